//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Builds a gzip compression layer. File streams are compressed too when the
/// client asks for it.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new().gzip(true)
}
