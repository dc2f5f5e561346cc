//! Streamed file retrieval result.

use docvault_storage::ByteStream;

/// An opened file ready to be streamed to the caller.
///
/// The stream owns its file handle; dropping the download closes it.
pub struct FileDownload {
    /// File content.
    pub stream: ByteStream,
    /// MIME type for the `Content-Type` header.
    pub content_type: String,
    /// Size in bytes, for `Content-Length`.
    pub size: u64,
    /// File name, for `Content-Disposition`.
    pub file_name: String,
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .field("file_name", &self.file_name)
            .finish()
    }
}
