//! # docvault-storage
//!
//! Everything that touches the physical storage root: the path sanitizer
//! that keeps callers inside it, the tree builder that turns it into
//! [`Node`](docvault_core::types::Node)s, the local filesystem primitives,
//! the stable item index and the striped mutation locks.

pub mod content_type;
pub mod index;
pub mod local;
pub mod locks;
pub mod sanitizer;
pub mod tree;

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;

pub use index::ItemIndex;
pub use local::LocalStore;
pub use locks::PathLocks;
pub use sanitizer::{PathSanitizer, SafeName, SafePath};
pub use tree::TreeBuilder;

/// A byte stream type used for reading file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;
