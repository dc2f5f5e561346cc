//! File lifecycle: upload, listing/search and streamed retrieval.

pub mod download;
pub mod search;
pub mod service;

pub use download::FileDownload;
pub use search::{flatten_files, view_url};
pub use service::FileService;
