//! Folder lifecycle: create, rename, delete, tree and id lookup.

pub mod service;

pub use service::FolderService;
