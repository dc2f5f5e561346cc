//! Core type definitions used across the DocVault workspace.

pub mod file_ref;
pub mod id;
pub mod node;

pub use file_ref::FileRef;
pub use id::ItemId;
pub use node::{Node, NodeKind};
