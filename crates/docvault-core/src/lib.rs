//! # docvault-core
//!
//! Core crate for DocVault. Contains the configuration schema, the node
//! types describing the folder tree, stable item identifiers, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other DocVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
