//! Path sanitizing for caller-supplied names and logical paths.
//!
//! Every physical path used anywhere in DocVault is produced here. Unsafe
//! input is rejected with a validation error, never rewritten:
//!
//! 1. **Lexical checks**: separators in names, absolute paths, drive
//!    prefixes, `..` segments, NUL bytes and overlong segments.
//! 2. **Containment check**: the deepest existing ancestor of the joined
//!    path is canonicalized (resolving symlinks) and must still lie under
//!    the canonical storage root. Dangling symlinks are rejected outright.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::node::join_logical;

/// Longest accepted single path segment, in bytes.
pub const MAX_SEGMENT_BYTES: usize = 255;

/// A validated single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafeName(String);

impl SafeName {
    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SafeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SafeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logical path paired with its physical location under the storage root.
///
/// Only [`PathSanitizer`] can construct one, so holding a `SafePath` means
/// the location was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath {
    logical: String,
    physical: PathBuf,
}

impl SafePath {
    /// Root-relative, forward-slash logical path.
    pub fn logical(&self) -> &str {
        &self.logical
    }

    /// Absolute physical path.
    pub fn physical(&self) -> &Path {
        &self.physical
    }

    /// Last segment of the logical path.
    pub fn name(&self) -> &str {
        self.logical
            .rsplit_once('/')
            .map_or(self.logical.as_str(), |(_, name)| name)
    }

    /// Logical path of the parent, or `None` for root-level items.
    pub fn parent_logical(&self) -> Option<&str> {
        self.logical.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// First segment of the logical path, i.e. the root folder it lives in.
    pub fn root_segment(&self) -> &str {
        self.logical
            .split_once('/')
            .map_or(self.logical.as_str(), |(first, _)| first)
    }

    /// Append an already sanitized name.
    ///
    /// Nothing on disk is inspected, so the result must only be used where
    /// following a symlink at the final component is impossible (existence
    /// probes via `symlink_metadata`, `rename`, exclusive creation).
    pub fn child(&self, name: &SafeName) -> SafePath {
        SafePath {
            logical: join_logical(Some(&self.logical), name.as_str()),
            physical: self.physical.join(name.as_str()),
        }
    }

    /// The entry named `name` in the same folder as this one. Same caveat as
    /// [`SafePath::child`].
    pub fn sibling(&self, name: &SafeName) -> SafePath {
        SafePath {
            logical: join_logical(self.parent_logical(), name.as_str()),
            physical: self.physical.with_file_name(name.as_str()),
        }
    }
}

/// Validates caller input against a single storage root.
#[derive(Debug, Clone)]
pub struct PathSanitizer {
    /// Canonical storage root.
    root: PathBuf,
}

impl PathSanitizer {
    /// Create a sanitizer for an existing root directory.
    pub async fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref();
        let root = fs::canonicalize(root).await.map_err(|e| {
            AppError::from_io(e, "resolve storage root", &root.display().to_string())
        })?;
        Ok(Self { root })
    }

    /// Canonical storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a name field: it must be exactly one path segment.
    pub fn sanitize_name(&self, name: &str) -> AppResult<SafeName> {
        sanitize_name(name)
    }

    /// Resolve a folder/item path field to a strict descendant of the root.
    pub async fn resolve(&self, path: &str) -> AppResult<SafePath> {
        let segments = split_logical(path)?;
        let logical = segments.join("/");
        let physical = segments
            .iter()
            .fold(self.root.clone(), |acc, segment| acc.join(segment));
        self.ensure_contained(&physical).await?;
        Ok(SafePath { logical, physical })
    }

    /// Resolve `name` inside `parent`, or directly under the storage root
    /// when `parent` is `None`.
    pub async fn join(&self, parent: Option<&SafePath>, name: &SafeName) -> AppResult<SafePath> {
        let (logical, physical) = match parent {
            Some(parent) => (
                join_logical(Some(parent.logical()), name.as_str()),
                parent.physical().join(name.as_str()),
            ),
            None => (name.as_str().to_string(), self.root.join(name.as_str())),
        };
        self.ensure_contained(&physical).await?;
        Ok(SafePath { logical, physical })
    }

    /// Check that the deepest existing ancestor of `physical` resolves
    /// inside the root.
    async fn ensure_contained(&self, physical: &Path) -> AppResult<()> {
        let mut probe = physical;
        loop {
            if probe == self.root.as_path() || !probe.starts_with(&self.root) {
                return Ok(());
            }
            match fs::symlink_metadata(probe).await {
                Ok(_) => {
                    let canonical = fs::canonicalize(probe).await.map_err(|e| {
                        if e.kind() == io::ErrorKind::NotFound {
                            AppError::validation("Path contains a dangling link")
                        } else {
                            AppError::from_io(e, "resolve path", &probe.display().to_string())
                        }
                    })?;
                    if canonical.starts_with(&self.root) {
                        return Ok(());
                    }
                    return Err(AppError::validation("Path resolves outside the storage root"));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => match probe.parent() {
                    Some(parent) => probe = parent,
                    None => return Ok(()),
                },
                Err(e) => {
                    return Err(AppError::from_io(
                        e,
                        "inspect path",
                        &probe.display().to_string(),
                    ));
                }
            }
        }
    }
}

/// Validate a name field: it must be exactly one path segment.
pub fn sanitize_name(name: &str) -> AppResult<SafeName> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(AppError::validation(format!(
            "Name must not contain path separators: '{name}'"
        )));
    }
    check_segment(name)?;
    Ok(SafeName(name.to_string()))
}

/// Split a logical path into validated segments.
///
/// Both `/` and `\` separate segments. Trailing separators and `.` segments
/// are ignored; everything unsafe is rejected.
pub fn split_logical(path: &str) -> AppResult<Vec<&str>> {
    if path.trim().is_empty() {
        return Err(AppError::validation("Path cannot be empty"));
    }
    if path.starts_with(['/', '\\']) || has_drive_prefix(path) {
        return Err(AppError::validation(format!(
            "Absolute paths are not allowed: '{path}'"
        )));
    }

    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(AppError::validation(format!(
                    "Parent directory references are not allowed: '{path}'"
                )));
            }
            _ => {
                check_segment(segment)?;
                segments.push(segment);
            }
        }
    }

    if segments.is_empty() {
        return Err(AppError::validation(format!(
            "Path must name an item below the storage root: '{path}'"
        )));
    }
    Ok(segments)
}

fn check_segment(segment: &str) -> AppResult<()> {
    if segment == "." || segment == ".." {
        return Err(AppError::validation(format!("Invalid name: '{segment}'")));
    }
    if segment.contains('\0') {
        return Err(AppError::validation("Names must not contain NUL bytes"));
    }
    if segment.len() > MAX_SEGMENT_BYTES {
        return Err(AppError::validation(format!(
            "Name exceeds {MAX_SEGMENT_BYTES} bytes"
        )));
    }
    Ok(())
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
