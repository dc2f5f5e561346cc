//! Activity feed configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-memory activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Maximum number of entries kept; the oldest are evicted first.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    500
}
