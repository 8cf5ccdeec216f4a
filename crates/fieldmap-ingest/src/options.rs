use serde::{Deserialize, Serialize};

/// Default nesting depth explored by JSON and XML inference.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Tuning knobs for field inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferOptions {
    /// Levels below this depth are truncated to an empty subtree.
    pub max_depth: usize,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InferOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
