//! Errors surfaced by analysis and synthesis.

use std::path::PathBuf;

/// Fatal conditions of a generation run. Soft mismatches (unmatched views,
/// controllers without actions, no static files) are never errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Two controllers map to the same generated field name.
    #[error("controller name collision: `{first}` and `{second}` both generate field `{field}`")]
    NameCollision {
        field: String,
        first: String,
        second: String,
    },
    /// A source file or the program snapshot could not be read or parsed.
    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },
}

impl GenerationError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
