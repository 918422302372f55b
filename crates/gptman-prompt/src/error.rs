//! Prompt document error types.

/// Result type alias for prompt document operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur while reading or writing prompt documents.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The opening or the closing `---` delimiter is missing.
    #[error("preamble not found: document must open and close its header with a '---' line")]
    PreambleNotFound,

    /// A header line has content but no `key: value` separator.
    #[error("malformed preamble entry on line {line}: '{content}' (expected 'key: value')")]
    MalformedEntry { line: usize, content: String },

    /// Failed to read a prompt file.
    #[error("failed to read prompt file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write a prompt file.
    #[error("failed to write prompt file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },
}
