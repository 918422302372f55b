//! Prompt documents for gptman.
//!
//! A prompt document is a markdown file whose preamble carries the remote
//! assistant's settings and whose body is the assistant's instructions:
//!
//! ```markdown
//! ---
//! id: asst_abc123
//! name: Helper
//! model: gpt-4o
//! tools: file_search code_interpreter
//! ---
//! You are a helpful assistant.
//! ```
//!
//! [`preamble`] holds the codec for the `---` block, [`document`] the typed
//! view used by the CLI and the file helpers.

pub mod document;
pub mod error;
pub mod preamble;

pub use document::{PromptDocument, read_prompt_file, write_prompt_file};
pub use error::{PromptError, Result};
pub use preamble::{DELIMITER, Preamble, parse_preamble, write_preamble};
