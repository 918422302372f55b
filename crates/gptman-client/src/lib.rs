//! Typed client for the OpenAI Assistants API.
//!
//! Works against OpenAI directly or an Azure OpenAI resource.
//!
//! # Example
//!
//! ```no_run
//! use gptman_client::{GptmanClient, Result, RunPoller};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<()> {
//! let client = GptmanClient::builder().openai("sk-...").build()?;
//!
//! for assistant in client.assistants().list().await? {
//!     println!("{} ({})", assistant.name.unwrap_or_default(), assistant.id);
//! }
//!
//! // Ask an assistant one question
//! let thread = client.threads().create().await?;
//! client
//!     .messages()
//!     .create(&thread.id, &"Hello!".into())
//!     .await?;
//! let reply = RunPoller::new(Duration::from_secs(60))
//!     .run(&client, &thread.id, "asst_abc123")
//!     .await?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```
//!
//! The shell talks to the remote side through [`AssistantsBackend`], which
//! [`GptmanClient`] and the scriptable [`MockBackend`] both implement.

pub mod api;
pub mod backend;
pub mod client;
pub mod error;
pub mod run;
pub mod types;

pub use backend::{AssistantsBackend, MockBackend, MockCall};
pub use client::{ClientBuilder, DEFAULT_API_VERSION, DEFAULT_OPENAI_BASE_URL, GptmanClient};
pub use error::{Error, Result};
pub use run::{
    DEFAULT_POLL_INTERVAL, DEFAULT_RUN_TIMEOUT, RunPoller, format_content, generated_content,
};
pub use types::*;
