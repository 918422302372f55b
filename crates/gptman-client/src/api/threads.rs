//! Threads API.

use crate::client::GptmanClient;
use crate::error::Result;
use crate::types::Thread;

/// Threads API client.
pub struct ThreadsApi {
    client: GptmanClient,
}

impl ThreadsApi {
    pub(crate) fn new(client: GptmanClient) -> Self {
        Self { client }
    }

    /// Create an empty thread.
    pub async fn create(&self) -> Result<Thread> {
        let thread: Thread = self.client.post("threads", &serde_json::json!({})).await?;
        tracing::debug!(thread_id = %thread.id, "created thread");
        Ok(thread)
    }
}
