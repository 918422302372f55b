//! Runs API.

use crate::client::GptmanClient;
use crate::error::Result;
use crate::types::Run;

/// Runs API client.
pub struct RunsApi {
    client: GptmanClient,
}

impl RunsApi {
    pub(crate) fn new(client: GptmanClient) -> Self {
        Self { client }
    }

    /// Start a run of an assistant on a thread.
    pub async fn create(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        self.client
            .post(
                &format!("threads/{}/runs", thread_id),
                &serde_json::json!({ "assistant_id": assistant_id }),
            )
            .await
    }

    /// Get the current state of a run.
    pub async fn retrieve(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.client
            .get(&format!("threads/{}/runs/{}", thread_id, run_id))
            .await
    }
}
