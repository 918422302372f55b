//! Messages API.

use crate::client::GptmanClient;
use crate::error::Result;
use crate::types::{CreateMessageRequest, ListResponse, Message};

/// Messages API client.
pub struct MessagesApi {
    client: GptmanClient,
}

impl MessagesApi {
    pub(crate) fn new(client: GptmanClient) -> Self {
        Self { client }
    }

    /// Post a message to a thread.
    pub async fn create(&self, thread_id: &str, request: &CreateMessageRequest) -> Result<Message> {
        self.client
            .post(&format!("threads/{}/messages", thread_id), request)
            .await
    }

    /// The most recent message in a thread.
    pub async fn latest(&self, thread_id: &str) -> Result<Option<Message>> {
        let page: ListResponse<Message> = self
            .client
            .get_with_query(
                &format!("threads/{}/messages", thread_id),
                &[("order", "desc"), ("limit", "1")],
            )
            .await?;
        Ok(page.data.into_iter().next())
    }
}
