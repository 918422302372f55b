//! Assistants API.

use crate::client::GptmanClient;
use crate::error::Result;
use crate::types::{Assistant, AssistantRequest, ListResponse};

/// Page size used when listing assistants.
const PAGE_LIMIT: &str = "100";

/// Assistants API client.
pub struct AssistantsApi {
    client: GptmanClient,
}

impl AssistantsApi {
    pub(crate) fn new(client: GptmanClient) -> Self {
        Self { client }
    }

    /// Create an assistant.
    pub async fn create(&self, request: &AssistantRequest) -> Result<Assistant> {
        self.client.post("assistants", request).await
    }

    /// Update an existing assistant.
    pub async fn update(&self, id: &str, request: &AssistantRequest) -> Result<Assistant> {
        self.client
            .post(&format!("assistants/{}", id), request)
            .await
    }

    /// Get an assistant by ID.
    pub async fn retrieve(&self, id: &str) -> Result<Assistant> {
        self.client.get(&format!("assistants/{}", id)).await
    }

    /// List all assistants, following pagination to the end.
    pub async fn list(&self) -> Result<Vec<Assistant>> {
        let mut assistants = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query = vec![("limit", PAGE_LIMIT.to_string())];
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let page: ListResponse<Assistant> =
                self.client.get_with_query("assistants", &query).await?;
            let has_more = page.has_more;
            let next = page
                .last_id
                .clone()
                .or_else(|| page.data.last().map(|a| a.id.clone()));
            assistants.extend(page.data);

            match next {
                Some(cursor) if has_more => after = Some(cursor),
                _ => break,
            }
        }

        tracing::debug!(count = assistants.len(), "listed assistants");
        Ok(assistants)
    }
}
