//! API request and response types.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Assistants
// ─────────────────────────────────────────────────────────────────────────────

/// An assistant as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub model: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<AssistantTool>,
}

impl Assistant {
    /// Tool types enabled on this assistant.
    pub fn tool_types(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.kind.as_str()).collect()
    }
}

/// A tool entry. Only the tool type is carried; tool-specific settings are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantTool {
    #[serde(rename = "type")]
    pub kind: String,
}

impl AssistantTool {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// Body for creating or updating an assistant. Unset fields are left untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AssistantTool>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Threads and messages
// ─────────────────────────────────────────────────────────────────────────────

/// A conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
}

/// A message in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    pub role: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub created_at: i64,
}

/// One block of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: TextContent },
    ImageFile { image_file: ImageFile },
    ImageUrl { image_url: ImageUrl },
}

impl ContentBlock {
    /// Create a text block.
    pub fn text(value: impl Into<String>) -> Self {
        ContentBlock::Text {
            text: TextContent {
                value: value.into(),
                annotations: Vec::new(),
            },
        }
    }

    /// Create an image file block.
    pub fn image_file(file_id: impl Into<String>) -> Self {
        ContentBlock::ImageFile {
            image_file: ImageFile {
                file_id: file_id.into(),
                detail: None,
            },
        }
    }

    /// Display string: the text value, the image file id, or the image URL.
    pub fn display_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => &text.value,
            ContentBlock::ImageFile { image_file } => &image_file.file_id,
            ContentBlock::ImageUrl { image_url } => &image_url.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Body for posting a message to a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub role: String,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl CreateMessageRequest {
    /// A plain-text user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
            attachments: Vec::new(),
        }
    }

    /// A user message made of content parts.
    pub fn user_parts(parts: Vec<MessagePart>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
            attachments: Vec::new(),
        }
    }

    /// Attach an uploaded file for the given tools.
    pub fn with_attachment(mut self, file_id: impl Into<String>, tools: &[&str]) -> Self {
        self.attachments.push(Attachment {
            file_id: file_id.into(),
            tools: tools.iter().map(|t| AssistantTool::new(*t)).collect(),
        });
        self
    }

    /// Text of the message, when it has any.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Parts(parts) => parts.iter().find_map(|p| match p {
                MessagePart::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }
}

impl From<&str> for CreateMessageRequest {
    fn from(text: &str) -> Self {
        Self::user(text)
    }
}

impl From<String> for CreateMessageRequest {
    fn from(text: String) -> Self {
        Self::user(text)
    }
}

/// Message content: a plain string or a list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

/// One part of outgoing message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ImageFile { image_file: ImageFile },
    ImageUrl { image_url: ImageUrl },
}

impl MessagePart {
    pub fn image_file(file_id: impl Into<String>) -> Self {
        MessagePart::ImageFile {
            image_file: ImageFile {
                file_id: file_id.into(),
                detail: None,
            },
        }
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_id: String,
    pub tools: Vec<AssistantTool>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Runs
// ─────────────────────────────────────────────────────────────────────────────

/// One invocation of an assistant against a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// Run lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
        }
    }

    /// Whether the run stopped without completing.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled | RunStatus::Failed | RunStatus::Incomplete | RunStatus::Expired
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported on a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub created_at: i64,
    pub filename: String,
    pub purpose: String,
}

/// Intended use of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    Assistants,
    Vision,
}

impl FilePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePurpose::Assistants => "assistants",
            FilePurpose::Vision => "vision",
        }
    }
}

/// Response to a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedObject {
    pub id: String,
    pub deleted: bool,
}

/// A page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_blocks_from_api() {
        let message: Message = serde_json::from_value(json!({
            "id": "msg_1",
            "object": "thread.message",
            "thread_id": "thread_1",
            "role": "assistant",
            "created_at": 1700000000,
            "content": [
                {"type": "text", "text": {"value": "Hello", "annotations": []}},
                {"type": "image_file", "image_file": {"file_id": "file_9"}},
                {
                    "type": "image_url",
                    "image_url": {"url": "https://example.com/a.png", "detail": "auto"}
                }
            ]
        }))
        .unwrap();

        let shown: Vec<_> = message.content.iter().map(|b| b.display_text()).collect();
        assert_eq!(shown, vec!["Hello", "file_9", "https://example.com/a.png"]);
    }

    #[test]
    fn test_unknown_content_block_is_rejected() {
        let result: Result<ContentBlock, _> =
            serde_json::from_value(json!({"type": "refusal", "refusal": "no"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_assistant_request_skips_unset_fields() {
        let request = AssistantRequest {
            name: Some("Helper".to_string()),
            instructions: Some("You are helpful.\n".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "Helper", "instructions": "You are helpful.\n"})
        );
    }

    #[test]
    fn test_message_request_shapes() {
        let plain = CreateMessageRequest::user("hi");
        assert_eq!(
            serde_json::to_value(&plain).unwrap(),
            json!({"role": "user", "content": "hi"})
        );

        let image = CreateMessageRequest::user_parts(vec![MessagePart::image_file("file_1")]);
        assert_eq!(
            serde_json::to_value(&image).unwrap(),
            json!({
                "role": "user",
                "content": [{"type": "image_file", "image_file": {"file_id": "file_1"}}]
            })
        );

        let attached = CreateMessageRequest::user("Here is a file you can refer.")
            .with_attachment("file_2", &["file_search"]);
        assert_eq!(
            serde_json::to_value(&attached).unwrap(),
            json!({
                "role": "user",
                "content": "Here is a file you can refer.",
                "attachments": [{"file_id": "file_2", "tools": [{"type": "file_search"}]}]
            })
        );
    }

    #[test]
    fn test_assistant_tools_ignore_settings() {
        let assistant: Assistant = serde_json::from_value(json!({
            "id": "asst_1",
            "model": "gpt-4o",
            "name": null,
            "tools": [
                {"type": "code_interpreter"},
                {"type": "file_search", "file_search": {"max_num_results": 5}}
            ]
        }))
        .unwrap();
        assert_eq!(
            assistant.tool_types(),
            vec!["code_interpreter", "file_search"]
        );
        assert!(assistant.name.is_none());
    }

    #[test]
    fn test_run_status_strings() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_1",
            "status": "requires_action"
        }))
        .unwrap();
        assert_eq!(run.status, RunStatus::RequiresAction);
        assert_eq!(run.status.to_string(), "requires_action");
        assert!(!run.status.is_terminal_failure());
        assert!(RunStatus::Expired.is_terminal_failure());
    }
}
