//! Conversation state for the interactive shell.

use std::path::Path;
use std::sync::Arc;

use gptman_client::{
    AssistantsBackend, CreateMessageRequest, Error, FileObject, MessagePart, Result, RunPoller,
};

use super::attachments::UploadKind;

/// Text posted alongside a `/file` upload.
pub const FILE_MESSAGE: &str = "Here is a file you can refer.";

/// Output of one assistant in a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub assistant_id: String,
    pub output: String,
}

/// Steps finished in a turn, and the error that stopped it early.
#[derive(Debug, Default)]
pub struct Turn {
    pub steps: Vec<Step>,
    pub error: Option<Error>,
}

impl Turn {
    /// The steps when every assistant answered, the error otherwise.
    pub fn into_result(self) -> Result<Vec<Step>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.steps),
        }
    }
}

/// One conversation: the assistants being queried, the thread and mode flags.
///
/// A turn walks the assistant ids in order. Each step posts the current text
/// to the thread, runs that assistant and carries its reply forward as the
/// next step's input.
pub struct Session {
    backend: Arc<dyn AssistantsBackend>,
    poller: RunPoller,
    assistants: Vec<String>,
    thread_id: String,
    debug: bool,
    renew: bool,
}

impl Session {
    /// Create a session on a fresh thread.
    pub async fn start(
        backend: Arc<dyn AssistantsBackend>,
        assistants: Vec<String>,
        poller: RunPoller,
    ) -> Result<Self> {
        let thread = backend.create_thread().await?;
        tracing::debug!(thread_id = %thread.id, "session started");
        Ok(Self {
            backend,
            poller,
            assistants,
            thread_id: thread.id,
            debug: false,
            renew: false,
        })
    }

    pub fn assistants(&self) -> &[String] {
        &self.assistants
    }

    /// Replace the assistant target. An empty list is ignored.
    pub fn set_assistants(&mut self, assistants: Vec<String>) -> bool {
        if assistants.is_empty() {
            return false;
        }
        self.assistants = assistants;
        true
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn renew(&self) -> bool {
        self.renew
    }

    pub fn set_renew(&mut self, renew: bool) {
        self.renew = renew;
    }

    /// Switch to a fresh thread.
    pub async fn new_thread(&mut self) -> Result<&str> {
        let thread = self.backend.create_thread().await?;
        tracing::debug!(old = %self.thread_id, new = %thread.id, "switched thread");
        self.thread_id = thread.id;
        Ok(&self.thread_id)
    }

    /// Send free text through the assistant chain.
    pub async fn ask(&mut self, text: &str) -> Turn {
        self.turn(CreateMessageRequest::user(text)).await
    }

    /// Run a turn whose first message is `first`. Later steps post the previous reply.
    ///
    /// A failing step stops the chain; the steps before it are kept.
    pub async fn turn(&mut self, first: CreateMessageRequest) -> Turn {
        let assistants = self.assistants.clone();
        let mut turn = Turn {
            steps: Vec::with_capacity(assistants.len()),
            error: None,
        };
        let mut request = first;

        for assistant_id in assistants {
            match self.step(&request, &assistant_id).await {
                Ok(output) => {
                    request = CreateMessageRequest::user(output.as_str());
                    turn.steps.push(Step {
                        assistant_id,
                        output,
                    });
                }
                Err(e) => {
                    tracing::debug!(assistant_id = %assistant_id, error = %e, "turn stopped");
                    turn.error = Some(e);
                    break;
                }
            }
        }

        turn
    }

    async fn step(&mut self, request: &CreateMessageRequest, assistant_id: &str) -> Result<String> {
        if self.renew {
            self.new_thread().await?;
        }

        let message = self.backend.create_message(&self.thread_id, request).await?;
        tracing::debug!(
            message_id = %message.id,
            thread_id = %self.thread_id,
            "posted message"
        );

        self.poller
            .run(self.backend.as_ref(), &self.thread_id, assistant_id)
            .await
    }

    /// Upload a validated file and send it through the chain.
    ///
    /// Images go in as `image_file` content; documents as an attachment
    /// for file search.
    pub async fn attach(&mut self, path: &Path, kind: UploadKind) -> Result<(FileObject, Turn)> {
        let file = self.backend.upload_file(path, kind.purpose()).await?;
        tracing::debug!(
            file_id = %file.id,
            filename = %file.filename,
            "uploaded attachment"
        );

        let request = match kind {
            UploadKind::Image => {
                CreateMessageRequest::user_parts(vec![MessagePart::image_file(&file.id)])
            }
            UploadKind::Document => {
                CreateMessageRequest::user(FILE_MESSAGE).with_attachment(&file.id, &["file_search"])
            }
        };
        let turn = self.turn(request).await;
        Ok((file, turn))
    }

    pub async fn list_files(&self) -> Result<Vec<FileObject>> {
        self.backend.list_files().await
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<bool> {
        Ok(self.backend.delete_file(file_id).await?.deleted)
    }

    pub async fn file_status(&self, file_id: &str) -> Result<FileObject> {
        self.backend.retrieve_file(file_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gptman_client::{MessageContent, MockBackend, MockCall, RunStatus};

    async fn session(backend: &Arc<MockBackend>, assistants: &[&str]) -> Session {
        Session::start(
            backend.clone(),
            assistants.iter().map(|a| a.to_string()).collect(),
            RunPoller::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_single_assistant_turn() {
        let backend = Arc::new(MockBackend::new());
        let mut session = session(&backend, &["asst_a"]).await;

        let steps = session.ask("hello").await.into_result().unwrap();
        assert_eq!(
            steps,
            vec![Step {
                assistant_id: "asst_a".to_string(),
                output: "asst_a: hello".to_string()
            }]
        );
        assert_eq!(backend.posted_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_chain_feeds_output_forward() {
        let backend = Arc::new(MockBackend::new());
        let mut session = session(&backend, &["asst_a", "asst_b"]).await;

        let steps = session.ask("draft").await.into_result().unwrap();
        let outputs: Vec<_> = steps.iter().map(|s| s.output.as_str()).collect();
        assert_eq!(outputs, vec!["asst_a: draft", "asst_b: asst_a: draft"]);

        let posted = backend.posted_messages();
        assert_eq!(posted[1].1.text(), Some("asst_a: draft"));
        // Without renew every step shares the session thread.
        assert!(posted.iter().all(|(thread, _)| thread == session.thread_id()));
    }

    #[tokio::test]
    async fn test_renew_creates_thread_per_step() {
        let backend = Arc::new(MockBackend::new());
        let mut session = session(&backend, &["asst_a", "asst_b"]).await;
        let first_thread = session.thread_id().to_string();
        session.set_renew(true);

        session.ask("draft").await.into_result().unwrap();

        assert_eq!(
            backend.count_calls(|c| matches!(c, MockCall::CreateThread)),
            3
        );
        let posted = backend.posted_messages();
        assert_ne!(posted[0].0, first_thread);
        assert_ne!(posted[0].0, posted[1].0);
        assert_eq!(session.thread_id(), posted[1].0);
    }

    #[tokio::test]
    async fn test_failed_step_keeps_earlier_outputs() {
        let backend =
            Arc::new(MockBackend::new().with_statuses([RunStatus::Completed, RunStatus::Failed]));
        let mut session = session(&backend, &["asst_a", "asst_b", "asst_c"]).await;

        let turn = session.ask("draft").await;

        assert_eq!(
            turn.steps,
            vec![Step {
                assistant_id: "asst_a".to_string(),
                output: "asst_a: draft".to_string()
            }]
        );
        assert!(matches!(turn.error, Some(Error::RunEnded { .. })));
        // The third assistant is never asked.
        assert_eq!(backend.posted_messages().len(), 2);
    }

    #[tokio::test]
    async fn test_set_assistants_rejects_empty() {
        let backend = Arc::new(MockBackend::new());
        let mut session = session(&backend, &["asst_a"]).await;
        assert!(!session.set_assistants(Vec::new()));
        assert_eq!(session.assistants(), ["asst_a".to_string()]);
        assert!(session.set_assistants(vec!["asst_b".to_string()]));
        assert_eq!(session.assistants(), ["asst_b".to_string()]);
    }

    #[tokio::test]
    async fn test_attach_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Notes").unwrap();

        let backend = Arc::new(MockBackend::new().with_reply("Got it"));
        let mut session = session(&backend, &["asst_a"]).await;
        let (file, turn) = session.attach(&path, UploadKind::Document).await.unwrap();
        let steps = turn.into_result().unwrap();

        assert_eq!(file.purpose, "assistants");
        assert_eq!(steps[0].output, "Got it");
        let (_, request) = &backend.posted_messages()[0];
        assert_eq!(
            request.content,
            MessageContent::Text(FILE_MESSAGE.to_string())
        );
        assert_eq!(request.attachments[0].file_id, file.id);
        assert_eq!(request.attachments[0].tools[0].kind, "file_search");
    }

    #[tokio::test]
    async fn test_attach_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, [0u8; 8]).unwrap();

        let backend = Arc::new(MockBackend::new());
        let mut session = session(&backend, &["asst_a"]).await;
        let (file, _) = session.attach(&path, UploadKind::Image).await.unwrap();

        assert_eq!(file.purpose, "vision");
        let (_, request) = &backend.posted_messages()[0];
        assert_eq!(
            request.content,
            MessageContent::Parts(vec![MessagePart::image_file(&file.id)])
        );
        assert!(request.attachments.is_empty());
    }

    #[tokio::test]
    async fn test_new_thread() {
        let backend = Arc::new(MockBackend::new());
        let mut session = session(&backend, &["asst_a"]).await;
        let before = session.thread_id().to_string();
        let after = session.new_thread().await.unwrap().to_string();
        assert_ne!(before, after);
        assert_eq!(session.thread_id(), after);
    }
}
