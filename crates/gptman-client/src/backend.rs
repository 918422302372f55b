//! Backend abstraction used by the interactive session.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::client::GptmanClient;
use crate::error::{Error, Result};
use crate::types::{
    ContentBlock, CreateMessageRequest, DeletedObject, FileObject, FilePurpose, Message, Run,
    RunStatus, Thread,
};

/// Remote operations a conversation needs.
#[async_trait]
pub trait AssistantsBackend: Send + Sync {
    async fn create_thread(&self) -> Result<Thread>;

    async fn create_message(
        &self,
        thread_id: &str,
        request: &CreateMessageRequest,
    ) -> Result<Message>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Most recent message in the thread, if any.
    async fn latest_message(&self, thread_id: &str) -> Result<Option<Message>>;

    async fn upload_file(&self, path: &Path, purpose: FilePurpose) -> Result<FileObject>;

    async fn list_files(&self) -> Result<Vec<FileObject>>;

    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject>;

    async fn delete_file(&self, file_id: &str) -> Result<DeletedObject>;
}

#[async_trait]
impl AssistantsBackend for GptmanClient {
    async fn create_thread(&self) -> Result<Thread> {
        self.threads().create().await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: &CreateMessageRequest,
    ) -> Result<Message> {
        self.messages().create(thread_id, request).await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        self.runs().create(thread_id, assistant_id).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.runs().retrieve(thread_id, run_id).await
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<Message>> {
        self.messages().latest(thread_id).await
    }

    async fn upload_file(&self, path: &Path, purpose: FilePurpose) -> Result<FileObject> {
        self.files().upload(path, purpose).await
    }

    async fn list_files(&self) -> Result<Vec<FileObject>> {
        self.files().list().await
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject> {
        self.files().retrieve(file_id).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<DeletedObject> {
        self.files().delete(file_id).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend (for testing)
// ─────────────────────────────────────────────────────────────────────────────

/// A call recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    CreateThread,
    CreateMessage {
        thread_id: String,
        request: CreateMessageRequest,
    },
    CreateRun {
        thread_id: String,
        assistant_id: String,
    },
    RetrieveRun { thread_id: String, run_id: String },
    LatestMessage { thread_id: String },
    UploadFile { path: PathBuf, purpose: FilePurpose },
    ListFiles,
    RetrieveFile { file_id: String },
    DeleteFile { file_id: String },
}

#[derive(Debug, Default)]
struct MockThread {
    last_user_text: String,
    last_assistant: String,
}

/// In-memory backend with scripted behavior for tests.
///
/// Run statuses are handed out in order and the last one repeats; with none
/// scripted every run completes at once. Replies are handed out in order; once
/// they run out the backend answers `"{assistant_id}: {last user text}"`.
#[derive(Debug, Default)]
pub struct MockBackend {
    statuses: Mutex<VecDeque<RunStatus>>,
    replies: Mutex<VecDeque<Vec<ContentBlock>>>,
    threads: Mutex<HashMap<String, MockThread>>,
    files: Mutex<Vec<FileObject>>,
    calls: Mutex<Vec<MockCall>>,
    next_id: AtomicUsize,
}

impl MockBackend {
    /// Create a mock whose runs complete immediately and echo the input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the statuses observed for runs.
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        *lock(&self.statuses) = statuses.into_iter().collect();
        self
    }

    /// Queue a single-text reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_reply_blocks(vec![ContentBlock::text(text)])
    }

    /// Queue a reply made of arbitrary content blocks.
    pub fn with_reply_blocks(self, blocks: Vec<ContentBlock>) -> Self {
        lock(&self.replies).push_back(blocks);
        self
    }

    /// Pre-populate the file store.
    pub fn with_file(self, file: FileObject) -> Self {
        lock(&self.files).push(file);
        self
    }

    /// Number of calls matching a predicate.
    pub fn count_calls(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| predicate(c)).count()
    }

    /// Messages posted so far, in order.
    pub fn posted_messages(&self) -> Vec<(String, CreateMessageRequest)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                MockCall::CreateMessage { thread_id, request } => {
                    Some((thread_id.clone(), request.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}_{}", prefix, n)
    }

    fn next_status(&self) -> RunStatus {
        let mut statuses = lock(&self.statuses);
        if statuses.len() > 1 {
            statuses.pop_front().unwrap_or(RunStatus::Completed)
        } else {
            statuses.front().copied().unwrap_or(RunStatus::Completed)
        }
    }

    fn run(&self, id: String, thread_id: &str, assistant_id: &str) -> Run {
        Run {
            id,
            thread_id: thread_id.to_string(),
            assistant_id: assistant_id.to_string(),
            status: self.next_status(),
            created_at: 0,
            last_error: None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AssistantsBackend for MockBackend {
    async fn create_thread(&self) -> Result<Thread> {
        self.record(MockCall::CreateThread);
        let id = self.next_id("thread");
        lock(&self.threads).insert(id.clone(), MockThread::default());
        Ok(Thread { id, created_at: 0 })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: &CreateMessageRequest,
    ) -> Result<Message> {
        self.record(MockCall::CreateMessage {
            thread_id: thread_id.to_string(),
            request: request.clone(),
        });
        let mut threads = lock(&self.threads);
        let thread = threads
            .get_mut(thread_id)
            .ok_or_else(|| Error::NotFound(format!("No thread found with id '{}'.", thread_id)))?;
        if let Some(text) = request.text() {
            thread.last_user_text = text.to_string();
        }
        Ok(Message {
            id: self.next_id("msg"),
            thread_id: thread_id.to_string(),
            role: request.role.clone(),
            content: Vec::new(),
            created_at: 0,
        })
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        self.record(MockCall::CreateRun {
            thread_id: thread_id.to_string(),
            assistant_id: assistant_id.to_string(),
        });
        let mut threads = lock(&self.threads);
        let thread = threads
            .get_mut(thread_id)
            .ok_or_else(|| Error::NotFound(format!("No thread found with id '{}'.", thread_id)))?;
        thread.last_assistant = assistant_id.to_string();
        drop(threads);
        Ok(self.run(self.next_id("run"), thread_id, assistant_id))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.record(MockCall::RetrieveRun {
            thread_id: thread_id.to_string(),
            run_id: run_id.to_string(),
        });
        let assistant_id = lock(&self.threads)
            .get(thread_id)
            .map(|t| t.last_assistant.clone())
            .unwrap_or_default();
        Ok(self.run(run_id.to_string(), thread_id, &assistant_id))
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<Message>> {
        self.record(MockCall::LatestMessage {
            thread_id: thread_id.to_string(),
        });
        let content = match lock(&self.replies).pop_front() {
            Some(blocks) => blocks,
            None => {
                let threads = lock(&self.threads);
                let Some(thread) = threads.get(thread_id) else {
                    return Ok(None);
                };
                vec![ContentBlock::text(format!(
                    "{}: {}",
                    thread.last_assistant, thread.last_user_text
                ))]
            }
        };
        Ok(Some(Message {
            id: self.next_id("msg"),
            thread_id: thread_id.to_string(),
            role: "assistant".to_string(),
            content,
            created_at: 0,
        }))
    }

    async fn upload_file(&self, path: &Path, purpose: FilePurpose) -> Result<FileObject> {
        self.record(MockCall::UploadFile {
            path: path.to_path_buf(),
            purpose,
        });
        let bytes = std::fs::metadata(path)?.len();
        let file = FileObject {
            id: self.next_id("file"),
            bytes,
            created_at: 0,
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            purpose: purpose.as_str().to_string(),
        };
        lock(&self.files).push(file.clone());
        Ok(file)
    }

    async fn list_files(&self) -> Result<Vec<FileObject>> {
        self.record(MockCall::ListFiles);
        Ok(lock(&self.files).clone())
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject> {
        self.record(MockCall::RetrieveFile {
            file_id: file_id.to_string(),
        });
        lock(&self.files)
            .iter()
            .find(|f| f.id == file_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("No such File object: {}", file_id)))
    }

    async fn delete_file(&self, file_id: &str) -> Result<DeletedObject> {
        self.record(MockCall::DeleteFile {
            file_id: file_id.to_string(),
        });
        let mut files = lock(&self.files);
        let before = files.len();
        files.retain(|f| f.id != file_id);
        Ok(DeletedObject {
            id: file_id.to_string(),
            deleted: files.len() < before,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
