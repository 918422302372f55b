//! Interactive assistant shell.

pub mod attachments;
pub mod commands;
pub mod prefix;
pub mod session;

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local};
use console::{Style, style};
use gptman_client::{AssistantsBackend, CreateMessageRequest, FileObject, GptmanClient, RunPoller};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use attachments::UploadKind;
use commands::{COMMANDS, CommandKind, lookup, parse_truthy};
use prefix::{Alias, PrefixParser};
use session::{Session, Step, Turn};

/// History file name, kept in the home directory.
const HISTORY_FILE: &str = ".gptman_history";

const HISTORY_SIZE: usize = 1000;

const ASSISTANT_WAIT: &str = "Waiting for the assistant...";
const FILES_WAIT: &str = "Talking to the files API...";
const THREAD_WAIT: &str = "Creating a thread...";

/// What the read loop does after a line is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

/// Read-eval-print loop over a [`Session`].
pub struct AssistantShell {
    session: Session,
    parser: PrefixParser,
    out: Box<dyn Write + Send>,
    spinner: bool,
}

impl AssistantShell {
    pub fn new(session: Session, out: Box<dyn Write + Send>) -> Self {
        Self {
            session,
            parser: PrefixParser::default().with_shell_escape(false),
            out,
            spinner: false,
        }
    }

    /// Show a spinner while waiting on the remote side.
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.spinner = enabled;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the loop until `/quit`, Ctrl-C or end of input.
    pub async fn run(&mut self) -> Result<()> {
        let config = Config::builder()
            .max_history_size(HISTORY_SIZE)?
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();
        let mut editor: Editor<(), DefaultHistory> = Editor::with_config(config)?;

        let history = history_path();
        if let Some(path) = &history
            && let Err(e) = editor.load_history(path)
        {
            tracing::debug!(path = %path.display(), error = %e, "no history loaded");
        }

        self.print_welcome()?;

        loop {
            let prompt = self.prompt();
            match editor.readline(&prompt) {
                Ok(line) => match self.handle_line(&line).await {
                    Ok(ControlFlow::Continue) => continue,
                    Ok(ControlFlow::Exit) => break,
                    Err(e) => self.print_error(&format!("{:#}", e))?,
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    writeln!(self.out)?;
                    break;
                }
                Err(e) => {
                    self.print_error(&format!("Input error: {}", e))?;
                    break;
                }
            }
        }

        if let Some(path) = &history
            && let Err(e) = editor.save_history(path)
        {
            tracing::warn!(path = %path.display(), error = %e, "failed to save history");
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        format!("[{}] User> ", self.session.assistants().join(" "))
    }

    /// Classify one input line and act on it.
    pub async fn handle_line(&mut self, line: &str) -> Result<ControlFlow> {
        let parsed = self.parser.parse_line(line);

        if parsed.alias == Some(Alias::Help) {
            self.print_help(parsed.help_topic().unwrap_or_default())?;
            return Ok(ControlFlow::Continue);
        }

        match parsed.command.as_deref() {
            Some(name) if !name.is_empty() => {
                let argument = parsed.argument.as_deref().unwrap_or_default();
                self.dispatch(name, argument).await
            }
            _ if parsed.line.is_empty() => Ok(ControlFlow::Continue),
            _ => self.chat(CreateMessageRequest::user(parsed.line)).await,
        }
    }

    async fn dispatch(&mut self, name: &str, argument: &str) -> Result<ControlFlow> {
        let Some(entry) = lookup(name) else {
            self.print_error(&format!("Unknown command: /{}", name))?;
            self.print_dim("Type /help for available commands")?;
            return Ok(ControlFlow::Continue);
        };

        tracing::debug!(command = entry.name, argument, "shell command");
        match entry.kind {
            CommandKind::Quit => return Ok(ControlFlow::Exit),
            CommandKind::Help => self.print_help(argument)?,
            CommandKind::Debug => {
                if !argument.is_empty() {
                    self.session.set_debug(parse_truthy(argument));
                }
                let state = on_off(self.session.debug());
                writeln!(self.out, "debug: {}", state)?;
            }
            CommandKind::Renew => {
                if !argument.is_empty() {
                    self.session.set_renew(parse_truthy(argument));
                }
                let state = on_off(self.session.renew());
                writeln!(self.out, "renew: {}", state)?;
            }
            CommandKind::Assistant => {
                let ids: Vec<String> = argument.split_whitespace().map(str::to_string).collect();
                self.session.set_assistants(ids);
                let current = self.session.assistants().join(" ");
                writeln!(self.out, "assistant: {}", current)?;
            }
            CommandKind::Load => return self.load(argument).await,
            CommandKind::Image => return self.upload(argument, UploadKind::Image).await,
            CommandKind::File => return self.file(argument).await,
            CommandKind::Thread => return self.thread(argument).await,
        }
        Ok(ControlFlow::Continue)
    }

    /// Send a message through the assistant chain and print the reply.
    async fn chat(&mut self, request: CreateMessageRequest) -> Result<ControlFlow> {
        match wait_for(self.spinner, ASSISTANT_WAIT, self.session.turn(request)).await {
            None => self.interrupted(),
            Some(turn) => {
                self.print_turn(&turn)?;
                Ok(ControlFlow::Continue)
            }
        }
    }

    async fn load(&mut self, argument: &str) -> Result<ControlFlow> {
        if argument.is_empty() {
            self.print_error("Filename should be provided")?;
            return Ok(ControlFlow::Continue);
        }
        match tokio::fs::read_to_string(argument).await {
            Ok(text) => self.chat(CreateMessageRequest::user(text)).await,
            Err(e) => {
                self.print_error(&format!("Cannot read {}: {}", argument, e))?;
                Ok(ControlFlow::Continue)
            }
        }
    }

    async fn upload(&mut self, argument: &str, kind: UploadKind) -> Result<ControlFlow> {
        let path = match attachments::validate(argument, kind) {
            Ok(path) => path,
            Err(e) => {
                self.print_error(&e.to_string())?;
                return Ok(ControlFlow::Continue);
            }
        };

        let attached = wait_for(
            self.spinner,
            ASSISTANT_WAIT,
            self.session.attach(&path, kind),
        )
        .await;
        match attached {
            None => self.interrupted(),
            Some(Ok((file, turn))) => {
                match kind {
                    UploadKind::Image => {
                        writeln!(
                            self.out,
                            "Image is uploaded: {} ({})",
                            file.filename, file.id
                        )?;
                    }
                    UploadKind::Document => {
                        writeln!(
                            self.out,
                            "File is uploaded: {} ({})",
                            file.filename, file.id
                        )?;
                        writeln!(self.out, "File is attached to the thread.")?;
                    }
                }
                self.print_turn(&turn)?;
                Ok(ControlFlow::Continue)
            }
            Some(Err(e)) => {
                self.print_error(&format!("Error: {}", e))?;
                Ok(ControlFlow::Continue)
            }
        }
    }

    async fn file(&mut self, argument: &str) -> Result<ControlFlow> {
        let (action, rest) = match argument.split_once(char::is_whitespace) {
            Some((action, rest)) => (action, rest.trim()),
            None => (argument, ""),
        };

        let spinner = self.spinner;
        match action {
            "list" => match wait_for(spinner, FILES_WAIT, self.session.list_files()).await {
                None => return self.interrupted(),
                Some(Ok(files)) => {
                    for file in &files {
                        writeln!(self.out, "{}", file_line(file))?;
                    }
                }
                Some(Err(e)) => self.print_error(&format!("Error: {}", e))?,
            },
            "delete" if !rest.is_empty() => {
                match wait_for(spinner, FILES_WAIT, self.session.delete_file(rest)).await {
                    None => return self.interrupted(),
                    Some(Ok(true)) => writeln!(self.out, "File is deleted: {}", rest)?,
                    Some(Ok(false)) => writeln!(self.out, "File is not deleted: {}", rest)?,
                    Some(Err(e)) => self.print_error(&format!("Error: {}", e))?,
                }
            }
            "status" if !rest.is_empty() => {
                match wait_for(spinner, FILES_WAIT, self.session.file_status(rest)).await {
                    None => return self.interrupted(),
                    Some(Ok(file)) => {
                        writeln!(self.out, "{}", serde_json::to_string_pretty(&file)?)?
                    }
                    Some(Err(e)) => self.print_error(&format!("Error: {}", e))?,
                }
            }
            _ => return self.upload(argument, UploadKind::Document).await,
        }
        Ok(ControlFlow::Continue)
    }

    async fn thread(&mut self, argument: &str) -> Result<ControlFlow> {
        match argument {
            "" => writeln!(self.out, "thread: {}", self.session.thread_id())?,
            "new" => {
                let session = &mut self.session;
                let created = wait_for(self.spinner, THREAD_WAIT, async move {
                    session.new_thread().await.map(str::to_string)
                })
                .await;
                match created {
                    None => return self.interrupted(),
                    Some(Ok(id)) => writeln!(self.out, "thread: {}", id)?,
                    Some(Err(e)) => self.print_error(&format!("Error: {}", e))?,
                }
            }
            _ => self.print_help("thread")?,
        }
        Ok(ControlFlow::Continue)
    }

    fn interrupted(&mut self) -> Result<ControlFlow> {
        writeln!(self.out)?;
        self.print_dim("(Interrupted)")?;
        Ok(ControlFlow::Exit)
    }

    /// Print the finished steps, then the error that cut the turn short.
    fn print_turn(&mut self, turn: &Turn) -> Result<()> {
        self.print_steps(&turn.steps)?;
        if let Some(e) = &turn.error {
            self.print_error(&format!("Error: {}", e))?;
        }
        Ok(())
    }

    fn print_steps(&mut self, steps: &[Step]) -> Result<()> {
        if self.session.debug() {
            for step in steps {
                writeln!(self.out, "----- {} -----", step.assistant_id)?;
                writeln!(self.out, "{}", step.output)?;
                writeln!(self.out, "-----")?;
            }
        }
        if let Some(last) = steps.last() {
            writeln!(self.out, "[{}] GPT> {}", last.assistant_id, last.output)?;
        }
        Ok(())
    }

    fn print_help(&mut self, topic: &str) -> Result<()> {
        let topic = topic.trim().trim_start_matches('/');
        if !topic.is_empty() {
            match lookup(topic) {
                Some(entry) => {
                    writeln!(self.out, "{}", entry.usage)?;
                    writeln!(self.out, "  {}", entry.summary)?;
                }
                None => self.print_error(&format!("Unknown command: /{}", topic))?,
            }
            return Ok(());
        }

        let dim = Style::new().dim();
        writeln!(self.out, "{}", style("Available Commands").bold())?;
        writeln!(self.out, "{}", dim.apply_to("─".repeat(40)))?;
        let width = COMMANDS.iter().map(|s| s.usage.len()).max().unwrap_or(0);
        for entry in COMMANDS {
            writeln!(
                self.out,
                "  {:<width$}  {}",
                entry.usage,
                entry.summary,
                width = width
            )?;
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            dim.apply_to("Anything else is sent to the assistant. ?TOPIC shows help.")
        )?;
        Ok(())
    }

    fn print_welcome(&mut self) -> Result<()> {
        let dim = Style::new().dim();
        writeln!(self.out, "{}", style("gptman shell").bold().cyan())?;
        writeln!(
            self.out,
            "{}",
            dim.apply_to(format!("thread {}", self.session.thread_id()))
        )?;
        writeln!(
            self.out,
            "{}",
            dim.apply_to("Use /help for commands, Ctrl+D to exit.")
        )?;
        Ok(())
    }

    fn print_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", style(message).red())?;
        Ok(())
    }

    fn print_dim(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", style(message).dim())?;
        Ok(())
    }
}

/// Await a remote operation; `None` when Ctrl-C arrives first.
async fn wait_for<T, F>(spinner: bool, message: &'static str, operation: F) -> Option<T>
where
    F: Future<Output = T>,
{
    let progress = spinner.then(|| {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    });

    let result = tokio::select! {
        result = operation => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    result
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn file_line(file: &FileObject) -> String {
    let created = DateTime::from_timestamp(file.created_at, 0)
        .map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default();
    format!("{} [{}, {}]", file.filename, file.id, created)
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}

/// Start a shell on a fresh thread with one assistant.
pub async fn run_shell(
    client: GptmanClient,
    assistant_id: String,
    timeout: Duration,
) -> Result<()> {
    let backend: Arc<dyn AssistantsBackend> = Arc::new(client);
    let session = Session::start(backend, vec![assistant_id], RunPoller::new(timeout))
        .await
        .context("failed to create a thread")?;

    let mut shell = AssistantShell::new(session, Box::new(std::io::stdout())).with_spinner(true);
    shell.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use gptman_client::{FileObject, MockBackend, MockCall, RunStatus};
    use std::sync::Mutex;

    /// Writer that keeps everything in a shared buffer.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    async fn shell(
        backend: &Arc<MockBackend>,
        assistants: &[&str],
    ) -> (AssistantShell, SharedBuffer) {
        let session = Session::start(
            backend.clone(),
            assistants.iter().map(|a| a.to_string()).collect(),
            RunPoller::new(Duration::from_secs(5)),
        )
        .await
        .unwrap();
        let buffer = SharedBuffer::default();
        let shell = AssistantShell::new(session, Box::new(buffer.clone()));
        (shell, buffer)
    }

    #[tokio::test]
    async fn test_plain_line_goes_to_chat() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        let flow = shell.handle_line("  hello there  ").await.unwrap();

        assert_eq!(flow, ControlFlow::Continue);
        assert!(out.contents().contains("[asst_a] GPT> asst_a: hello there"));
        assert_eq!(backend.posted_messages()[0].1.text(), Some("hello there"));
    }

    #[tokio::test]
    async fn test_quit_and_aliases_exit() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, _) = shell(&backend, &["asst_a"]).await;
        for line in ["/quit", "/exit", "/q"] {
            assert_eq!(shell.handle_line(line).await.unwrap(), ControlFlow::Exit);
        }
        assert!(backend.posted_messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_line_does_nothing() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;
        let flow = shell.handle_line("   ").await.unwrap();
        assert_eq!(flow, ControlFlow::Continue);
        assert!(out.contents().is_empty());
        assert!(backend.posted_messages().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_keeps_loop() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;
        let flow = shell.handle_line("/frobnicate now").await.unwrap();
        assert_eq!(flow, ControlFlow::Continue);
        assert!(out.contents().contains("Unknown command: /frobnicate"));
        assert!(backend.posted_messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_command_token_goes_to_chat() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, _) = shell(&backend, &["asst_a"]).await;
        shell.handle_line("/ just text").await.unwrap();
        assert_eq!(backend.posted_messages()[0].1.text(), Some("/ just text"));
    }

    #[tokio::test]
    async fn test_question_mark_shows_help() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        shell.handle_line("?").await.unwrap();
        let contents = out.contents();
        for entry in COMMANDS {
            assert!(contents.contains(entry.usage), "missing {}", entry.usage);
        }

        shell.handle_line("?file").await.unwrap();
        assert!(out.contents().contains("Attach a file for file search"));
        assert!(backend.posted_messages().is_empty());
    }

    #[tokio::test]
    async fn test_bang_line_goes_to_chat() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, _) = shell(&backend, &["asst_a"]).await;
        shell.handle_line("!ls -la").await.unwrap();
        assert_eq!(backend.posted_messages()[0].1.text(), Some("!ls -la"));
    }

    #[tokio::test]
    async fn test_debug_and_renew_flags() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        shell.handle_line("/debug yes").await.unwrap();
        assert!(shell.session().debug());
        shell.handle_line("/set_debug no").await.unwrap();
        assert!(!shell.session().debug());

        shell.handle_line("/renew t").await.unwrap();
        assert!(shell.session().renew());
        shell.handle_line("/renew").await.unwrap();
        assert!(shell.session().renew());
        assert!(out.contents().contains("renew: on"));
    }

    #[tokio::test]
    async fn test_chained_turn_in_debug_mode() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        shell.handle_line("/assistant asst_a asst_b").await.unwrap();
        shell.handle_line("/debug y").await.unwrap();
        shell.handle_line("draft").await.unwrap();

        let contents = out.contents();
        assert!(contents.contains("----- asst_a -----\nasst_a: draft\n-----\n"));
        assert!(contents.contains("----- asst_b -----\nasst_b: asst_a: draft\n-----\n"));
        assert!(contents.contains("[asst_b] GPT> asst_b: asst_a: draft"));
        assert_eq!(shell.prompt(), "[asst_a asst_b] User> ");
    }

    #[tokio::test]
    async fn test_failed_chain_prints_finished_steps() {
        let backend =
            Arc::new(MockBackend::new().with_statuses([RunStatus::Completed, RunStatus::Failed]));
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        shell.handle_line("/assistant asst_a asst_b").await.unwrap();
        shell.handle_line("/debug y").await.unwrap();
        let flow = shell.handle_line("draft").await.unwrap();

        assert_eq!(flow, ControlFlow::Continue);
        let contents = out.contents();
        let step = contents
            .find("----- asst_a -----\nasst_a: draft\n-----\n")
            .unwrap();
        let reply = contents.find("[asst_a] GPT> asst_a: draft").unwrap();
        let error = contents.find("Error: run run_").unwrap();
        assert!(step < reply && reply < error);
        assert!(!contents.contains("----- asst_b -----"));
    }

    #[tokio::test]
    async fn test_load_sends_file_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("question.txt");
        std::fs::write(&path, "What is Rust?").unwrap();

        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;
        shell
            .handle_line(&format!("/load {}", path.display()))
            .await
            .unwrap();

        assert_eq!(backend.posted_messages()[0].1.text(), Some("What is Rust?"));
        assert!(out.contents().contains("GPT> asst_a: What is Rust?"));
    }

    #[tokio::test]
    async fn test_attachment_errors_are_reported() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        shell.handle_line("/image").await.unwrap();
        shell
            .handle_line("/file /nonexistent/report.pdf")
            .await
            .unwrap();

        let contents = out.contents();
        assert!(contents.contains("Filename should be provided"));
        assert!(contents.contains("File /nonexistent/report.pdf does not exist"));
        assert_eq!(
            backend.count_calls(|c| matches!(c, MockCall::UploadFile { .. })),
            0
        );
    }

    #[tokio::test]
    async fn test_file_upload_list_and_delete() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Notes").unwrap();

        let backend = Arc::new(MockBackend::new().with_reply("Noted"));
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        shell
            .handle_line(&format!("/file {}", path.display()))
            .await
            .unwrap();
        let file_id = backend.list_files().await.unwrap()[0].id.clone();

        let contents = out.contents();
        assert!(contents.contains(&format!("File is uploaded: notes.md ({})", file_id)));
        assert!(contents.contains("File is attached to the thread."));
        assert!(contents.contains("GPT> Noted"));

        shell.handle_line("/file list").await.unwrap();
        assert!(out.contents().contains(&format!("notes.md [{},", file_id)));

        shell
            .handle_line(&format!("/file status {}", file_id))
            .await
            .unwrap();
        assert!(out.contents().contains("\"purpose\": \"assistants\""));

        shell
            .handle_line(&format!("/file delete {}", file_id))
            .await
            .unwrap();
        let deleted = format!("File is deleted: {}", file_id);
        assert!(out.contents().contains(&deleted));
    }

    #[tokio::test]
    async fn test_file_list_and_status_of_existing_files() {
        let report = FileObject {
            id: "file_report".to_string(),
            bytes: 2048,
            created_at: 0,
            filename: "report.pdf".to_string(),
            purpose: "assistants".to_string(),
        };
        let backend = Arc::new(MockBackend::new().with_file(report));
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        shell.handle_line("/file list").await.unwrap();
        assert!(out.contents().contains("report.pdf [file_report,"));

        shell.handle_line("/file status file_report").await.unwrap();
        assert!(out.contents().contains("\"bytes\": 2048"));

        let flow = shell
            .handle_line("/file status file_missing")
            .await
            .unwrap();
        assert_eq!(flow, ControlFlow::Continue);
        assert!(out.contents().contains("Error: "));
        assert!(backend.posted_messages().is_empty());
    }

    #[tokio::test]
    async fn test_thread_command() {
        let backend = Arc::new(MockBackend::new());
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;
        let first = shell.session().thread_id().to_string();

        shell.handle_line("/thread").await.unwrap();
        assert!(out.contents().contains(&format!("thread: {}", first)));

        shell.handle_line("/thread new").await.unwrap();
        assert_ne!(shell.session().thread_id(), first);
    }

    #[tokio::test]
    async fn test_remote_errors_keep_loop() {
        let backend = Arc::new(MockBackend::new().with_statuses([RunStatus::Failed]));
        let (mut shell, out) = shell(&backend, &["asst_a"]).await;

        let flow = shell.handle_line("hello").await.unwrap();
        assert_eq!(flow, ControlFlow::Continue);
        assert!(out.contents().contains("Error: run run_"));
        assert!(out.contents().contains("ended with status failed"));
    }
}
