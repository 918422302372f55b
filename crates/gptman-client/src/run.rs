//! Waiting on runs and reading their output.

use std::time::Duration;

use crate::backend::AssistantsBackend;
use crate::error::{Error, Result};
use crate::types::{ContentBlock, Run, RunStatus};

/// Time budget for a run to complete.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between run status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Starts runs and polls them until they complete.
///
/// The poller makes `floor(timeout / interval)` status observations. The first
/// is the status returned when the run is created; each later one follows a
/// sleep of `interval`.
#[derive(Debug, Clone, Copy)]
pub struct RunPoller {
    timeout: Duration,
    interval: Duration,
}

impl Default for RunPoller {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_TIMEOUT)
    }
}

impl RunPoller {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of status observations before giving up.
    pub fn attempts(&self) -> u32 {
        let interval = self.interval.as_millis().max(1);
        u32::try_from(self.timeout.as_millis() / interval).unwrap_or(u32::MAX)
    }

    /// Start a run of `assistant_id` on the thread and return the formatted reply.
    pub async fn run<B>(&self, backend: &B, thread_id: &str, assistant_id: &str) -> Result<String>
    where
        B: AssistantsBackend + ?Sized,
    {
        let run = backend.create_run(thread_id, assistant_id).await?;
        tracing::debug!(run_id = %run.id, assistant_id, thread_id, "created run");
        self.wait(backend, run).await
    }

    /// Poll an already created run until it completes.
    pub async fn wait<B>(&self, backend: &B, mut run: Run) -> Result<String>
    where
        B: AssistantsBackend + ?Sized,
    {
        let attempts = self.attempts();
        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.interval).await;
                run = backend.retrieve_run(&run.thread_id, &run.id).await?;
            }
            tracing::debug!(
                run_id = %run.id,
                status = %run.status,
                attempt,
                "run status"
            );

            match run.status {
                RunStatus::Completed => {
                    let content = generated_content(backend, &run.thread_id).await?;
                    tracing::debug!(run_id = %run.id, content = %content, "run completed");
                    return Ok(content);
                }
                status if status.is_terminal_failure() => {
                    return Err(Error::RunEnded { run: Box::new(run) });
                }
                _ => {}
            }
        }

        Err(Error::RequestTimeout {
            run: Box::new(run),
            attempts,
        })
    }
}

/// Formatted content of the most recent message in a thread.
pub async fn generated_content<B>(backend: &B, thread_id: &str) -> Result<String>
where
    B: AssistantsBackend + ?Sized,
{
    let message = backend
        .latest_message(thread_id)
        .await?
        .ok_or_else(|| Error::EmptyThread(thread_id.to_string()))?;
    Ok(format_content(&message.content))
}

/// Join the display strings of content blocks with blank lines.
pub fn format_content(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(ContentBlock::display_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}
