//! Assistant management commands.
//!
//! - `gptman assistant push [PATH]` - create or update assistants from prompt files
//! - `gptman assistant pull` - mirror remote assistants into prompt files
//! - `gptman assistant shell (PATH|--id ID)` - chat with an assistant
//! - `gptman assistant list` - list assistants
//! - `gptman assistant describe (PATH|--id ID)` - show one assistant

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, Local};
use clap::{Args, Subcommand};

use gptman_client::{Assistant, AssistantRequest, AssistantTool, GptmanClient};
use gptman_config::{Backend, Profile};
use gptman_prompt::{PromptDocument, read_prompt_file, write_prompt_file};

use super::Context;
use crate::shell::run_shell;

/// Extension of prompt files.
const PROMPT_EXTENSION: &str = "md";

/// Assistant management commands.
#[derive(Args, Debug)]
pub struct AssistantArgs {
    #[command(subcommand)]
    pub command: AssistantCommand,
}

#[derive(Subcommand, Debug)]
pub enum AssistantCommand {
    /// Create or update assistants from prompt files
    Push(PushArgs),

    /// Write remote assistants to prompt files in the working directory
    Pull,

    /// Chat with an assistant in an interactive shell
    Shell(TargetArgs),

    /// List assistants
    List(ListArgs),

    /// Show the settings of one assistant
    Describe(TargetArgs),
}

/// Arguments for `gptman assistant push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Prompt file to push (default: every *.md in the working directory)
    pub path: Option<PathBuf>,
}

/// Arguments for `gptman assistant list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Also show model and creation time
    #[arg(short, long)]
    pub long: bool,
}

/// An assistant picked by prompt file or by id.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Prompt file holding the assistant id
    pub path: Option<PathBuf>,

    /// Assistant id
    #[arg(long)]
    pub id: Option<String>,
}

impl TargetArgs {
    /// The assistant id, read from the prompt file when no `--id` is given.
    pub fn resolve_id(&self) -> Result<String> {
        if let Some(id) = &self.id {
            return Ok(id.clone());
        }
        let Some(path) = &self.path else {
            bail!("either a prompt file or --id is required");
        };
        let document = read_prompt_file(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match document.id() {
            Some(id) => Ok(id.to_string()),
            None => bail!(
                "{} has no id; run `gptman assistant push` first",
                path.display()
            ),
        }
    }
}

/// Run the assistant command.
pub async fn run(args: AssistantArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AssistantCommand::Push(push_args) => run_push(push_args, ctx).await,
        AssistantCommand::Pull => run_pull(ctx).await,
        AssistantCommand::Shell(target) => run_shell_command(target, ctx).await,
        AssistantCommand::List(list_args) => run_list(list_args, ctx).await,
        AssistantCommand::Describe(target) => run_describe(target, ctx).await,
    }
}

async fn run_push(args: PushArgs, ctx: &Context) -> Result<()> {
    let paths = match args.path {
        Some(path) => vec![path],
        None => prompt_files(Path::new("."))?,
    };
    if paths.is_empty() {
        println!("No prompt files found.");
        return Ok(());
    }

    let connection = ctx.connect()?;
    push_documents(&connection.client, &connection.profile, &paths).await?;
    Ok(())
}

async fn run_pull(ctx: &Context) -> Result<()> {
    let connection = ctx.connect()?;
    pull_documents(&connection.client, Path::new(".")).await?;
    Ok(())
}

async fn run_shell_command(target: TargetArgs, ctx: &Context) -> Result<()> {
    let assistant_id = target.resolve_id()?;
    let connection = ctx.connect()?;
    run_shell(
        connection.client,
        assistant_id,
        connection.profile.timeout(),
    )
    .await
}

async fn run_list(args: ListArgs, ctx: &Context) -> Result<()> {
    let connection = ctx.connect()?;
    let assistants = connection.client.assistants().list().await?;
    if assistants.is_empty() {
        println!("No assistants found.");
        return Ok(());
    }
    print!("{}", format_table(&assistants, args.long));
    Ok(())
}

async fn run_describe(target: TargetArgs, ctx: &Context) -> Result<()> {
    let assistant_id = target.resolve_id()?;
    let connection = ctx.connect()?;
    let assistant = connection
        .client
        .assistants()
        .retrieve(&assistant_id)
        .await
        .with_context(|| format!("failed to retrieve assistant {}", assistant_id))?;
    print!("{}", format_description(&assistant));
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Push / pull
// ─────────────────────────────────────────────────────────────────────────────

/// Push prompt files, creating assistants for documents without an id.
///
/// Created ids are written back into the prompt file.
pub async fn push_documents(
    client: &GptmanClient,
    profile: &Profile,
    paths: &[PathBuf],
) -> Result<Vec<Assistant>> {
    let mut pushed = Vec::with_capacity(paths.len());

    for path in paths {
        let mut document = read_prompt_file(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for (key, _) in document.extra_fields() {
            tracing::warn!(path = %path.display(), key, "ignoring unknown preamble key");
        }
        let request = document_request(&document, profile);

        let assistant = match document.id() {
            Some(id) => {
                let id = id.to_string();
                let assistant = client
                    .assistants()
                    .update(&id, &request)
                    .await
                    .with_context(|| format!("failed to update assistant {}", id))?;
                println!(
                    "update {} ---> {} ({})",
                    path.display(),
                    assistant.name.as_deref().unwrap_or_default(),
                    assistant.id
                );
                assistant
            }
            None => {
                let assistant = client
                    .assistants()
                    .create(&request)
                    .await
                    .with_context(|| {
                        format!("failed to create assistant from {}", path.display())
                    })?;
                document.set_id(&assistant.id);
                write_prompt_file(path, &document)?;
                println!(
                    "create {} ---> {} ({})",
                    path.display(),
                    assistant.name.as_deref().unwrap_or_default(),
                    assistant.id
                );
                assistant
            }
        };
        tracing::debug!(
            assistant_id = %assistant.id,
            path = %path.display(),
            "pushed assistant"
        );
        pushed.push(assistant);
    }

    Ok(pushed)
}

/// Request body for a prompt document.
pub fn document_request(document: &PromptDocument, profile: &Profile) -> AssistantRequest {
    let model = document.model().map(str::to_string).or_else(|| match profile.backend {
        Backend::Azure => profile.azure_deployment.clone(),
        Backend::Openai => None,
    });
    let tools = document.tools();

    AssistantRequest {
        name: document.name().map(str::to_string),
        model,
        description: document.description().map(str::to_string),
        instructions: Some(document.instructions().to_string()),
        tools: (!tools.is_empty()).then(|| tools.into_iter().map(AssistantTool::new).collect()),
    }
}

/// Write every remote assistant into a prompt file under `dir`.
///
/// Files already holding an assistant's id are updated in place; the others
/// are named after the assistant.
pub async fn pull_documents(client: &GptmanClient, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut local: HashMap<String, (PathBuf, PromptDocument)> = HashMap::new();
    for path in prompt_files(dir)? {
        match read_prompt_file(&path) {
            Ok(document) => {
                if let Some(id) = document.id() {
                    local.insert(id.to_string(), (path.clone(), document));
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable prompt file"
                );
            }
        }
    }

    let assistants = client.assistants().list().await?;
    let mut written = Vec::with_capacity(assistants.len());

    for assistant in &assistants {
        let (path, mut document) = match local.remove(&assistant.id) {
            Some(entry) => entry,
            None => {
                let path = dir.join(prompt_file_name(assistant));
                (path, PromptDocument::default())
            }
        };

        document.set_id(&assistant.id);
        document.set_name(assistant.name.as_deref());
        document.set_description(assistant.description.as_deref());
        document.set_model(&assistant.model);
        document.set_tools(assistant.tool_types().as_slice());
        document.set_instructions(assistant.instructions.clone().unwrap_or_default());

        write_prompt_file(&path, &document)?;
        println!("pull {} ---> {}", assistant.id, path.display());
        written.push(path);
    }

    Ok(written)
}

/// File name for a pulled assistant without a local prompt file.
fn prompt_file_name(assistant: &Assistant) -> String {
    let stem = assistant
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&assistant.id);
    format!("{}.{}", stem.replace(['/', '\\'], "_"), PROMPT_EXTENSION)
}

/// Prompt files directly under `dir`, sorted by path.
pub fn prompt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == PROMPT_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

fn format_table(assistants: &[Assistant], long: bool) -> String {
    let name_width = assistants
        .iter()
        .map(|a| a.name.as_deref().unwrap_or_default().len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let id_width = assistants
        .iter()
        .map(|a| a.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = String::new();
    if long {
        let model_width = assistants
            .iter()
            .map(|a| a.model.len())
            .max()
            .unwrap_or(0)
            .max("MODEL".len());
        out.push_str(&format!(
            "{:<name_width$}  {:<id_width$}  {:<model_width$}  CREATED\n",
            "NAME", "ID", "MODEL"
        ));
        for a in assistants {
            out.push_str(&format!(
                "{:<name_width$}  {:<id_width$}  {:<model_width$}  {}\n",
                a.name.as_deref().unwrap_or_default(),
                a.id,
                a.model,
                created_local(a.created_at)
            ));
        }
    } else {
        out.push_str(&format!("{:<name_width$}  ID\n", "NAME"));
        for a in assistants {
            out.push_str(&format!(
                "{:<name_width$}  {}\n",
                a.name.as_deref().unwrap_or_default(),
                a.id
            ));
        }
    }
    out
}

fn format_description(assistant: &Assistant) -> String {
    let mut out = format!(
        "{} [{}]\n",
        assistant.name.as_deref().unwrap_or("(unnamed)"),
        assistant.id
    );
    out.push_str(&format!("model: {}\n", assistant.model));
    let tools = assistant.tool_types();
    if !tools.is_empty() {
        out.push_str(&format!("tools: {}\n", tools.join(" ")));
    }
    if let Some(description) = assistant.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("description: {}\n", description));
    }
    if let Some(instructions) = assistant.instructions.as_deref() {
        out.push('\n');
        out.push_str(instructions);
        if !instructions.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn created_local(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
