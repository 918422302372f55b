//! Typed view over a prompt file.

use std::path::Path;

use crate::preamble::{Preamble, parse_preamble, write_preamble};
use crate::{PromptError, Result};

/// Preamble key holding the remote assistant id.
pub const ID_KEY: &str = "id";
/// Preamble key holding the assistant name.
pub const NAME_KEY: &str = "name";
/// Preamble key holding the model identifier.
pub const MODEL_KEY: &str = "model";
/// Preamble key holding the assistant description.
pub const DESCRIPTION_KEY: &str = "description";
/// Preamble key holding space-separated tool types.
pub const TOOLS_KEY: &str = "tools";

const KNOWN_KEYS: [&str; 5] = [ID_KEY, NAME_KEY, MODEL_KEY, DESCRIPTION_KEY, TOOLS_KEY];

/// An assistant definition: preamble settings plus the instructions body.
///
/// The preamble keeps the file's key order, so reading a document, changing
/// a field and writing it back only touches that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDocument {
    preamble: Preamble,
    instructions: String,
}

impl PromptDocument {
    /// Create a document with instructions and an empty preamble.
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            preamble: Preamble::new(),
            instructions: instructions.into(),
        }
    }

    /// Build a document from an existing preamble.
    pub fn with_preamble(preamble: Preamble, instructions: impl Into<String>) -> Self {
        Self {
            preamble,
            instructions: instructions.into(),
        }
    }

    /// Parse document text.
    pub fn parse(text: &str) -> Result<Self> {
        let (preamble, instructions) = parse_preamble(text)?;
        Ok(Self {
            preamble,
            instructions,
        })
    }

    /// Render the document as text.
    pub fn render(&self) -> String {
        write_preamble(&self.preamble, &self.instructions)
    }

    /// Remote assistant id. An empty value means the assistant was not created yet.
    pub fn id(&self) -> Option<&str> {
        self.preamble.get(ID_KEY).filter(|id| !id.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.preamble.get(NAME_KEY)
    }

    pub fn model(&self) -> Option<&str> {
        self.preamble.get(MODEL_KEY)
    }

    pub fn description(&self) -> Option<&str> {
        self.preamble.get(DESCRIPTION_KEY)
    }

    /// Tool types, split on spaces.
    pub fn tools(&self) -> Vec<&str> {
        self.preamble
            .get(TOOLS_KEY)
            .map(|tools| tools.split(' ').filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    /// Preamble entries gptman does not interpret.
    pub fn extra_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.preamble
            .iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(key))
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.preamble.set(ID_KEY, id);
    }

    /// Set the name. `None` or an empty name removes the entry.
    pub fn set_name(&mut self, name: Option<&str>) {
        self.set_optional(NAME_KEY, name);
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.preamble.set(MODEL_KEY, model);
    }

    /// Set the description. `None` or an empty description removes the entry.
    pub fn set_description(&mut self, description: Option<&str>) {
        self.set_optional(DESCRIPTION_KEY, description);
    }

    /// Set the tool list. An empty list removes the entry.
    pub fn set_tools<S: AsRef<str>>(&mut self, tools: &[S]) {
        if tools.is_empty() {
            self.preamble.remove(TOOLS_KEY);
            return;
        }
        let joined = tools
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        self.preamble.set(TOOLS_KEY, joined);
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.instructions = instructions.into();
    }

    fn set_optional(&mut self, key: &str, value: Option<&str>) {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self.preamble.set(key, value),
            None => {
                self.preamble.remove(key);
            }
        }
    }
}

/// Read and parse a prompt file.
pub fn read_prompt_file(path: &Path) -> Result<PromptDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| PromptError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    PromptDocument::parse(&text)
}

/// Write a prompt file, replacing any existing content.
pub fn write_prompt_file(path: &Path, document: &PromptDocument) -> Result<()> {
    std::fs::write(path, document.render()).map_err(|e| PromptError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "wrote prompt file");
    Ok(())
}
