//! Preamble codec.
//!
//! A preamble is a block of `key: value` lines fenced by `---` lines at the
//! very top of a document. Everything after the closing fence is the body:
//!
//! ```text
//! ---
//! id: asst_abc123
//! name: Helper
//! ---
//! You are helpful.
//! ```
//!
//! Parsing splits each entry on its first colon, keeps the key verbatim and
//! trims the value. Writing emits the entries in insertion order; when the
//! preamble is empty no closing fence is written, so such a document does not
//! parse back.

use crate::{PromptError, Result};

/// Line prefix that opens and closes a preamble.
pub const DELIMITER: &str = "---";

/// Ordered `key: value` entries of a preamble.
///
/// Setting a key that already exists replaces its value in place, so the
/// position of the first occurrence is kept and the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preamble {
    entries: Vec<(String, String)>,
}

impl Preamble {
    /// Create an empty preamble.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Check whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the preamble has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Preamble
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut preamble = Preamble::new();
        for (key, value) in iter {
            preamble.set(key, value);
        }
        preamble
    }
}

/// Split a document into its preamble and body.
///
/// The first line must start with [`DELIMITER`]. Header lines are read until
/// the next line starting with the delimiter; the lines after it are joined
/// back with `\n` and returned verbatim as the body, trailing empty line
/// included.
pub fn parse_preamble(text: &str) -> Result<(Preamble, String)> {
    let lines: Vec<&str> = text.split('\n').collect();
    if !lines
        .first()
        .is_some_and(|first| first.starts_with(DELIMITER))
    {
        return Err(PromptError::PreambleNotFound);
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|line| line.starts_with(DELIMITER))
        .map(|pos| pos + 1)
        .ok_or(PromptError::PreambleNotFound)?;

    let mut preamble = Preamble::new();
    for (idx, line) in lines.iter().enumerate().take(close).skip(1) {
        if let Some((key, value)) = parse_entry(line, idx + 1)? {
            preamble.set(key, value);
        }
    }

    let body = lines[close + 1..].join("\n");
    Ok((preamble, body))
}

/// Render a preamble and body back into document text.
pub fn write_preamble(preamble: &Preamble, body: &str) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    for (key, value) in preamble.iter() {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    if !preamble.is_empty() {
        out.push_str(DELIMITER);
        out.push('\n');
    }
    out.push_str(body);
    out.push('\n');
    out
}

/// Parse one header line. Blank lines carry no entry.
fn parse_entry(line: &str, line_number: usize) -> Result<Option<(String, String)>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    match line.split_once(':') {
        Some((key, value)) => Ok(Some((key.to_string(), value.trim().to_string()))),
        None => Err(PromptError::MalformedEntry {
            line: line_number,
            content: line.to_string(),
        }),
    }
}
