//! Line classification for the interactive shell.
//!
//! A line is either a command (`/name argument`), a help request (`?topic`),
//! a shell escape (`!command`, only when enabled) or free text for the chat.
//! Classification is purely lexical; the caller decides what each kind does.

/// Default command sentinel.
pub const COMMAND_PREFIX: char = '/';

/// Rewrite applied to a line before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alias {
    /// `?rest` became `help rest`.
    Help,
    /// `!rest` became `shell rest`.
    Shell,
}

/// Result of classifying one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Command name when the line starts with the sentinel. May be empty.
    pub command: Option<String>,
    /// Trimmed text after the command name.
    pub argument: Option<String>,
    /// The line itself, rewritten when `alias` is set.
    pub line: String,
    pub alias: Option<Alias>,
}

impl ParsedLine {
    fn plain(line: String) -> Self {
        Self {
            command: None,
            argument: None,
            line,
            alias: None,
        }
    }

    fn aliased(alias: Alias, keyword: &str, rest: &str) -> Self {
        Self {
            command: None,
            argument: None,
            line: format!("{} {}", keyword, rest),
            alias: Some(alias),
        }
    }

    /// Topic of a `?` help request.
    pub fn help_topic(&self) -> Option<&str> {
        match self.alias {
            Some(Alias::Help) => self.line.strip_prefix("help ").map(str::trim),
            _ => None,
        }
    }
}

/// Classifies shell input lines.
#[derive(Debug, Clone, Copy)]
pub struct PrefixParser {
    prefix: char,
    shell_escape: bool,
}

impl Default for PrefixParser {
    fn default() -> Self {
        Self {
            prefix: COMMAND_PREFIX,
            shell_escape: false,
        }
    }
}

impl PrefixParser {
    pub fn new(prefix: char) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    /// Enable `!` as a shell escape.
    pub fn with_shell_escape(mut self, enabled: bool) -> Self {
        self.shell_escape = enabled;
        self
    }

    /// Classify a line.
    pub fn parse_line(&self, line: &str) -> ParsedLine {
        let line = line.trim();
        let mut chars = line.chars();
        match chars.next() {
            None => ParsedLine::plain(String::new()),
            Some('?') => ParsedLine::aliased(Alias::Help, "help", chars.as_str()),
            Some('!') if self.shell_escape => {
                ParsedLine::aliased(Alias::Shell, "shell", chars.as_str())
            }
            Some(c) if c == self.prefix => self.parse_command(line, c.len_utf8()),
            Some(_) => ParsedLine::plain(line.to_string()),
        }
    }

    fn parse_command(&self, line: &str, start: usize) -> ParsedLine {
        let rest = &line[start..];
        let end = rest
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        ParsedLine {
            command: Some(rest[..end].to_string()),
            argument: Some(rest[end..].trim().to_string()),
            line: line.to_string(),
            alias: None,
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(parsed: &ParsedLine) -> (Option<&str>, Option<&str>, &str) {
        (
            parsed.command.as_deref(),
            parsed.argument.as_deref(),
            parsed.line.as_str(),
        )
    }

    #[test]
    fn test_plain_lines() {
        let parser = PrefixParser::default();
        assert_eq!(
            triple(&parser.parse_line("This is a normal line")),
            (None, None, "This is a normal line")
        );
        assert_eq!(
            triple(&parser.parse_line("attach This is a normal line")),
            (None, None, "attach This is a normal line")
        );
        assert_eq!(
            triple(&parser.parse_line("  padded  ")),
            (None, None, "padded")
        );
        assert_eq!(triple(&parser.parse_line("")), (None, None, ""));
    }

    #[test]
    fn test_command_lines() {
        let parser = PrefixParser::default();
        assert_eq!(
            triple(&parser.parse_line("/attach This is a normal line")),
            (
                Some("attach"),
                Some("This is a normal line"),
                "/attach This is a normal line"
            )
        );
        assert_eq!(
            triple(&parser.parse_line("/cmd arg")),
            (Some("cmd"), Some("arg"), "/cmd arg")
        );
        assert_eq!(
            triple(&parser.parse_line("/set_debug   yes ")),
            (Some("set_debug"), Some("yes"), "/set_debug   yes")
        );
    }

    #[test]
    fn test_command_token_stops_at_non_identifier() {
        let parser = PrefixParser::default();
        assert_eq!(
            triple(&parser.parse_line("/set-debug yes")),
            (Some("set"), Some("-debug yes"), "/set-debug yes")
        );
        assert_eq!(
            triple(&parser.parse_line("/ hello")),
            (Some(""), Some("hello"), "/ hello")
        );
    }

    #[test]
    fn test_help_alias() {
        let parser = PrefixParser::default();
        let parsed = parser.parse_line("?");
        assert_eq!(triple(&parsed), (None, None, "help "));
        assert_eq!(parsed.alias, Some(Alias::Help));
        assert_eq!(parsed.help_topic(), Some(""));

        let parsed = parser.parse_line("?file");
        assert_eq!(parsed.line, "help file");
        assert_eq!(parsed.help_topic(), Some("file"));

        // Typed text that merely starts with "help" stays plain.
        let parsed = parser.parse_line("help me write a poem");
        assert_eq!(parsed.alias, None);
        assert_eq!(parsed.help_topic(), None);
    }

    #[test]
    fn test_shell_escape() {
        let parser = PrefixParser::default();
        let parsed = parser.parse_line("!");
        assert_eq!(triple(&parsed), (None, None, "!"));
        assert_eq!(parsed.alias, None);

        let parser = PrefixParser::default().with_shell_escape(true);
        let parsed = parser.parse_line("!");
        assert_eq!(triple(&parsed), (None, None, "shell "));
        assert_eq!(parsed.alias, Some(Alias::Shell));
    }

    #[test]
    fn test_custom_prefix() {
        let parser = PrefixParser::new(':');
        assert_eq!(
            triple(&parser.parse_line(":quit")),
            (Some("quit"), Some(""), ":quit")
        );
        assert_eq!(triple(&parser.parse_line("/quit")), (None, None, "/quit"));
    }
}
