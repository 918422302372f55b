//! Shell command table.

/// What a shell command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Quit,
    Help,
    Debug,
    Renew,
    Assistant,
    Load,
    Image,
    File,
    Thread,
}

/// A shell command descriptor.
#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
    pub kind: CommandKind,
}

impl CommandSpec {
    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// Shell commands, in lookup and help order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "quit",
        aliases: &["exit", "q"],
        usage: "/quit",
        summary: "Leave the shell",
        kind: CommandKind::Quit,
    },
    CommandSpec {
        name: "help",
        aliases: &["h"],
        usage: "/help [command]",
        summary: "Show commands, or the usage of one command",
        kind: CommandKind::Help,
    },
    CommandSpec {
        name: "debug",
        aliases: &["set_debug"],
        usage: "/debug [yes|no]",
        summary: "Print every step of a chained turn",
        kind: CommandKind::Debug,
    },
    CommandSpec {
        name: "renew",
        aliases: &["set_renew"],
        usage: "/renew [yes|no]",
        summary: "Start a fresh thread for every step of a turn",
        kind: CommandKind::Renew,
    },
    CommandSpec {
        name: "assistant",
        aliases: &["set_assistant"],
        usage: "/assistant ID [ID...]",
        summary: "Talk to other assistants; several ids are queried in a chain",
        kind: CommandKind::Assistant,
    },
    CommandSpec {
        name: "load",
        aliases: &[],
        usage: "/load PATH",
        summary: "Send the contents of a file as a message",
        kind: CommandKind::Load,
    },
    CommandSpec {
        name: "image",
        aliases: &[],
        usage: "/image PATH",
        summary: "Upload a .png image and send it to the thread",
        kind: CommandKind::Image,
    },
    CommandSpec {
        name: "file",
        aliases: &[],
        usage: "/file PATH | list | delete ID | status ID",
        summary: "Attach a file for file search, or manage uploaded files",
        kind: CommandKind::File,
    },
    CommandSpec {
        name: "thread",
        aliases: &[],
        usage: "/thread [new]",
        summary: "Show the current thread, or start a new one",
        kind: CommandKind::Thread,
    },
];

/// Find a command by name or alias.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|entry| entry.matches(name))
}

/// Parse a flag argument. Anything outside the truthy set is false.
pub fn parse_truthy(value: &str) -> bool {
    matches!(value.trim(), "true" | "True" | "yes" | "y" | "t")
}
