//! Slash command parsing for the terminal client.
//!
//! Input starting with `/` controls the client; anything else is a chat
//! message for the current session.

/// Refers to a session by its position in the last shown list or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// 1-based position in the session list.
    Index(usize),
    /// Session identifier.
    Id(String),
}

impl SessionRef {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(idx) if idx > 0 => SessionRef::Index(idx),
            _ => SessionRef::Id(arg.to_string()),
        }
    }
}

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Create a session and switch to it.
    New,

    /// Refresh and show the session list.
    Sessions,

    /// Switch to a session.
    Select(SessionRef),

    /// Delete a session after confirmation.
    Delete(SessionRef),

    /// Reload and show the current transcript.
    History,

    /// Upload a file and attach it to every later message.
    Upload(String),

    /// List uploaded files.
    Files,

    /// Turn RAG on or off.
    Rag(bool),

    /// Display help information.
    Help,

    /// Exit the client.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be sent as a chat message.
///
/// # Examples
///
/// ```
/// # use ragchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/select 2").is_some());
/// assert!(parse_command("What is in my notes?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::New,
        "sessions" | "ls" => ChatCommand::Sessions,
        "select" | "open" => match argument {
            Some(arg) => ChatCommand::Select(SessionRef::parse(arg)),
            None => ChatCommand::Invalid("/select requires a number or session id".to_string()),
        },
        "delete" | "rm" => match argument {
            Some(arg) => ChatCommand::Delete(SessionRef::parse(arg)),
            None => ChatCommand::Invalid("/delete requires a number or session id".to_string()),
        },
        "history" => ChatCommand::History,
        "upload" => match argument {
            Some(path) => ChatCommand::Upload(path.to_string()),
            None => ChatCommand::Invalid("/upload requires a file path".to_string()),
        },
        "files" => ChatCommand::Files,
        "rag" => match argument.and_then(parse_on_off) {
            Some(value) => ChatCommand::Rag(value),
            None => ChatCommand::Invalid("/rag expects 'on' or 'off'".to_string()),
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new session
  /sessions              List sessions (* marks the current one)
  /select <n|id>         Switch to a session
  /delete <n|id>         Delete a session (asks first)
  /history               Reload the current transcript
  /upload <path>         Upload a .txt or .pdf file for every later message
  /files                 List uploaded files
  /rag on|off            Toggle retrieval-augmented generation
  /help                  Show this help message
  /quit                  Exit
Ctrl-C while a reply is typing shows the rest at once."#
}
