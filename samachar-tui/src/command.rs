#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,   // /help
    Health, // /health
    Menu,   // /menu
    Quit,   // /quit or /exit
    Unknown(String),
}

/// Parse a submitted line as a slash command. Returns `None` for article
/// text, which goes to the classifier instead.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let verb = trimmed
        .split(char::is_whitespace)
        .next()
        .unwrap_or_default();

    let cmd = match verb {
        "/help" => Command::Help,
        "/health" => Command::Health,
        "/menu" => Command::Menu,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(verb.to_string()),
    };
    Some(cmd)
}
