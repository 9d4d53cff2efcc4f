#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A 1-based scenario number on the home screen, option number while playing.
    Pick(usize),
    Replay,
    Home,
    Back,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP_TEXT: &str =
    "Commands: <number> to pick, r replay, h home, b back to scenarios, ? help, q quit";

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let word = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    if let Ok(number) = word.parse::<usize>() {
        return Some(Command::Pick(number));
    }

    let parsed = match word.as_str() {
        "r" | "replay" => Command::Replay,
        "h" | "home" => Command::Home,
        "b" | "back" => Command::Back,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    };

    Some(parsed)
}
