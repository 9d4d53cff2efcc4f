//! Terminal trait.

/// Input delivered by a terminal's reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalInput {
    /// One line, without the trailing newline.
    Line(String),
    /// The input stream ended.
    Closed,
}

/// Minimal line-oriented terminal interface.
pub trait Terminal {
    /// Start the terminal; `on_input` is called from the reader thread.
    fn start(&mut self, on_input: Box<dyn FnMut(TerminalInput) + Send>) -> std::io::Result<()>;

    /// Stop the reader and restore state.
    fn stop(&mut self) -> std::io::Result<()>;

    /// Write output to the terminal.
    fn write(&mut self, data: &str);

    /// Terminal width in columns.
    fn columns(&self) -> u16;
}
