//! Line commands understood by the REPL.

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the input text, as if the user typed it.
    Type(String),
    Select(String),
    Clear,
    Open,
    Close,
    Toggle,
    Up,
    Down,
    Enter,
    Tab,
    Focus,
    Blur,
    Show,
    Stats,
    Help,
}

pub const HELP: &str = "\
  <text>        set the input text
  :select KEY   select an item by key
  :clear        clear the input text
  :open         open the popup
  :close        close the popup
  :toggle       open the popup if it is closed
  :down / :up   move keyboard focus (opens the popup when closed)
  :enter        commit the focused item
  :tab          accept the inline suggestion
  :focus        give the input focus
  :blur         take focus away from the input
  :show         print the current state
  :stats        print filtered-view cache statistics
  :help         show this help";

impl Command {
    /// Parse one input line. Returns `None` for blank lines.
    ///
    /// Lines that do not start with `:` are text to type. A leading `::`
    /// types text that starts with a single `:`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Some(Command::Type(line.to_string())));
        };
        if rest.starts_with(':') {
            return Ok(Some(Command::Type(rest.to_string())));
        }

        let mut parts = rest.trim().splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        let command = match (name, arg) {
            ("select", Some(key)) => Command::Select(key.to_string()),
            ("select", None) => bail!(":select needs a key"),
            ("clear", None) => Command::Clear,
            ("open", None) => Command::Open,
            ("close", None) => Command::Close,
            ("toggle", None) => Command::Toggle,
            ("up", None) => Command::Up,
            ("down", None) => Command::Down,
            ("enter", None) => Command::Enter,
            ("tab", None) => Command::Tab,
            ("focus", None) => Command::Focus,
            ("blur", None) => Command::Blur,
            ("show", None) => Command::Show,
            ("stats", None) => Command::Stats,
            ("help", None) => Command::Help,
            (name, Some(_)) if !name.is_empty() => bail!(":{name} takes no argument"),
            _ => bail!("unknown command ':{name}' (try :help)"),
        };
        Ok(Some(command))
    }
}
