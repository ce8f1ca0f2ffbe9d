//! Interactive command parsing.
//!
//! Task positions are 1-based, as printed by the list view.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Add(String),
    Toggle(usize),
    Remove(usize),
    Help,
    Quit,
}

pub const HELP: &str = "commands:
  ls                 show tasks
  refresh            reload tasks from the store
  add <title>        create a task
  done <n>           toggle task n
  rm <n>             delete task n
  help               show this help
  quit               exit";

/// Parses one input line. Blank lines map to `List`.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" | "ls" | "list" => Ok(Command::List),
        "refresh" | "r" => Ok(Command::Refresh),
        // Blank titles are passed through; the synchronizer skips them.
        "add" | "a" => Ok(Command::Add(rest.to_string())),
        "done" | "toggle" | "t" => parse_position(rest).map(Command::Toggle),
        "rm" | "del" | "delete" => parse_position(rest).map(Command::Remove),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn parse_position(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(format!("expected a task number, got `{value}`")),
    }
}
