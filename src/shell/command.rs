//! Command definitions
//!
//! Parses one input line into a command.

use std::path::PathBuf;

use crate::error::{ChainFsError, Result};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an empty file
    Touch { name: String },

    /// Print a file
    Cat { name: String },

    /// Overwrite a file; `text` comes from the following input line
    Write { name: String, text: String },

    /// Append to a file; `text` comes from the following input line
    Append { name: String, text: String },

    /// Delete a file
    Remove { name: String },

    /// List files
    Dir,

    /// Print the journal
    ShowLog,

    /// Undo journaled operations (negative counts are rejected by the engine)
    Undo { count: i64 },

    /// Save the disk image
    Save { path: PathBuf },

    /// Load a disk image
    Load { path: PathBuf },

    /// End the session
    Exit,
}

impl Command {
    /// Parse a single input line
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Err(ChainFsError::Command("empty command".to_string())),
            "exit" => Ok(Command::Exit),
            "dir" => Ok(Command::Dir),
            "show" if rest == "log" => Ok(Command::ShowLog),
            "touch" => Ok(Command::Touch {
                name: required(word, rest)?,
            }),
            "cat" => Self::parse_cat(rest),
            "rm" => {
                // The flag must stand alone: `rm -fx` is not `rm -f x`
                let name = rest
                    .strip_prefix("-f")
                    .filter(|name| name.is_empty() || name.starts_with(char::is_whitespace))
                    .ok_or_else(|| {
                        ChainFsError::Command("rm: only `rm -f <name>` is supported".to_string())
                    })?;
                Ok(Command::Remove {
                    name: required(word, name.trim())?,
                })
            }
            "undo" => {
                let count = required(word, rest)?.parse().map_err(|_| {
                    ChainFsError::Command(format!("undo: {:?} is not a number", rest))
                })?;
                Ok(Command::Undo { count })
            }
            "save" => Ok(Command::Save {
                path: required(word, rest)?.into(),
            }),
            "load" => Ok(Command::Load {
                path: required(word, rest)?.into(),
            }),
            _ => Err(ChainFsError::Command(format!("unknown command: {}", line))),
        }
    }

    /// `cat <name>`, `cat ><name>` or `cat >><name>`
    fn parse_cat(rest: &str) -> Result<Self> {
        if let Some(name) = rest.strip_prefix(">>") {
            Ok(Command::Append {
                name: required("cat >>", name.trim())?,
                text: String::new(),
            })
        } else if let Some(name) = rest.strip_prefix('>') {
            Ok(Command::Write {
                name: required("cat >", name.trim())?,
                text: String::new(),
            })
        } else {
            Ok(Command::Cat {
                name: required("cat", rest)?,
            })
        }
    }

    /// Whether the command takes the next input line as its text
    pub fn expects_text(&self) -> bool {
        matches!(self, Command::Write { .. } | Command::Append { .. })
    }

    /// Attach an input line (plus its newline) as the command text
    pub fn with_text(self, line: &str) -> Self {
        let text = format!("{}\n", line);
        match self {
            Command::Write { name, .. } => Command::Write { name, text },
            Command::Append { name, .. } => Command::Append { name, text },
            other => other,
        }
    }
}

fn required(command: &str, argument: &str) -> Result<String> {
    if argument.is_empty() {
        return Err(ChainFsError::Command(format!(
            "{}: missing argument",
            command
        )));
    }
    Ok(argument.to_string())
}
