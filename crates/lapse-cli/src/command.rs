use thiserror::Error;

/// One line of input to the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { target: String, max_uses: u32 },
    Open { id: String },
    Info { id: String },
    Delete { id: String },
    Sweep,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("max uses must be a non-negative integer, got {0:?}")]
    InvalidMaxUses(String),
}

pub const HELP: &str = "\
commands:
  create <url> <max-uses>   shorten a url
  open <id>                 follow a short link
  info <id>                 show a link without using it
  delete <id>               delete one of your links
  sweep                     evict expired links now
  help                      show this message
  quit                      leave";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("create", [target, max_uses]) => {
                let max_uses = max_uses
                    .parse()
                    .map_err(|_| CommandError::InvalidMaxUses(max_uses.to_string()))?;
                Ok(Command::Create {
                    target: target.to_string(),
                    max_uses,
                })
            }
            ("create", _) => Err(CommandError::Usage("create <url> <max-uses>")),
            ("open", [id]) => Ok(Command::Open { id: id.to_string() }),
            ("open", _) => Err(CommandError::Usage("open <id>")),
            ("info", [id]) => Ok(Command::Info { id: id.to_string() }),
            ("info", _) => Err(CommandError::Usage("info <id>")),
            ("delete", [id]) => Ok(Command::Delete { id: id.to_string() }),
            ("delete", _) => Err(CommandError::Usage("delete <id>")),
            ("sweep", []) => Ok(Command::Sweep),
            ("sweep", _) => Err(CommandError::Usage("sweep")),
            ("help", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
