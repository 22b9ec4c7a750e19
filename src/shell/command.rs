//! The closed set of shell commands and their argument parsing.

use crate::error::ShellError;
use chrono::format::{Item, StrftimeItems};
use std::fmt;

/// Every command the shell knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Ls,
    Cd,
    Pwd,
    Echo,
    Cat,
    Date,
    Who,
    Rmdir,
    Exit,
}

impl CommandName {
    pub const ALL: [CommandName; 9] = [
        CommandName::Ls,
        CommandName::Cd,
        CommandName::Pwd,
        CommandName::Echo,
        CommandName::Cat,
        CommandName::Date,
        CommandName::Who,
        CommandName::Rmdir,
        CommandName::Exit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Ls => "ls",
            CommandName::Cd => "cd",
            CommandName::Pwd => "pwd",
            CommandName::Echo => "echo",
            CommandName::Cat => "cat",
            CommandName::Date => "date",
            CommandName::Who => "who",
            CommandName::Rmdir => "rmdir",
            CommandName::Exit => "exit",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.as_str() == name)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ls {
        long: bool,
        all: bool,
        path: Option<String>,
    },
    Cd {
        path: Option<String>,
    },
    Pwd,
    Echo {
        args: Vec<String>,
    },
    Cat {
        paths: Vec<String>,
    },
    Date {
        format: Option<String>,
    },
    Who,
    Rmdir {
        paths: Vec<String>,
    },
    Exit {
        code: i32,
    },
}

impl Command {
    /// Validate `args` for `name`. Errors here are reported without running anything.
    pub fn parse(name: CommandName, args: &[String]) -> Result<Command, ShellError> {
        match name {
            CommandName::Ls => parse_ls(args),
            CommandName::Cd => match args {
                [] => Ok(Command::Cd { path: None }),
                [path] => Ok(Command::Cd {
                    path: Some(path.clone()),
                }),
                _ => Err(ShellError::TooManyArguments),
            },
            CommandName::Pwd => Ok(Command::Pwd),
            CommandName::Echo => Ok(Command::Echo {
                args: args.to_vec(),
            }),
            CommandName::Cat => {
                if args.is_empty() {
                    return Err(ShellError::MissingOperand);
                }
                Ok(Command::Cat {
                    paths: args.to_vec(),
                })
            }
            CommandName::Date => match args {
                [] => Ok(Command::Date { format: None }),
                // Anything but a usable `+FORMAT` falls back to the default format
                [arg, ..] => Ok(Command::Date {
                    format: arg
                        .strip_prefix('+')
                        .filter(|format| is_valid_date_format(format))
                        .map(str::to_string),
                }),
            },
            CommandName::Who => Ok(Command::Who),
            CommandName::Rmdir => {
                if args.is_empty() {
                    return Err(ShellError::MissingOperand);
                }
                Ok(Command::Rmdir {
                    paths: args.to_vec(),
                })
            }
            CommandName::Exit => match args {
                [] => Ok(Command::Exit { code: 0 }),
                [code] => code
                    .parse::<i32>()
                    .map(|code| Command::Exit { code })
                    .map_err(|_| ShellError::InvalidExitCode(code.clone())),
                _ => Err(ShellError::TooManyArguments),
            },
        }
    }

    pub fn name(&self) -> CommandName {
        match self {
            Command::Ls { .. } => CommandName::Ls,
            Command::Cd { .. } => CommandName::Cd,
            Command::Pwd => CommandName::Pwd,
            Command::Echo { .. } => CommandName::Echo,
            Command::Cat { .. } => CommandName::Cat,
            Command::Date { .. } => CommandName::Date,
            Command::Who => CommandName::Who,
            Command::Rmdir { .. } => CommandName::Rmdir,
            Command::Exit { .. } => CommandName::Exit,
        }
    }
}

fn parse_ls(args: &[String]) -> Result<Command, ShellError> {
    let mut long = false;
    let mut all = false;
    let mut path = None;

    for arg in args {
        match arg.strip_prefix('-') {
            Some(flags) if !flags.is_empty() => {
                for flag in flags.chars() {
                    match flag {
                        'l' => long = true,
                        'a' => all = true,
                        other => return Err(ShellError::InvalidOption(other.to_string())),
                    }
                }
            }
            _ => {
                if path.is_some() {
                    return Err(ShellError::TooManyArguments);
                }
                path = Some(arg.clone());
            }
        }
    }

    Ok(Command::Ls { long, all, path })
}

fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
