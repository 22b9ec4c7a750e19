//! Command interpreter
//!
//! Holds the VFS and the current directory, runs parsed commands against them
//! and turns every outcome into ordered output lines. Handlers return errors as
//! values; `dispatch` and `execute` are the only places that format them, so a
//! bad command never ends the session.

use crate::error::ShellError;
use crate::shell::command::{Command, CommandName};
use crate::shell::lexer::{expand_vars, tokenize};
use crate::tree::Vfs;
use crate::types::NodeId;
use chrono::{DateTime, Local};
use tracing::{debug, info};

/// Name used when an error cannot be attributed to a command.
pub const SHELL_NAME: &str = "vshell";

const DEFAULT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";
const WHO_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const LS_TIME_FORMAT: &str = "%b %e %H:%M";

/// Whether the session keeps reading lines after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// One block of text, tagged with the stream it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout(String),
    Stderr(String),
}

/// Result of running one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub output: Vec<Output>,
    pub flow: Flow,
}

impl Execution {
    fn quiet() -> Self {
        Self {
            output: Vec::new(),
            flow: Flow::Continue,
        }
    }

    fn error(line: String) -> Self {
        Self {
            output: vec![Output::Stderr(line)],
            flow: Flow::Continue,
        }
    }

    /// Stdout blocks joined by newlines.
    pub fn stdout(&self) -> String {
        self.collect(|o| match o {
            Output::Stdout(text) => Some(text),
            Output::Stderr(_) => None,
        })
    }

    /// Stderr lines joined by newlines.
    pub fn stderr(&self) -> String {
        self.collect(|o| match o {
            Output::Stderr(text) => Some(text),
            Output::Stdout(_) => None,
        })
    }

    fn collect<'a>(&'a self, pick: impl Fn(&'a Output) -> Option<&'a String>) -> String {
        self.output
            .iter()
            .filter_map(pick)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What a handler produced: per-item results in order, plus the control signal.
struct Report {
    items: Vec<Result<String, ShellError>>,
    flow: Flow,
}

impl Report {
    fn text(text: impl Into<String>) -> Self {
        Self {
            items: vec![Ok(text.into())],
            flow: Flow::Continue,
        }
    }

    fn silent() -> Self {
        Self {
            items: Vec::new(),
            flow: Flow::Continue,
        }
    }

    fn items(items: Vec<Result<String, ShellError>>) -> Self {
        Self {
            items,
            flow: Flow::Continue,
        }
    }
}

/// Session identity shown by `who`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            user: "user".to_string(),
            host: "localhost".to_string(),
        }
    }
}

/// Interpreter state: the tree, the working directory and the session identity.
pub struct Interpreter {
    vfs: Vfs,
    cwd: NodeId,
    identity: Identity,
    clock: fn() -> DateTime<Local>,
}

impl Interpreter {
    /// Start at the root of `vfs`.
    pub fn new(vfs: Vfs, identity: Identity) -> Self {
        let cwd = vfs.root();
        Self {
            vfs,
            cwd,
            identity,
            clock: Local::now,
        }
    }

    /// Replace the time source used by `date`, `who` and `ls -l`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Absolute path of the working directory.
    pub fn cwd_path(&self) -> String {
        self.vfs
            .get_path(self.cwd)
            .unwrap_or_else(|_| "/".to_string())
    }

    /// Run one raw input line, expanding variables from the process environment.
    pub fn execute_line(&mut self, line: &str) -> Execution {
        self.execute_line_with(line, |name| std::env::var(name).ok())
    }

    /// Run one raw input line: expand variables, tokenize, dispatch.
    pub fn execute_line_with<F>(&mut self, line: &str, lookup: F) -> Execution
    where
        F: Fn(&str) -> Option<String>,
    {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Execution::quiet();
        }

        let expanded = expand_vars(trimmed, lookup);
        match tokenize(&expanded) {
            Ok(tokens) => self.dispatch(&tokens),
            Err(e) => Execution::error(format!("{}: {}", SHELL_NAME, e)),
        }
    }

    /// Dispatch already tokenized words. The first word names the command.
    pub fn dispatch(&mut self, tokens: &[String]) -> Execution {
        let Some((first, args)) = tokens.split_first() else {
            return Execution::quiet();
        };

        let Some(name) = CommandName::lookup(first) else {
            debug!(command = %first, "command not found");
            return Execution::error(ShellError::CommandNotFound(first.clone()).to_string());
        };

        match Command::parse(name, args) {
            Ok(command) => self.execute(command),
            Err(e) => {
                debug!(command = %name, error = %e, "invalid arguments");
                Execution::error(format!("{}: {}", name, e))
            }
        }
    }

    /// Run a parsed command. Per-item errors become stderr lines prefixed by
    /// the command name; output keeps the order the handler produced.
    pub fn execute(&mut self, command: Command) -> Execution {
        let name = command.name();
        match self.run(command) {
            Ok(report) => {
                let output = report
                    .items
                    .into_iter()
                    .map(|item| match item {
                        Ok(text) => Output::Stdout(text),
                        Err(e) => {
                            debug!(command = %name, error = %e, "command error");
                            Output::Stderr(format!("{}: {}", name, e))
                        }
                    })
                    .collect();
                Execution {
                    output,
                    flow: report.flow,
                }
            }
            Err(e) => {
                debug!(command = %name, error = %e, "command failed");
                Execution::error(format!("{}: {}", name, e))
            }
        }
    }

    /// The whole dispatch table: one arm per command.
    fn run(&mut self, command: Command) -> Result<Report, ShellError> {
        debug!(command = %command.name(), "dispatch");
        match command {
            Command::Ls { long, all, path } => self.ls(long, all, path.as_deref()),
            Command::Cd { path } => self.cd(path.as_deref()),
            Command::Pwd => Ok(Report::text(self.vfs.get_path(self.cwd)?)),
            Command::Echo { args } => Ok(Report::text(args.join(" "))),
            Command::Cat { paths } => Ok(self.cat(&paths)),
            Command::Date { format } => Ok(self.date(format.as_deref())),
            Command::Who => Ok(self.who()),
            Command::Rmdir { paths } => Ok(self.rmdir(&paths)),
            Command::Exit { code } => Ok(Report {
                items: Vec::new(),
                flow: Flow::Exit(code),
            }),
        }
    }

    fn resolve(&self, path: &str) -> Result<NodeId, ShellError> {
        Ok(self.vfs.resolve_path(self.cwd, path)?)
    }

    fn ls(&self, long: bool, all: bool, path: Option<&str>) -> Result<Report, ShellError> {
        let target = match path {
            Some(path) => self.resolve(path)?,
            None => self.cwd,
        };
        let node = self.vfs.node(target)?;
        if !node.is_directory() {
            return Err(ShellError::NotADirectory(path.unwrap_or(".").to_string()));
        }

        let mut entries = Vec::new();
        for (name, id) in node.children() {
            let child = self.vfs.node(*id)?;
            if all || !child.is_hidden() {
                entries.push((name.as_str(), child));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(b.0));

        if long {
            let mut lines = vec![format!("total {}", entries.len())];
            for (name, child) in &entries {
                lines.push(format!(
                    "{} {:<8} {:<8} {:>6} {} {}{}",
                    child.mode_string(),
                    child.metadata.owner,
                    child.metadata.group,
                    child.size(),
                    child.metadata.modified.format(LS_TIME_FORMAT),
                    name,
                    if child.is_directory() { "/" } else { "" }
                ));
            }
            return Ok(Report::text(lines.join("\n")));
        }

        if entries.is_empty() {
            return Ok(Report::silent());
        }
        let names: Vec<String> = entries
            .iter()
            .map(|(name, child)| {
                if child.is_directory() {
                    format!("{}/", name)
                } else {
                    name.to_string()
                }
            })
            .collect();
        Ok(Report::text(names.join("\n")))
    }

    fn cd(&mut self, path: Option<&str>) -> Result<Report, ShellError> {
        let path = path.unwrap_or("/");
        let target = self.resolve(path)?;
        if !self.vfs.node(target)?.is_directory() {
            return Err(ShellError::NotADirectory(path.to_string()));
        }
        self.cwd = target;
        debug!(cwd = %self.cwd_path(), "changed directory");
        Ok(Report::silent())
    }

    fn cat(&self, paths: &[String]) -> Report {
        let items = paths
            .iter()
            .map(|path| {
                let node = self.vfs.node(self.resolve(path)?)?;
                if node.is_directory() {
                    return Err(ShellError::IsADirectory(path.clone()));
                }
                Ok(node.content().to_string())
            })
            .collect();
        Report::items(items)
    }

    fn date(&self, format: Option<&str>) -> Report {
        let now = (self.clock)();
        Report::text(now.format(format.unwrap_or(DEFAULT_DATE_FORMAT)).to_string())
    }

    fn who(&self) -> Report {
        let now = (self.clock)().format(WHO_TIME_FORMAT).to_string();
        let Identity { user, host } = &self.identity;
        Report::items(vec![
            Ok(format!("{:<8} pts/0    {} ({})", user, now, host)),
            Ok(format!("{:<8} pts/1    {} ({})", user, now, host)),
        ])
    }

    fn rmdir(&mut self, paths: &[String]) -> Report {
        let items = paths
            .iter()
            .map(|path| self.remove_directory(path))
            .collect();
        Report::items(items)
    }

    fn remove_directory(&mut self, path: &str) -> Result<String, ShellError> {
        let target = self.resolve(path)?;
        let node = self.vfs.node(target)?;
        if !node.is_directory() {
            return Err(ShellError::NotADirectory(path.to_string()));
        }
        let Some(parent) = node.parent() else {
            return Err(ShellError::CannotRemoveRoot(path.to_string()));
        };
        if target == self.cwd {
            return Err(ShellError::CannotRemoveCurrent(path.to_string()));
        }
        if !node.children().is_empty() {
            return Err(ShellError::NotEmpty(path.to_string()));
        }

        let name = node.name.clone();
        self.vfs.remove_child(parent, &name)?;
        info!(path, "removed directory");
        Ok(format!("removed directory '{}'", path))
    }
}
