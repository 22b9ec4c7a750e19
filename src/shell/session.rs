//! Run states: interactive (line editor) and scripted (fixed line sequence).
//!
//! Both feed lines through `Interpreter::execute_line` and print what comes
//! back; they differ only in where lines come from and how input ends.

use crate::shell::command::CommandName;
use crate::shell::interpreter::{Execution, Flow, Interpreter, Output};
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

const INTERRUPT_HINT: &str = "^C (type 'exit' or press Ctrl-D to leave)";

/// A named shell session over one interpreter.
pub struct Session {
    name: String,
    interpreter: Interpreter,
}

impl Session {
    pub fn new(name: impl Into<String>, interpreter: Interpreter) -> Self {
        Self {
            name: name.into(),
            interpreter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// `<name>:<cwd>$ `
    pub fn prompt(&self) -> String {
        format!("{}:{}$ ", self.name, self.interpreter.cwd_path())
    }

    /// Greeting shown before the first interactive prompt.
    pub fn banner(&self) -> String {
        let commands: Vec<&str> = CommandName::ALL.iter().map(|c| c.as_str()).collect();
        format!(
            "Virtual filesystem '{}'\nAvailable commands: {}\nType 'exit' or press Ctrl-D to leave.",
            self.name,
            commands.join(", ")
        )
    }

    fn colored_prompt(&self) -> String {
        format!(
            "{}:{}$ ",
            self.name.green().bold(),
            self.interpreter.cwd_path().blue().bold()
        )
    }

    /// Run lines from `reader` in order, echoing each after the prompt.
    ///
    /// Blank and comment lines are skipped without echo. Returns the exit code:
    /// the argument of `exit`, or 0 when the lines run out. A read failure
    /// stops the run and is returned as an error.
    pub fn run_script<R, W, E>(&mut self, reader: R, out: &mut W, err: &mut E) -> io::Result<i32>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        info!(session = %self.name, "script started");
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                warn!(line = number + 1, error = %e, "script read failed");
                e
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            writeln!(out, "{}{}", self.prompt(), trimmed)?;
            let execution = self.interpreter.execute_line(trimmed);
            write_execution(&execution, out, err)?;
            if let Flow::Exit(code) = execution.flow {
                info!(session = %self.name, code, "script exited");
                return Ok(code);
            }
        }
        info!(session = %self.name, "script finished");
        Ok(0)
    }

    /// Read lines from the terminal until `exit` or end of input.
    ///
    /// Ctrl-C abandons only the line being typed.
    pub fn run_interactive(&mut self) -> anyhow::Result<i32> {
        let mut editor = DefaultEditor::new()?;
        let stdout = io::stdout();
        let stderr = io::stderr();
        info!(session = %self.name, "interactive session started");
        println!("{}", self.banner());

        loop {
            match editor.readline(&self.colored_prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(e) = editor.add_history_entry(line.as_str()) {
                            warn!("Failed to add history entry: {}", e);
                        }
                    }
                    let execution = self.interpreter.execute_line(&line);
                    write_execution(&execution, &mut stdout.lock(), &mut stderr.lock())?;
                    if let Flow::Exit(code) = execution.flow {
                        info!(session = %self.name, code, "session exited");
                        return Ok(code);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", INTERRUPT_HINT);
                }
                Err(ReadlineError::Eof) => {
                    info!(session = %self.name, "end of input");
                    return Ok(0);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Print stdout blocks to `out` and error lines to `err`, one line each.
pub fn write_execution<W: Write, E: Write>(
    execution: &Execution,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    for item in &execution.output {
        match item {
            Output::Stdout(text) => write_block(out, text)?,
            Output::Stderr(text) => write_block(err, text)?,
        }
    }
    out.flush()?;
    err.flush()
}

fn write_block<W: Write>(sink: &mut W, text: &str) -> io::Result<()> {
    if text.ends_with('\n') {
        write!(sink, "{}", text)
    } else {
        writeln!(sink, "{}", text)
    }
}
