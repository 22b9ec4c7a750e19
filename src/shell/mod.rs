//! Command Interpreter
//!
//! Lexing, the fixed command set, the interpreter that runs commands against
//! the VFS, and the interactive/scripted session loops.

pub mod command;
pub mod interpreter;
pub mod lexer;
pub mod session;

pub use command::{Command, CommandName};
pub use interpreter::{Execution, Flow, Identity, Interpreter, Output};
pub use session::Session;
