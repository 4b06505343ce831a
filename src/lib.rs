//! A small line-oriented quiz shell.
//!
//! Commands are read line by line from a terminal or a script file. The first
//! word of a line selects a command from a [`CommandTable`]; the command gets
//! the rest of the line and splits it with [`tokenize`], which understands
//! `'single'` and `"double"` quoted arguments.
//!
//! The main entry point is [`Shell`], which owns a [`Session`] (input, output,
//! messages and properties) and runs the read-dispatch loop.

mod builtin;
pub mod command;
pub mod error;
pub mod io_adapters;
mod interpreter;
pub mod messages;
pub mod opts;
pub mod session;
pub mod tokenizer;

pub use builtin::default_commands;
pub use command::{CommandHandler, CommandTable};
pub use error::{Result, ShellError};
pub use interpreter::Shell;
pub use io_adapters::{EditorSource, LineSource, MemWriter, ScriptSource};
pub use messages::Catalog;
pub use opts::Opts;
pub use session::{LoopState, Session};
pub use tokenizer::{dequote, tokenize};
