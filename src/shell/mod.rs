//! Interactive command shell
//!
//! Input lines are tokenized by a Pest grammar into literal arguments,
//! checked against each command's parameter list and executed by a
//! [`Session`].

pub mod command;
pub mod output;
pub mod parser;
pub mod session;

pub use command::{help_text, Command, CommandSpec, COMMANDS};
pub use output::{CommandOutput, EdgeRecord};
pub use parser::{parse_raw, RawCommand, Rule};
pub use session::Session;

use crate::graph::GraphError;
use crate::persistence::PersistenceError;
use thiserror::Error;

/// Shell errors
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Parse error: {0}")]
    Parse(#[from] pest::error::Error<Rule>),

    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("{command} expects {expected} argument(s), got {found}")]
    Arity {
        command: &'static str,
        expected: String,
        found: usize,
    },

    #[error("{command}: argument '{argument}' must be {expected}, got {found}")]
    ArgumentType {
        command: &'static str,
        argument: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{command}: unknown argument '{argument}'")]
    UnknownArgument {
        command: &'static str,
        argument: String,
    },

    #[error("{command}: argument '{argument}' given twice")]
    DuplicateArgument {
        command: &'static str,
        argument: String,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type ShellResult<T> = Result<T, ShellError>;
