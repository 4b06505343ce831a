//! Errors raised by the shell, its tokenizer and its commands.

use std::io;
use thiserror::Error;

/// Every failure a command line can run into.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The first word of the line does not name a registered command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A property name missing from the property registry.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// A quote at one end of a token is not closed at the other end.
    #[error("a quote should be closed for <{0}>")]
    UnbalancedQuote(String),

    /// A lone quote sits in the middle of two quotes of the same kind, e.g. `"""`.
    #[error("a non-paired quote may not occur between the same quotes in <{0}>")]
    UnpairedQuoteBetweenQuotes(String),

    /// The tokenizer was asked to split on a delimiter it cannot handle.
    #[error("unsupported delimiter <{0}>: it must be non-empty and contain no quotes")]
    UnsupportedConfiguration(String),

    /// An argument that should be numeric is not.
    #[error("not a number: {0}")]
    NotANumber(String),

    /// The property validator rejected the value.
    #[error("cannot set {name} to {value}: {reason}")]
    PropertySetFailure {
        name: String,
        value: String,
        reason: String,
    },

    /// Reading input or writing output failed.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

/// Convenience Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ShellError>;
