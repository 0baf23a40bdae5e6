//! Error types for Serialpub Core

use std::path::PathBuf;
use thiserror::Error;

use crate::namegen::Channel;

/// Result type alias using NamingError
pub type Result<T> = std::result::Result<T, NamingError>;

/// Top-level error type for all naming operations
#[derive(Debug, Error)]
pub enum NamingError {
    #[error("Invalid namegen rules: {0}")]
    Parse(#[from] ParseError),

    #[error("Rule '{rule}' cannot be applied to a {variant} value (channel {channel})")]
    TypeMismatch {
        channel: Channel,
        rule: &'static str,
        variant: &'static str,
    },

    #[error("Channel {channel} ended on a {variant} value instead of a string")]
    Unterminated {
        channel: Channel,
        variant: &'static str,
    },

    #[error("Channel {channel} produced an empty name")]
    EmptyName { channel: Channel },

    #[error("Cannot load override library '{}': {message}", path.display())]
    ScriptLoad { path: PathBuf, message: String },

    #[error("Override for channel {channel} failed: {message}")]
    ScriptExecution { channel: Channel, message: String },

    #[error("Invalid naming request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors found while compiling a rule expression
///
/// Positions are byte offsets into the expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("expected {expected} at position {position}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("unknown section '{prefix}' at position {position} (expected t, n or f)")]
    UnknownSection { prefix: String, position: usize },

    #[error("section '{section}' at position {position} must be present only once")]
    DuplicateSection { section: char, position: usize },

    #[error("section at position {position} needs a prefix when several sections are given")]
    UnprefixedSection { position: usize },

    #[error("unknown rule '{name}' at position {position}")]
    UnknownRule { name: String, position: usize },

    #[error("_t at position {position} must be the first rule of the n or f section")]
    MisplacedBackref { position: usize },

    #[error("rule '{rule}' at position {position} takes at most {expected} argument(s), got {found}")]
    Arity {
        rule: &'static str,
        expected: usize,
        found: usize,
        position: usize,
    },

    #[error("argument {index} of rule '{rule}' at position {position} must be ASCII")]
    NonAsciiArgument {
        rule: &'static str,
        index: usize,
        position: usize,
    },

    #[error("argument {index} of rule '{rule}' at position {position} must be {expected}")]
    ArgumentType {
        rule: &'static str,
        index: usize,
        expected: &'static str,
        position: usize,
    },
}

/// Errors that occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}
