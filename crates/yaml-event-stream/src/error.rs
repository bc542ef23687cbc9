//! Error types for the YAML event stream.

use crate::event::Position;
use thiserror::Error;

/// Result type alias for yaml-event-stream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`EventParser`](crate::EventParser).
///
/// Both variants are terminal: once returned, the parser produces no further
/// events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The engine could not be set up, or the input could not be bound to it
    #[error("failed to initialize YAML parser: {message}")]
    Initialization { message: String },

    /// The engine rejected the input mid-stream
    #[error("{message}{}", describe_position(.position))]
    Parse {
        message: String,
        position: Option<Position>,
    },
}

impl Error {
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Initialization { .. } => None,
            Error::Parse { position, .. } => *position,
        }
    }
}

fn describe_position(position: &Option<Position>) -> String {
    match position {
        Some(pos) => format!(" at line {} column {}", pos.line + 1, pos.column),
        None => String::new(),
    }
}
