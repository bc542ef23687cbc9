//! Inspector driver: parse a whole input and print its event trace.

use crate::Error;
use crate::parser::EventParser;
use crate::render::write_event;
use std::io::{self, Read, Write};
use thiserror::Error as ThisError;

/// Outcome of a successful [`inspect`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectSummary {
    /// Number of events written
    pub events: usize,
}

/// Why an [`inspect`] run stopped.
#[derive(Debug, ThisError)]
pub enum InspectError {
    #[error("Error creating parser: {0}")]
    Create(#[source] Error),

    #[error("Parser error: {0}")]
    Parse(#[source] Error),

    #[error("Error writing output: {0}")]
    Io(#[from] io::Error),
}

/// Parse everything in `input` and write one rendered block per event to
/// `out`.
///
/// Events are written as they are produced, so when parsing fails the trace
/// up to the failure is already in `out`.
pub fn inspect<R: Read, W: Write + ?Sized>(
    input: R,
    out: &mut W,
) -> std::result::Result<InspectSummary, InspectError> {
    let mut parser = EventParser::from_reader(input).map_err(InspectError::Create)?;

    let mut events = 0;
    while let Some(event) = parser.next_event().map_err(InspectError::Parse)? {
        write_event(out, &event)?;
        events += 1;
    }
    parser.close();

    tracing::debug!(events, "inspection finished");
    Ok(InspectSummary { events })
}
