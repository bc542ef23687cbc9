//! # yaml-event-stream
//!
//! Position-annotated YAML event stream.
//!
//! This crate exposes the low-level event stream of a YAML parser: stream,
//! document, scalar, alias and collection boundaries, each with start and end
//! positions, node properties, style hints and the comments attached to it.
//! It is meant for tools that need to see *how* a document was written, not
//! just what it means.
//!
//! ## Design
//!
//! [`EventParser`] is a thin adapter over an [`Engine`]. The engine produces
//! loosely typed [`RawEvent`] records; the parser normalizes each one into an
//! [`Event`] whose payload is fixed by its kind ([`EventData`]), so a scalar
//! always has a value and an end marker never has one. The default engine,
//! [`YamlEngine`], drives yaml-rust2 and recovers anchor names, extents and
//! comments from the source text.
//!
//! [`inspect`] renders a whole stream as a readable trace; the
//! `inspect-yaml` binary is a wrapper around it.
//!
//! ## Example
//!
//! ```rust
//! use yaml_event_stream::{EventKind, EventParser};
//!
//! let mut parser = EventParser::new("# greeting\nhello: world\n");
//! while let Some(event) = parser.next_event().unwrap() {
//!     if event.kind() == EventKind::Scalar {
//!         println!("{} at line {}", event.value(), event.start().line + 1);
//!     }
//! }
//! parser.close();
//! ```

pub mod engine;
mod error;
mod event;
mod inspect;
mod parser;
mod render;
mod source_text;

pub use engine::{Engine, EngineError, Mark, RawEvent, RawEventKind, RawStyle, YamlEngine};
pub use error::{Error, Result};
pub use event::{
    CollectionStyle, Comments, Event, EventData, EventKind, NodeProperties, Position, ScalarStyle,
    Style,
};
pub use inspect::{InspectError, InspectSummary, inspect};
pub use parser::EventParser;
pub use render::{render_event, write_event};
