#![forbid(unsafe_code)]

//! Core: terminal lifecycle, geometry, cell buffers, and canonical input events.
//!
//! Everything above this crate (widgets, runtime, the lab binary) draws into a
//! [`buffer::Buffer`] and consumes [`event::Event`]s; only
//! [`terminal_session`] touches the real terminal.

pub mod buffer;
pub mod event;
pub mod geometry;
pub mod style;
pub mod terminal_session;
pub mod text;

pub use buffer::{Buffer, Cell};
pub use event::Event;
pub use geometry::Rect;
pub use style::{Color, Style, StyleFlags};
