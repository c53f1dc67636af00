#![forbid(unsafe_code)]

//! Portal Lab: a terminal board for moving characters between dimensions.
//!
//! - [`app`]: the [`LabModel`] board model and its move/steal pipelines
//! - [`board`]: column layout and pointer hit-testing
//! - [`cli`]: command-line options
//! - [`logging`]: file-backed tracing subscriber

pub mod app;
pub mod board;
pub mod cli;
pub mod logging;

pub use app::{LabConfig, LabModel, LoadState, Msg};
pub use board::{BoardHit, BoardLayout, ColumnSlot};
pub use cli::{Invocation, Opts};
