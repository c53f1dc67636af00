#![forbid(unsafe_code)]

//! Runtime: the update/view loop and the pieces it is built from.
//!
//! - [`program`]: [`Model`], [`Cmd`], and the terminal-backed [`Program`]
//! - [`simulator`]: a terminal-free [`ProgramSimulator`] for tests
//! - [`presenter`]: diffing buffers into terminal output
//! - [`debounce`]: trailing-edge [`Debouncer`] driven by explicit timestamps
//! - [`clock`]: injectable time source so debounced models stay testable

pub mod clock;
pub mod debounce;
pub mod presenter;
pub mod program;
pub mod simulator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use presenter::Presenter;
pub use program::{Cmd, Model, Program, ProgramConfig, TaskSpec};
pub use simulator::{CmdRecord, ProgramSimulator, TaskMode};
