#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] without a terminal. Events are
//! injected, messages sent directly, and frames captured into plain
//! [`Buffer`]s for assertions.
//!
//! Tasks normally run synchronously at the point they are issued. With
//! [`TaskMode::Deferred`] they queue up instead and the test decides when,
//! and in which order, each one completes. That is how out-of-order
//! responses are reproduced.
//!
//! # Example
//!
//! ```ignore
//! use portal_runtime::simulator::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(Counter { value: 0 });
//! sim.init();
//! sim.send(Msg::Increment);
//! assert_eq!(sim.model().value, 1);
//!
//! let buf = sim.capture_frame(80, 24);
//! assert!(buf.row_text(0).contains("1"));
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use portal_core::buffer::Buffer;
use portal_core::event::Event;

use crate::program::{Cmd, Model, TaskSpec};

/// Record of a command executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    Msg,
    Batch(usize),
    Sequence(usize),
    Tick(Duration),
    Log(String),
    /// Task issued, with its name when it has one.
    Task(Option<String>),
    MouseCapture(bool),
}

/// When simulated tasks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskMode {
    /// Run each task as soon as it is issued.
    #[default]
    Immediate,
    /// Queue tasks until the test runs them.
    Deferred,
}

type PendingTask<Msg> = (TaskSpec, Box<dyn FnOnce() -> Msg + Send>);

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    model: M,
    frames: Vec<Buffer>,
    command_log: Vec<CmdRecord>,
    running: bool,
    tick_rate: Option<Duration>,
    logs: Vec<String>,
    task_mode: TaskMode,
    pending: VecDeque<PendingTask<M::Message>>,
}

impl<M: Model> ProgramSimulator<M> {
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            frames: Vec::new(),
            command_log: Vec::new(),
            running: true,
            tick_rate: None,
            logs: Vec::new(),
            task_mode: TaskMode::Immediate,
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_task_mode(mut self, mode: TaskMode) -> Self {
        self.task_mode = mode;
        self
    }

    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Convert each event to a message and dispatch it; stops after a quit.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            if !self.running {
                break;
            }
            let msg = M::Message::from(event.clone());
            let cmd = self.model.update(msg);
            self.execute_cmd(cmd);
        }
    }

    pub fn inject_event(&mut self, event: Event) {
        self.inject_events(&[event]);
    }

    /// Deliver one [`Event::Tick`], as the runtime would at the tick rate.
    pub fn tick(&mut self) {
        self.inject_event(Event::Tick);
    }

    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Render into a fresh `width`×`height` buffer and keep it.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Buffer {
        let mut buf = Buffer::new(width, height);
        self.model.view(&mut buf);
        self.frames.push(buf);
        &self.frames[self.frames.len() - 1]
    }

    pub fn frames(&self) -> &[Buffer] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Buffer> {
        self.frames.last()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// `false` once a [`Cmd::Quit`] has executed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_rate(&self) -> Option<Duration> {
        self.tick_rate
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    /// Names of tasks issued so far, in order.
    pub fn issued_tasks(&self) -> Vec<Option<String>> {
        self.command_log
            .iter()
            .filter_map(|r| match r {
                CmdRecord::Task(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    // ---- deferred tasks ----

    /// Names of queued tasks, oldest first.
    pub fn pending_tasks(&self) -> Vec<Option<String>> {
        self.pending.iter().map(|(spec, _)| spec.name.clone()).collect()
    }

    /// Complete the queued task at `index`. Returns `false` if there is none.
    pub fn run_task(&mut self, index: usize) -> bool {
        let Some((_, f)) = self.pending.remove(index) else {
            return false;
        };
        let msg = f();
        self.send(msg);
        true
    }

    /// Complete the oldest queued task.
    pub fn run_next_task(&mut self) -> bool {
        self.run_task(0)
    }

    /// Complete queued tasks, including ones they issue, until none remain.
    pub fn run_all_tasks(&mut self) -> usize {
        let mut ran = 0;
        while self.run_next_task() {
            ran += 1;
        }
        ran
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => self.command_log.push(CmdRecord::None),
            Cmd::Quit => {
                self.running = false;
                self.command_log.push(CmdRecord::Quit);
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                self.execute_all(cmds);
            }
            Cmd::Sequence(cmds) => {
                self.command_log.push(CmdRecord::Sequence(cmds.len()));
                self.execute_all(cmds);
            }
            Cmd::Tick(rate) => {
                self.tick_rate = Some(rate);
                self.command_log.push(CmdRecord::Tick(rate));
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
            Cmd::SetMouseCapture(enabled) => {
                self.command_log.push(CmdRecord::MouseCapture(enabled));
            }
            Cmd::Task(spec, f) => {
                self.command_log.push(CmdRecord::Task(spec.name.clone()));
                match self.task_mode {
                    TaskMode::Immediate => {
                        let msg = f();
                        let cmd = self.model.update(msg);
                        self.execute_cmd(cmd);
                    }
                    TaskMode::Deferred => self.pending.push_back((spec, f)),
                }
            }
        }
    }

    fn execute_all(&mut self, cmds: Vec<Cmd<M::Message>>) {
        for c in cmds {
            self.execute_cmd(c);
            if !self.running {
                break;
            }
        }
    }
}
