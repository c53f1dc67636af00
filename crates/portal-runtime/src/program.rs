#![forbid(unsafe_code)]

//! Elm-style runtime for terminal applications.
//!
//! A [`Model`] owns all state. Terminal events become messages, messages go
//! through [`Model::update`], and the returned [`Cmd`] describes side effects
//! for the runtime to perform. Blocking work (HTTP calls) runs as
//! [`Cmd::Task`] on a background thread; its return value comes back as a
//! message on the event loop, so `update` is the only place state changes.
//!
//! # Example
//!
//! ```ignore
//! use portal_runtime::program::{Cmd, Model};
//! use portal_core::{Buffer, Event};
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//!     Quit,
//!     Ignore,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Key(k) if k.is_char('q') => Msg::Quit,
//!             Event::Key(k) if k.is_char('+') => Msg::Increment,
//!             _ => Msg::Ignore,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!             Msg::Quit => Cmd::quit(),
//!             Msg::Ignore => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self, buf: &mut Buffer) {
//!         buf.set_string(0, 0, &self.count.to_string(), Default::default(), 10);
//!     }
//! }
//! ```
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Task thread cannot be spawned | Logged; the task's message never arrives |
//! | Task panics | Thread dies; its message never arrives |
//! | Terminal write fails | `run` returns the I/O error; the session guard restores the terminal |

use std::io::{self, Stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use portal_core::buffer::Buffer;
use portal_core::event::Event;
use portal_core::terminal_session::{SessionOptions, TerminalSession};
use tracing::{debug, info, warn};

use crate::presenter::Presenter;

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages drive every state change. Terminal events convert into them.
    type Message: From<Event> + Send + 'static;

    /// Startup commands, e.g. the initial data load.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Draw the current state. The buffer starts blank and covers the screen.
    fn view(&self, buf: &mut Buffer);
}

/// Scheduling metadata for background tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskSpec {
    /// Thread and log name.
    pub name: Option<String>,
}

impl TaskSpec {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Side effects returned from `init` and `update`.
#[derive(Default)]
pub enum Cmd<M> {
    #[default]
    None,
    Quit,
    /// Execute several commands. Order is not significant.
    Batch(Vec<Cmd<M>>),
    /// Execute commands in order.
    Sequence(Vec<Cmd<M>>),
    /// Feed a message straight back into `update`.
    Msg(M),
    /// Deliver [`Event::Tick`] at this interval from now on.
    Tick(Duration),
    /// Write a line to the application log.
    Log(String),
    /// Run a blocking closure off the event loop; its result is the next message.
    Task(TaskSpec, Box<dyn FnOnce() -> M + Send>),
    SetMouseCapture(bool),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Sequence(cmds) => f.debug_tuple("Sequence").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Tick(d) => f.debug_tuple("Tick").field(d).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Task(spec, _) => f.debug_struct("Task").field("spec", spec).finish(),
            Self::SetMouseCapture(b) => write!(f, "SetMouseCapture({b})"),
        }
    }
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Batch commands, dropping no-ops and unwrapping a single survivor.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Batch(cmds),
        }
    }

    /// Sequence commands, dropping no-ops and unwrapping a single survivor.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Sequence(cmds),
        }
    }

    /// Stable name for logs and assertions.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Sequence(_) => "Sequence",
            Self::Msg(_) => "Msg",
            Self::Tick(_) => "Tick",
            Self::Log(_) => "Log",
            Self::Task(..) => "Task",
            Self::SetMouseCapture(_) => "SetMouseCapture",
        }
    }

    #[inline]
    pub fn tick(interval: Duration) -> Self {
        Self::Tick(interval)
    }

    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::default(), Box::new(f))
    }

    pub fn task_named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::named(name), Box::new(f))
    }

    #[inline]
    pub fn set_mouse_capture(enabled: bool) -> Self {
        Self::SetMouseCapture(enabled)
    }

    /// Atomic commands contained in this one: 0 for `None`, recursive for groups.
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) | Self::Sequence(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }
}

/// Terminal and loop settings for [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub mouse: bool,
    pub alternate_screen: bool,
    /// Upper bound on how long the loop waits for input before checking
    /// task results and ticks.
    pub poll_interval: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            alternate_screen: true,
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// A model bound to a live terminal.
pub struct Program<M: Model> {
    model: M,
    session: TerminalSession,
    presenter: Presenter<Stdout>,
    previous: Option<Buffer>,
    tx: mpsc::Sender<M::Message>,
    rx: mpsc::Receiver<M::Message>,
    config: ProgramConfig,
    running: bool,
    dirty: bool,
    tick_rate: Option<Duration>,
    last_tick: Instant,
}

impl<M: Model> Program<M> {
    /// Take over the terminal. It is restored when the program is dropped.
    pub fn new(model: M, config: ProgramConfig) -> io::Result<Self> {
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: config.alternate_screen,
            mouse_capture: config.mouse,
            focus_events: false,
        })?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            model,
            session,
            presenter: Presenter::new(io::stdout()),
            previous: None,
            tx,
            rx,
            config,
            running: true,
            dirty: true,
            tick_rate: None,
            last_tick: Instant::now(),
        })
    }

    /// Run until the model returns [`Cmd::Quit`].
    pub fn run(mut self) -> io::Result<M> {
        info!("program starting");
        let cmd = self.model.init();
        self.execute_cmd(cmd)?;
        let (width, height) = self.session.size()?;
        self.handle(M::Message::from(Event::Resize { width, height }))?;

        while self.running {
            if self.dirty {
                self.render()?;
            }

            if self.session.poll_event(self.next_wait())?
                && let Some(event) = self.session.read_event()?
            {
                if matches!(event, Event::Resize { .. }) {
                    self.previous = None;
                }
                self.handle(M::Message::from(event))?;
            }

            while self.running
                && let Ok(msg) = self.rx.try_recv()
            {
                self.handle(msg)?;
            }

            if let Some(rate) = self.tick_rate
                && self.last_tick.elapsed() >= rate
            {
                self.last_tick = Instant::now();
                self.handle(M::Message::from(Event::Tick))?;
            }
        }
        info!("program stopped");
        Ok(self.model)
    }

    fn next_wait(&self) -> Duration {
        let until_tick = self
            .tick_rate
            .map(|rate| rate.saturating_sub(self.last_tick.elapsed()));
        match until_tick {
            Some(wait) => wait.min(self.config.poll_interval),
            None => self.config.poll_interval,
        }
    }

    fn handle(&mut self, msg: M::Message) -> io::Result<()> {
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute_cmd(cmd)
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = self.session.size()?;
        let mut frame = Buffer::new(width, height);
        self.model.view(&mut frame);
        self.presenter.present(self.previous.as_ref(), &frame)?;
        self.previous = Some(frame);
        self.dirty = false;
        Ok(())
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) -> io::Result<()> {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => self.handle(m)?,
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for c in cmds {
                    self.execute_cmd(c)?;
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Tick(rate) => {
                self.tick_rate = Some(rate);
                self.last_tick = Instant::now();
            }
            Cmd::Log(text) => info!(target: "portal_runtime::log", "{text}"),
            Cmd::SetMouseCapture(enabled) => self.session.set_mouse_capture(enabled)?,
            Cmd::Task(spec, f) => self.spawn_task(spec, f),
        }
        Ok(())
    }

    fn spawn_task(&self, spec: TaskSpec, f: Box<dyn FnOnce() -> M::Message + Send>) {
        let tx = self.tx.clone();
        let name = spec.name.unwrap_or_else(|| "task".to_string());
        debug!(task = %name, "spawning task");
        let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
            // The receiver is gone only after the loop exits.
            let _ = tx.send(f());
        });
        if let Err(err) = spawned {
            warn!(task = %name, error = %err, "failed to spawn task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_drops_noops_and_unwraps_single() {
        let cmd: Cmd<u8> = Cmd::batch(vec![Cmd::none(), Cmd::msg(1), Cmd::none()]);
        assert!(matches!(cmd, Cmd::Msg(1)));
        let empty: Cmd<u8> = Cmd::sequence(vec![Cmd::none()]);
        assert!(matches!(empty, Cmd::None));
    }

    #[test]
    fn count_recurses_into_groups() {
        let cmd: Cmd<u8> = Cmd::batch(vec![
            Cmd::msg(1),
            Cmd::sequence(vec![Cmd::tick(Duration::from_millis(10)), Cmd::log("x")]),
            Cmd::task(|| 2),
        ]);
        assert_eq!(cmd.count(), 4);
        assert_eq!(cmd.type_name(), "Batch");
    }

    #[test]
    fn debug_hides_task_closure() {
        let cmd: Cmd<u8> = Cmd::task_named("load", || 0);
        let text = format!("{cmd:?}");
        assert!(text.contains("load"));
        assert_eq!(cmd.type_name(), "Task");
    }

    #[test]
    fn default_config_captures_mouse() {
        let config = ProgramConfig::default();
        assert!(config.mouse);
        assert!(config.alternate_screen);
    }
}
