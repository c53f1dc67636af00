#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII ownership of raw mode, the alternate screen, and mouse capture.
//! Dropping the [`TerminalSession`] restores the terminal, including during
//! panic unwinding.
//!
//! # Cleanup Order
//!
//! On drop, cleanup happens in reverse order of enabling:
//! 1. Disable focus events (if enabled)
//! 2. Disable mouse capture (if enabled)
//! 3. Show cursor (always)
//! 4. Leave alternate screen (if enabled)
//! 5. Exit raw mode (always)
//! 6. Flush stdout
//!
//! # Usage
//!
//! ```no_run
//! use portal_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     mouse_capture: true,
//!     ..Default::default()
//! })?;
//! // ... draw and read events ...
//! drop(session);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{cursor, event as cte, execute, terminal};

use crate::event::Event;

/// Which terminal modes a session enables.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub alternate_screen: bool,
    pub mouse_capture: bool,
    pub focus_events: bool,
}

/// An owned terminal in raw mode.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
    focus_enabled: bool,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested modes.
    ///
    /// On partial failure the modes already enabled are rolled back by `Drop`.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            options: options.clone(),
            alternate_screen_enabled: false,
            mouse_enabled: false,
            focus_enabled: false,
        };

        let mut stdout = io::stdout();
        if options.alternate_screen {
            execute!(stdout, terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
        }
        execute!(stdout, cursor::Hide)?;
        if options.mouse_capture {
            execute!(stdout, cte::EnableMouseCapture)?;
            session.mouse_enabled = true;
        }
        if options.focus_events {
            execute!(stdout, cte::EnableFocusChange)?;
            session.focus_enabled = true;
        }
        Ok(session)
    }

    /// Current terminal size as `(columns, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for an input event to become available.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        cte::poll(timeout)
    }

    /// Read the next event; `Ok(None)` for events the board ignores.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        Ok(Event::from_crossterm(cte::read()?))
    }

    /// Toggle mouse capture at runtime.
    pub fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled == self.mouse_enabled {
            return Ok(());
        }
        let mut stdout = io::stdout();
        if enabled {
            execute!(stdout, cte::EnableMouseCapture)?;
        } else {
            execute!(stdout, cte::DisableMouseCapture)?;
        }
        self.mouse_enabled = enabled;
        Ok(())
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();
        if self.focus_enabled {
            let _ = execute!(stdout, cte::DisableFocusChange);
            self.focus_enabled = false;
        }
        if self.mouse_enabled {
            let _ = execute!(stdout, cte::DisableMouseCapture);
            self.mouse_enabled = false;
        }
        let _ = execute!(stdout, cursor::Show);
        if self.alternate_screen_enabled {
            let _ = execute!(stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        #[cfg(feature = "tracing")]
        tracing::info!("terminal restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}
