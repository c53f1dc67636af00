#![forbid(unsafe_code)]

//! Transient notifications.
//!
//! [`ToastQueue`] owns the toasts and their lifetimes; [`ToastStack`] draws
//! them stacked in the top-right corner. Time is always passed in, so
//! expiry is deterministic under test.
//!
//! # Example
//!
//! ```ignore
//! let mut toasts = ToastQueue::new();
//! toasts.push_at("Rick moved to C-131", Severity::Success, now);
//! toasts.prune_at(now + Duration::from_secs(6));
//! assert!(toasts.is_empty());
//! ```
//!
//! # Invariants
//!
//! - At most `max_visible` toasts are held; pushing beyond that evicts the
//!   oldest first.
//! - Ids are unique for the life of the queue.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use portal_core::buffer::Buffer;
use portal_core::geometry::Rect;
use portal_core::style::{Color, Style};
use portal_core::text::{display_width, truncate_with_ellipsis};

use crate::Widget;
use crate::block::Block;

/// Toasts shown at once.
pub const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Info,
    /// Soft guidance, e.g. a drop that changed nothing.
    Hint,
}

impl Severity {
    pub fn lifetime(self) -> Duration {
        match self {
            Self::Success | Self::Hint => Duration::from_secs(5),
            Self::Error | Self::Info => Duration::from_secs(6),
        }
    }

    pub fn icon(self) -> char {
        match self {
            Self::Success => '✓',
            Self::Error => '✗',
            Self::Info => 'i',
            Self::Hint => '·',
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Success => Color::Green,
            Self::Error => Color::Red,
            Self::Info => Color::Cyan,
            Self::Hint => Color::Grey,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    next_id: u64,
    max_visible: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::with_max_visible(MAX_VISIBLE)
    }

    pub fn with_max_visible(max_visible: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 1,
            max_visible: max_visible.max(1),
        }
    }

    /// Show `message` from `now` for the severity's lifetime.
    pub fn push_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id,
            message: message.into(),
            severity,
            expires_at: now + severity.lifetime(),
        });
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
        id
    }

    /// Drop expired toasts. Returns how many were removed.
    pub fn prune_at(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired(now));
        before - self.toasts.len()
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        before != self.toasts.len()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Messages of the held toasts with the given severity, oldest first.
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.toasts
            .iter()
            .filter(|t| t.severity == severity)
            .map(|t| t.message.as_str())
            .collect()
    }
}

/// Renders a [`ToastQueue`] in the top-right corner of its area.
pub struct ToastStack<'a> {
    queue: &'a ToastQueue,
    max_width: u16,
    margin: u16,
}

impl<'a> ToastStack<'a> {
    pub fn new(queue: &'a ToastQueue) -> Self {
        Self {
            queue,
            max_width: 48,
            margin: 1,
        }
    }

    #[must_use]
    pub fn max_width(mut self, width: u16) -> Self {
        self.max_width = width;
        self
    }
}

impl Widget for ToastStack<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        const TOAST_HEIGHT: u16 = 3;
        let mut y = area.y + self.margin;
        for toast in self.queue.iter() {
            if y + TOAST_HEIGHT > area.bottom() {
                break;
            }
            // Border, space, icon, space, text, space, border.
            let chrome = 6;
            let limit = self
                .max_width
                .min(area.width.saturating_sub(self.margin * 2))
                .saturating_sub(chrome);
            if limit == 0 {
                return;
            }
            let text = truncate_with_ellipsis(&toast.message, limit as usize);
            let width = display_width(&text) as u16 + chrome;
            let x = area.right().saturating_sub(width + self.margin);
            let rect = Rect::new(x, y, width, TOAST_HEIGHT);

            let color = toast.severity.color();
            let block = Block::new().border_style(Style::new().fg(color));
            block.render(rect, buf);
            let inner = block.inner(rect);
            let line = format!(" {} {text}", toast.severity.icon());
            buf.set_string(inner.x, inner.y, &line, Style::new().fg(color), inner.width);

            y += TOAST_HEIGHT;
        }
    }
}
