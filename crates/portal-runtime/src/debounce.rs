#![forbid(unsafe_code)]

//! Trailing-edge debouncer.
//!
//! Holds at most one pending payload. Every [`call_at`](Debouncer::call_at)
//! replaces the payload and restarts the quiet period; the payload fires
//! once no call has arrived for the configured delay.
//!
//! All methods take an explicit `now`, so behavior is a pure function of the
//! call sequence and its timestamps.
//!
//! # Invariants
//!
//! - **Latest-wins**: only the most recent payload of a burst ever fires.
//! - **At most once**: a payload fires exactly once, then the slot is empty.
//! - **Quiet period**: a payload never fires before `delay` has elapsed since
//!   the last call.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `delay = 0` | Fires on the first poll at or after the call |
//! | Poll with `now` before the last call | Treated as not yet due |
//! | `cancel` with nothing pending | Returns `None` |

use std::time::{Duration, Instant};

/// Quiet period used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Pending<T> {
    payload: T,
    last_call: Instant,
}

/// Single-slot trailing-edge debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    superseded: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            superseded: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `payload`, replacing anything still waiting.
    ///
    /// Returns the payload that was displaced, if any.
    pub fn call_at(&mut self, payload: T, now: Instant) -> Option<T> {
        let displaced = self
            .pending
            .replace(Pending {
                payload,
                last_call: now,
            })
            .map(|p| p.payload);
        if displaced.is_some() {
            self.superseded += 1;
        }
        displaced
    }

    /// Take the payload if its quiet period has elapsed.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.last_call) >= self.delay);
        if due {
            self.pending.take().map(|p| p.payload)
        } else {
            None
        }
    }

    /// Time left before the pending payload is due; `None` when idle.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref().map(|p| {
            let elapsed = now.saturating_duration_since(p.last_call);
            self.delay.saturating_sub(elapsed)
        })
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.payload)
    }

    /// Drop the pending payload without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    /// Payloads replaced before they could fire, over the debouncer's life.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        assert!(d.call_at("a", t0).is_none());
        assert_eq!(d.poll_at(t0 + ms(299)), None);
        assert_eq!(d.time_until_fire(t0 + ms(100)), Some(ms(200)));
        assert_eq!(d.poll_at(t0 + ms(300)), Some("a"));
        assert!(!d.has_pending());
        assert_eq!(d.poll_at(t0 + ms(900)), None);
    }

    #[test]
    fn burst_keeps_only_latest() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        d.call_at(1, t0);
        assert_eq!(d.call_at(2, t0 + ms(100)), Some(1));
        assert_eq!(d.call_at(3, t0 + ms(200)), Some(2));
        // Quiet period restarts from the last call.
        assert_eq!(d.poll_at(t0 + ms(400)), None);
        assert_eq!(d.poll_at(t0 + ms(500)), Some(3));
        assert_eq!(d.superseded(), 2);
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.call_at('x', t0);
        assert_eq!(d.time_until_fire(t0), Some(Duration::ZERO));
        assert_eq!(d.poll_at(t0), Some('x'));
    }

    #[test]
    fn cancel_discards_payload() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        assert_eq!(d.delay(), DEFAULT_DEBOUNCE);
        assert_eq!(d.cancel(), None::<u8>);
        d.call_at(7u8, t0);
        assert_eq!(d.peek(), Some(&7));
        assert_eq!(d.cancel(), Some(7));
        assert_eq!(d.poll_at(t0 + ms(1000)), None);
        assert_eq!(d.time_until_fire(t0), None);
    }

    proptest! {
        #[test]
        fn burst_fires_exactly_once_with_last_payload(
            gaps in proptest::collection::vec(0u64..299, 1..20)
        ) {
            let t0 = Instant::now();
            let mut d = Debouncer::new(ms(300));
            let mut now = t0;
            let mut fired = Vec::new();
            for (i, gap) in gaps.iter().enumerate() {
                now += ms(*gap);
                if let Some(p) = d.poll_at(now) {
                    fired.push(p);
                }
                d.call_at(i, now);
            }
            if let Some(p) = d.poll_at(now + ms(300)) {
                fired.push(p);
            }
            prop_assert_eq!(fired, vec![gaps.len() - 1]);
        }
    }
}
