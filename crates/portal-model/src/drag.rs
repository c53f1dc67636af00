#![forbid(unsafe_code)]

//! Drag session tracking.
//!
//! [`DragSession`] is a three-state machine: **Idle** → **Dragging** →
//! **Idle**. [`PressArm`] sits in front of it and decides when a mouse press
//! on a card has travelled far enough to count as a drag.
//!
//! # Invariants
//!
//! 1. At most one drag is active; starting another overwrites the first.
//! 2. `start` clears the remembered hover target.
//! 3. While dragging, the remembered target is the most recent non-null
//!    hover target; a null hover never erases it.
//! 4. `end` always returns to Idle, whatever the outcome.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Live target null at release | Remembered target used instead |
//! | No target ever observed | Release carries `target: None` |
//! | `over`/`end` while Idle | Ignored, `end` returns `None` |
//! | Escape / focus loss | `cancel` returns to Idle with no release |

use crate::character::EntityId;
use crate::dimension::DropTargetId;

/// Gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragConfig {
    /// Cells the pointer must travel from the press before a drag starts.
    pub threshold_cells: u16,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { threshold_cells: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging {
        active: EntityId,
        last_hover: Option<DropTargetId>,
        live_hover: Option<DropTargetId>,
    },
}

/// What a finished drag produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRelease {
    pub entity: EntityId,
    /// Live target at release, or the remembered one when that was null.
    pub target: Option<DropTargetId>,
    /// Whether `target` came from the remembered hover.
    pub used_fallback: bool,
}

/// Transient state of the current drag.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    phase: Phase,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging `entity`. Returns the entity of an overwritten session.
    pub fn start(&mut self, entity: EntityId) -> Option<EntityId> {
        let previous = self.active().cloned();
        self.phase = Phase::Dragging {
            active: entity,
            last_hover: None,
            live_hover: None,
        };
        previous
    }

    /// Record the target currently under the pointer.
    pub fn over(&mut self, target: Option<DropTargetId>) {
        if let Phase::Dragging {
            last_hover,
            live_hover,
            ..
        } = &mut self.phase
        {
            if target.is_some() {
                last_hover.clone_from(&target);
            }
            *live_hover = target;
        }
    }

    /// Finish the drag and return to Idle.
    pub fn end(&mut self, live_target: Option<DropTargetId>) -> Option<DropRelease> {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => None,
            Phase::Dragging {
                active, last_hover, ..
            } => {
                let used_fallback = live_target.is_none() && last_hover.is_some();
                Some(DropRelease {
                    entity: active,
                    target: live_target.or(last_hover),
                    used_fallback,
                })
            }
        }
    }

    /// Abandon the drag without a release.
    pub fn cancel(&mut self) -> Option<EntityId> {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => None,
            Phase::Dragging { active, .. } => Some(active),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn active(&self) -> Option<&EntityId> {
        match &self.phase {
            Phase::Dragging { active, .. } => Some(active),
            Phase::Idle => None,
        }
    }

    pub fn last_hover(&self) -> Option<&DropTargetId> {
        match &self.phase {
            Phase::Dragging { last_hover, .. } => last_hover.as_ref(),
            Phase::Idle => None,
        }
    }

    /// Target under the pointer right now (may be null mid-drag).
    pub fn live_hover(&self) -> Option<&DropTargetId> {
        match &self.phase {
            Phase::Dragging { live_hover, .. } => live_hover.as_ref(),
            Phase::Idle => None,
        }
    }
}

/// A mouse press on a draggable card that has not yet become a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressArm {
    entity: EntityId,
    origin: (u16, u16),
    threshold: u16,
}

impl PressArm {
    pub fn new(entity: EntityId, x: u16, y: u16, config: DragConfig) -> Self {
        Self {
            entity,
            origin: (x, y),
            threshold: config.threshold_cells,
        }
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn origin(&self) -> (u16, u16) {
        self.origin
    }

    /// Whether the pointer at `(x, y)` has left the dead zone around the press.
    ///
    /// Distance is Chebyshev (max of the axis deltas), matching cell grids.
    pub fn exceeded(&self, x: u16, y: u16) -> bool {
        let dx = x.abs_diff(self.origin.0);
        let dy = y.abs_diff(self.origin.1);
        dx.max(dy) >= self.threshold.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntityId {
        EntityId::new(s)
    }

    #[test]
    fn starts_idle() {
        let session = DragSession::new();
        assert!(!session.is_dragging());
        assert!(session.active().is_none());
    }

    #[test]
    fn start_clears_previous_hover() {
        let mut session = DragSession::new();
        session.start(id("rick"));
        session.over(Some(DropTargetId::container("C-131")));
        let overwritten = session.start(id("morty"));
        assert_eq!(overwritten, Some(id("rick")));
        assert!(session.last_hover().is_none());
        assert_eq!(session.active(), Some(&id("morty")));
    }

    #[test]
    fn null_hover_keeps_remembered_target() {
        let mut session = DragSession::new();
        session.start(id("rick"));
        session.over(Some(DropTargetId::container("C-131")));
        session.over(None);
        assert_eq!(session.live_hover(), None);
        assert_eq!(
            session.last_hover(),
            Some(&DropTargetId::container("C-131"))
        );
    }

    #[test]
    fn end_falls_back_to_remembered_target() {
        let mut session = DragSession::new();
        session.start(id("rick"));
        session.over(Some(DropTargetId::entity("morty")));
        session.over(None);
        let release = session.end(None).expect("release");
        assert_eq!(release.target, Some(DropTargetId::entity("morty")));
        assert!(release.used_fallback);
        assert!(!session.is_dragging());
    }

    #[test]
    fn live_target_wins_over_remembered() {
        let mut session = DragSession::new();
        session.start(id("rick"));
        session.over(Some(DropTargetId::container("C-131")));
        let release = session
            .end(Some(DropTargetId::container("C-137")))
            .expect("release");
        assert_eq!(release.target, Some(DropTargetId::container("C-137")));
        assert!(!release.used_fallback);
    }

    #[test]
    fn events_while_idle_are_ignored() {
        let mut session = DragSession::new();
        session.over(Some(DropTargetId::container("C-131")));
        assert!(session.end(None).is_none());
        assert!(session.cancel().is_none());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut session = DragSession::new();
        session.start(id("rick"));
        assert_eq!(session.cancel(), Some(id("rick")));
        assert!(!session.is_dragging());
        assert!(session.end(None).is_none());
    }

    #[test]
    fn press_arm_threshold() {
        let arm = PressArm::new(id("rick"), 10, 5, DragConfig::default());
        assert!(!arm.exceeded(11, 6));
        assert!(arm.exceeded(12, 5));
        assert!(arm.exceeded(10, 3));
        let eager = PressArm::new(id("rick"), 10, 5, DragConfig { threshold_cells: 0 });
        assert!(!eager.exceeded(10, 5));
        assert!(eager.exceeded(11, 5));
    }
}
