use bevy::prelude::*;

use crate::constants::ACTIVATION_HOLD_MS;

/// Phases of the one-shot garment selection flow.
///
/// ```text
/// Idle ⇄ Hovered → Armed → Committed → Replacing → Done
///                    └──(early release)──► Idle/Hovered
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Hovered,
    Armed,
    Committed,
    Replacing,
    Done,
}

/// Outcome of a pointer release while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Held at least the activation threshold; the caller must still validate
    /// the candidate (name resolution + catalog lookup) before confirming.
    HeldPastThreshold { candidate: Entity },
    /// Released early or without a candidate; glow fades, nothing commits.
    Abandoned,
}

/// Transient state of the user's current selection attempt.
///
/// `committed` is monotonic: once a garment commits, the session never
/// accepts another press for the lifetime of the page.
#[derive(Resource, Debug)]
pub struct SelectionSession {
    phase: SelectionPhase,
    candidate: Option<Entity>,
    pressed_at_ms: Option<f64>,
    committed: bool,
}

impl Default for SelectionSession {
    fn default() -> Self {
        Self {
            phase: SelectionPhase::Idle,
            candidate: None,
            pressed_at_ms: None,
            committed: false,
        }
    }
}

impl SelectionSession {
    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn candidate(&self) -> Option<Entity> {
        self.candidate
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Hover updates only apply while no press is in flight.
    pub fn set_hovered(&mut self, entity: Option<Entity>) {
        if !matches!(self.phase, SelectionPhase::Idle | SelectionPhase::Hovered) {
            return;
        }
        self.candidate = entity;
        self.phase = if entity.is_some() {
            SelectionPhase::Hovered
        } else {
            SelectionPhase::Idle
        };
    }

    /// Arm a candidate on pointer-down. Returns false once committed or when
    /// no selection is possible in the current phase.
    pub fn press(&mut self, entity: Entity, now_ms: f64) -> bool {
        if self.committed
            || !matches!(self.phase, SelectionPhase::Idle | SelectionPhase::Hovered)
        {
            return false;
        }
        self.phase = SelectionPhase::Armed;
        self.candidate = Some(entity);
        self.pressed_at_ms = Some(now_ms);
        true
    }

    /// Milliseconds the current press has been held, if any.
    pub fn hold_elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        self.pressed_at_ms.map(|t| now_ms - t)
    }

    /// Pointer-up. Past the activation threshold the session stays armed so
    /// the caller can validate and then `confirm_commit` or `abort_commit`.
    pub fn release(&mut self, now_ms: f64) -> ReleaseOutcome {
        if self.phase != SelectionPhase::Armed {
            return ReleaseOutcome::Abandoned;
        }
        let held = self.hold_elapsed_ms(now_ms).unwrap_or(0.0);
        self.pressed_at_ms = None;

        match self.candidate {
            Some(candidate) if held >= ACTIVATION_HOLD_MS => {
                ReleaseOutcome::HeldPastThreshold { candidate }
            }
            Some(_) => {
                self.phase = SelectionPhase::Hovered;
                ReleaseOutcome::Abandoned
            }
            None => {
                self.phase = SelectionPhase::Idle;
                ReleaseOutcome::Abandoned
            }
        }
    }

    pub fn confirm_commit(&mut self) {
        self.phase = SelectionPhase::Committed;
        self.committed = true;
    }

    /// Validation failed (unresolvable name or no catalog entry); fall back
    /// to hovering so another garment can be tried.
    pub fn abort_commit(&mut self) {
        if self.phase == SelectionPhase::Armed {
            self.phase = if self.candidate.is_some() {
                SelectionPhase::Hovered
            } else {
                SelectionPhase::Idle
            };
        }
    }

    /// Dissolve and avatar swap are now in flight.
    pub fn begin_replacing(&mut self) {
        if self.phase == SelectionPhase::Committed {
            self.phase = SelectionPhase::Replacing;
        }
    }

    /// Terminal: presentation pose reached, no further selection.
    pub fn finish(&mut self) {
        self.phase = SelectionPhase::Done;
    }
}

/// Fired when a garment passes validation and the replacement begins.
#[derive(Event, Debug, Clone)]
pub struct GarmentCommitted {
    pub entity: Entity,
    /// Resolved (trimmed, case-folded) garment name.
    pub key: String,
    pub posed_avatar: String,
    pub colour: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Entity {
        Entity::from_raw(7)
    }

    #[test]
    fn starts_idle_and_uncommitted() {
        let s = SelectionSession::default();
        assert_eq!(s.phase(), SelectionPhase::Idle);
        assert!(!s.is_committed());
        assert!(s.candidate().is_none());
    }

    #[test]
    fn short_hold_does_not_commit() {
        let mut s = SelectionSession::default();
        s.set_hovered(Some(entity()));
        assert!(s.press(entity(), 1000.0));
        // 400ms is under the 500ms activation hold.
        assert_eq!(s.release(1400.0), ReleaseOutcome::Abandoned);
        assert_eq!(s.phase(), SelectionPhase::Hovered);
        assert!(!s.is_committed());
    }

    #[test]
    fn long_hold_passes_threshold_and_commits_after_validation() {
        let mut s = SelectionSession::default();
        s.set_hovered(Some(entity()));
        assert!(s.press(entity(), 1000.0));
        match s.release(1600.0) {
            ReleaseOutcome::HeldPastThreshold { candidate } => assert_eq!(candidate, entity()),
            other => panic!("expected threshold pass, got {other:?}"),
        }
        s.confirm_commit();
        assert_eq!(s.phase(), SelectionPhase::Committed);
        assert!(s.is_committed());
    }

    #[test]
    fn committed_flag_is_monotonic_and_blocks_new_presses() {
        let mut s = SelectionSession::default();
        s.set_hovered(Some(entity()));
        s.press(entity(), 0.0);
        s.release(700.0);
        s.confirm_commit();
        s.begin_replacing();
        s.finish();
        assert_eq!(s.phase(), SelectionPhase::Done);
        assert!(!s.press(entity(), 5000.0));
        assert!(s.is_committed());
    }

    #[test]
    fn failed_validation_falls_back_to_hovered() {
        let mut s = SelectionSession::default();
        s.set_hovered(Some(entity()));
        s.press(entity(), 0.0);
        assert!(matches!(
            s.release(900.0),
            ReleaseOutcome::HeldPastThreshold { .. }
        ));
        s.abort_commit();
        assert_eq!(s.phase(), SelectionPhase::Hovered);
        assert!(!s.is_committed());
        // The user may immediately try another garment.
        assert!(s.press(entity(), 2000.0));
    }

    #[test]
    fn hover_is_ignored_while_armed() {
        let mut s = SelectionSession::default();
        s.set_hovered(Some(entity()));
        s.press(entity(), 0.0);
        s.set_hovered(None);
        assert_eq!(s.phase(), SelectionPhase::Armed);
        assert_eq!(s.candidate(), Some(entity()));
    }
}
