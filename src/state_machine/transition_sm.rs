//! Device-switch transition state machine.
//!
//! ```text
//! Active (superstate)
//!   ├── Settled
//!   ├── Shrinking { elapsed }  [Tick past shrink_secs: commit pending]
//!   └── Growing { elapsed }
//! ```
//!
//! The geometry is always computed from `committed`. A new selection is
//! only committed at the end of the shrink phase, so the frame never
//! jumps to new dimensions while it is still visible at full size.

use statig::prelude::*;
use tracing::{debug, info};

use crate::config::AnimationConfig;
use crate::preview::Selection;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum TransitionEvent {
    /// The user picked a new device, orientation or frame mode.
    Request(Selection),
    /// Frame clock advanced by this many seconds.
    Tick(f64),
    /// Timing changed after a config reload.
    Retime(AnimationConfig),
}

// ---------------------------------------------------------------------------
// Shared storage
// ---------------------------------------------------------------------------

pub struct TransitionMachine {
    pub committed: Selection,
    pub pending: Option<Selection>,
    pub timing: AnimationConfig,
}

impl TransitionMachine {
    pub fn new(committed: Selection, timing: AnimationConfig) -> Self {
        Self {
            committed,
            pending: None,
            timing,
        }
    }

    /// The selection the user is heading towards.
    pub fn target(&self) -> &Selection {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    fn commit_pending(&mut self) {
        if let Some(next) = self.pending.take() {
            info!(
                target: "transition",
                device = %next.device,
                orientation = ?next.orientation,
                mode = ?next.mode,
                "selection committed"
            );
            self.committed = next;
        }
    }

    /// Cosmetic scale multiplier for the current state, in `[shrink_factor, 1]`.
    pub fn presentation(state: &State, timing: &AnimationConfig) -> f64 {
        let low = timing.shrink_factor;
        match state {
            State::Settled {} => 1.0,
            State::Shrinking { elapsed } => {
                let t = progress(*elapsed, timing.shrink_secs);
                1.0 + (low - 1.0) * t
            }
            State::Growing { elapsed } => {
                let t = progress(*elapsed, timing.grow_secs);
                low + (1.0 - low) * t
            }
        }
    }
}

fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// State machine implementation
// ---------------------------------------------------------------------------

#[state_machine(
    initial = "State::settled()",
    state(derive(Debug, Clone, PartialEq))
)]
impl TransitionMachine {
    #[superstate]
    fn active(&mut self, event: &TransitionEvent) -> Outcome<State> {
        match event {
            TransitionEvent::Retime(timing) => {
                self.timing = timing.clone();
                Handled
            }
            _ => Handled,
        }
    }

    /// Nothing in flight; presentation factor is 1.
    #[state(superstate = "active")]
    fn settled(&mut self, event: &TransitionEvent) -> Outcome<State> {
        match event {
            TransitionEvent::Request(selection) if *selection != self.committed => {
                self.pending = Some(selection.clone());
                Transition(State::shrinking(0.0))
            }
            TransitionEvent::Request(_) => Handled,
            _ => Super,
        }
    }

    /// Scaling the old frame down. Later requests replace the pending one.
    #[state(superstate = "active")]
    fn shrinking(&mut self, event: &TransitionEvent, elapsed: &mut f64) -> Outcome<State> {
        match event {
            TransitionEvent::Request(selection) => {
                debug!(target: "transition", device = %selection.device, "pending selection replaced");
                self.pending = Some(selection.clone());
                Handled
            }
            TransitionEvent::Tick(dt) => {
                *elapsed += dt.max(0.0);
                if *elapsed >= self.timing.shrink_secs {
                    self.commit_pending();
                    Transition(State::growing(0.0))
                } else {
                    Handled
                }
            }
            _ => Super,
        }
    }

    /// Scaling the newly committed frame back up.
    #[state(superstate = "active")]
    fn growing(&mut self, event: &TransitionEvent, elapsed: &mut f64) -> Outcome<State> {
        match event {
            TransitionEvent::Request(selection) if *selection != self.committed => {
                self.pending = Some(selection.clone());
                Transition(State::shrinking(0.0))
            }
            TransitionEvent::Request(_) => Handled,
            TransitionEvent::Tick(dt) => {
                *elapsed += dt.max(0.0);
                if *elapsed >= self.timing.grow_secs {
                    Transition(State::settled())
                } else {
                    Handled
                }
            }
            _ => Super,
        }
    }
}
