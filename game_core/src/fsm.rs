//! Run State Machine
//!
//! Start -> Playing -> Ending -> End, with End (or any phase, on a host
//! re-init) going back to Start.

use serde::{Deserialize, Serialize};

/// Run phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    /// Waiting for the first input, player hovering
    Start,
    /// Simulation and timers running
    Playing,
    /// Player hit an obstacle; world frozen while the player falls
    Ending,
    /// Results reported, everything torn down
    End,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Start => "start",
            RunPhase::Playing => "playing",
            RunPhase::Ending => "ending",
            RunPhase::End => "end",
        }
    }
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    FirstInput,
    FatalHit,
    FellOut,
    Restart,
}

/// Result of a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub success: bool,
    pub from: RunPhase,
    pub to: RunPhase,
    pub action: RunAction,
}

/// Run Finite State Machine
#[derive(Debug, Clone)]
pub struct RunFsm {
    phase: RunPhase,
}

impl RunFsm {
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Start,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn can_transition(&self, action: RunAction) -> bool {
        self.next_phase(action).is_some()
    }

    /// Attempt a transition; the phase is unchanged on failure
    pub fn transition(&mut self, action: RunAction) -> TransitionResult {
        let from = self.phase;

        match self.next_phase(action) {
            Some(to) => {
                self.phase = to;
                log::info!("Run {} -> {} ({:?})", from.as_str(), to.as_str(), action);
                TransitionResult {
                    success: true,
                    from,
                    to,
                    action,
                }
            }
            None => TransitionResult {
                success: false,
                from,
                to: from,
                action,
            },
        }
    }

    fn next_phase(&self, action: RunAction) -> Option<RunPhase> {
        match (self.phase, action) {
            (RunPhase::Start, RunAction::FirstInput) => Some(RunPhase::Playing),

            (RunPhase::Playing, RunAction::FatalHit) => Some(RunPhase::Ending),

            // Falling out of view ends the run from anywhere but End
            (RunPhase::Start | RunPhase::Playing | RunPhase::Ending, RunAction::FellOut) => {
                Some(RunPhase::End)
            }

            (_, RunAction::Restart) => Some(RunPhase::Start),

            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::End
    }
}

impl Default for RunFsm {
    fn default() -> Self {
        Self::new()
    }
}
