//! Episode termination and reward
//!
//! After termination the episode keeps stepping if the caller insists, but
//! every further step yields no reward and the first one is flagged.

/// Where an episode stands with respect to termination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Not terminated yet
    Active,
    /// Terminated on the most recent step
    JustTerminated,
    /// Stepped at least once after termination
    TerminatedContinuing,
}

/// Outcome of recording one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Reward for the step
    pub reward: f32,
    /// Whether this was the first step taken after termination
    pub misuse_warning: bool,
}

/// Tracks steps taken beyond termination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeLifecycle {
    steps_beyond_terminated: Option<u32>,
}

impl EpisodeLifecycle {
    /// Fresh lifecycle for a new episode
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until termination, then the number of steps taken after it
    pub fn steps_beyond_terminated(&self) -> Option<u32> {
        self.steps_beyond_terminated
    }

    /// Current phase
    pub fn phase(&self) -> EpisodePhase {
        match self.steps_beyond_terminated {
            None => EpisodePhase::Active,
            Some(0) => EpisodePhase::JustTerminated,
            Some(_) => EpisodePhase::TerminatedContinuing,
        }
    }

    /// Record a step whose resulting state is `terminated`
    pub fn record(&mut self, terminated: bool) -> StepOutcome {
        if !terminated {
            return StepOutcome { reward: 1.0, misuse_warning: false };
        }

        match self.steps_beyond_terminated {
            None => {
                // Pole just fell, the terminal step still counts
                self.steps_beyond_terminated = Some(0);
                StepOutcome { reward: 1.0, misuse_warning: false }
            }
            Some(steps) => {
                if steps == 0 {
                    tracing::warn!(
                        "step() called after the episode already returned terminated = true; \
                         call reset() once terminated is received, further steps are undefined"
                    );
                }
                self.steps_beyond_terminated = Some(steps.saturating_add(1));
                StepOutcome { reward: 0.0, misuse_warning: steps == 0 }
            }
        }
    }

    /// Forget the previous episode
    pub fn reset(&mut self) {
        self.steps_beyond_terminated = None;
    }
}
