//! Per-step countdown.
//!
//! The timer does not own a clock. The host delivers ticks tagged with the [`StepToken`] the
//! timer was armed with; ticks for any other token, or for a timer that already stopped, are
//! reported as [`TickOutcome::Ignored`]. Expiry is reported exactly once.

/// Identifies one armed step. Tokens are never reused within a drill.
pub type StepToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting { remaining: u32 },
    Expired,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTimer {
    token: StepToken,
    budget: u32,
    remaining: u32,
    state: TimerState,
}

impl StepTimer {
    #[must_use]
    pub fn arm(token: StepToken, budget: u32) -> Self {
        Self {
            token,
            budget,
            remaining: budget,
            state: TimerState::Running,
        }
    }

    pub fn tick(&mut self, token: StepToken) -> TickOutcome {
        if token != self.token || self.state != TimerState::Running {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting {
                remaining: self.remaining,
            }
        }
    }

    /// Stops a running timer. Returns `false` if it had already stopped.
    pub fn cancel(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }

        self.state = TimerState::Cancelled;
        true
    }

    #[must_use]
    pub fn token(&self) -> StepToken {
        self.token
    }

    #[must_use]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }
}
