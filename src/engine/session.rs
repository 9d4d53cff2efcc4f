use crate::engine::scoring::TIMEOUT_PENALTY;
use crate::engine::timer::{StepTimer, StepToken};

/// One completed step. Appended once per step, in step order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRecord {
    pub step_id: String,
    /// `None` when the step timed out.
    pub option_id: Option<String>,
    pub delta: i32,
    pub time_remaining: u32,
}

impl DecisionRecord {
    #[must_use]
    pub fn chosen(
        step_id: impl Into<String>,
        option_id: impl Into<String>,
        delta: i32,
        time_remaining: u32,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            option_id: Some(option_id.into()),
            delta,
            time_remaining,
        }
    }

    #[must_use]
    pub fn timed_out(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            option_id: None,
            delta: TIMEOUT_PENALTY,
            time_remaining: 0,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.option_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPhase {
    /// Countdown running, selections accepted.
    Open,
    /// A selection was recorded; waiting for the delayed advance.
    Answered { option_id: String },
}

/// Run-time state of one scenario attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    scenario_id: String,
    step_index: usize,
    score: i32,
    timer: Option<StepTimer>,
    phase: StepPhase,
    log: Vec<DecisionRecord>,
}

impl Session {
    #[must_use]
    pub fn new(scenario_id: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            step_index: 0,
            score: 0,
            timer: None,
            phase: StepPhase::Open,
            log: Vec::new(),
        }
    }

    #[must_use]
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn log(&self) -> &[DecisionRecord] {
        &self.log
    }

    #[must_use]
    pub fn phase(&self) -> &StepPhase {
        &self.phase
    }

    #[must_use]
    pub fn timer(&self) -> Option<&StepTimer> {
        self.timer.as_ref()
    }

    /// Seconds left on the current step; zero when no step is armed.
    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.timer.as_ref().map_or(0, StepTimer::remaining)
    }

    #[must_use]
    pub fn is_complete(&self, step_count: usize) -> bool {
        self.step_index >= step_count
    }

    pub(crate) fn timer_mut(&mut self) -> Option<&mut StepTimer> {
        self.timer.as_mut()
    }

    pub(crate) fn arm_step(&mut self, token: StepToken, budget: u32) {
        self.timer = Some(StepTimer::arm(token, budget));
        self.phase = StepPhase::Open;
    }

    /// Cancels the running timer, returning its token when one was running.
    pub(crate) fn cancel_timer(&mut self) -> Option<StepToken> {
        let timer = self.timer.as_mut()?;
        timer.cancel().then(|| timer.token())
    }

    pub(crate) fn mark_answered(&mut self, option_id: impl Into<String>) {
        self.phase = StepPhase::Answered {
            option_id: option_id.into(),
        };
    }

    pub(crate) fn record(&mut self, record: DecisionRecord) {
        self.score = self.score.saturating_add(record.delta);
        self.log.push(record);
    }

    pub(crate) fn advance(&mut self) {
        self.step_index += 1;
        self.timer = None;
        self.phase = StepPhase::Open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_empty() {
        let session = Session::new("flood");

        assert_eq!(session.scenario_id(), "flood");
        assert_eq!(session.step_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.log().is_empty());
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.phase(), &StepPhase::Open);
    }

    #[test]
    fn record_applies_delta_and_appends() {
        let mut session = Session::new("flood");

        session.record(DecisionRecord::chosen("s1", "a", 12, 16));
        session.record(DecisionRecord::timed_out("s2"));

        assert_eq!(session.score(), 9);
        assert_eq!(session.log().len(), 2);
        assert!(session.log()[1].is_timeout());
        assert_eq!(session.log()[1].delta, TIMEOUT_PENALTY);
        assert_eq!(session.log()[1].time_remaining, 0);
    }

    #[test]
    fn cancel_timer_reports_token_only_once() {
        let mut session = Session::new("flood");
        assert_eq!(session.cancel_timer(), None);

        session.arm_step(4, 10);
        assert_eq!(session.time_remaining(), 10);
        assert_eq!(session.cancel_timer(), Some(4));
        assert_eq!(session.cancel_timer(), None);
    }

    #[test]
    fn advance_moves_one_step_and_clears_timer() {
        let mut session = Session::new("flood");
        session.arm_step(1, 10);
        session.mark_answered("a");

        session.advance();

        assert_eq!(session.step_index(), 1);
        assert!(session.timer().is_none());
        assert_eq!(session.phase(), &StepPhase::Open);
        assert!(session.is_complete(1));
        assert!(!session.is_complete(2));
    }
}
