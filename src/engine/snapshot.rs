//! Immutable views of the drill handed to the presentation layer.

use crate::engine::drill::Screen;
use crate::engine::session::DecisionRecord;
use crate::engine::timer::StepToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub intro: String,
    pub kicker: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub explain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayView {
    /// Token of the armed step. Selections made from this view carry it.
    pub token: StepToken,
    pub scenario_title: String,
    /// 1-based position of the current step.
    pub step_number: usize,
    pub step_count: usize,
    pub question: String,
    pub options: Vec<OptionView>,
    /// Set once the step is answered; the view reveals that option's explanation.
    pub answered_option: Option<String>,
    pub time_remaining: u32,
    pub time_budget: u32,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub scenario_id: String,
    pub scenario_title: String,
    pub score: i32,
    /// `None` only for a scenario without outcome buckets, which catalog validation rejects.
    pub outcome: Option<OutcomeView>,
    pub log: Vec<DecisionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeView {
    pub min: i32,
    pub title: String,
    pub message: String,
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillSnapshot {
    pub screen: Screen,
    pub scenarios: Vec<ScenarioSummary>,
    pub play: Option<PlayView>,
    pub result: Option<ResultView>,
}

impl DrillSnapshot {
    /// Option id for a 1-based number on the play screen.
    #[must_use]
    pub fn option_id_at(&self, number: usize) -> Option<&str> {
        let play = self.play.as_ref()?;
        let index = number.checked_sub(1)?;
        play.options.get(index).map(|option| option.id.as_str())
    }

    /// Scenario id for a 1-based number on the home screen.
    #[must_use]
    pub fn scenario_id_at(&self, number: usize) -> Option<&str> {
        let index = number.checked_sub(1)?;
        self.scenarios
            .get(index)
            .map(|scenario| scenario.id.as_str())
    }
}
