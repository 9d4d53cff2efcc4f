use serde::{Deserialize, Serialize};

/// Badge text shown for scenarios that do not carry a `kicker`.
pub const DEFAULT_KICKER: &str = "Scenario";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub intro: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kicker: Option<String>,
    pub steps: Vec<Step>,
    pub outcomes: Vec<Outcome>,
}

impl Scenario {
    #[must_use]
    pub fn kicker_or_default(&self) -> &str {
        self.kicker.as_deref().unwrap_or(DEFAULT_KICKER)
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    pub id: String,
    pub question: String,
    /// Whole seconds the user has to answer.
    pub time: u32,
    pub options: Vec<DecisionOption>,
}

impl Step {
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionOption {
    pub id: String,
    pub label: String,
    pub explain: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Outcome {
    pub min: i32,
    pub title: String,
    pub message: String,
}
