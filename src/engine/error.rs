use thiserror::Error;

use crate::engine::drill::Screen;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillError {
    #[error("unknown scenario '{scenario_id}'")]
    UnknownScenario { scenario_id: String },

    #[error("step '{step_id}' has no option '{option_id}'")]
    UnknownOption { step_id: String, option_id: String },

    #[error("'{command}' is not available on the {screen} screen")]
    NotAvailable {
        command: &'static str,
        screen: Screen,
    },
}

impl DrillError {
    #[must_use]
    pub fn not_available(command: &'static str, screen: Screen) -> Self {
        Self::NotAvailable { command, screen }
    }
}
