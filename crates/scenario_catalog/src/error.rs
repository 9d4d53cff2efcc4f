use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario catalog {origin}: {source}")]
    JsonParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("scenario catalog {origin} contains no scenarios")]
    Empty { origin: String },

    #[error("scenario catalog {origin} contains a duplicate scenario id '{scenario_id}'")]
    DuplicateScenarioId { origin: String, scenario_id: String },

    #[error("scenario '{scenario_id}' has no steps")]
    NoSteps { scenario_id: String },

    #[error("scenario '{scenario_id}' has a duplicate step id '{step_id}'")]
    DuplicateStepId {
        scenario_id: String,
        step_id: String,
    },

    #[error("step '{step_id}' in scenario '{scenario_id}' has no options")]
    NoOptions {
        scenario_id: String,
        step_id: String,
    },

    #[error("step '{step_id}' in scenario '{scenario_id}' has a zero time budget")]
    ZeroTimeBudget {
        scenario_id: String,
        step_id: String,
    },

    #[error("step '{step_id}' in scenario '{scenario_id}' has a duplicate option id '{option_id}'")]
    DuplicateOptionId {
        scenario_id: String,
        step_id: String,
        option_id: String,
    },

    #[error("scenario '{scenario_id}' has no outcomes")]
    NoOutcomes { scenario_id: String },

    #[error("scenario '{scenario_id}' has more than one outcome with min {min}")]
    DuplicateOutcomeThreshold { scenario_id: String, min: i32 },
}

impl CatalogError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            origin: origin.into(),
            source,
        }
    }
}
