use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::CatalogError;
use crate::schema::{Scenario, Step};

/// Catalog shipped with the crate, used when no catalog path is configured.
pub const BUNDLED_CATALOG_JSON: &str = include_str!("../data/scenarios.json");

const BUNDLED_ORIGIN: &str = "<bundled>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCatalog {
    origin: String,
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Reads and validates the catalog at `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::io("reading scenario catalog", path, source))?;
        Self::from_json_str(path.display().to_string(), &raw)
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_ORIGIN, BUNDLED_CATALOG_JSON)
    }

    /// Parses a catalog document. `origin` names the source in error messages.
    pub fn from_json_str(origin: impl Into<String>, raw: &str) -> Result<Self, CatalogError> {
        let origin = origin.into();
        let scenarios = serde_json::from_str::<Vec<Scenario>>(raw)
            .map_err(|source| CatalogError::json(origin.clone(), source))?;
        Self::from_scenarios(origin, scenarios)
    }

    pub fn from_scenarios(
        origin: impl Into<String>,
        scenarios: Vec<Scenario>,
    ) -> Result<Self, CatalogError> {
        let origin = origin.into();
        validate_catalog(&origin, &scenarios)?;
        Ok(Self { origin, scenarios })
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn find(&self, scenario_id: &str) -> Option<&Scenario> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.id == scenario_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

pub(crate) fn validate_catalog(origin: &str, scenarios: &[Scenario]) -> Result<(), CatalogError> {
    if scenarios.is_empty() {
        return Err(CatalogError::Empty {
            origin: origin.to_string(),
        });
    }

    let mut seen_ids = HashSet::new();
    for scenario in scenarios {
        if !seen_ids.insert(scenario.id.as_str()) {
            return Err(CatalogError::DuplicateScenarioId {
                origin: origin.to_string(),
                scenario_id: scenario.id.clone(),
            });
        }

        validate_scenario(scenario)?;
    }

    Ok(())
}

pub(crate) fn validate_scenario(scenario: &Scenario) -> Result<(), CatalogError> {
    if scenario.steps.is_empty() {
        return Err(CatalogError::NoSteps {
            scenario_id: scenario.id.clone(),
        });
    }

    let mut step_ids = HashSet::new();
    for step in &scenario.steps {
        if !step_ids.insert(step.id.as_str()) {
            return Err(CatalogError::DuplicateStepId {
                scenario_id: scenario.id.clone(),
                step_id: step.id.clone(),
            });
        }

        validate_step(&scenario.id, step)?;
    }

    if scenario.outcomes.is_empty() {
        return Err(CatalogError::NoOutcomes {
            scenario_id: scenario.id.clone(),
        });
    }

    let mut thresholds = HashSet::new();
    for outcome in &scenario.outcomes {
        if !thresholds.insert(outcome.min) {
            return Err(CatalogError::DuplicateOutcomeThreshold {
                scenario_id: scenario.id.clone(),
                min: outcome.min,
            });
        }
    }

    Ok(())
}

pub(crate) fn validate_step(scenario_id: &str, step: &Step) -> Result<(), CatalogError> {
    if step.time == 0 {
        return Err(CatalogError::ZeroTimeBudget {
            scenario_id: scenario_id.to_string(),
            step_id: step.id.clone(),
        });
    }

    if step.options.is_empty() {
        return Err(CatalogError::NoOptions {
            scenario_id: scenario_id.to_string(),
            step_id: step.id.clone(),
        });
    }

    let mut option_ids = HashSet::new();
    for option in &step.options {
        if !option_ids.insert(option.id.as_str()) {
            return Err(CatalogError::DuplicateOptionId {
                scenario_id: scenario_id.to_string(),
                step_id: step.id.clone(),
                option_id: option.id.clone(),
            });
        }
    }

    Ok(())
}
