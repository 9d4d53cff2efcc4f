//! Terminal front end for decision drills.
//!
//! ## Configuration
//!
//! All settings come from the environment (see `decision_drill::config`):
//!
//! - `DRILL_SCENARIOS_PATH`: scenario catalog JSON; the bundled catalog is used when unset
//! - `DRILL_TICK_MS` / `DRILL_FEEDBACK_DELAY_MS`: countdown tick and post-answer delay
//! - `DRILL_LOG_FILE` / `DRILL_LOG`: log file and `tracing` filter directive
//! - `DRILL_NO_COLOR=1`: plain output without ANSI styling
//!
//! A catalog that fails to load or validate stops startup with an error; nothing is played from
//! a partially valid catalog.
//!
//! ## Event flow
//!
//! Stdin lines, countdown ticks and delayed advances all land in one FIFO queue owned by
//! [`runtime::DrillRuntime`]. The runtime thread drains it and is the only code that touches the
//! drill.

pub mod commands;
pub mod runtime;
pub mod view;

use decision_drill::config::EnvConfig;
use scenario_catalog::{CatalogError, ScenarioCatalog};

/// Loads the configured catalog, or the bundled one when no path is set.
pub fn load_catalog(config: &EnvConfig) -> Result<ScenarioCatalog, CatalogError> {
    match config.scenarios_path.as_deref() {
        Some(path) => ScenarioCatalog::load(path),
        None => ScenarioCatalog::bundled(),
    }
}
