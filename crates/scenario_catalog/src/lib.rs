//! Scenario catalog: the read-only set of timed decision scenarios.
//!
//! A catalog is a JSON array of scenarios. It is loaded once, validated as a whole, and never
//! written back. Every structural problem (empty step list, step without options, duplicate
//! outcome thresholds, ...) is reported as a [`CatalogError`] at load time so nothing downstream
//! has to re-check it during play.

mod catalog;
mod error;
mod schema;

pub use catalog::{ScenarioCatalog, BUNDLED_CATALOG_JSON};
pub use error::CatalogError;
pub use schema::{DecisionOption, Outcome, Scenario, Step, DEFAULT_KICKER};
