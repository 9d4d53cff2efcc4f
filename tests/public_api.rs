#![allow(unused_imports)]

use decision_drill::catalog::{
    CatalogError, DecisionOption, Outcome, Scenario, ScenarioCatalog, Step, BUNDLED_CATALOG_JSON,
    DEFAULT_KICKER,
};
use decision_drill::config::EnvConfig;
use decision_drill::logging::{self, LoggingError};
use decision_drill::{
    choice_delta, install_signal_handlers, resolve_outcome, time_bonus, visible_width, wrap_text,
    DecisionRecord, Drill, DrillError, DrillEvent, DrillHost, DrillSnapshot, DrillTiming,
    OptionView, OutcomeResolution, OutcomeView, PlayView, ProcessTerminal, ResultView,
    ScenarioSummary, Screen, Session, SignalHookGuard, StepPhase, StepTimer, StepToken, Terminal,
    TerminalInput, TickOutcome, TimerState, MAX_TIME_BONUS, SECONDS_PER_BONUS_POINT, TIMEOUT_PENALTY,
};

#[test]
fn public_api_exports_compile() {}

#[test]
fn bundled_catalog_drives_a_default_drill() {
    let catalog = ScenarioCatalog::bundled().expect("bundled catalog is valid");
    let drill = Drill::new(catalog, DrillTiming::default());

    let snapshot = drill.snapshot();
    assert_eq!(snapshot.screen, Screen::Home);
    assert_eq!(snapshot.scenarios.len(), drill.catalog().len());
    assert!(snapshot.play.is_none());
    assert!(snapshot.result.is_none());
    assert_eq!(drill.timing(), EnvConfig::default().timing());
}
