//! Timed decision drills.
//!
//! A drill walks the user through a scenario of timed multiple-choice steps. Each step runs a
//! countdown; answering early earns up to three bonus points, letting the clock run out costs
//! three. The final score selects one of the scenario's outcome buckets.
//!
//! # Public API Overview
//! - [`Drill`] is the home/play/result state machine. Feed it [`DrillEvent`]s and give it a
//!   [`DrillHost`] for timers, renders and stop requests.
//! - [`Drill::snapshot`] returns an immutable [`DrillSnapshot`] for presentation.
//! - [`Terminal`] abstracts the line-oriented terminal; [`ProcessTerminal`] is the stdin/stdout
//!   implementation.
//! - [`config::EnvConfig`] and [`logging::init`] carry environment configuration and file
//!   logging.
//!
//! Scenario data comes from the `scenario_catalog` crate, re-exported as [`catalog`].

pub mod config;
pub mod logging;

pub mod core;
pub mod engine;
pub mod platform;

pub use scenario_catalog as catalog;

/// State machine, session and scoring types.
pub use crate::engine::{
    choice_delta, resolve_outcome, time_bonus, DecisionRecord, Drill, DrillError, DrillEvent,
    DrillHost, DrillSnapshot, DrillTiming, OptionView, OutcomeResolution, OutcomeView, PlayView,
    ResultView, ScenarioSummary, Screen, Session, StepPhase, StepTimer, StepToken, TickOutcome,
    TimerState, MAX_TIME_BONUS, SECONDS_PER_BONUS_POINT, TIMEOUT_PENALTY,
};

/// Terminal interfaces and process-backed implementation.
pub use crate::core::terminal::{Terminal, TerminalInput};
#[cfg(unix)]
pub use crate::platform::{install_signal_handlers, ProcessTerminal, SignalHookGuard};

/// Width-aware text helpers.
pub use crate::core::text::{visible_width, wrap_text};
