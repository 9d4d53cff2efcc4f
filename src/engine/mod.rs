//! Timed decision state machine.
//!
//! [`Drill`] owns the catalog and the single [`Session`]. It is driven by [`DrillEvent`]s and
//! reaches its environment only through [`DrillHost`]: start/cancel a step's tick stream,
//! schedule the post-answer advance, request renders, request stop. Every armed step gets a fresh
//! [`StepToken`]; ticks and advances carrying an older token are dropped, so a late tick can
//! never penalise or advance a step twice.

pub mod drill;
pub mod error;
pub mod outcome;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use drill::{Drill, DrillEvent, DrillHost, DrillTiming, Screen};
pub use error::DrillError;
pub use outcome::{resolve_outcome, OutcomeResolution};
pub use scoring::{
    choice_delta, time_bonus, MAX_TIME_BONUS, SECONDS_PER_BONUS_POINT, TIMEOUT_PENALTY,
};
pub use session::{DecisionRecord, Session, StepPhase};
pub use snapshot::{DrillSnapshot, OptionView, OutcomeView, PlayView, ResultView, ScenarioSummary};
pub use timer::{StepTimer, StepToken, TickOutcome, TimerState};
