use std::fmt;
use std::time::Duration;

use scenario_catalog::{Scenario, ScenarioCatalog, Step};
use tracing::{debug, info, trace};

use crate::config::{DEFAULT_FEEDBACK_DELAY_MS, DEFAULT_TICK_MS};
use crate::engine::error::DrillError;
use crate::engine::outcome::resolve_outcome;
use crate::engine::scoring::choice_delta;
use crate::engine::session::{DecisionRecord, Session, StepPhase};
use crate::engine::snapshot::{
    DrillSnapshot, OptionView, OutcomeView, PlayView, ResultView, ScenarioSummary,
};
use crate::engine::timer::{StepTimer, StepToken, TickOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Play,
    Result,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Home => "home",
            Self::Play => "play",
            Self::Result => "result",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillTiming {
    pub tick_interval: Duration,
    pub feedback_delay: Duration,
}

impl Default for DrillTiming {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            feedback_delay: Duration::from_millis(DEFAULT_FEEDBACK_DELAY_MS),
        }
    }
}

/// Everything that can happen to a drill. Hosts queue these and apply them one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEvent {
    Start { scenario_id: String },
    /// `token` names the step whose options the user was shown.
    Select { token: StepToken, option_id: String },
    Tick { token: StepToken },
    Advance { token: StepToken },
    Replay,
    Home,
    Quit,
}

/// Side effects the drill asks of its environment.
pub trait DrillHost {
    /// Deliver `DrillEvent::Tick { token }` every `interval` until cancelled.
    fn start_timer(&mut self, token: StepToken, interval: Duration);
    fn cancel_timer(&mut self, token: StepToken);
    /// Deliver `DrillEvent::Advance { token }` once, after `delay`.
    fn schedule_advance(&mut self, token: StepToken, delay: Duration);
    fn request_render(&mut self);
    fn request_stop(&mut self);
}

/// The home → play → result state machine. Owns the catalog and the only session.
#[derive(Debug, Clone)]
pub struct Drill {
    catalog: ScenarioCatalog,
    timing: DrillTiming,
    screen: Screen,
    session: Option<Session>,
    next_token: StepToken,
    should_exit: bool,
}

impl Drill {
    pub fn new(catalog: ScenarioCatalog, timing: DrillTiming) -> Self {
        Self {
            catalog,
            timing,
            screen: Screen::Home,
            session: None,
            next_token: 1,
            should_exit: false,
        }
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn timing(&self) -> DrillTiming {
        self.timing
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn handle(&mut self, event: DrillEvent, host: &mut dyn DrillHost) -> Result<(), DrillError> {
        match event {
            DrillEvent::Start { scenario_id } => self.start(&scenario_id, host),
            DrillEvent::Select { token, option_id } => {
                self.select_for_step(token, &option_id, host)
            }
            DrillEvent::Tick { token } => {
                self.on_tick(token, host);
                Ok(())
            }
            DrillEvent::Advance { token } => {
                self.on_advance(token, host);
                Ok(())
            }
            DrillEvent::Replay => self.replay(host),
            DrillEvent::Home => self.go_home(host),
            DrillEvent::Quit => {
                self.quit(host);
                Ok(())
            }
        }
    }

    /// `home --start--> play` with a fresh session.
    pub fn start(&mut self, scenario_id: &str, host: &mut dyn DrillHost) -> Result<(), DrillError> {
        if self.screen != Screen::Home {
            return Err(DrillError::not_available("start", self.screen));
        }

        if self.catalog.find(scenario_id).is_none() {
            return Err(DrillError::UnknownScenario {
                scenario_id: scenario_id.to_string(),
            });
        }

        self.begin_session(scenario_id.to_string(), host);
        Ok(())
    }

    /// `result --replay--> play` on the same scenario.
    pub fn replay(&mut self, host: &mut dyn DrillHost) -> Result<(), DrillError> {
        if self.screen != Screen::Result {
            return Err(DrillError::not_available("replay", self.screen));
        }

        let Some(scenario_id) = self
            .session
            .as_ref()
            .map(|session| session.scenario_id().to_string())
        else {
            return Err(DrillError::not_available("replay", self.screen));
        };

        self.begin_session(scenario_id, host);
        Ok(())
    }

    /// Leaves a finished or in-progress run. The session is discarded.
    pub fn go_home(&mut self, host: &mut dyn DrillHost) -> Result<(), DrillError> {
        if self.screen == Screen::Home {
            return Err(DrillError::not_available("home", self.screen));
        }

        if self.screen == Screen::Play {
            info!(
                scenario = ?self.session.as_ref().map(Session::scenario_id),
                "session abandoned"
            );
        }

        self.discard_session(host);
        self.screen = Screen::Home;
        host.request_render();
        Ok(())
    }

    pub fn quit(&mut self, host: &mut dyn DrillHost) {
        self.cancel_active_timer(host);
        self.should_exit = true;
        info!("drill exiting");
        host.request_stop();
    }

    /// Records the first selection for the current step. Later selections for the same step are
    /// ignored.
    pub fn select(&mut self, option_id: &str, host: &mut dyn DrillHost) -> Result<(), DrillError> {
        if self.screen != Screen::Play {
            return Err(DrillError::not_available("select", self.screen));
        }

        let Some(session) = self.session.as_ref() else {
            return Err(DrillError::not_available("select", self.screen));
        };

        if let StepPhase::Answered { option_id: chosen } = session.phase() {
            debug!(ignored = option_id, chosen = %chosen, "step already answered");
            return Ok(());
        }

        let Some(step) = self.current_step() else {
            return Err(DrillError::not_available("select", self.screen));
        };
        let Some(option) = step.option(option_id) else {
            return Err(DrillError::UnknownOption {
                step_id: step.id.clone(),
                option_id: option_id.to_string(),
            });
        };

        let time_remaining = session.time_remaining();
        let delta = choice_delta(option, time_remaining);
        let record = DecisionRecord::chosen(step.id.clone(), option.id.clone(), delta, time_remaining);

        let Some(session) = self.session.as_mut() else {
            return Err(DrillError::not_available("select", self.screen));
        };
        let Some(token) = session.cancel_timer() else {
            debug!(option = option_id, "selection ignored, step timer not running");
            return Ok(());
        };
        host.cancel_timer(token);

        info!(
            step = %record.step_id,
            option = option_id,
            delta,
            time_remaining,
            "option selected"
        );
        session.record(record);
        session.mark_answered(option_id);

        host.schedule_advance(token, self.timing.feedback_delay);
        host.request_render();
        Ok(())
    }

    /// Like [`Drill::select`], but only while the step armed with `token` is still current.
    /// A selection aimed at a step that already timed out or advanced is dropped.
    pub fn select_for_step(
        &mut self,
        token: StepToken,
        option_id: &str,
        host: &mut dyn DrillHost,
    ) -> Result<(), DrillError> {
        let current = self
            .session
            .as_ref()
            .and_then(Session::timer)
            .map(StepTimer::token);

        if self.screen == Screen::Play && current != Some(token) {
            debug!(token, ?current, option = option_id, "selection for a previous step ignored");
            return Ok(());
        }

        self.select(option_id, host)
    }

    pub fn on_tick(&mut self, token: StepToken, host: &mut dyn DrillHost) {
        if self.screen != Screen::Play {
            debug!(token, screen = %self.screen, "tick outside play ignored");
            return;
        }

        let Some(timer) = self.session.as_mut().and_then(Session::timer_mut) else {
            debug!(token, "tick without armed step ignored");
            return;
        };

        match timer.tick(token) {
            TickOutcome::Ignored => debug!(token, "stale tick ignored"),
            TickOutcome::Counting { remaining } => {
                trace!(token, remaining, "tick");
                host.request_render();
            }
            TickOutcome::Expired => {
                host.cancel_timer(token);
                self.complete_timed_out_step(host);
            }
        }
    }

    pub fn on_advance(&mut self, token: StepToken, host: &mut dyn DrillHost) {
        let due = self.screen == Screen::Play
            && self.session.as_ref().is_some_and(|session| {
                matches!(session.phase(), StepPhase::Answered { .. })
                    && session.timer().map(StepTimer::token) == Some(token)
            });

        if !due {
            debug!(token, "stale advance ignored");
            return;
        }

        self.advance_step(host);
    }

    pub fn snapshot(&self) -> DrillSnapshot {
        let scenarios = self
            .catalog
            .scenarios()
            .iter()
            .map(|scenario| ScenarioSummary {
                id: scenario.id.clone(),
                title: scenario.title.clone(),
                intro: scenario.intro.clone(),
                kicker: scenario.kicker_or_default().to_string(),
            })
            .collect();

        DrillSnapshot {
            screen: self.screen,
            scenarios,
            play: self.play_view(),
            result: self.result_view(),
        }
    }

    fn play_view(&self) -> Option<PlayView> {
        if self.screen != Screen::Play {
            return None;
        }

        let session = self.session.as_ref()?;
        let scenario = self.current_scenario()?;
        let step = scenario.step(session.step_index())?;
        let token = session.timer().map(StepTimer::token)?;
        let answered_option = match session.phase() {
            StepPhase::Open => None,
            StepPhase::Answered { option_id } => Some(option_id.clone()),
        };

        Some(PlayView {
            token,
            scenario_title: scenario.title.clone(),
            step_number: session.step_index() + 1,
            step_count: scenario.step_count(),
            question: step.question.clone(),
            options: step
                .options
                .iter()
                .map(|option| OptionView {
                    id: option.id.clone(),
                    label: option.label.clone(),
                    explain: option.explain.clone(),
                })
                .collect(),
            answered_option,
            time_remaining: session.time_remaining(),
            time_budget: step.time,
            score: session.score(),
        })
    }

    fn result_view(&self) -> Option<ResultView> {
        if self.screen != Screen::Result {
            return None;
        }

        let session = self.session.as_ref()?;
        let scenario = self.current_scenario()?;
        let outcome =
            resolve_outcome(session.score(), &scenario.outcomes).map(|resolved| OutcomeView {
                min: resolved.outcome.min,
                title: resolved.outcome.title.clone(),
                message: resolved.outcome.message.clone(),
                fallback: resolved.fallback,
            });

        Some(ResultView {
            scenario_id: scenario.id.clone(),
            scenario_title: scenario.title.clone(),
            score: session.score(),
            outcome,
            log: session.log().to_vec(),
        })
    }

    fn current_scenario(&self) -> Option<&Scenario> {
        let session = self.session.as_ref()?;
        self.catalog.find(session.scenario_id())
    }

    fn current_step(&self) -> Option<&Step> {
        let session = self.session.as_ref()?;
        self.current_scenario()?.step(session.step_index())
    }

    fn begin_session(&mut self, scenario_id: String, host: &mut dyn DrillHost) {
        self.discard_session(host);
        info!(scenario = %scenario_id, "session started");
        self.session = Some(Session::new(scenario_id));
        self.enter_step(host);
    }

    fn discard_session(&mut self, host: &mut dyn DrillHost) {
        self.cancel_active_timer(host);
        self.session = None;
    }

    fn cancel_active_timer(&mut self, host: &mut dyn DrillHost) {
        if let Some(token) = self.session.as_mut().and_then(Session::cancel_timer) {
            host.cancel_timer(token);
        }
    }

    fn complete_timed_out_step(&mut self, host: &mut dyn DrillHost) {
        let Some(step_id) = self.current_step().map(|step| step.id.clone()) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        info!(step = %step_id, "step timed out");
        session.record(DecisionRecord::timed_out(step_id));
        self.advance_step(host);
    }

    fn advance_step(&mut self, host: &mut dyn DrillHost) {
        if let Some(session) = self.session.as_mut() {
            session.advance();
        }
        self.enter_step(host);
    }

    /// Arms the step at the session's index, or finishes the run when none is left.
    fn enter_step(&mut self, host: &mut dyn DrillHost) {
        let budget = self.current_step().map(|step| step.time);
        let token = self.next_token;

        let Some(session) = self.session.as_mut() else {
            return;
        };

        match budget {
            Some(budget) => {
                self.next_token += 1;
                session.arm_step(token, budget);
                self.screen = Screen::Play;
                debug!(token, step_index = session.step_index(), budget, "step armed");
                host.start_timer(token, self.timing.tick_interval);
            }
            None => {
                self.screen = Screen::Result;
                info!(
                    scenario = session.scenario_id(),
                    score = session.score(),
                    decisions = session.log().len(),
                    "scenario finished"
                );
            }
        }

        host.request_render();
    }
}
