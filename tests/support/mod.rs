#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use decision_drill::catalog::ScenarioCatalog;
use decision_drill::{Drill, DrillHost, DrillTiming, StepToken};

pub const TICK: Duration = Duration::from_millis(1000);
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    StartTimer(StepToken, Duration),
    CancelTimer(StepToken),
    ScheduleAdvance(StepToken, Duration),
    Render,
    Stop,
}

#[derive(Debug, Default)]
pub struct HostSpy {
    pub calls: Vec<HostCall>,
}

impl HostSpy {
    pub fn started_timers(&self) -> Vec<StepToken> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::StartTimer(token, _) => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled_timers(&self) -> Vec<StepToken> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::CancelTimer(token) => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn scheduled_advances(&self) -> Vec<StepToken> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::ScheduleAdvance(token, _) => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn last_started_timer(&self) -> StepToken {
        *self
            .started_timers()
            .last()
            .expect("a step timer has been started")
    }

    pub fn stop_requests(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Stop))
            .count()
    }
}

impl DrillHost for HostSpy {
    fn start_timer(&mut self, token: StepToken, interval: Duration) {
        self.calls.push(HostCall::StartTimer(token, interval));
    }

    fn cancel_timer(&mut self, token: StepToken) {
        self.calls.push(HostCall::CancelTimer(token));
    }

    fn schedule_advance(&mut self, token: StepToken, delay: Duration) {
        self.calls.push(HostCall::ScheduleAdvance(token, delay));
    }

    fn request_render(&mut self) {
        self.calls.push(HostCall::Render);
    }

    fn request_stop(&mut self) {
        self.calls.push(HostCall::Stop);
    }
}

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read fixture {name}: {err}"))
}

pub fn fixture_catalog() -> ScenarioCatalog {
    ScenarioCatalog::from_json_str("two_step.json", &read_fixture("two_step.json"))
        .expect("fixture catalog is valid")
}

pub fn fixture_drill() -> Drill {
    Drill::new(
        fixture_catalog(),
        DrillTiming {
            tick_interval: TICK,
            feedback_delay: FEEDBACK_DELAY,
        },
    )
}

/// Delivers `count` ticks for `token`.
pub fn tick_n(drill: &mut Drill, host: &mut HostSpy, token: StepToken, count: u32) {
    for _ in 0..count {
        drill.on_tick(token, host);
    }
}
