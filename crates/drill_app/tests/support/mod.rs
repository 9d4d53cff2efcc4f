#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use decision_drill::{Drill, DrillTiming, Terminal, TerminalInput};
use drill_app::runtime::DrillRuntime;
use drill_app::view::ViewOptions;
use scenario_catalog::ScenarioCatalog;

type InputHandler = Box<dyn FnMut(TerminalInput) + Send>;

pub const FIXTURE: &str = include_str!("../fixtures/drills.json");

/// Long enough that no countdown tick fires during a synchronous test.
pub const IDLE_TICK: Duration = Duration::from_secs(60);

#[derive(Default)]
pub struct TerminalTrace {
    pub writes: Vec<String>,
    pub start_calls: usize,
    pub stop_calls: usize,
    pub on_input: Option<InputHandler>,
}

pub struct SharedTerminal {
    state: Arc<Mutex<TerminalTrace>>,
    columns: u16,
}

impl SharedTerminal {
    pub fn new(columns: u16) -> (Self, Arc<Mutex<TerminalTrace>>) {
        let state = Arc::new(Mutex::new(TerminalTrace::default()));
        (
            Self {
                state: Arc::clone(&state),
                columns,
            },
            state,
        )
    }
}

impl Terminal for SharedTerminal {
    fn start(&mut self, on_input: InputHandler) -> std::io::Result<()> {
        let mut state = lock_unpoisoned(&self.state);
        state.start_calls += 1;
        state.on_input = Some(on_input);
        Ok(())
    }

    fn stop(&mut self) -> std::io::Result<()> {
        let mut state = lock_unpoisoned(&self.state);
        state.stop_calls += 1;
        Ok(())
    }

    fn write(&mut self, data: &str) {
        let mut state = lock_unpoisoned(&self.state);
        state.writes.push(data.to_string());
    }

    fn columns(&self) -> u16 {
        self.columns
    }
}

pub fn fixture_catalog() -> ScenarioCatalog {
    ScenarioCatalog::from_json_str("drills.json", FIXTURE).expect("fixture catalog is valid")
}

pub fn runtime_with_timing(
    tick_interval: Duration,
    feedback_delay: Duration,
) -> (DrillRuntime<SharedTerminal>, Arc<Mutex<TerminalTrace>>) {
    let (terminal, trace) = SharedTerminal::new(80);
    let drill = Drill::new(
        fixture_catalog(),
        DrillTiming {
            tick_interval,
            feedback_delay,
        },
    );
    let mut runtime = DrillRuntime::new(terminal, drill, ViewOptions { ansi: false });
    runtime.start().expect("runtime starts");
    (runtime, trace)
}

/// Runtime whose countdowns never fire and whose advances are queued immediately.
pub fn synchronous_runtime() -> (DrillRuntime<SharedTerminal>, Arc<Mutex<TerminalTrace>>) {
    runtime_with_timing(IDLE_TICK, Duration::ZERO)
}

pub fn inject_input(state: &Arc<Mutex<TerminalTrace>>, input: TerminalInput) {
    let mut state = lock_unpoisoned(state);
    let Some(on_input) = state.on_input.as_mut() else {
        panic!("terminal input handler is not registered");
    };

    on_input(input);
}

/// Feeds one line and drains the queue.
pub fn type_line(
    runtime: &mut DrillRuntime<SharedTerminal>,
    state: &Arc<Mutex<TerminalTrace>>,
    line: &str,
) {
    inject_input(state, TerminalInput::Line(line.to_string()));
    runtime.run_once();
}

pub fn rendered_output(state: &Arc<Mutex<TerminalTrace>>) -> String {
    lock_unpoisoned(state).writes.join("")
}

pub fn last_frame(state: &Arc<Mutex<TerminalTrace>>) -> String {
    lock_unpoisoned(state)
        .writes
        .last()
        .cloned()
        .unwrap_or_default()
}

/// Drives the runtime until `done` holds, failing after `timeout`.
pub fn run_until(
    runtime: &mut DrillRuntime<SharedTerminal>,
    timeout: Duration,
    mut done: impl FnMut(&DrillRuntime<SharedTerminal>) -> bool,
) {
    let deadline = Instant::now() + timeout;
    while !done(runtime) {
        assert!(Instant::now() < deadline, "runtime did not settle in time");
        runtime.run_blocking_once();
    }
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
