use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use decision_drill::{Drill, DrillEvent, DrillHost, Screen, StepToken, Terminal, TerminalInput};
use tracing::{debug, info, warn};

use crate::commands::{parse_command, Command, HELP_TEXT};
use crate::view::{is_countdown_checkpoint, render_frame, ViewOptions};

/// One entry in the runtime queue. Input and scheduler threads only ever append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuedEvent {
    Input(String),
    InputClosed,
    Drill(DrillEvent),
    /// The countdown for `token` could not be started.
    TimerFailed { token: StepToken, error: String },
}

#[derive(Default)]
struct RuntimeWakeState {
    pending: VecDeque<QueuedEvent>,
    render_requested: bool,
    stop_requested: bool,
}

#[derive(Default)]
struct RuntimeWake {
    state: Mutex<RuntimeWakeState>,
    cvar: Condvar,
}

impl RuntimeWake {
    fn lock(&self) -> MutexGuard<'_, RuntimeWakeState> {
        lock_unpoisoned(&self.state)
    }

    fn wait_for_event(&self) -> bool {
        let mut state = self.lock();

        while !state.stop_requested && state.pending.is_empty() && !state.render_requested {
            state = self
                .cvar
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }

        !state.stop_requested
    }

    fn enqueue(&self, event: QueuedEvent) {
        let mut state = self.lock();
        state.pending.push_back(event);
        self.cvar.notify_one();
    }

    fn pop_event(&self) -> Option<QueuedEvent> {
        self.lock().pending.pop_front()
    }

    fn request_render(&self) {
        let mut state = self.lock();
        state.render_requested = true;
        self.cvar.notify_one();
    }

    fn take_render_requested(&self) -> bool {
        std::mem::take(&mut self.lock().render_requested)
    }

    fn request_stop(&self) {
        let mut state = self.lock();
        state.stop_requested = true;
        self.cvar.notify_all();
    }

    fn is_stop_requested(&self) -> bool {
        self.lock().stop_requested
    }
}

/// Cloneable handle for feeding the runtime from other threads (signal handlers, tests).
#[derive(Clone)]
pub struct RuntimeHandle {
    wake: Arc<RuntimeWake>,
}

impl RuntimeHandle {
    pub fn dispatch(&self, event: DrillEvent) {
        self.wake.enqueue(QueuedEvent::Drill(event));
    }

    pub fn submit_line(&self, line: impl Into<String>) {
        self.wake.enqueue(QueuedEvent::Input(line.into()));
    }

    pub fn request_stop(&self) {
        self.wake.request_stop();
    }
}

/// [`DrillHost`] backed by one thread per running countdown and one per pending advance.
///
/// A countdown thread waits on its cancel channel with the tick interval as timeout; dropping
/// the sender ends it. Whatever a late thread still enqueues carries a stale token and is
/// ignored by the drill.
pub struct SchedulerHost {
    wake: Arc<RuntimeWake>,
    timers: HashMap<StepToken, Sender<()>>,
}

impl SchedulerHost {
    fn new(wake: Arc<RuntimeWake>) -> Self {
        Self {
            wake,
            timers: HashMap::new(),
        }
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    fn cancel_all(&mut self) {
        self.timers.clear();
    }
}

impl DrillHost for SchedulerHost {
    fn start_timer(&mut self, token: StepToken, interval: Duration) {
        self.timers.remove(&token);

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let wake = Arc::clone(&self.wake);
        let spawned = thread::Builder::new()
            .name(format!("drill-timer-{token}"))
            .spawn(move || loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        wake.enqueue(QueuedEvent::Drill(DrillEvent::Tick { token }));
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match spawned {
            Ok(_) => {
                self.timers.insert(token, cancel_tx);
            }
            Err(error) => {
                warn!(token, error = %error, "failed to spawn countdown thread");
                self.wake.enqueue(QueuedEvent::TimerFailed {
                    token,
                    error: error.to_string(),
                });
            }
        }
    }

    fn cancel_timer(&mut self, token: StepToken) {
        if self.timers.remove(&token).is_some() {
            debug!(token, "countdown cancelled");
        }
    }

    fn schedule_advance(&mut self, token: StepToken, delay: Duration) {
        if delay.is_zero() {
            self.wake
                .enqueue(QueuedEvent::Drill(DrillEvent::Advance { token }));
            return;
        }

        let wake = Arc::clone(&self.wake);
        let spawned = thread::Builder::new()
            .name(format!("drill-advance-{token}"))
            .spawn(move || {
                thread::sleep(delay);
                wake.enqueue(QueuedEvent::Drill(DrillEvent::Advance { token }));
            });

        if let Err(error) = spawned {
            warn!(token, error = %error, "failed to spawn advance thread, advancing now");
            self.wake
                .enqueue(QueuedEvent::Drill(DrillEvent::Advance { token }));
        }
    }

    fn request_render(&mut self) {
        self.wake.request_render();
    }

    fn request_stop(&mut self) {
        self.wake.request_stop();
    }
}

/// Owns the terminal and the drill, and drains the event queue on the calling thread.
pub struct DrillRuntime<T: Terminal> {
    terminal: T,
    drill: Drill,
    host: SchedulerHost,
    wake: Arc<RuntimeWake>,
    options: ViewOptions,
    status: Option<String>,
    last_frame: Option<String>,
    last_status: Option<String>,
    /// Step and answer state of the last play frame written, `None` off the play screen.
    shown_step: Option<(StepToken, Option<String>)>,
    started: bool,
    stopped: bool,
}

impl<T: Terminal> DrillRuntime<T> {
    pub fn new(terminal: T, drill: Drill, options: ViewOptions) -> Self {
        let wake = Arc::new(RuntimeWake::default());
        Self {
            terminal,
            drill,
            host: SchedulerHost::new(Arc::clone(&wake)),
            wake,
            options,
            status: None,
            last_frame: None,
            last_status: None,
            shown_step: None,
            started: false,
            stopped: false,
        }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            wake: Arc::clone(&self.wake),
        }
    }

    pub fn drill(&self) -> &Drill {
        &self.drill
    }

    pub fn host(&self) -> &SchedulerHost {
        &self.host
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Starts the terminal reader and draws the home screen.
    pub fn start(&mut self) -> std::io::Result<()> {
        if self.started {
            return Ok(());
        }

        let wake = Arc::clone(&self.wake);
        self.terminal.start(Box::new(move |input| match input {
            TerminalInput::Line(line) => wake.enqueue(QueuedEvent::Input(line)),
            TerminalInput::Closed => wake.enqueue(QueuedEvent::InputClosed),
        }))?;
        self.started = true;
        info!(scenarios = self.drill.catalog().len(), "drill runtime started");
        self.render();
        Ok(())
    }

    /// Blocks until something is queued, then drains the queue.
    pub fn run_blocking_once(&mut self) {
        if self.stopped || !self.wake.wait_for_event() {
            return;
        }
        self.run_once();
    }

    /// Applies every queued event in arrival order, then renders if anything asked for it.
    pub fn run_once(&mut self) {
        while let Some(event) = self.wake.pop_event() {
            self.apply(event);
            if self.drill.should_exit() {
                break;
            }
        }

        if self.wake.take_render_requested() && !self.drill.should_exit() {
            self.render();
        }
    }

    pub fn should_exit(&self) -> bool {
        self.drill.should_exit() || self.wake.is_stop_requested()
    }

    /// Cancels outstanding countdowns and stops the terminal. Safe to call twice.
    pub fn stop(&mut self) -> std::io::Result<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        self.host.cancel_all();
        info!("drill runtime stopped");
        if self.started {
            self.terminal.stop()?;
        }
        Ok(())
    }

    fn apply(&mut self, event: QueuedEvent) {
        match event {
            QueuedEvent::Drill(event) => self.apply_drill_event(event),
            QueuedEvent::Input(line) => self.handle_line(&line),
            QueuedEvent::InputClosed => {
                info!("input closed");
                self.drill.quit(&mut self.host);
            }
            QueuedEvent::TimerFailed { token, error } => self.abandon_untimed_step(token, &error),
        }
    }

    /// A step without a running countdown would never expire, so the run is abandoned.
    fn abandon_untimed_step(&mut self, token: StepToken, error: &str) {
        let active = self
            .drill
            .snapshot()
            .play
            .is_some_and(|play| play.token == token);
        if !active {
            debug!(token, "countdown failure for an inactive step ignored");
            return;
        }

        self.apply_drill_event(DrillEvent::Home);
        self.status = Some(format!(
            "Countdown could not start ({error}). The run was abandoned."
        ));
        self.wake.request_render();
    }

    fn apply_drill_event(&mut self, event: DrillEvent) {
        if let Err(error) = self.drill.handle(event, &mut self.host) {
            debug!(error = %error, "drill rejected event");
            self.status = Some(error.to_string());
            self.wake.request_render();
        }
    }

    fn handle_line(&mut self, line: &str) {
        let Some(command) = parse_command(line) else {
            return;
        };
        self.status = None;

        let event = match command {
            Command::Pick(number) => self.pick(number),
            Command::Replay => Some(DrillEvent::Replay),
            Command::Home | Command::Back => Some(DrillEvent::Home),
            Command::Quit => Some(DrillEvent::Quit),
            Command::Help => {
                self.status = Some(HELP_TEXT.to_string());
                None
            }
            Command::Unknown(text) => {
                self.status = Some(format!("Unknown command '{text}'. Type ? for help."));
                None
            }
        };

        if let Some(event) = event {
            self.apply_drill_event(event);
        }
        self.wake.request_render();
    }

    fn pick(&mut self, number: usize) -> Option<DrillEvent> {
        let snapshot = self.drill.snapshot();
        match snapshot.screen {
            Screen::Home => match snapshot.scenario_id_at(number) {
                Some(id) => Some(DrillEvent::Start {
                    scenario_id: id.to_string(),
                }),
                None => {
                    self.status = Some(format!("No scenario numbered {number}"));
                    None
                }
            },
            Screen::Play => match (self.shown_step.as_ref(), snapshot.option_id_at(number)) {
                (None, _) => {
                    debug!(number, "option picked before any play frame was shown");
                    None
                }
                (Some((token, _)), Some(id)) => Some(DrillEvent::Select {
                    token: *token,
                    option_id: id.to_string(),
                }),
                (Some(_), None) => {
                    self.status = Some(format!("No option numbered {number}"));
                    None
                }
            },
            Screen::Result => {
                self.status = Some("Type r to replay or h to choose another scenario".to_string());
                None
            }
        }
    }

    fn render(&mut self) {
        let snapshot = self.drill.snapshot();
        let step = snapshot
            .play
            .as_ref()
            .map(|play| (play.token, play.answered_option.clone()));

        // Plain output scrolls, so a countdown-only change is printed at checkpoints only.
        if !self.options.ansi {
            if let Some(play) = &snapshot.play {
                let countdown_only = step.is_some()
                    && step == self.shown_step
                    && self.status == self.last_status;
                if countdown_only && !is_countdown_checkpoint(play.time_remaining) {
                    return;
                }
            }
        }

        let columns = usize::from(self.terminal.columns());
        let frame = render_frame(&snapshot, self.status.as_deref(), columns, &self.options);
        self.shown_step = step;
        self.last_status = self.status.clone();
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return;
        }
        self.terminal.write(&frame);
        self.last_frame = Some(frame);
    }
}

impl<T: Terminal> Drop for DrillRuntime<T> {
    fn drop(&mut self) {
        self.host.cancel_all();
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
