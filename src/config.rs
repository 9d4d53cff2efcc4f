//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::DrillTiming;

pub const SCENARIOS_PATH_ENV_VAR: &str = "DRILL_SCENARIOS_PATH";
pub const TICK_MS_ENV_VAR: &str = "DRILL_TICK_MS";
pub const FEEDBACK_DELAY_MS_ENV_VAR: &str = "DRILL_FEEDBACK_DELAY_MS";
pub const LOG_FILE_ENV_VAR: &str = "DRILL_LOG_FILE";
pub const LOG_FILTER_ENV_VAR: &str = "DRILL_LOG";
pub const NO_COLOR_ENV_VAR: &str = "DRILL_NO_COLOR";

pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 700;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub scenarios_path: Option<PathBuf>,
    pub tick_interval: Duration,
    pub feedback_delay: Duration,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
    pub no_color: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            scenarios_path: None,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            feedback_delay: Duration::from_millis(DEFAULT_FEEDBACK_DELAY_MS),
            log_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            no_color: false,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            scenarios_path: env_string_opt(SCENARIOS_PATH_ENV_VAR).map(PathBuf::from),
            tick_interval: Duration::from_millis(env_millis(TICK_MS_ENV_VAR, DEFAULT_TICK_MS)),
            feedback_delay: Duration::from_millis(env_millis(
                FEEDBACK_DELAY_MS_ENV_VAR,
                DEFAULT_FEEDBACK_DELAY_MS,
            )),
            log_file: env_string_opt(LOG_FILE_ENV_VAR).map(PathBuf::from),
            log_filter: env_string_opt(LOG_FILTER_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            no_color: env_flag(NO_COLOR_ENV_VAR),
        }
    }

    #[must_use]
    pub fn timing(&self) -> DrillTiming {
        DrillTiming {
            tick_interval: self.tick_interval,
            feedback_delay: self.feedback_delay,
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

/// Tick intervals must be positive; the feedback delay may be zero.
fn env_millis(key: &str, default: u64) -> u64 {
    let allow_zero = key == FEEDBACK_DELAY_MS_ENV_VAR;
    env_string_opt(key)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|millis| allow_zero || *millis > 0)
        .unwrap_or(default)
}
