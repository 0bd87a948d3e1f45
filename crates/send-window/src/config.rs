//! Engine configuration and the scheduling feature flag.

use std::env;

/// Environment key for the global "waiting for scheduling" switch.
pub const WAITING_FOR_SCHEDULING_KEY: &str = "SEND_WINDOW_WAITING_FOR_SCHEDULING";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Feature flags the rule chain consults.
///
/// When waiting-for-scheduling is off, notifications are never deferred to a
/// later day: the day-rollover and out-of-window rules decline.
pub trait SchedulingFlags {
    fn waiting_for_scheduling_active(&self) -> bool;
}

impl SchedulingFlags for bool {
    fn waiting_for_scheduling_active(&self) -> bool {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub waiting_for_scheduling_active: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            waiting_for_scheduling_active: true,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            waiting_for_scheduling_active: lookup(WAITING_FOR_SCHEDULING_KEY)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.waiting_for_scheduling_active),
        }
    }
}

impl SchedulingFlags for EngineConfig {
    fn waiting_for_scheduling_active(&self) -> bool {
        self.waiting_for_scheduling_active
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
