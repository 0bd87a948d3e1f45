//! Public entry point for send-window resolution.
//!
//! The resolver never reads a clock: `now` and the original request time are
//! always supplied by the caller, which keeps results reproducible.

use chrono::NaiveDateTime;

use crate::config::{EngineConfig, SchedulingFlags};
use crate::definition::{NotificationDefinition, NotificationOptions};
use crate::evaluator::{Resolution, RuleChain};
use crate::rules::RuleInput;

/// Resolves send windows against the standard rule chain.
///
/// Holds no mutable state; share one instance across threads freely.
#[derive(Debug, Clone)]
pub struct WindowResolver<F = EngineConfig> {
    flags: F,
    chain: &'static RuleChain,
}

impl Default for WindowResolver<EngineConfig> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<F: SchedulingFlags> WindowResolver<F> {
    pub fn new(flags: F) -> Self {
        Self {
            flags,
            chain: RuleChain::standard(),
        }
    }

    /// Decide whether `definition` may be sent at `now`, or when it may be sent next.
    ///
    /// # Arguments
    ///
    /// * `definition` — Schedule, durations and optional hard window
    /// * `options` — Per-request override, if any
    /// * `now` — Current local wall-clock time
    /// * `request_date` — When the notification was first requested; `None`
    ///   disables the expiry check
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use send_window::{
    ///     EngineConfig, NotificationDefinition, ScheduleEntry, WeekdaySet, WindowResolver,
    /// };
    ///
    /// let business_hours = ScheduleEntry::new(
    ///     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    ///     WeekdaySet::from_indices([1, 2, 3, 4, 5]).unwrap(),
    /// );
    /// let definition = NotificationDefinition::new(60).with_schedule(business_hours);
    ///
    /// // Monday 2026-03-16 at 09:00
    /// let now = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let resolver = WindowResolver::new(EngineConfig::default());
    /// let resolution = resolver.resolve(&definition, None, now, None);
    ///
    /// let window = resolution.window().unwrap();
    /// assert_eq!(window.start, now);
    /// assert_eq!(window.end.format("%H:%M").to_string(), "10:00");
    /// ```
    pub fn resolve(
        &self,
        definition: &NotificationDefinition,
        options: Option<&NotificationOptions>,
        now: NaiveDateTime,
        request_date: Option<NaiveDateTime>,
    ) -> Resolution {
        let input = RuleInput {
            definition,
            options,
            now,
            request_date,
            waiting_for_scheduling_active: self.flags.waiting_for_scheduling_active(),
        };
        self.chain.evaluate(&input)
    }
}

/// [`WindowResolver::resolve`] with the default configuration
/// (waiting-for-scheduling enabled).
pub fn resolve(
    definition: &NotificationDefinition,
    options: Option<&NotificationOptions>,
    now: NaiveDateTime,
    request_date: Option<NaiveDateTime>,
) -> Resolution {
    WindowResolver::<EngineConfig>::default().resolve(definition, options, now, request_date)
}
