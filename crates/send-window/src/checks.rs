//! Schedule checks a dispatch host runs alongside resolution.

use chrono::{Datelike, NaiveDateTime, NaiveTime};

use crate::definition::NotificationDefinition;
use crate::window::SendWindow;

/// Whether `now` (shifted by `send_start_duration`) falls outside every
/// scheduled slot.
///
/// All-day entries cover the whole day. An overnight slot belongs to the day it
/// opens on, the same anchoring the overnight rule uses. A definition without
/// schedules is always out of schedule.
pub fn is_out_of_schedule(definition: &NotificationDefinition, now: NaiveDateTime) -> bool {
    let Some(last_now) = definition.shifted_now(now) else {
        return true;
    };
    !definition
        .schedules
        .iter()
        .any(|entry| entry.covers(last_now))
}

/// Keep a window from spilling into an unscheduled day.
///
/// If `window.end` falls on a later calendar day than the shifted `now`, and
/// no entry runs on that day, the end is pulled back to 23:59:59 of the
/// shifted `now`'s day. Definitions without schedules are returned unchanged.
pub fn trim_to_scheduled_day(
    window: SendWindow,
    definition: &NotificationDefinition,
    now: NaiveDateTime,
) -> SendWindow {
    let Some(last_now) = definition.shifted_now(now) else {
        return window;
    };
    if !definition.has_schedules() || window.end.date() == last_now.date() {
        return window;
    }
    if definition.scheduled_days().contains(window.end.weekday()) {
        return window;
    }
    match NaiveTime::from_hms_opt(23, 59, 59) {
        Some(end_of_day) => window.clamp_end(last_now.date().and_time(end_of_day)),
        None => window,
    }
}
