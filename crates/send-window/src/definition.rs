//! Notification definitions, recurring schedule entries, and explicit options.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WindowError};
use crate::window::{add_minutes, SendWindow, TimeWindow, WeekdaySet, WindowShape};

/// One recurring slot: a time-of-day interval on a set of weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub days: WeekdaySet,
}

impl ScheduleEntry {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, days: WeekdaySet) -> Self {
        Self {
            start_time,
            end_time,
            days,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn shape(&self) -> WindowShape {
        self.window().shape()
    }

    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(day)
    }

    /// The date of the slot `at` falls into, or `None` outside the interval.
    ///
    /// An overnight slot belongs to the day it opens on, so the after-midnight
    /// part of 22:00-06:00 reports the previous date.
    pub fn slot_date(&self, at: NaiveDateTime) -> Option<NaiveDate> {
        let time = at.time();
        if !self.window().contains(time) {
            return None;
        }
        if self.shape() == WindowShape::Overnight && time < self.start_time {
            at.date().pred_opt()
        } else {
            Some(at.date())
        }
    }

    /// Whether `at` lies inside a slot this entry actually schedules.
    pub fn covers(&self, at: NaiveDateTime) -> bool {
        self.slot_date(at)
            .is_some_and(|date| self.runs_on(date.weekday()))
    }
}

/// How and when a notification may be sent.
///
/// Durations are in minutes. `send_start_duration` shifts "now" before any
/// schedule comparison (it may be zero or negative); `send_end_duration` is the
/// length of a freshly computed window and the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationDefinition {
    #[serde(default)]
    pub send_start_duration: i64,
    pub send_end_duration: i64,
    /// Hard window that overrides the recurring schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_window: Option<SendWindow>,
    #[serde(default)]
    pub is_continue_sending_other_day: bool,
    #[serde(default)]
    pub schedules: Vec<ScheduleEntry>,
}

impl NotificationDefinition {
    pub fn new(send_end_duration: i64) -> Self {
        Self {
            send_end_duration,
            ..Default::default()
        }
    }

    pub fn with_start_duration(mut self, minutes: i64) -> Self {
        self.send_start_duration = minutes;
        self
    }

    pub fn with_send_window(mut self, window: SendWindow) -> Self {
        self.send_window = Some(window);
        self
    }

    pub fn with_schedule(mut self, entry: ScheduleEntry) -> Self {
        self.schedules.push(entry);
        self
    }

    pub fn continue_on_other_days(mut self, enabled: bool) -> Self {
        self.is_continue_sending_other_day = enabled;
        self
    }

    pub fn has_schedules(&self) -> bool {
        !self.schedules.is_empty()
    }

    /// `now` shifted by `send_start_duration`, or `None` if that overflows.
    pub fn shifted_now(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        add_minutes(now, self.send_start_duration)
    }

    /// Union of every entry's weekday set.
    pub fn scheduled_days(&self) -> WeekdaySet {
        self.schedules
            .iter()
            .fold(WeekdaySet::EMPTY, |days, entry| days.union(entry.days))
    }

    /// Check the shape of the definition before handing it to the resolver.
    ///
    /// The resolver itself never calls this; it is total for any input.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidDefinition`] if `send_end_duration` is not
    /// positive or the hard window ends before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.send_end_duration <= 0 {
            return Err(WindowError::InvalidDefinition(format!(
                "send_end_duration must be positive, got {}",
                self.send_end_duration
            )));
        }
        if let Some(window) = &self.send_window {
            if window.start > window.end {
                return Err(WindowError::InvalidDefinition(format!(
                    "send window starts after it ends: {} > {}",
                    window.start, window.end
                )));
            }
        }
        Ok(())
    }
}

/// Per-request override of the send window.
///
/// With `control_with_notification_schedule == false` the window is used as-is
/// and the recurring schedule is skipped. With `true` the schedule still
/// decides, and `send_end_time` only acts as a cut-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub send_start_time: NaiveDateTime,
    pub send_end_time: NaiveDateTime,
    #[serde(default)]
    pub control_with_notification_schedule: bool,
}

impl NotificationOptions {
    /// Options that replace the schedule entirely.
    pub fn authoritative(window: SendWindow) -> Self {
        Self {
            send_start_time: window.start,
            send_end_time: window.end,
            control_with_notification_schedule: false,
        }
    }

    /// Options that let the schedule decide but cap the end at `window.end`.
    pub fn cutoff(window: SendWindow) -> Self {
        Self {
            send_start_time: window.start,
            send_end_time: window.end,
            control_with_notification_schedule: true,
        }
    }

    pub fn window(&self) -> SendWindow {
        SendWindow::new(self.send_start_time, self.send_end_time)
    }
}

/// A definition and its optional options, as a host serializes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub definition: NotificationDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<NotificationOptions>,
}

impl ResolveRequest {
    /// Parse and validate a JSON request document.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidDefinition`] if the JSON is malformed
    /// (including weekday indices outside 0-6) or fails [`NotificationDefinition::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let request: ResolveRequest = serde_json::from_str(json)
            .map_err(|e| WindowError::InvalidDefinition(e.to_string()))?;
        request.definition.validate()?;
        Ok(request)
    }
}
