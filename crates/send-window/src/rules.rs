//! The nine send-window resolution rules.
//!
//! Each rule is a pure function of a [`RuleInput`]. A rule either declines
//! ("not my case, ask the next rule"), produces a valid [`SendWindow`], or, in
//! the case of [`ScheduleRule::RequestExpired`], reports that the request is
//! permanently too late.
//!
//! Schedule-based rules work on the *shifted* now: `now + send_start_duration`.
//! "Today" is the weekday of that shifted instant.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;

use crate::definition::{NotificationDefinition, NotificationOptions};
use crate::window::{add_minutes, SendWindow, WindowShape};

/// Everything a rule may look at. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub definition: &'a NotificationDefinition,
    pub options: Option<&'a NotificationOptions>,
    pub now: NaiveDateTime,
    pub request_date: Option<NaiveDateTime>,
    /// Global "waiting for scheduling" feature flag.
    pub waiting_for_scheduling_active: bool,
}

impl RuleInput<'_> {
    /// Deferral to a later slot requires both the global flag and the
    /// definition's opt-in.
    fn may_defer(&self) -> bool {
        self.waiting_for_scheduling_active && self.definition.is_continue_sending_other_day
    }

    fn shifted_now(&self) -> Option<NaiveDateTime> {
        self.definition.shifted_now(self.now)
    }

    fn end_duration(&self) -> i64 {
        self.definition.send_end_duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Declined,
    /// The request outlived `send_end_duration`; no later rule may revive it.
    Expired,
    Valid(SendWindow),
}

impl From<Option<SendWindow>> for RuleOutcome {
    fn from(window: Option<SendWindow>) -> Self {
        window.map_or(RuleOutcome::Declined, RuleOutcome::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleRule {
    RequestExpired,
    ExplicitOptions,
    HardDefinitionWindow,
    DayRollover,
    SameDayInsideWindow,
    SameDayBeforeWindow,
    AllDayEntry,
    OvernightWrap,
    OutOfAnyWindow,
}

impl ScheduleRule {
    /// Evaluation order. Earlier rules take precedence.
    pub const CHAIN: [ScheduleRule; 9] = [
        ScheduleRule::RequestExpired,
        ScheduleRule::ExplicitOptions,
        ScheduleRule::HardDefinitionWindow,
        ScheduleRule::DayRollover,
        ScheduleRule::SameDayInsideWindow,
        ScheduleRule::SameDayBeforeWindow,
        ScheduleRule::AllDayEntry,
        ScheduleRule::OvernightWrap,
        ScheduleRule::OutOfAnyWindow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScheduleRule::RequestExpired => "request_expired",
            ScheduleRule::ExplicitOptions => "explicit_options",
            ScheduleRule::HardDefinitionWindow => "hard_definition_window",
            ScheduleRule::DayRollover => "day_rollover",
            ScheduleRule::SameDayInsideWindow => "same_day_inside_window",
            ScheduleRule::SameDayBeforeWindow => "same_day_before_window",
            ScheduleRule::AllDayEntry => "all_day_entry",
            ScheduleRule::OvernightWrap => "overnight_wrap",
            ScheduleRule::OutOfAnyWindow => "out_of_any_window",
        }
    }

    pub fn evaluate(&self, input: &RuleInput<'_>) -> RuleOutcome {
        match self {
            ScheduleRule::RequestExpired => {
                if request_expired(input) {
                    RuleOutcome::Expired
                } else {
                    RuleOutcome::Declined
                }
            }
            ScheduleRule::ExplicitOptions => explicit_options(input).into(),
            ScheduleRule::HardDefinitionWindow => hard_definition_window(input).into(),
            ScheduleRule::DayRollover => day_rollover(input).into(),
            ScheduleRule::SameDayInsideWindow => same_day_inside_window(input).into(),
            ScheduleRule::SameDayBeforeWindow => same_day_before_window(input).into(),
            ScheduleRule::AllDayEntry => all_day_entry(input).into(),
            ScheduleRule::OvernightWrap => overnight_wrap(input).into(),
            ScheduleRule::OutOfAnyWindow => out_of_any_window(input).into(),
        }
    }
}

impl fmt::Display for ScheduleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Override rules ──────────────────────────────────────────────────────────

fn request_expired(input: &RuleInput<'_>) -> bool {
    input
        .request_date
        .and_then(|requested| add_minutes(requested, input.end_duration()))
        .is_some_and(|deadline| deadline < input.now)
}

fn explicit_options(input: &RuleInput<'_>) -> Option<SendWindow> {
    let options = input
        .options
        .filter(|o| !o.control_with_notification_schedule)?;
    (input.now <= options.send_end_time).then(|| options.window())
}

fn hard_definition_window(input: &RuleInput<'_>) -> Option<SendWindow> {
    let window = input.definition.send_window?;
    (input.now <= window.end).then_some(window)
}

// ── Schedule rules ──────────────────────────────────────────────────────────

/// Skip forward over days that no entry covers.
///
/// Declines when today is already a scheduled day; rules 5-9 handle that.
fn day_rollover(input: &RuleInput<'_>) -> Option<SendWindow> {
    if !input.may_defer() || !input.definition.has_schedules() {
        return None;
    }
    let last_now = input.shifted_now()?;
    let today = last_now.weekday();
    let scheduled = input.definition.scheduled_days();
    if scheduled.contains(today) {
        return None;
    }

    let (day, ahead) = scheduled.next_after(today)?;
    let entry = input
        .definition
        .schedules
        .iter()
        .find(|entry| entry.runs_on(day))?;
    let date = last_now
        .date()
        .checked_add_signed(Duration::try_days(ahead)?)?;
    let start = date.and_time(entry.start_time);
    let end = add_minutes(start, input.end_duration())?;
    Some(SendWindow::new(start, end))
}

fn same_day_inside_window(input: &RuleInput<'_>) -> Option<SendWindow> {
    let last_now = input.shifted_now()?;
    let today = last_now.weekday();
    let entry = input.definition.schedules.iter().find(|entry| {
        entry.shape() == WindowShape::SameDay
            && entry.runs_on(today)
            && entry.window().contains(last_now.time())
    })?;

    let day_end = last_now.date().and_time(entry.end_time);
    let end = add_minutes(last_now, input.end_duration())?.min(day_end);
    Some(SendWindow::new(last_now, end))
}

/// A request arriving shortly before (or after) a same-day slot opens gets a
/// window starting `|start_time - now|` later.
fn same_day_before_window(input: &RuleInput<'_>) -> Option<SendWindow> {
    let last_now = input.shifted_now()?;
    let today = last_now.weekday();
    let limit = Duration::try_minutes(input.end_duration())?;
    let now_time = input.now.time();

    let residual = input
        .definition
        .schedules
        .iter()
        .filter(|entry| entry.shape() == WindowShape::SameDay && entry.runs_on(today))
        .map(|entry| (entry.start_time - now_time).abs())
        .find(|residual| *residual < limit)?;

    let start = last_now.checked_add_signed(residual)?;
    let end = add_minutes(last_now, input.end_duration())?;
    Some(SendWindow::new(start, end))
}

fn all_day_entry(input: &RuleInput<'_>) -> Option<SendWindow> {
    let last_now = input.shifted_now()?;
    let today = last_now.weekday();
    input
        .definition
        .schedules
        .iter()
        .find(|entry| entry.shape() == WindowShape::AllDay && entry.runs_on(today))?;

    let end = add_minutes(last_now, input.end_duration())?;
    Some(SendWindow::new(last_now, end))
}

/// Inside an overnight slot such as 22:00-06:00.
///
/// The slot belongs to the day it starts on: at 01:00 on Saturday we are in
/// Friday's slot, so Friday must be in the entry's days and the window may
/// run until Saturday 06:00 at the latest.
fn overnight_wrap(input: &RuleInput<'_>) -> Option<SendWindow> {
    let last_now = input.shifted_now()?;

    input
        .definition
        .schedules
        .iter()
        .filter(|entry| entry.shape() == WindowShape::Overnight)
        .find_map(|entry| {
            let start_day = entry.slot_date(last_now)?;
            if !entry.runs_on(start_day.weekday()) {
                return None;
            }
            let wrap_end = start_day.succ_opt()?.and_time(entry.end_time);
            let end = add_minutes(last_now, input.end_duration())?.min(wrap_end);
            Some(SendWindow::new(last_now, end))
        })
}

/// Catch-all: outside every slot of today, so move to the next opening.
///
/// Before the slot opens (including the daytime gap of an overnight slot) the
/// window starts today; after a same-day slot has closed it starts tomorrow.
/// The after-midnight part of an overnight slot whose opening day is not
/// scheduled counts as outside, so tonight's opening is used.
fn out_of_any_window(input: &RuleInput<'_>) -> Option<SendWindow> {
    if !input.may_defer() {
        return None;
    }
    let last_now = input.shifted_now()?;
    let today = last_now.weekday();
    let time = last_now.time();

    input
        .definition
        .schedules
        .iter()
        .filter(|entry| entry.runs_on(today) && !entry.covers(last_now))
        .find_map(|entry| {
            let date = if time < entry.start_time {
                last_now.date()
            } else {
                last_now.date().succ_opt()?
            };
            let start = date.and_time(entry.start_time);
            let end = add_minutes(start, input.end_duration())?;
            Some(SendWindow::new(start, end))
        })
}
