//! End-to-end resolution scenarios through the public facade.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use send_window::{
    resolve, EngineConfig, NotificationDefinition, NotificationOptions, Resolution, ScheduleEntry,
    ScheduleRule, SendWindow, WeekdaySet, WindowResolver,
};

// March 2026: 15 = Sunday, 16 = Monday, 17 = Tuesday, 20 = Friday, 21 = Saturday.

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn days(indices: &[u8]) -> WeekdaySet {
    WeekdaySet::from_indices(indices.iter().copied()).unwrap()
}

fn business_hours() -> NotificationDefinition {
    NotificationDefinition::new(60).with_schedule(ScheduleEntry::new(
        t(8, 0),
        t(17, 0),
        days(&[1, 2, 3, 4, 5]),
    ))
}

fn sent_by(resolution: Resolution) -> (ScheduleRule, SendWindow) {
    match resolution {
        Resolution::Send { rule, window } => (rule, window),
        other => panic!("expected a send window, got {other:?}"),
    }
}

// ── Schedule scenarios ──────────────────────────────────────────────────────

#[test]
fn test_same_day_containment() {
    let definition = NotificationDefinition::new(60).with_schedule(ScheduleEntry::new(
        t(8, 0),
        t(17, 0),
        days(&[1]),
    ));
    let resolution = resolve(&definition, None, dt(16, 9, 0), None);
    assert!(resolution.is_valid());
    assert_eq!(
        resolution.window(),
        Some(SendWindow::new(dt(16, 9, 0), dt(16, 10, 0)))
    );
}

#[test]
fn test_overnight_wrap_after_midnight() {
    let friday_night = ScheduleEntry::new(t(22, 0), t(6, 0), days(&[5]));
    let definition = NotificationDefinition::new(120).with_schedule(friday_night);

    let (rule, window) = sent_by(resolve(&definition, None, dt(21, 1, 0), None));
    assert_eq!(rule, ScheduleRule::OvernightWrap);
    assert_eq!(window, SendWindow::new(dt(21, 1, 0), dt(21, 3, 0)));

    let long = NotificationDefinition::new(600).with_schedule(friday_night);
    let (_, window) = sent_by(resolve(&long, None, dt(21, 1, 0), None));
    assert_eq!(window.end, dt(21, 6, 0));
}

#[test]
fn test_overnight_slot_after_midnight_of_unscheduled_eve_waits_for_tonight() {
    let friday_night = ScheduleEntry::new(t(22, 0), t(6, 0), days(&[5]));
    let definition = NotificationDefinition::new(60)
        .continue_on_other_days(true)
        .with_schedule(friday_night);

    let (rule, window) = sent_by(resolve(&definition, None, dt(20, 1, 0), None));
    assert_eq!(rule, ScheduleRule::OutOfAnyWindow);
    assert_eq!(window, SendWindow::new(dt(20, 22, 0), dt(20, 23, 0)));
}

#[test]
fn test_day_rollover_to_next_tuesday() {
    let definition = NotificationDefinition::new(60)
        .continue_on_other_days(true)
        .with_schedule(ScheduleEntry::new(t(9, 0), t(9, 0), days(&[2])));

    let (rule, window) = sent_by(resolve(&definition, None, dt(15, 16, 45), None));
    assert_eq!(rule, ScheduleRule::DayRollover);
    assert_eq!(window.start, dt(17, 9, 0));
    assert_eq!(window.end, dt(17, 10, 0));
}

#[test]
fn test_after_hours_moves_to_next_morning() {
    let definition = business_hours().continue_on_other_days(true);
    let (rule, window) = sent_by(resolve(&definition, None, dt(16, 18, 0), None));
    assert_eq!(rule, ScheduleRule::OutOfAnyWindow);
    assert_eq!(window, SendWindow::new(dt(17, 8, 0), dt(17, 9, 0)));
}

#[test]
fn test_after_hours_without_deferral_has_no_window() {
    let resolution = resolve(&business_hours(), None, dt(16, 18, 0), None);
    assert_eq!(resolution, Resolution::NoWindow);
    assert_eq!(resolution.into_parts(), (false, None));
}

#[test]
fn test_shortly_before_opening() {
    let (rule, window) = sent_by(resolve(&business_hours(), None, dt(16, 7, 45), None));
    assert_eq!(rule, ScheduleRule::SameDayBeforeWindow);
    assert_eq!(window, SendWindow::new(dt(16, 8, 0), dt(16, 8, 45)));
}

#[test]
fn test_negative_start_duration_can_move_to_previous_day() {
    // Tuesday 00:30 shifted back an hour is Monday 23:30.
    let definition = NotificationDefinition::new(60)
        .with_start_duration(-60)
        .with_schedule(ScheduleEntry::new(t(0, 0), t(0, 0), days(&[1])));
    let (rule, window) = sent_by(resolve(&definition, None, dt(17, 0, 30), None));
    assert_eq!(rule, ScheduleRule::AllDayEntry);
    assert_eq!(window, SendWindow::new(dt(16, 23, 30), dt(17, 0, 30)));
}

#[test]
fn test_no_match_exhaustion() {
    let definition = NotificationDefinition::new(60).continue_on_other_days(true);
    for now in [dt(15, 0, 0), dt(16, 12, 0), dt(21, 23, 59)] {
        assert_eq!(resolve(&definition, None, now, None), Resolution::NoWindow);
    }
}

// ── Overrides and expiry ────────────────────────────────────────────────────

#[test]
fn test_expired_request_beats_open_options() {
    let options = NotificationOptions::authoritative(SendWindow::new(dt(16, 8, 0), dt(16, 20, 0)));
    let resolution = resolve(
        &business_hours(),
        Some(&options),
        dt(16, 12, 0),
        Some(dt(16, 10, 0)),
    );
    assert_eq!(resolution, Resolution::Expired);
}

#[test]
fn test_recent_request_is_not_expired() {
    let resolution = resolve(&business_hours(), None, dt(16, 12, 0), Some(dt(16, 11, 30)));
    assert!(resolution.is_valid());
}

#[test]
fn test_explicit_options_bypass_schedule() {
    let options = NotificationOptions::authoritative(SendWindow::new(dt(21, 8, 0), dt(21, 20, 0)));
    // Saturday: the schedule alone would give nothing.
    let (rule, window) = sent_by(resolve(&business_hours(), Some(&options), dt(21, 9, 0), None));
    assert_eq!(rule, ScheduleRule::ExplicitOptions);
    assert_eq!(window, options.window());
}

#[test]
fn test_closed_explicit_options_fall_back_to_schedule() {
    let options = NotificationOptions::authoritative(SendWindow::new(dt(16, 6, 0), dt(16, 7, 0)));
    let (rule, window) = sent_by(resolve(&business_hours(), Some(&options), dt(16, 9, 0), None));
    assert_eq!(rule, ScheduleRule::SameDayInsideWindow);
    assert_eq!(window, SendWindow::new(dt(16, 9, 0), dt(16, 10, 0)));
}

#[test]
fn test_hard_definition_window_precedes_schedule() {
    let definition =
        business_hours().with_send_window(SendWindow::new(dt(18, 12, 0), dt(18, 13, 0)));
    let (rule, window) = sent_by(resolve(&definition, None, dt(16, 9, 0), None));
    assert_eq!(rule, ScheduleRule::HardDefinitionWindow);
    assert_eq!(window, SendWindow::new(dt(18, 12, 0), dt(18, 13, 0)));
}

// ── Reconciliation ──────────────────────────────────────────────────────────

#[test]
fn test_cutoff_clamps_end() {
    let options = NotificationOptions::cutoff(SendWindow::new(dt(16, 8, 0), dt(16, 10, 30)));
    let resolution = resolve(&business_hours(), Some(&options), dt(16, 10, 0), None);
    assert_eq!(
        resolution.window(),
        Some(SendWindow::new(dt(16, 10, 0), dt(16, 10, 30)))
    );
}

#[test]
fn test_cutoff_at_computed_start_is_invalid() {
    let options = NotificationOptions::cutoff(SendWindow::new(dt(16, 8, 0), dt(16, 10, 0)));
    let resolution = resolve(&business_hours(), Some(&options), dt(16, 10, 0), None);
    assert!(!resolution.is_valid());
    assert!(matches!(resolution, Resolution::PastCutoff { .. }));
}

#[test]
fn test_cutoff_before_deferred_start_is_invalid() {
    let definition = business_hours().continue_on_other_days(true);
    let options = NotificationOptions::cutoff(SendWindow::new(dt(16, 8, 0), dt(16, 23, 0)));
    // After hours: the schedule would send tomorrow 08:00, past the 23:00 cut-off.
    let resolution = resolve(&definition, Some(&options), dt(16, 18, 0), None);
    assert_eq!(
        resolution,
        Resolution::PastCutoff {
            window: SendWindow::new(dt(17, 8, 0), dt(17, 9, 0)),
            cutoff: dt(16, 23, 0),
        }
    );
}

// ── Configuration ───────────────────────────────────────────────────────────

#[test]
fn test_waiting_for_scheduling_off_disables_deferral() {
    let definition = business_hours().continue_on_other_days(true);
    let resolver = WindowResolver::new(false);
    assert_eq!(
        resolver.resolve(&definition, None, dt(16, 18, 0), None),
        Resolution::NoWindow
    );
    // Same-day sending still works.
    assert!(resolver.resolve(&definition, None, dt(16, 9, 0), None).is_valid());
}

#[test]
fn test_resolver_shared_across_threads() {
    let resolver = std::sync::Arc::new(WindowResolver::new(EngineConfig::default()));
    let definition = std::sync::Arc::new(business_hours());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = resolver.clone();
            let definition = definition.clone();
            std::thread::spawn(move || resolver.resolve(&definition, None, dt(16, 9, 0), None))
        })
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().unwrap().window(),
            Some(SendWindow::new(dt(16, 9, 0), dt(16, 10, 0)))
        );
    }
}
