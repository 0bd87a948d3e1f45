//! # send-window
//!
//! Deterministic send-window resolution for scheduled notifications.
//!
//! Given a notification's recurring schedule, an optional per-request override,
//! the current time and the time the notification was first requested, the
//! resolver decides whether the notification may go out now and, if not, the
//! next `[start, end]` window in which it may. Nothing here reads a clock or
//! performs I/O; every call is a pure function of its arguments.
//!
//! ## Modules
//!
//! - [`window`] — Weekday sets, time-of-day intervals, resolved send windows
//! - [`definition`] — Notification definitions, schedule entries, options
//! - [`rules`] — The nine resolution rules
//! - [`evaluator`] — Rule chain evaluation and option reconciliation
//! - [`resolver`] — Public facade
//! - [`checks`] — Out-of-schedule check and day-boundary trim
//! - [`local`] — Timestamp to local wall-clock conversion
//! - [`config`] — Engine configuration and feature flags
//! - [`error`] — Error types

pub mod checks;
pub mod config;
pub mod definition;
pub mod error;
pub mod evaluator;
pub mod local;
pub mod resolver;
pub mod rules;
pub mod window;

pub use checks::{is_out_of_schedule, trim_to_scheduled_day};
pub use config::{load_dotenv, EngineConfig, SchedulingFlags, WAITING_FOR_SCHEDULING_KEY};
pub use definition::{NotificationDefinition, NotificationOptions, ResolveRequest, ScheduleEntry};
pub use error::WindowError;
pub use evaluator::{reconcile, ChainResult, Resolution, RuleChain};
pub use local::local_wall_clock;
pub use resolver::{resolve, WindowResolver};
pub use rules::{RuleInput, RuleOutcome, ScheduleRule};
pub use window::{weekday_index, SendWindow, TimeWindow, WeekdaySet, WindowShape};
