use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};

/// Dry-run notification send-window resolution against a JSON request.
#[derive(Parser, Debug)]
#[command(name = "send-window", version, about)]
pub struct CliArgs {
    /// Allow deferring notifications to a later day. Falls back to
    /// SEND_WINDOW_WAITING_FOR_SCHEDULING, then to true.
    #[arg(long, global = true, value_parser = BoolishValueParser::new())]
    pub waiting_for_scheduling: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the send window for a request document.
    Resolve(ResolveArgs),
    /// Report whether the current time is outside every scheduled slot.
    Check(CheckArgs),
}

/// Where the request comes from and what time it is.
#[derive(Args, Debug)]
pub struct Moment {
    /// Request JSON file (`-` for stdin).
    #[arg(long, short, default_value = "-")]
    pub input: PathBuf,

    /// Current time, RFC 3339 or naive local `YYYY-MM-DDTHH:MM:SS`.
    #[arg(long)]
    pub now: String,

    /// IANA zone the schedule is written in.
    #[arg(long, default_value = "UTC")]
    pub timezone: String,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub moment: Moment,

    /// When the notification was first requested. Enables the expiry check.
    #[arg(long)]
    pub request_date: Option<String>,

    /// Pull the end back to 23:59:59 when it spills into an unscheduled day.
    #[arg(long)]
    pub trim_to_scheduled_day: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub moment: Moment,
}
