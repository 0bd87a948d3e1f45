mod cli;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use send_window::{
    is_out_of_schedule, load_dotenv, local_wall_clock, trim_to_scheduled_day, EngineConfig,
    Resolution, ResolveRequest, SchedulingFlags, WindowResolver,
};

use crate::cli::{CheckArgs, CliArgs, Command, Moment, ResolveArgs};

const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize)]
struct ResolveReport {
    is_valid: bool,
    send_start_time: Option<String>,
    send_end_time: Option<String>,
    #[serde(flatten)]
    resolution: Resolution,
}

impl From<Resolution> for ResolveReport {
    fn from(resolution: Resolution) -> Self {
        let window = resolution.window();
        Self {
            is_valid: resolution.is_valid(),
            send_start_time: window.map(|w| w.start.format(OUTPUT_FORMAT).to_string()),
            send_end_time: window.map(|w| w.end.format(OUTPUT_FORMAT).to_string()),
            resolution,
        }
    }
}

#[derive(Serialize)]
struct CheckReport {
    out_of_schedule: bool,
}

fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut config = EngineConfig::from_env();
    if let Some(active) = args.waiting_for_scheduling {
        config.waiting_for_scheduling_active = active;
    }
    debug!(
        waiting_for_scheduling = config.waiting_for_scheduling_active(),
        "engine configuration"
    );

    let output = match args.command {
        Command::Resolve(resolve_args) => {
            serde_json::to_string_pretty(&run_resolve(config, resolve_args)?)?
        }
        Command::Check(check_args) => serde_json::to_string_pretty(&run_check(check_args)?)?,
    };
    println!("{output}");
    Ok(())
}

fn run_resolve(config: EngineConfig, args: ResolveArgs) -> Result<ResolveReport> {
    let request = load_request(&args.moment.input)?;
    let now = parse_now(&args.moment)?;
    let request_date = args
        .request_date
        .as_deref()
        .map(|ts| local_wall_clock(ts, &args.moment.timezone))
        .transpose()
        .context("invalid --request-date")?;

    let resolver = WindowResolver::new(config);
    let mut resolution = resolver.resolve(
        &request.definition,
        request.options.as_ref(),
        now,
        request_date,
    );

    if args.trim_to_scheduled_day {
        if let Resolution::Send { window, rule } = resolution {
            resolution = Resolution::Send {
                window: trim_to_scheduled_day(window, &request.definition, now),
                rule,
            };
        }
    }

    info!(now = %now, valid = resolution.is_valid(), "resolved send window");
    Ok(resolution.into())
}

fn run_check(args: CheckArgs) -> Result<CheckReport> {
    let request = load_request(&args.moment.input)?;
    let now = parse_now(&args.moment)?;
    Ok(CheckReport {
        out_of_schedule: is_out_of_schedule(&request.definition, now),
    })
}

fn parse_now(moment: &Moment) -> Result<NaiveDateTime> {
    local_wall_clock(&moment.now, &moment.timezone).context("invalid --now")
}

fn load_request(path: &Path) -> Result<ResolveRequest> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?
    };
    ResolveRequest::from_json(&json).context("invalid request document")
}
