//! Subscription Periods CLI - print the billing periods of a subscription
//!
//! Reads the interval and activation date from a TOML file and/or flags, partitions the
//! time elapsed since activation and prints one line per period:
//!
//! ```text
//! $ subscription-periods --interval P30D --activation-date 2012-09-01 --today 2012-12-12
//! #0 2012-09-01 .. 2012-09-30
//! #1 2012-10-01 .. 2012-10-30
//! #2 2012-10-31 .. 2012-11-29
//! #3 2012-11-30 .. 2012-12-29
//! ```
//!
//! Exit status is 0 on success and 1 when the subscription cannot be computed. Logs are
//! written to stderr (see [`observability`]).

mod observability;

use std::{error::Error, path::PathBuf, process::ExitCode};

use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, ValueEnum};
use subscription_periods::{
    ActivationValue, Period, Subscription, SubscriptionBuilder, SubscriptionConfig,
    SubscriptionError,
};
use tracing::{error, info};

use crate::observability::{LogFormat, init_observability};

#[derive(Debug, Parser)]
#[command(name = "subscription-periods", version)]
#[command(about = "Prints the billing periods of a subscription", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interval specification such as P30D or P1M1D, overrides the configuration
    #[arg(short, long)]
    interval: Option<String>,

    /// Activation date, overrides the configuration
    #[arg(short, long)]
    activation_date: Option<String>,

    /// Date or datetime used as "today" [default: now, UTC]
    #[arg(short, long, value_parser = parse_moment)]
    today: Option<NaiveDateTime>,

    /// Print only the period containing this date
    #[arg(long)]
    at: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `#<index> <first_date> .. <last_date>` per line
    Text,
    /// Pretty-printed JSON
    Json,
}

fn parse_moment(text: &str) -> Result<NaiveDateTime, String> {
    ActivationValue::parse(text)
        .as_datetime()
        .ok_or_else(|| format!("`{text}` is not a date or datetime"))
}

/// Merges the configuration file with command-line overrides.
fn load_config(cli: &Cli) -> subscription_periods::Result<SubscriptionConfig> {
    let mut config = match &cli.config {
        Some(path) => SubscriptionConfig::read_file(path)?,
        None => SubscriptionConfig::default(),
    };

    if let Some(interval) = &cli.interval {
        config.interval.clone_from(interval);
    }
    if let Some(activation_date) = &cli.activation_date {
        config.activation_date = Some(activation_date.clone());
    }

    config.validate()?;
    Ok(config)
}

fn build(cli: &Cli) -> subscription_periods::Result<Subscription> {
    let config = load_config(cli)?;
    let provider = config
        .activation_provider()
        .ok_or_else(|| SubscriptionError::Config("activation_date is not set".into()))?;
    let builder = SubscriptionBuilder::from_config(&config, provider)?;

    let today = cli.today.unwrap_or_else(|| Utc::now().naive_utc());
    let subscription = builder.build_at(today)?;
    info!(periods = subscription.count(), %today, "Computed subscription periods");
    Ok(subscription)
}

fn text_line(index: usize, period: &Period) -> String {
    format!("#{index} {} .. {}", period.first_date(), period.last_date())
}

fn render(
    subscription: &Subscription,
    at: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<String, Box<dyn Error>> {
    if let Some(date) = at {
        let (index, period) = subscription
            .iter()
            .enumerate()
            .find(|(_, period)| period.contains(date))
            .ok_or_else(|| format!("no period contains {date}"))?;

        return Ok(match format {
            OutputFormat::Text => text_line(index, period),
            OutputFormat::Json => serde_json::to_string_pretty(period)?,
        });
    }

    Ok(match format {
        OutputFormat::Text => subscription
            .iter()
            .enumerate()
            .map(|(index, period)| text_line(index, period))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(subscription)?,
    })
}

fn run(cli: &Cli) -> Result<String, Box<dyn Error>> {
    let subscription = build(cli)?;
    render(&subscription, cli.at, cli.format)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_observability(LogFormat::from_env());

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to compute subscription periods");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
