use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::api::{ApiState, run_http_server};
use crate::config::{GlobalArgs, Settings};
use crate::core::{changed_positions, format_money};
use crate::estimate::{
    Estimate, EstimateOverrides, ProfileOverrides, build_estimate, build_request,
    validate_profile,
};
use crate::store::{ConfigStore, JsonFileStore, load_or_default};

#[derive(Parser, Debug)]
#[command(
    name = "carrot",
    about = "FIRE estimator: how long savings last under income, interest and inflation"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, env = "CARROT_BIND", default_value = "0.0.0.0")]
        bind: IpAddr,
        #[arg(long, env = "CARROT_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Compute the estimate once and print it.
    Estimate {
        #[command(flatten)]
        overrides: EstimateOverrides,
        #[arg(long, help = "Print the full estimate as JSON")]
        json: bool,
    },
    /// Recompute the live balance and years on a fixed interval.
    Watch {
        #[command(flatten)]
        overrides: EstimateOverrides,
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
        #[arg(long, help = "Stop after this many updates")]
        ticks: Option<u64>,
    },
    /// Show the stored profile, or update it when any field is given.
    Config {
        #[command(flatten)]
        overrides: ProfileOverrides,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::from_args(&cli.global)?;
    let store = Arc::new(JsonFileStore::new(settings.config_path.clone()));
    tracing::debug!(path = %store.path().display(), "using profile store");

    match cli.command {
        Command::Serve { bind, port } => {
            let state = ApiState::new(store, settings.clock, settings.schedule);
            run_http_server(SocketAddr::new(bind, port), state)
                .await
                .context("HTTP server failed")
        }
        Command::Estimate { overrides, json } => {
            let estimate = estimate_once(&settings, store.as_ref(), &overrides)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
            } else {
                print!("{}", render_summary(&estimate));
            }
            Ok(())
        }
        Command::Watch {
            overrides,
            interval_ms,
            ticks,
        } => watch(&settings, store.as_ref(), &overrides, interval_ms, ticks).await,
        Command::Config { overrides } => update_profile(store.as_ref(), &overrides),
    }
}

fn estimate_once(
    settings: &Settings,
    store: &dyn ConfigStore,
    overrides: &EstimateOverrides,
) -> anyhow::Result<Estimate> {
    let profile = load_or_default(store);
    let request = build_request(&profile, overrides, &settings.clock).map_err(anyhow::Error::msg)?;
    Ok(build_estimate(
        &request,
        &settings.clock,
        &settings.schedule,
        Utc::now(),
    ))
}

async fn watch(
    settings: &Settings,
    store: &dyn ConfigStore,
    overrides: &EstimateOverrides,
    interval_ms: u64,
    ticks: Option<u64>,
) -> anyhow::Result<()> {
    if interval_ms == 0 {
        bail!("--interval-ms must be > 0");
    }
    let profile = load_or_default(store);
    let request = build_request(&profile, overrides, &settings.clock).map_err(anyhow::Error::msg)?;

    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
    let mut previous = String::new();
    let mut count = 0;
    while ticks.is_none_or(|limit| count < limit) {
        interval.tick().await;
        let estimate = build_estimate(&request, &settings.clock, &settings.schedule, Utc::now());
        let line = format!(
            "{}  ({} years)",
            estimate.deposit_display, estimate.support_years_display
        );
        println!("{line}");
        println!("{}", change_markers(&previous, &line));
        previous = line;
        count += 1;
    }
    Ok(())
}

fn update_profile(store: &dyn ConfigStore, overrides: &ProfileOverrides) -> anyhow::Result<()> {
    let mut profile = load_or_default(store);
    if !overrides.is_empty() {
        overrides.apply(&mut profile);
        validate_profile(&profile).map_err(anyhow::Error::msg)?;
        store.save(&profile).context("failed to save profile")?;
        tracing::info!("profile saved");
    }
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

/// `^` under every glyph of `current` that changed since `previous`.
fn change_markers(previous: &str, current: &str) -> String {
    let changed = changed_positions(previous, current);
    let width = changed.last().map_or(0, |last| last + 1);
    (0..width)
        .map(|i| if changed.contains(&i) { '^' } else { ' ' })
        .collect()
}

fn render_summary(estimate: &Estimate) -> String {
    let life_style = &estimate.life_style;
    format!(
        "Live deposit:      {} ({})\n\
         Salary per second: {:.4}\n\
         Life style:        {} (year cost {}, interest {}%, inflation {}%)\n\
         Years supported:   {} (from {})\n",
        estimate.deposit_display,
        estimate.deposit_abbr_display,
        estimate.salary_per_second,
        life_style.desc,
        format_money(life_style.year_cost),
        life_style.interest_percent(),
        life_style.inflation_percent(),
        estimate.support_years_display,
        estimate.start_year,
    )
}
