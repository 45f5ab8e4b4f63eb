use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use client_core::{
    DashboardFetcher, GreetingPanel, GreetingRule, MissingFetcher, PanelOptions, StateContainer,
    StaticFetcher,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "greeting-panel", about = "Render the dashboard greeting header")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// JSON profile fixture served by the fetcher.
    #[arg(long)]
    profile: Option<PathBuf>,
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    rule: Option<GreetingRule>,
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,
    /// Render time (RFC 3339). Defaults to now.
    #[arg(long)]
    at: Option<DateTime<Utc>>,
    /// Seed the state container with the profile before mounting.
    #[arg(long)]
    cached: bool,
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,
    #[arg(long)]
    json: bool,
}

// flags win over the settings file and APP__* variables
fn apply_cli_overrides(settings: &mut Settings, args: &Args) {
    if let Some(locale) = &args.locale {
        settings.locale = locale.clone();
    }
    if let Some(rule) = args.rule {
        settings.greeting_rule = rule;
    }
    if let Some(minutes) = args.utc_offset_minutes {
        settings.utc_offset_minutes = minutes;
    }
    if let Some(profile) = &args.profile {
        settings.profile_path = Some(profile.clone());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    apply_cli_overrides(&mut settings, &args);

    let container = StateContainer::new(settings.locale());
    let fetcher: Arc<dyn DashboardFetcher> = match &settings.profile_path {
        Some(path) => {
            let fetcher = StaticFetcher::from_json_file(path)?
                .with_latency(Duration::from_millis(args.latency_ms));
            if args.cached {
                container.seed(&settings.namespace, fetcher.profile());
            }
            Arc::new(fetcher)
        }
        None => {
            warn!("no profile fixture configured; every field will stay empty");
            Arc::new(MissingFetcher)
        }
    };

    let options = PanelOptions {
        namespace: settings.namespace.clone(),
        rule: settings.greeting_rule,
        utc_offset: settings.utc_offset()?,
    };
    let mut panel = GreetingPanel::mount(
        &container,
        fetcher,
        Arc::new(settings.catalog()),
        options,
    )
    .context("failed to mount greeting panel")?;

    panel.settled().await;
    let view = panel.render(args.at.unwrap_or_else(Utc::now));
    info!(
        locale = %settings.locale(),
        period = ?view.period,
        fetched = panel.hydration().requested.len(),
        "rendered greeting header"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{view}");
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
