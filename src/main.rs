use clap::Parser;
use futures::future::join_all;
use price_radar::config::{load_config, AppConfig};
use price_radar::error::AppError;
use price_radar::render::color_enabled;
use price_radar::report::{process_report, ReportState, RunSettings};
use price_radar::source::source_for;
use std::path::PathBuf;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compares your prices against competitors and flags overpriced products")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, value_name = "PATH", default_value = "config.json")]
    config: PathBuf,

    /// Re-check every report on the configured interval until Ctrl-C
    #[arg(short, long)]
    watch: bool,

    /// Skip CSV export for every report
    #[arg(long)]
    no_export: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config load error ({}): {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = RunSettings {
        export_dir: PathBuf::from(&config.export_dir),
        export_enabled: !cli.no_export,
        color: color_enabled(config.color),
    };

    let mut states = build_states(&config);
    if states.is_empty() {
        error!("No usable reports configured.");
        std::process::exit(1);
    }
    info!("🚀 price-radar started with {} report(s)", states.len());

    loop {
        run_all(&mut states, &settings).await;

        if !cli.watch {
            break;
        }

        info!("Waiting {}s before the next check...", config.check_interval_seconds);
        tokio::select! {
            _ = sleep(Duration::from_secs(config.check_interval_seconds)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("🛑 Interrupted, shutting down.");
                break;
            }
        }
    }
}

fn build_states(config: &AppConfig) -> Vec<ReportState> {
    config
        .reports
        .iter()
        .filter_map(|report| match source_for(&report.source) {
            Ok(source) => Some(ReportState::new(report.clone(), source)),
            Err(e) => {
                warn!("⚠️ [{}] Cannot set up source {}: {}", report.name, report.source, e);
                None
            }
        })
        .collect()
}

/// Processes every report concurrently. Failures are reported per report and never
/// stop the others.
async fn run_all(states: &mut [ReportState], settings: &RunSettings) {
    let tasks = states.iter_mut().map(|state| async move {
        let name = state.report.name.clone();
        (name, process_report(state, settings).await)
    });

    for (name, result) in join_all(tasks).await {
        match result {
            Ok(Some(run)) => {
                println!("{}", run.rendered);
                if let Some(path) = run.export_path {
                    println!("📥 Exported: {}\n", path.display());
                }
            }
            Ok(None) => {}
            Err(AppError::Config(e)) => warn!("⚠️ [{}] {}; table withheld until corrected", name, e),
            Err(e) => warn!("❌ [{}] {}", name, e),
        }
    }
}
