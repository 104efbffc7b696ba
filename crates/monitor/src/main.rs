use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shm_core::health::HealthStatus;
use shm_monitor::config::MonitorConfig;
use shm_monitor::{dataset, output};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing (stderr, so stdout carries only the report) ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shm_monitor=info,shm_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = MonitorConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        dataset = %config.dataset_path.display(),
        project_id = ?config.project_id,
        asset_id = ?config.asset_id,
        "Loaded monitor configuration"
    );

    // --- Dataset ---
    let data = dataset::load_dataset(&config.dataset_path)
        .with_context(|| format!("Failed to load {}", config.dataset_path.display()))?;
    if data.quarantined > 0 {
        tracing::warn!(count = data.quarantined, "Readings quarantined during load");
    }

    // --- Evaluation ---
    let reports = data.evaluate(config.project_id.as_deref(), config.asset_id.as_deref())?;
    for report in &reports {
        if report.band_status >= HealthStatus::Warning {
            tracing::warn!(
                asset_id = %report.asset_id,
                shi = report.shi,
                band = report.band_status.as_str(),
                "Asset requires attention"
            );
        }
    }
    tracing::info!(assets = reports.len(), "Evaluation complete");

    println!("{}", output::render(&reports, config.output)?);
    Ok(())
}
