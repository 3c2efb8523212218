// File: crates/dashboard-demo/src/main.rs
// Summary: Demo loads a chart payload, renders it headlessly and runs every export action into target/out.

mod fs_host;
mod raster;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dashboard_core::{ChartPayload, Dashboard, ExportAction, SessionConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::fs_host::FsHost;
use crate::raster::RasterEngine;

const SAMPLE_PAYLOAD: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/charts.json");

fn main() -> Result<()> {
    init_tracing();

    // Payload path from CLI or the bundled sample; optional session config JSON second.
    let mut args = std::env::args().skip(1);
    let payload_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(SAMPLE_PAYLOAD));
    let config = match args.next() {
        Some(path) => load_config(&path)?,
        None => SessionConfig::default(),
    };
    println!("Using payload: {}", payload_path.display());
    println!(
        "Number format: {} (1234567.8 -> {})",
        config.number_format.name,
        config.number_format.format(1_234_567.8, 1)
    );

    let payload = ChartPayload::load(&payload_path)?;
    let total = payload.plotly.len() + payload.highcharts.len();

    let mut dashboard = Dashboard::new(config);
    let mut plots = RasterEngine::default();
    let mut options = RasterEngine::default();
    let drawn = dashboard.render(&payload, &mut plots, &mut options);
    println!(
        "Rendered {drawn} of {total} charts ({} trace, {} options)",
        plots.drawn, options.drawn
    );
    if dashboard.is_empty() {
        anyhow::bail!("no charts rendered from {}", payload_path.display());
    }

    let mut host = FsHost::new("target/out")?;
    let targets: Vec<String> = dashboard.target_ids().map(str::to_string).collect();
    for target in &targets {
        for action in ExportAction::ALL {
            dashboard.export(target, action, &mut host);
        }
        println!("Exported {target}");
    }

    let ran = host.run_pending();
    println!("Ran {ran} deferred tasks; {} object urls still live", host.live_urls());
    if let Some(target) = &host.fullscreen {
        println!("Last fullscreen target: {target}");
    }
    for path in &host.written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn load_config(path: &str) -> Result<SessionConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
