//! Dashboard refresh daemon.
//!
//! Wires the refresh engine to the backend aggregation endpoint and mirrors
//! every refreshed resource into a JSON snapshot directory that the
//! presentation layer serves from. SIGHUP requests an out-of-band refresh;
//! Ctrl-C shuts down between cycles.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{error, info};

use lib_dash::backend::{BackendSource, DashboardApi, HttpStatusProbe};
use lib_dash::configs::Settings;
use lib_dash::engine::connectivity::ConnectivityMonitor;
use lib_dash::engine::resource::ResourceValue;
use lib_dash::engine::scheduler::{RefreshScheduler, RenderSink};
use lib_dash::loggers::setup_logging;
use lib_dash::retrieve::api_http::ApiClientOptions;

// load .env files before anything else
use static_init::dynamic;

#[dynamic]
static DOTENV_INIT: () = {
    // Set up environment variables
    dotenvy::dotenv().ok();
};

/// Render sink that writes one JSON snapshot file per resource, plus a
/// connectivity marker. Stands in for the DOM: per-resource writes may fail
/// without affecting the rest of the cycle.
struct SnapshotSink {
    state_dir: PathBuf,
}

impl SnapshotSink {
    fn new(state_dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&state_dir)?;
        Ok(Self { state_dir })
    }
}

impl RenderSink for SnapshotSink {
    fn render(&mut self, value: &ResourceValue) -> Result<()> {
        let path = self.state_dir.join(format!("{}.json", value.resource.key()));
        fs::write(path, serde_json::to_vec_pretty(value)?)?;
        Ok(())
    }

    fn render_connectivity(&mut self, online: bool) -> Result<()> {
        let path = self.state_dir.join("connectivity.json");
        fs::write(path, serde_json::json!({ "online": online }).to_string())?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = match setup_logging("dashd") {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(?settings, "starting dashboard refresh daemon");

    let options = ApiClientOptions {
        timeout: settings.fetch_timeout,
        ..Default::default()
    };
    let api = DashboardApi::new(&settings.api_base_url, Some(options))?;
    let source = BackendSource::new(api, settings.cache_ttl);
    let probe = HttpStatusProbe::new(&settings.api_base_url, settings.fetch_timeout)?;
    let monitor = ConnectivityMonitor::new(probe, settings.max_retries);
    let sink = SnapshotSink::new(settings.state_dir.clone())?;

    let scheduler = RefreshScheduler::new(
        source,
        sink,
        monitor,
        settings.update_interval,
        settings.fetch_timeout,
    );
    let handle = scheduler.handle();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // SIGHUP maps to the manual-refresh trigger.
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let refresh = handle.clone();
        tokio::spawn(async move {
            let Ok(mut hup) = signal(SignalKind::hangup()) else {
                return;
            };
            while hup.recv().await.is_some() {
                info!("SIGHUP received, requesting manual refresh");
                refresh.refresh_now();
            }
        });
    }

    let engine = tokio::spawn(scheduler.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested, stopping scheduler");
    let _ = shutdown_tx.send(());
    let _ = engine.await;
    Ok(())
}
