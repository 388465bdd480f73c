//! Scheduled refresh for watch mode.

use chrono::NaiveDate;
use loader::{ExportConfig, LoadConfig, Warehouse};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};
use warehouse_core::{Error, Result};

use crate::refresh::{refresh_once, RefreshSummary};
use crate::views::ReportViews;

/// Refresh scheduler configuration.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub load: LoadConfig,
    pub export: ExportConfig,
    /// Time between refreshes; the first runs immediately
    pub interval: Duration,
    /// Fixed as-of date; today at each tick when unset
    pub as_of: Option<NaiveDate>,
}

/// Re-runs the load and report cycle on a fixed interval until shut down.
pub struct RefreshScheduler {
    config: RefreshConfig,
    warehouse: Arc<Warehouse>,
    views: Arc<ReportViews>,
    shutdown: watch::Sender<bool>,
}

impl RefreshScheduler {
    pub fn new(config: RefreshConfig, warehouse: Arc<Warehouse>, views: Arc<ReportViews>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            warehouse,
            views,
            shutdown,
        }
    }

    /// Starts the refresh loop.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let scheduler = self.clone();
        let handle = tokio::spawn(async move {
            scheduler.run().await;
        });
        info!(interval_secs = self.config.interval.as_secs(), "Refresh scheduler started");
        handle
    }

    /// Stops the loop after any in-flight refresh finishes.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    async fn run(&self) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stop = self.shutdown.subscribe();

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stop.changed() => break,
            }
            if *stop.borrow() {
                break;
            }

            match self.refresh().await {
                Ok(summary) if summary.is_failed() => {
                    error!(run_id = %summary.run_id, "Refresh loaded no tables");
                }
                Ok(_) => {}
                Err(e) => error!("Refresh error: {}", e),
            }
        }

        info!("Refresh scheduler stopped");
    }

    /// Run one refresh on the blocking pool.
    pub async fn refresh(&self) -> Result<RefreshSummary> {
        let warehouse = self.warehouse.clone();
        let views = self.views.clone();
        let config = self.config.clone();
        let as_of = config
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        tokio::task::spawn_blocking(move || {
            refresh_once(&warehouse, &views, &config.load, &config.export, as_of)
        })
        .await
        .map_err(|e| Error::internal(format!("refresh task failed: {}", e)))?
    }
}
