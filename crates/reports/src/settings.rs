//! Report run settings.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;
use warehouse_core::error::ConfigErrorCode;
use warehouse_core::{Error, Result};

use crate::analytics::AnalyticsOptions;
use crate::trends::TimeGrain;

/// Settings for report, analytics, and watch runs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportSettings {
    /// Rows kept by the top-N / bottom-N rankings
    #[serde(default = "default_top_n")]
    #[validate(range(min = 1, max = 1000))]
    pub top_n: usize,
    /// Bucket size for the time-series analytics
    #[serde(default)]
    pub grain: TimeGrain,
    /// Fixed "as of" date; today when unset
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Seconds between refreshes in watch mode
    #[serde(default = "default_refresh_interval_secs")]
    #[validate(range(min = 1, max = 86400))]
    pub refresh_interval_secs: u64,
}

fn default_top_n() -> usize {
    5
}

fn default_refresh_interval_secs() -> u64 {
    300 // 5 minutes
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            grain: TimeGrain::default(),
            as_of: None,
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl ReportSettings {
    /// Validate ranges, mapping failures to `CONFIG_001`.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| Error::config(ConfigErrorCode::Invalid, e.to_string()))
    }

    /// The configured as-of date, or today's local date.
    pub fn as_of_or_today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn analytics_options(&self) -> AnalyticsOptions {
        AnalyticsOptions {
            grain: self.grain,
            top_n: self.top_n,
        }
    }
}
