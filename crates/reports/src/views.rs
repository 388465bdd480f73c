//! Materialized reporting views.
//!
//! Both views are built from one warehouse snapshot and cached by warehouse
//! version and as-of date. Any table load bumps the version, so the next read
//! recomputes everything.

use chrono::NaiveDate;
use loader::{Warehouse, WarehouseSnapshot};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, info};

use crate::customer::{build_customer_report, CustomerReport};
use crate::product::{build_product_report, ProductReport};
use crate::star::StarSchema;

/// `report_customers` and `report_products` for one warehouse version.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSet {
    pub version: u64,
    pub as_of: NaiveDate,
    pub customers: Vec<CustomerReport>,
    pub products: Vec<ProductReport>,
}

impl ReportSet {
    /// Build both views from a snapshot.
    pub fn build(snapshot: &WarehouseSnapshot, as_of: NaiveDate) -> Self {
        let start = Instant::now();
        let star = StarSchema::from_snapshot(snapshot);

        let customers = build_customer_report(&star, as_of);
        let products = build_product_report(&star, as_of);

        metrics()
            .report_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        metrics().customer_report_rows.set(customers.len() as u64);
        metrics().product_report_rows.set(products.len() as u64);

        info!(
            version = snapshot.version,
            %as_of,
            customers = customers.len(),
            products = products.len(),
            "Built report views"
        );

        Self {
            version: snapshot.version,
            as_of,
            customers,
            products,
        }
    }
}

/// Version-keyed cache of the report views.
#[derive(Debug, Default)]
pub struct ReportViews {
    cached: RwLock<Option<Arc<ReportSet>>>,
}

impl ReportViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports for the warehouse's current version, computed on a miss.
    pub fn get(&self, warehouse: &Warehouse, as_of: NaiveDate) -> Arc<ReportSet> {
        let snapshot = warehouse.snapshot();

        if let Some(hit) = self.lookup(snapshot.version, as_of) {
            metrics().report_cache_hits.inc();
            debug!(version = snapshot.version, "Report cache hit");
            return hit;
        }

        metrics().report_cache_misses.inc();
        let built = Arc::new(ReportSet::build(&snapshot, as_of));

        let mut cached = self.cached.write();
        // Keep a newer entry if another reader won the race
        match cached.as_ref() {
            Some(existing) if existing.version > built.version => {}
            _ => *cached = Some(built.clone()),
        }
        built
    }

    fn lookup(&self, version: u64, as_of: NaiveDate) -> Option<Arc<ReportSet>> {
        self.cached
            .read()
            .as_ref()
            .filter(|set| set.version == version && set.as_of == as_of)
            .cloned()
    }

    /// Version of the cached reports, if any.
    pub fn cached_version(&self) -> Option<u64> {
        self.cached.read().as_ref().map(|set| set.version)
    }
}
