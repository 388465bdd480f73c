//! Report export.
//!
//! Files are written next to their final path and renamed into place, so a
//! reader polling the output directory never sees a partial report.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, error};
use warehouse_core::error::ExportErrorCode;
use warehouse_core::{Error, Result};

use crate::config::{ExportConfig, OutputFormat};

/// A report row. `COLUMNS` lists the serialized field names in order and is
/// the CSV header, written even when the report has no rows.
pub trait ReportRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

/// Write `rows` as `<output_dir>/<name>.<ext>` in the configured format.
pub fn export_rows<T: ReportRow>(config: &ExportConfig, name: &str, rows: &[T]) -> Result<PathBuf> {
    let path = config
        .output_dir
        .join(format!("{}.{}", name, config.format.extension()));

    let start = Instant::now();
    let result = match config.format {
        OutputFormat::Csv => write_csv(&path, T::COLUMNS, rows),
        OutputFormat::Json => write_json(&path, rows),
    };
    metrics()
        .export_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    match result {
        Ok(()) => {
            metrics().files_exported.inc();
            debug!(path = %path.display(), rows = rows.len(), "Exported report");
            Ok(path)
        }
        Err(e) => {
            metrics().export_failures.inc();
            error!(path = %path.display(), error = %e, "Report export failed");
            Err(e)
        }
    }
}

/// Write rows as CSV under the given header row.
pub fn write_csv<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    write_atomically(path, |file| {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(columns)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    })
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    write_atomically(path, |file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    })
}

fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let wrap = |e: &dyn std::fmt::Display| {
        Error::export(
            ExportErrorCode::WriteFailed,
            format!("{}: {}", path.display(), e),
        )
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| wrap(&e))?;
    }

    let tmp = path.with_extension("tmp");
    let file = File::create(&tmp).map_err(|e| wrap(&e))?;

    if let Err(e) = write(file) {
        let _ = fs::remove_file(&tmp);
        return Err(wrap(&e));
    }

    fs::rename(&tmp, path).map_err(|e| wrap(&e))
}
