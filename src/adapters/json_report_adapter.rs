//! Backtest report written as a pretty-printed JSON document.

use super::atomic_file::write_json_atomic;
use crate::domain::error::WatchError;
use crate::domain::report::BacktestReport;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &str) -> Result<(), WatchError> {
        write_json_atomic(Path::new(output_path), report).map_err(|e| WatchError::Report {
            reason: format!("failed to write {output_path}: {e}"),
        })?;
        tracing::info!(
            path = output_path,
            trades = report.trades.len(),
            "backtest report written"
        );
        Ok(())
    }
}
