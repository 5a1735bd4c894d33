//! Backtest report port.

use crate::domain::error::WatchError;
use crate::domain::report::BacktestReport;

pub trait ReportPort {
    fn write(&self, report: &BacktestReport, output_path: &str) -> Result<(), WatchError>;
}
