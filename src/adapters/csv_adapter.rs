//! CSV file price adapter.
//!
//! One file per symbol, `<base>/<symbol>.csv`, with a `date,close` header and
//! an optional third `dividend` column (cash per share, blank or absent = 0).

use crate::domain::error::WatchError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

fn malformed(index: usize, reason: impl Into<String>) -> WatchError {
    WatchError::MalformedRecord {
        index,
        reason: reason.into(),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, WatchError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| WatchError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| WatchError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record
                .get(0)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| malformed(index, "missing date"))?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| malformed(index, format!("invalid date {date_str:?}: {e}")))?;

            if date < start_date || date > end_date {
                continue;
            }

            let close: f64 = record
                .get(1)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| malformed(index, "missing close"))?
                .parse()
                .map_err(|e| malformed(index, format!("invalid close value: {e}")))?;

            let dividend: f64 = match record.get(2).filter(|s| !s.is_empty()) {
                Some(raw) => raw
                    .parse()
                    .map_err(|e| malformed(index, format!("invalid dividend value: {e}")))?,
                None => 0.0,
            };

            points.push(PricePoint::new(date, close).with_dividend(dividend));
        }

        tracing::debug!(
            symbol,
            path = %path.display(),
            points = points.len(),
            "loaded price series"
        );
        Ok(points)
    }
}
