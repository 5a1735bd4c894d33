//! Daily price records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::WatchError;

/// One trading day for the tracked security.
///
/// `dividend` is the cash distribution per share paid on `date` (0 on most days).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default)]
    pub dividend: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            dividend: 0.0,
        }
    }

    pub fn with_dividend(mut self, dividend: f64) -> Self {
        self.dividend = dividend;
        self
    }

    pub fn pays_dividend(&self) -> bool {
        self.dividend > 0.0
    }
}

/// Rejects the whole batch on the first bad record.
///
/// Dates must be strictly increasing, closes finite and positive, dividends
/// finite and non-negative.
pub fn validate_series(prices: &[PricePoint]) -> Result<(), WatchError> {
    let mut prev: Option<NaiveDate> = None;

    for (index, point) in prices.iter().enumerate() {
        if !point.close.is_finite() || point.close <= 0.0 {
            return Err(WatchError::MalformedRecord {
                index,
                reason: format!("close must be positive, got {}", point.close),
            });
        }
        if !point.dividend.is_finite() || point.dividend < 0.0 {
            return Err(WatchError::MalformedRecord {
                index,
                reason: format!("dividend must be non-negative, got {}", point.dividend),
            });
        }
        if let Some(prev_date) = prev {
            if point.date <= prev_date {
                return Err(WatchError::MalformedRecord {
                    index,
                    reason: format!(
                        "date {} does not follow {} (duplicate or out of order)",
                        point.date, prev_date
                    ),
                });
            }
        }
        prev = Some(point.date);
    }

    Ok(())
}

/// Calendar days between the first and last point (0 for fewer than two points).
pub fn calendar_span(prices: &[PricePoint]) -> i64 {
    match (prices.first(), prices.last()) {
        (Some(first), Some(last)) => (last.date - first.date).num_days(),
        _ => 0,
    }
}
