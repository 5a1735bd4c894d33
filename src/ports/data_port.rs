//! Price series source port.

use crate::domain::error::WatchError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily records for `symbol` within `[start_date, end_date]`, in source order.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, WatchError>;
}
