//! RSI (Relative Strength Index) engine.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, or 50 when avg_gain is also 0 (no movement).
//!
//! Warmup: the first n prices produce no output, so the result is aligned
//! date-for-date with `prices[n..]`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::WatchError;
use super::price::{validate_series, PricePoint};

pub const DEFAULT_PERIOD: usize = 14;
/// Largest period accepted from configuration.
pub const MAX_PERIOD: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Smallest number of prices that yields one RSI value for `period`.
pub fn minimum_points(period: usize) -> usize {
    period.saturating_add(1)
}

pub fn compute_rsi(prices: &[PricePoint], period: usize) -> Result<Vec<RsiPoint>, WatchError> {
    if period == 0 {
        return Err(WatchError::config_invalid(
            "monitor",
            "period",
            "period must be positive",
        ));
    }
    validate_series(prices)?;
    if prices.len() < minimum_points(period) {
        return Err(WatchError::InsufficientData {
            points: prices.len(),
            minimum: minimum_points(period),
        });
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;

    let mut values = Vec::with_capacity(prices.len() - period);
    values.push(RsiPoint {
        date: prices[period].date,
        value: rsi_from_averages(avg_gain, avg_loss),
    });

    // gains[i] is the change into prices[i + 1]
    for i in period..gains.len() {
        avg_gain = (avg_gain * (n - 1.0) + gains[i]) / n;
        avg_loss = (avg_loss * (n - 1.0) + losses[i]) / n;
        values.push(RsiPoint {
            date: prices[i + 1].date,
            value: rsi_from_averages(avg_gain, avg_loss),
        });
    }

    Ok(values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
        rsi.clamp(0.0, 100.0)
    }
}
