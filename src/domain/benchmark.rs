//! Buy-and-hold benchmarks and compound annualized returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::WatchError;
use super::portfolio::EquityCurvePoint;
use super::price::{calendar_span, PricePoint};

pub const STRATEGY_NAME: &str = "strategy";
const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub name: String,
    pub total_return: f64,
    pub annualized_return: f64,
    pub includes_dividends: bool,
}

/// `(1 + total_return)^(365 / days) - 1`. `days` must be positive.
pub fn annualize(total_return: f64, days: i64) -> Result<f64, WatchError> {
    if days <= 0 {
        return Err(WatchError::InvalidRange { days });
    }
    Ok((1.0 + total_return).powf(DAYS_PER_YEAR / days as f64) - 1.0)
}

/// Price-only buy-and-hold return; the dividend column is ignored.
pub fn price_return(series: &[PricePoint]) -> Result<f64, WatchError> {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => Ok(last.close / first.close - 1.0),
        _ => Err(WatchError::InvalidRange {
            days: calendar_span(series),
        }),
    }
}

/// Buy-and-hold return with every dividend reinvested at that day's close,
/// LONG from the first day onwards.
pub fn total_return(series: &[PricePoint]) -> Result<f64, WatchError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => (first, last),
        _ => {
            return Err(WatchError::InvalidRange {
                days: calendar_span(series),
            });
        }
    };

    let mut shares = 1.0 / first.close;
    for day in series.iter().filter(|d| d.pays_dividend()) {
        shares += shares * day.dividend / day.close;
    }
    Ok(shares * last.close - 1.0)
}

pub fn curve_return(curve: &[EquityCurvePoint]) -> Result<(f64, i64), WatchError> {
    match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => {
            let days = (last.date - first.date).num_days();
            if days <= 0 {
                return Err(WatchError::InvalidRange { days });
            }
            Ok((last.portfolio_value / first.portfolio_value - 1.0, days))
        }
        _ => Err(WatchError::InvalidRange { days: 0 }),
    }
}

/// Strategy row followed by a price-only and a total-return row per benchmark.
///
/// Benchmarks are independent columns: each is annualized over its own span.
pub fn compare(
    strategy_curve: &[EquityCurvePoint],
    benchmarks: &BTreeMap<String, Vec<PricePoint>>,
) -> Result<Vec<BenchmarkResult>, WatchError> {
    if benchmarks.contains_key(STRATEGY_NAME) {
        return Err(WatchError::config_invalid(
            "backtest",
            "benchmarks",
            format!("{STRATEGY_NAME:?} is reserved for the strategy row"),
        ));
    }

    let (strategy_total, strategy_days) = curve_return(strategy_curve)?;
    let mut results = vec![BenchmarkResult {
        name: STRATEGY_NAME.to_string(),
        total_return: strategy_total,
        annualized_return: annualize(strategy_total, strategy_days)?,
        includes_dividends: true,
    }];

    for (name, series) in benchmarks {
        let days = calendar_span(series);

        let price_only = price_return(series)?;
        results.push(BenchmarkResult {
            name: name.clone(),
            total_return: price_only,
            annualized_return: annualize(price_only, days)?,
            includes_dividends: false,
        });

        let full = total_return(series)?;
        results.push(BenchmarkResult {
            name: format!("{name} (total return)"),
            total_return: full,
            annualized_return: annualize(full, days)?,
            includes_dividends: true,
        });
    }

    Ok(results)
}
