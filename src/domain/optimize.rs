//! Parameter sweep over RSI period and threshold pairs.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::backtest::{run_backtest, BacktestConfig};
use super::error::WatchError;
use super::metrics::PerformanceSummary;
use super::portfolio::DividendMode;
use super::price::PricePoint;
use super::signal::Thresholds;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid {
    pub periods: RangeInclusive<usize>,
    pub buy_thresholds: RangeInclusive<u32>,
    pub sell_thresholds: RangeInclusive<u32>,
    pub threshold_step: usize,
    pub initial_capital: f64,
    pub dividend_mode: DividendMode,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            periods: 3..=20,
            buy_thresholds: 20..=50,
            sell_thresholds: 60..=90,
            threshold_step: 2,
            initial_capital: 1.0,
            dividend_mode: DividendMode::default(),
        }
    }
}

impl SweepGrid {
    /// Every `(period, buy, sell)` with `buy < sell`.
    pub fn combinations(&self) -> Vec<(usize, u32, u32)> {
        let step = self.threshold_step.max(1);
        let mut combos = Vec::new();
        for period in self.periods.clone() {
            for buy in self.buy_thresholds.clone().step_by(step) {
                for sell in self.sell_thresholds.clone().step_by(step) {
                    if buy < sell {
                        combos.push((period, buy, sell));
                    }
                }
            }
        }
        combos
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    pub period: usize,
    pub buy_threshold: u32,
    pub sell_threshold: u32,
    #[serde(flatten)]
    pub summary: PerformanceSummary,
}

/// Runs every grid combination; results sorted by total return, best first.
///
/// Combinations whose period needs more history than available are skipped.
/// Any other failure aborts the sweep.
pub fn sweep(prices: &[PricePoint], grid: &SweepGrid) -> Result<Vec<SweepResult>, WatchError> {
    let combos = grid.combinations();
    let mut results = Vec::with_capacity(combos.len());

    for (period, buy, sell) in combos {
        let config = BacktestConfig {
            thresholds: Thresholds::new(f64::from(buy), f64::from(sell))?,
            period,
            initial_capital: grid.initial_capital,
            dividend_mode: grid.dividend_mode,
        };
        let result = match run_backtest(prices, &config) {
            Ok(r) => r,
            Err(WatchError::InsufficientData { points, minimum }) => {
                tracing::debug!(period, points, minimum, "skipping combination");
                continue;
            }
            Err(e) => return Err(e),
        };
        results.push(SweepResult {
            period,
            buy_threshold: buy,
            sell_threshold: sell,
            summary: PerformanceSummary::compute(&result)?,
        });
    }

    results.sort_by(|a, b| b.summary.total_return.total_cmp(&a.summary.total_return));
    Ok(results)
}
