//! Performance summary for a backtest run.

use serde::{Deserialize, Serialize};

use super::backtest::BacktestResult;
use super::benchmark::{annualize, curve_return};
use super::error::WatchError;
use super::portfolio::EquityCurvePoint;
use super::position::{Holding, Trade, TradeAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub round_trips: usize,
    pub win_rate: f64,
    pub final_holding: Holding,
}

impl PerformanceSummary {
    pub fn compute(result: &BacktestResult) -> Result<Self, WatchError> {
        let (total_return, days) = curve_return(&result.curve)?;
        Ok(PerformanceSummary {
            total_return,
            annualized_return: annualize(total_return, days)?,
            max_drawdown: compute_drawdown(&result.curve),
            round_trips: result
                .ledger
                .iter()
                .filter(|t| t.action == TradeAction::Buy)
                .count(),
            win_rate: compute_win_rate(&result.ledger),
            final_holding: result.final_holding,
        })
    }
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn compute_drawdown(curve: &[EquityCurvePoint]) -> f64 {
    let Some(first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first.portfolio_value;
    let mut max_dd = 0.0_f64;

    for point in curve {
        if point.portfolio_value > peak {
            peak = point.portfolio_value;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.portfolio_value) / peak);
        }
    }

    max_dd
}

/// Share of closed BUY→SELL pairs that sold above the entry price.
pub fn compute_win_rate(ledger: &[Trade]) -> f64 {
    let mut closed = 0usize;
    let mut wins = 0usize;

    for pair in ledger.chunks_exact(2) {
        let (entry, exit) = (&pair[0], &pair[1]);
        if entry.action != TradeAction::Buy || exit.action != TradeAction::Sell {
            continue;
        }
        closed += 1;
        if exit.price > entry.price {
            wins += 1;
        }
    }

    if closed > 0 {
        wins as f64 / closed as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn make_curve(values: &[f64]) -> Vec<EquityCurvePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EquityCurvePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                portfolio_value: v,
            })
            .collect()
    }

    fn make_trade(action: TradeAction, price: f64) -> Trade {
        Trade {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            action,
            price,
            shares: 1.0,
            notional_after: price,
        }
    }

    #[test]
    fn max_drawdown() {
        let curve = make_curve(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_abs_diff_eq!(compute_drawdown(&curve), 30.0 / 110.0, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_monotone_rise_is_zero() {
        let curve = make_curve(&[1.0, 1.1, 1.2]);
        assert_eq!(compute_drawdown(&curve), 0.0);
        assert_eq!(compute_drawdown(&[]), 0.0);
    }

    #[test]
    fn win_rate_counts_closed_pairs_only() {
        let ledger = vec![
            make_trade(TradeAction::Buy, 10.0),
            make_trade(TradeAction::Sell, 12.0),
            make_trade(TradeAction::Buy, 11.0),
            make_trade(TradeAction::Sell, 10.0),
            make_trade(TradeAction::Buy, 9.0),
        ];
        assert_abs_diff_eq!(compute_win_rate(&ledger), 0.5);
    }

    #[test]
    fn win_rate_without_trades() {
        assert_eq!(compute_win_rate(&[]), 0.0);
    }

    #[test]
    fn summary_from_result() {
        let result = BacktestResult {
            ledger: vec![
                make_trade(TradeAction::Buy, 10.0),
                make_trade(TradeAction::Sell, 12.0),
                make_trade(TradeAction::Buy, 11.0),
            ],
            curve: make_curve(&[1.0, 1.2, 1.1, 1.3]),
            final_holding: Holding::Long,
            final_shares: 0.1,
        };
        let summary = PerformanceSummary::compute(&result).unwrap();
        assert_abs_diff_eq!(summary.total_return, 0.3, epsilon = 1e-12);
        assert_eq!(summary.round_trips, 2);
        assert_abs_diff_eq!(summary.win_rate, 1.0);
        assert_eq!(summary.final_holding, Holding::Long);
        assert!(summary.max_drawdown > 0.08 && summary.max_drawdown < 0.09);
    }
}
