//! Backtest report document consumed by the reporting page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::backtest::{BacktestConfig, BacktestResult};
use super::benchmark::BenchmarkResult;
use super::metrics::PerformanceSummary;
use super::portfolio::{DividendMode, EquityCurvePoint};
use super::position::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub symbol: String,
    pub period: usize,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    pub initial_capital: f64,
    pub dividend_mode: DividendMode,
    pub summary: PerformanceSummary,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityCurvePoint>,
    pub benchmarks: BTreeMap<String, BenchmarkResult>,
}

impl BacktestReport {
    pub fn new(
        symbol: &str,
        config: &BacktestConfig,
        result: BacktestResult,
        summary: PerformanceSummary,
        benchmarks: Vec<BenchmarkResult>,
    ) -> Self {
        BacktestReport {
            symbol: symbol.to_string(),
            period: config.period,
            buy_threshold: config.thresholds.buy(),
            sell_threshold: config.thresholds.sell(),
            initial_capital: config.initial_capital,
            dividend_mode: config.dividend_mode,
            summary,
            trades: result.ledger,
            equity_curve: result.curve,
            benchmarks: benchmarks
                .into_iter()
                .map(|b| (b.name.clone(), b))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::{Holding, TradeAction};
    use chrono::NaiveDate;

    fn sample_report() -> BacktestReport {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let result = BacktestResult {
            ledger: vec![Trade {
                date,
                action: TradeAction::Buy,
                price: 1.0,
                shares: 1.0,
                notional_after: 1.0,
            }],
            curve: vec![EquityCurvePoint {
                date,
                portfolio_value: 1.0,
            }],
            final_holding: Holding::Long,
            final_shares: 1.0,
        };
        let summary = PerformanceSummary {
            total_return: 0.0,
            annualized_return: 0.0,
            max_drawdown: 0.0,
            round_trips: 1,
            win_rate: 0.0,
            final_holding: Holding::Long,
        };
        let benchmarks = vec![
            BenchmarkResult {
                name: "strategy".into(),
                total_return: 0.1,
                annualized_return: 0.1,
                includes_dividends: true,
            },
            BenchmarkResult {
                name: "CSI300".into(),
                total_return: 0.05,
                annualized_return: 0.05,
                includes_dividends: false,
            },
        ];
        BacktestReport::new("512890", &BacktestConfig::default(), result, summary, benchmarks)
    }

    #[test]
    fn benchmarks_keyed_by_name() {
        let report = sample_report();
        assert_eq!(report.benchmarks.len(), 2);
        assert!(report.benchmarks["CSI300"].total_return > 0.0);
        assert!(report.benchmarks.contains_key("strategy"));
    }

    #[test]
    fn carries_config() {
        let report = sample_report();
        assert_eq!(report.period, 14);
        assert_eq!(report.buy_threshold, 40.0);
        assert_eq!(report.sell_threshold, 70.0);
        assert_eq!(report.dividend_mode, DividendMode::Reinvest);
    }

    #[test]
    fn json_shape() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(value["dividendMode"], "reinvest");
        assert_eq!(value["trades"][0]["action"], "BUY");
        assert_eq!(value["equityCurve"][0]["portfolioValue"], 1.0);
        assert_eq!(value["benchmarks"]["CSI300"]["includesDividends"], false);
        assert_eq!(value["summary"]["finalHolding"], "LONG");
    }
}
