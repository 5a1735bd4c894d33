//! Backtest engine: replays the full price history through the signal
//! state machine, trading all-in / all-out on fired signals.
//!
//! Per day, in order:
//! 1. dividend handling for a held position (no ledger entry)
//! 2. signal evaluation once the RSI warm-up is satisfied
//! 3. equity snapshot at the close

use super::error::WatchError;
use super::portfolio::{DividendMode, EquityCurvePoint, Portfolio};
use super::position::{Holding, Trade};
use super::price::PricePoint;
use super::rsi::{compute_rsi, DEFAULT_PERIOD};
use super::signal::{evaluate, MonitorState, Signal, Thresholds};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub thresholds: Thresholds,
    pub period: usize,
    pub initial_capital: f64,
    pub dividend_mode: DividendMode,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            period: DEFAULT_PERIOD,
            initial_capital: 1.0,
            dividend_mode: DividendMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub ledger: Vec<Trade>,
    pub curve: Vec<EquityCurvePoint>,
    pub final_holding: Holding,
    pub final_shares: f64,
}

pub fn run_backtest(
    prices: &[PricePoint],
    config: &BacktestConfig,
) -> Result<BacktestResult, WatchError> {
    if !config.initial_capital.is_finite() || config.initial_capital <= 0.0 {
        return Err(WatchError::config_invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }

    let rsi = compute_rsi(prices, config.period)?;
    // rsi[i] belongs to prices[i + period]
    let offset = prices.len() - rsi.len();

    let mut portfolio = Portfolio::new(config.initial_capital);
    let mut state = MonitorState::default();

    for (i, day) in prices.iter().enumerate() {
        if day.pays_dividend() {
            portfolio.receive_dividend(day.dividend, day.close, config.dividend_mode);
        }

        if let Some(point) = i.checked_sub(offset).map(|j| &rsi[j]) {
            let (next, signal) = evaluate(point, &state, &config.thresholds);
            state = next;
            match signal {
                Signal::Buy => {
                    portfolio.buy(day.date, day.close);
                }
                Signal::Sell => {
                    portfolio.sell(day.date, day.close);
                }
                Signal::None => {}
            }
        }

        portfolio.record_equity(day.date, day.close);
    }

    tracing::debug!(
        days = prices.len(),
        trades = portfolio.ledger.len(),
        "backtest complete"
    );

    Ok(BacktestResult {
        ledger: portfolio.ledger,
        curve: portfolio.equity_curve,
        final_holding: portfolio.position.holding,
        final_shares: portfolio.position.shares,
    })
}
