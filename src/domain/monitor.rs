//! Live-monitoring pass: latest RSI → signal → persisted state → notification.
//!
//! The stored document is replaced before the notifier runs, so a crash can
//! lose an alert but never send one twice for the same fired signal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::WatchError;
use super::price::PricePoint;
use super::rsi::{compute_rsi, minimum_points, DEFAULT_PERIOD};
use super::signal::{evaluate, MonitorState, Signal, SignalState, Thresholds};
use crate::ports::notify_port::SignalNotifier;
use crate::ports::state_port::StatePort;

pub const DOCUMENT_VERSION: u32 = 1;

/// Persisted monitor state as read by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorDocument {
    pub version: u32,
    pub date: NaiveDate,
    pub price: f64,
    pub rsi: f64,
    pub signal_state: SignalState,
    pub last_fired_date: Option<NaiveDate>,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

impl MonitorDocument {
    pub fn to_state(&self) -> Result<MonitorState, WatchError> {
        if self.version != DOCUMENT_VERSION {
            return Err(WatchError::StatePersist {
                path: String::new(),
                reason: format!(
                    "unsupported document version {} (expected {})",
                    self.version, DOCUMENT_VERSION
                ),
            });
        }
        Ok(MonitorState {
            last_evaluated_date: Some(self.date),
            last_rsi_value: Some(self.rsi),
            signal_state: self.signal_state,
            last_fired_date: self.last_fired_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub symbol: String,
    pub thresholds: Thresholds,
    pub period: usize,
    /// Trailing prices fed to the RSI engine; 0 uses the whole series.
    pub lookback: usize,
}

impl MonitorConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            thresholds: Thresholds::default(),
            period: DEFAULT_PERIOD,
            lookback: 0,
        }
    }
}

/// Passed to the notifier with every fired signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalContext {
    pub symbol: String,
    pub date: NaiveDate,
    pub price: f64,
    pub rsi: f64,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOutcome {
    pub document: MonitorDocument,
    pub signal: Signal,
}

fn window<'a>(
    prices: &'a [PricePoint],
    config: &MonitorConfig,
) -> Result<&'a [PricePoint], WatchError> {
    if config.lookback == 0 {
        return Ok(prices);
    }
    if config.lookback < minimum_points(config.period) {
        return Err(WatchError::config_invalid(
            "monitor",
            "lookback",
            format!(
                "lookback {} is shorter than period + 1 ({})",
                config.lookback,
                minimum_points(config.period)
            ),
        ));
    }
    Ok(&prices[prices.len().saturating_sub(config.lookback)..])
}

pub fn run_monitor(
    prices: &[PricePoint],
    config: &MonitorConfig,
    store: &dyn StatePort,
    notifier: &dyn SignalNotifier,
) -> Result<MonitorOutcome, WatchError> {
    let prices = window(prices, config)?;
    let rsi = compute_rsi(prices, config.period)?;
    let (Some(current), Some(latest)) = (rsi.last(), prices.last()) else {
        return Err(WatchError::InsufficientData {
            points: prices.len(),
            minimum: minimum_points(config.period),
        });
    };

    let prior = match store.load()? {
        Some(doc) => {
            if doc.buy_threshold != config.thresholds.buy()
                || doc.sell_threshold != config.thresholds.sell()
            {
                tracing::info!(
                    stored_buy = doc.buy_threshold,
                    stored_sell = doc.sell_threshold,
                    "thresholds changed since last run"
                );
            }
            let state = doc.to_state()?;
            if doc.date > current.date {
                tracing::warn!(
                    stored = %doc.date,
                    latest = %current.date,
                    "stored state is newer than price data, skipping run"
                );
                return Ok(MonitorOutcome {
                    document: doc,
                    signal: Signal::None,
                });
            }
            state
        }
        None => {
            tracing::info!("no stored monitor state, starting NEUTRAL");
            MonitorState::default()
        }
    };

    let (state, signal) = evaluate(current, &prior, &config.thresholds);
    tracing::info!(
        symbol = %config.symbol,
        date = %current.date,
        rsi = current.value,
        state = %state.signal_state,
        signal = %signal,
        "evaluated"
    );

    let document = MonitorDocument {
        version: DOCUMENT_VERSION,
        date: current.date,
        price: latest.close,
        rsi: current.value,
        signal_state: state.signal_state,
        last_fired_date: state.last_fired_date,
        buy_threshold: config.thresholds.buy(),
        sell_threshold: config.thresholds.sell(),
    };
    store.replace(&document)?;

    if signal.fired() {
        let context = SignalContext {
            symbol: config.symbol.clone(),
            date: current.date,
            price: latest.close,
            rsi: current.value,
            buy_threshold: config.thresholds.buy(),
            sell_threshold: config.thresholds.sell(),
        };
        notifier.on_signal(signal, &context)?;
    }

    Ok(MonitorOutcome { document, signal })
}
