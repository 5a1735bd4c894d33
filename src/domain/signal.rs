//! Threshold signal state machine.
//!
//! A signal fires only on the edge into a breach band, so a breach that lasts
//! many days (or is evaluated many times in one day) yields one alert.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::WatchError;
use super::rsi::RsiPoint;

pub const DEFAULT_BUY_THRESHOLD: f64 = 40.0;
pub const DEFAULT_SELL_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalState {
    #[default]
    Neutral,
    Oversold,
    Overbought,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    None,
    Buy,
    Sell,
}

impl Signal {
    pub fn fired(self) -> bool {
        self != Signal::None
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::None => write!(f, "NONE"),
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalState::Neutral => write!(f, "NEUTRAL"),
            SignalState::Oversold => write!(f, "OVERSOLD"),
            SignalState::Overbought => write!(f, "OVERBOUGHT"),
        }
    }
}

/// Buy/sell RSI bands. `buy < sell` is guaranteed by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    buy: f64,
    sell: f64,
}

impl Thresholds {
    pub fn new(buy: f64, sell: f64) -> Result<Self, WatchError> {
        for (key, value) in [("buy_threshold", buy), ("sell_threshold", sell)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(WatchError::config_invalid(
                    "monitor",
                    key,
                    format!("{key} must be within 0..=100, got {value}"),
                ));
            }
        }
        if buy >= sell {
            return Err(WatchError::config_invalid(
                "monitor",
                "buy_threshold",
                format!("buy_threshold ({buy}) must be less than sell_threshold ({sell})"),
            ));
        }
        Ok(Self { buy, sell })
    }

    pub fn buy(&self) -> f64 {
        self.buy
    }

    pub fn sell(&self) -> f64 {
        self.sell
    }

    fn band(&self, value: f64) -> SignalState {
        if value < self.buy {
            SignalState::Oversold
        } else if value > self.sell {
            SignalState::Overbought
        } else {
            SignalState::Neutral
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            buy: DEFAULT_BUY_THRESHOLD,
            sell: DEFAULT_SELL_THRESHOLD,
        }
    }
}

/// Evaluator memory carried between evaluations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonitorState {
    pub last_evaluated_date: Option<NaiveDate>,
    pub last_rsi_value: Option<f64>,
    pub signal_state: SignalState,
    pub last_fired_date: Option<NaiveDate>,
}

/// Pure transition: `(prior state, current RSI) → (new state, signal)`.
///
/// Entering OVERSOLD fires BUY and entering OVERBOUGHT fires SELL, from any
/// other state. Staying in a band or returning to NEUTRAL fires nothing. If a
/// signal already fired on `current.date`, the state still moves but the
/// signal is suppressed.
pub fn evaluate(
    current: &RsiPoint,
    prior: &MonitorState,
    thresholds: &Thresholds,
) -> (MonitorState, Signal) {
    let next = thresholds.band(current.value);

    let edge = match (prior.signal_state, next) {
        (from, SignalState::Oversold) if from != SignalState::Oversold => Signal::Buy,
        (from, SignalState::Overbought) if from != SignalState::Overbought => Signal::Sell,
        _ => Signal::None,
    };

    let signal = if edge.fired() && prior.last_fired_date == Some(current.date) {
        Signal::None
    } else {
        edge
    };

    let state = MonitorState {
        last_evaluated_date: Some(current.date),
        last_rsi_value: Some(current.value),
        signal_state: next,
        last_fired_date: if signal.fired() {
            Some(current.date)
        } else {
            prior.last_fired_date
        },
    };

    (state, signal)
}
