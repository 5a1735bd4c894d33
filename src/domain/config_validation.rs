//! Configuration validation.
//!
//! Checks every `[monitor]` and `[backtest]` field before a run starts, so a
//! bad value is reported as a config error rather than surfacing halfway
//! through a pipeline.

use crate::domain::error::WatchError;
use crate::domain::portfolio::DividendMode;
use crate::domain::benchmark::STRATEGY_NAME;
use crate::domain::rsi::{minimum_points, DEFAULT_PERIOD, MAX_PERIOD};
use crate::domain::signal::Thresholds;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_monitor_config(config: &dyn ConfigPort) -> Result<(), WatchError> {
    validate_symbol(config)?;
    read_thresholds(config, None, None)?;
    validate_period_and_lookback(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), WatchError> {
    read_initial_capital(config)?;
    read_date_range(config)?;
    read_dividend_mode(config)?;
    read_benchmarks(config)?;
    Ok(())
}

/// Reads a float, falling back to `default` when the key is absent.
/// A present but non-numeric value is an error, never the default.
pub fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, WatchError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                WatchError::config_invalid(section, key, format!("expected a number, got {raw:?}"))
            }),
    }
}

pub fn read_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, WatchError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            WatchError::config_invalid(
                section,
                key,
                format!("expected a non-negative integer, got {raw:?}"),
            )
        }),
    }
}

/// Optional `YYYY-MM-DD` date; an empty value counts as absent.
pub fn read_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, WatchError> {
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                WatchError::config_invalid(
                    section,
                    key,
                    format!("invalid {key} format, expected YYYY-MM-DD"),
                )
            }),
        _ => Ok(None),
    }
}

pub fn read_dividend_mode(config: &dyn ConfigPort) -> Result<DividendMode, WatchError> {
    match config.get_string("backtest", "dividend_mode") {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse()
            .map_err(|reason: String| WatchError::config_invalid("backtest", "dividend_mode", reason)),
        _ => Ok(DividendMode::default()),
    }
}

/// Threshold pair from `[monitor]`; a `Some` override replaces the file value.
pub fn read_thresholds(
    config: &dyn ConfigPort,
    buy_override: Option<f64>,
    sell_override: Option<f64>,
) -> Result<Thresholds, WatchError> {
    let defaults = Thresholds::default();
    let buy = match buy_override {
        Some(v) => v,
        None => read_f64(config, "monitor", "buy_threshold", defaults.buy())?,
    };
    let sell = match sell_override {
        Some(v) => v,
        None => read_f64(config, "monitor", "sell_threshold", defaults.sell())?,
    };
    Thresholds::new(buy, sell)
}

/// RSI period in `1..=MAX_PERIOD`; a `Some` override replaces the file value.
pub fn read_period(
    config: &dyn ConfigPort,
    period_override: Option<usize>,
) -> Result<usize, WatchError> {
    let period = match period_override {
        Some(p) => p,
        None => read_usize(config, "monitor", "period", DEFAULT_PERIOD)?,
    };
    if !(1..=MAX_PERIOD).contains(&period) {
        return Err(WatchError::config_invalid(
            "monitor",
            "period",
            format!("period must be between 1 and {MAX_PERIOD}, got {period}"),
        ));
    }
    Ok(period)
}

pub fn read_initial_capital(config: &dyn ConfigPort) -> Result<f64, WatchError> {
    let value = read_f64(config, "backtest", "initial_capital", 1.0)?;
    if value <= 0.0 {
        return Err(WatchError::config_invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(value)
}

/// `(start_date, end_date)`, either end open; both set means `start < end`.
pub fn read_date_range(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), WatchError> {
    let start = read_date(config, "backtest", "start_date")?;
    let end = read_date(config, "backtest", "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(WatchError::config_invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok((start, end))
}

/// Benchmark symbols; `strategy` is reserved for the strategy's own row.
pub fn read_benchmarks(config: &dyn ConfigPort) -> Result<Vec<String>, WatchError> {
    let names = config.get_list("backtest", "benchmarks");
    if names.iter().any(|n| n.eq_ignore_ascii_case(STRATEGY_NAME)) {
        return Err(WatchError::config_invalid(
            "backtest",
            "benchmarks",
            format!("{STRATEGY_NAME:?} is reserved for the strategy row"),
        ));
    }
    Ok(names)
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), WatchError> {
    match config.get_string("monitor", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(WatchError::ConfigMissing {
            section: "monitor".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_period_and_lookback(config: &dyn ConfigPort) -> Result<(), WatchError> {
    let period = read_period(config, None)?;
    let lookback = read_usize(config, "monitor", "lookback", 0)?;
    if lookback != 0 && lookback < minimum_points(period) {
        return Err(WatchError::config_invalid(
            "monitor",
            "lookback",
            format!(
                "lookback must be 0 or at least period + 1 ({})",
                minimum_points(period)
            ),
        ));
    }
    Ok(())
}
