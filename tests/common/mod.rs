#![allow(dead_code)]

use chrono::NaiveDate;
use rsiwatch::domain::error::WatchError;
use rsiwatch::domain::monitor::{MonitorDocument, SignalContext};
pub use rsiwatch::domain::price::PricePoint;
use rsiwatch::domain::signal::Signal;
use rsiwatch::ports::data_port::DataPort;
use rsiwatch::ports::notify_port::SignalNotifier;
use rsiwatch::ports::state_port::StatePort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, WatchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(WatchError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|prices| {
                prices
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// In-memory state store; `fail_replace` simulates a full disk.
#[derive(Default)]
pub struct MemoryStatePort {
    pub document: RefCell<Option<MonitorDocument>>,
    pub fail_replace: bool,
    pub replaces: RefCell<usize>,
}

impl StatePort for MemoryStatePort {
    fn load(&self) -> Result<Option<MonitorDocument>, WatchError> {
        Ok(self.document.borrow().clone())
    }

    fn replace(&self, document: &MonitorDocument) -> Result<(), WatchError> {
        if self.fail_replace {
            return Err(WatchError::StatePersist {
                path: "memory".into(),
                reason: "disk full".into(),
            });
        }
        *self.replaces.borrow_mut() += 1;
        *self.document.borrow_mut() = Some(document.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub calls: RefCell<Vec<(Signal, SignalContext)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.calls.borrow().iter().map(|(s, _)| *s).collect()
    }
}

impl SignalNotifier for RecordingNotifier {
    fn on_signal(&self, signal: Signal, context: &SignalContext) -> Result<(), WatchError> {
        self.calls.borrow_mut().push((signal, context.clone()));
        if self.fail {
            return Err(WatchError::Notify {
                reason: "smtp unreachable".into(),
            });
        }
        Ok(())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_point(d: &str, close: f64) -> PricePoint {
    PricePoint::new(date(d), close)
}

/// Consecutive calendar days from `start`.
pub fn make_series(start: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
        .collect()
}

/// A price path that swings between roughly 8 and 12 every ~40 days.
pub fn generate_wave(start: &str, count: usize) -> Vec<PricePoint> {
    let closes: Vec<f64> = (0..count)
        .map(|i| 10.0 + 2.0 * ((i as f64) * std::f64::consts::PI / 20.0).sin())
        .collect();
    make_series(start, &closes)
}

/// Steady decline that drives RSI to 0.
pub fn falling(count: usize) -> Vec<f64> {
    (0..count).map(|i| 20.0 - i as f64 * 0.25).collect()
}

/// Steady climb that drives RSI to 100.
pub fn rising(count: usize) -> Vec<f64> {
    (0..count).map(|i| 10.0 + i as f64 * 0.25).collect()
}

pub fn write_csv(dir: &std::path::Path, symbol: &str, prices: &[PricePoint]) {
    let mut content = String::from("date,close,dividend\n");
    for p in prices {
        content.push_str(&format!("{},{},{}\n", p.date, p.close, p.dividend));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
