//! Core domain types and logic.

pub mod price;
pub mod rsi;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod backtest;
pub mod benchmark;
pub mod metrics;
pub mod optimize;
pub mod monitor;
pub mod report;
pub mod config_validation;
pub mod error;
