//! Concrete adapter implementations for ports.

pub mod atomic_file;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_report_adapter;
pub mod json_state_adapter;
pub mod log_notifier;
