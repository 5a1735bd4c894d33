//! Notification callback port.

use crate::domain::error::WatchError;
use crate::domain::monitor::SignalContext;
use crate::domain::signal::Signal;

/// Called at most once per fired BUY or SELL, after the new state is stored.
pub trait SignalNotifier {
    fn on_signal(&self, signal: Signal, context: &SignalContext) -> Result<(), WatchError>;
}
