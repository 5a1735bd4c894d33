//! Notifier that records fired signals as structured log events.
//!
//! Stands in for email/chat delivery; a real transport implements
//! [`SignalNotifier`] the same way.

use crate::domain::error::WatchError;
use crate::domain::monitor::SignalContext;
use crate::domain::signal::Signal;
use crate::ports::notify_port::SignalNotifier;

#[derive(Debug, Default)]
pub struct LogNotifier;

impl SignalNotifier for LogNotifier {
    fn on_signal(&self, signal: Signal, context: &SignalContext) -> Result<(), WatchError> {
        tracing::info!(
            target: "rsiwatch::signal",
            %signal,
            symbol = %context.symbol,
            date = %context.date,
            price = context.price,
            rsi = context.rsi,
            buy_threshold = context.buy_threshold,
            sell_threshold = context.sell_threshold,
            "signal fired"
        );
        Ok(())
    }
}
