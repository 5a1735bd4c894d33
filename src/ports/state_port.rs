//! Monitor state persistence port.

use crate::domain::error::WatchError;
use crate::domain::monitor::MonitorDocument;

pub trait StatePort {
    /// `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<MonitorDocument>, WatchError>;

    /// Replaces the stored document as a single step; on failure the previous
    /// document must remain intact.
    fn replace(&self, document: &MonitorDocument) -> Result<(), WatchError>;
}
