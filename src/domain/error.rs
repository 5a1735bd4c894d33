//! Domain error types.

/// Top-level error type for rsiwatch.
///
/// Every variant is terminal for the current invocation: nothing is retried
/// and no persisted state is overwritten once one of these is raised.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("insufficient data: have {points} price points, need {minimum}")]
    InsufficientData { points: usize, minimum: usize },

    #[error("malformed price record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid date range: series spans {days} days")]
    InvalidRange { days: i64 },

    #[error("price source error: {reason}")]
    DataSource { reason: String },

    #[error("state persistence error for {path}: {reason}")]
    StatePersist { path: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WatchError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        WatchError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl WatchError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            WatchError::Io(_) => 1,
            WatchError::ConfigParse { .. }
            | WatchError::ConfigMissing { .. }
            | WatchError::ConfigInvalid { .. } => 2,
            WatchError::DataSource { .. } | WatchError::MalformedRecord { .. } => 3,
            WatchError::StatePersist { .. } | WatchError::Report { .. } => 4,
            WatchError::InsufficientData { .. } | WatchError::InvalidRange { .. } => 5,
            WatchError::Notify { .. } => 6,
        }
    }
}

impl From<&WatchError> for std::process::ExitCode {
    fn from(err: &WatchError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = WatchError::InsufficientData {
            points: 10,
            minimum: 15,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: have 10 price points, need 15"
        );
    }

    #[test]
    fn config_invalid_helper() {
        let err = WatchError::config_invalid("monitor", "period", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [monitor] period: must be positive"
        );
    }

    #[test]
    fn exit_codes_group_by_family() {
        let range = WatchError::InvalidRange { days: 0 };
        let data = WatchError::InsufficientData {
            points: 1,
            minimum: 15,
        };
        assert_eq!(range.exit_status(), data.exit_status());

        let missing = WatchError::ConfigMissing {
            section: "monitor".into(),
            key: "symbol".into(),
        };
        assert_eq!(missing.exit_status(), 2);
    }
}
