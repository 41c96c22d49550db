use thiserror::Error;

/// Errors that cross the check-cycle boundary.
///
/// `PolicyNotImplemented` stops continuous monitoring; everything else is a
/// failed cycle that the next scheduled cycle retries.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("decision policy `{0}` is not implemented")]
    PolicyNotImplemented(&'static str),

    #[error(transparent)]
    Cycle(#[from] anyhow::Error),
}

impl MonitorError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, MonitorError::PolicyNotImplemented(_))
    }
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_policy_is_fatal() {
        assert!(MonitorError::PolicyNotImplemented("x").is_fatal());
        assert!(!MonitorError::from(anyhow::anyhow!("disk full")).is_fatal());
    }

    #[test]
    fn cycle_errors_display_transparently() {
        let e = MonitorError::from(anyhow::anyhow!("disk full"));
        assert_eq!(e.to_string(), "disk full");
    }
}
