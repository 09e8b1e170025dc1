use thiserror::Error;

/// Errors surfaced by the scan session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Scan already in progress")]
    Busy,

    #[error("Scan task failed: {0}")]
    Runtime(String),
}

/// Errors produced while parsing subnet notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubnetError {
    #[error("Invalid subnet '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("IPv6 subnet '{0}' is not supported")]
    Ipv6Unsupported(String),
}

impl SubnetError {
    pub(crate) fn malformed(input: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
