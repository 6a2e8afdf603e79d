//! Error types for network parsing and subnet splitting
//!
//! Every public lens operation validates its input up front and reports
//! failures with one of the two [`CalcError`] kinds. Each error carries a
//! human-readable message plus a suggestion showing valid input, which the
//! CLI prints below the message.

use serde::Serialize;
use thiserror::Error;

/// Suggestion attached to every network parsing failure
pub const NETWORK_SUGGESTION: &str =
    "Please provide a valid IPv4 or IPv6 network address (e.g., '192.168.1.0/24' or '2001:db8::/32')";

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalcError {
    /// Malformed address, out-of-range prefix length or malformed mask
    #[error("{message}")]
    InvalidNetwork { message: String, suggestion: String },

    /// Split that is not strictly finer than the source network, a
    /// non-positive count, or a resulting prefix longer than the family width
    #[error("{message}")]
    InvalidSplit { message: String, suggestion: String },
}

impl CalcError {
    /// Build an [`CalcError::InvalidNetwork`] with the standard suggestion
    pub fn invalid_network(message: impl Into<String>) -> Self {
        CalcError::InvalidNetwork {
            message: message.into(),
            suggestion: NETWORK_SUGGESTION.to_string(),
        }
    }

    pub fn invalid_split(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        CalcError::InvalidSplit {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Short name of the error kind, used as the title when printing
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::InvalidNetwork { .. } => "InvalidNetworkError",
            CalcError::InvalidSplit { .. } => "InvalidSplitError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CalcError::InvalidNetwork { message, .. } | CalcError::InvalidSplit { message, .. } => {
                message
            }
        }
    }

    pub fn suggestion(&self) -> &str {
        match self {
            CalcError::InvalidNetwork { suggestion, .. }
            | CalcError::InvalidSplit { suggestion, .. } => suggestion,
        }
    }
}
