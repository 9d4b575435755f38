// src/error.rs

use thiserror::Error;

/// Failure returned by a secret store while fetching a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The service itself rejected the call (unknown secret, access denied, ...).
    #[error("{0}")]
    Provider(String),
    /// Anything that never produced a service answer: dispatch, timeout, parsing.
    #[error("{0}")]
    General(String),
}

/// Failure raised by the host engine's parameter or buffer interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("parameter '{0}' is missing")]
    MissingParameter(String),
    #[error("output parameter '{0}' is bound to an empty buffer name")]
    EmptyBufferName(String),
    #[error("{0}")]
    Rejected(String),
}

/// Configuration errors for the runner binary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),
    #[error("unsupported log format '{0}', expected 'pretty' or 'json'")]
    InvalidLogFormat(String),
    #[error("failed to read parameter file {path}: {source}")]
    ReadParams {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse parameter file {path}: {source}")]
    ParseParams {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Every way a single invocation can stop early. Rendered into the failed
/// result's message, never propagated past the action boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{}", crate::action::MISSING_CONFIGURATION_MESSAGE)]
    MissingConfiguration,
    #[error("Missing required input parameters.")]
    MissingInput,
    #[error("Failed to retrieve the secret value for: {0}.")]
    EmptySecret(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Host(#[from] HostError),
}
