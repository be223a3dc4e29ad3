use thiserror::Error;

use crate::payments::types::Provider;

pub type PayResult<T> = Result<T, PayError>;

/// Errors surfaced by the dispatcher for conditions the caller can act on.
///
/// Vendor-reported payment failures are not errors; they arrive through the
/// normal callback as `PayStatus::Failure`. These variants cover the
/// structural cases instead: misconfiguration, unroutable inbound URLs and
/// results that no longer have an attempt waiting for them.
#[derive(Debug, Error)]
pub enum PayError {
    #[error("scheme '{scheme}' is not registered for {provider}")]
    SchemeNotRegistered { provider: Provider, scheme: String },

    #[error("no provider registered for URL scheme '{scheme}'")]
    UnknownScheme { scheme: String },

    #[error("{provider} return URL has unroutable host '{host}'")]
    UnroutableHost { provider: Provider, host: String },

    #[error("received a {provider} result but no attempt is pending")]
    NoPendingAttempt { provider: Provider },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl PayError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Failure reported by a vendor SDK gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{provider} submission failed: {message}")]
    Submission { provider: Provider, message: String },

    #[error("{provider} result could not be parsed: {message}")]
    Parse { provider: Provider, message: String },
}

impl GatewayError {
    pub fn submission(provider: Provider, message: impl Into<String>) -> Self {
        Self::Submission {
            provider,
            message: message.into(),
        }
    }

    pub fn parse(provider: Provider, message: impl Into<String>) -> Self {
        Self::Parse {
            provider,
            message: message.into(),
        }
    }
}
