//! Error types for rate providers and the service boundary.

use thiserror::Error;

use crate::rate_provider::CurrencyCode;

/// Outcomes a single provider can report for one operation.
///
/// These never reach callers directly; the provider chain consumes them
/// while deciding whether to fall through to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered but holds no data for the request.
    #[error("no rate data found")]
    NotFound,
    /// The provider could not be reached or gave an unusable answer.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    /// The provider does not implement the requested operation.
    #[error("operation not supported")]
    Unsupported,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Unavailable(err.to_string())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that cross the service boundary to callers.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The request was rejected before any provider was consulted.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Every active provider was tried and none produced a usable answer.
    ///
    /// The pair fields avoid the name `source`, which thiserror would
    /// otherwise wire up as the error's cause.
    #[error("all providers exhausted for {operation} on {source_currency}/{target_currency}")]
    AllProvidersExhausted {
        operation: &'static str,
        source_currency: CurrencyCode,
        target_currency: CurrencyCode,
    },
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
