#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FitError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    /// The change observer's attach call returned no deregistration
    /// capability. Mounting stops here because the subscription could never
    /// be torn down.
    #[error(
        "the observer `{observer}` did not provide a way to unobserve; \
         this will likely lead to memory leaks"
    )]
    InvalidObserverContract { observer: String },

    #[error("invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

impl FitError {
    #[must_use]
    pub fn invalid_observer(observer: impl Into<String>) -> Self {
        Self::InvalidObserverContract {
            observer: observer.into(),
        }
    }

    #[must_use]
    pub fn invalid_config(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether this error came from the observer contract check.
    #[must_use]
    pub fn is_observer_contract(&self) -> bool {
        matches!(self, Self::InvalidObserverContract { .. })
    }
}
