use thiserror::Error;

use crate::esito::Esito;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XPayError>;

/// Errors returned by XPay operations.
///
/// Every variant is terminal for the operation that produced it; nothing in
/// this crate retries. [`XPayError::MacMismatch`] means the payment is not
/// confirmed and must never be downgraded to a warning by callers.
#[derive(Debug, Error)]
pub enum XPayError {
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid format for field {field}: {value:?}")]
    InvalidFieldFormat { field: String, value: String },

    #[error("invalid value for field {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("invalid transaction data: MAC mismatch")]
    MacMismatch,

    #[error("upstream returned HTTP status {status}, expected 200")]
    UpstreamHttpError { status: u16 },

    #[error("upstream response body is empty")]
    UpstreamBodyEmpty,

    #[error("upstream response body is malformed: {0}")]
    UpstreamBodyMalformed(String),

    #[error("XPay error {code}: {message}")]
    UpstreamBusinessError { code: i64, message: String },

    #[error("payment not confirmed: esito {0}")]
    PaymentNotConfirmed(Esito),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl XPayError {
    /// True when the failure means the data could not be authenticated.
    pub fn is_security_failure(&self) -> bool {
        matches!(self, Self::MacMismatch)
    }

    /// True when the request may not have reached the gateway, or the gateway
    /// answered at the HTTP level with something other than 200.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::UpstreamHttpError { .. })
    }

    pub(crate) fn invalid_format(field: &str, value: &str) -> Self {
        Self::InvalidFieldFormat {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mac_mismatch_is_a_security_failure() {
        assert!(XPayError::MacMismatch.is_security_failure());
        assert!(!XPayError::UpstreamBodyEmpty.is_security_failure());
        assert!(!XPayError::MissingField("mac".into()).is_security_failure());
    }

    #[test]
    fn transport_failures_are_distinguishable() {
        assert!(XPayError::Transport("timeout".into()).is_transport_failure());
        assert!(XPayError::UpstreamHttpError { status: 502 }.is_transport_failure());
        assert!(!XPayError::MacMismatch.is_transport_failure());
    }

    #[test]
    fn business_error_message_includes_code() {
        let err = XPayError::UpstreamBusinessError {
            code: 96,
            message: "Transazione negata".into(),
        };
        assert_eq!(err.to_string(), "XPay error 96: Transazione negata");
    }
}
