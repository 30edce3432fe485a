//! Per-request values: transaction code, amount in cents, timestamp.

use sha2::{Digest, Sha256};

use crate::config::COD_TRANS_MAX_LEN;
use crate::error::{Result, XPayError};

/// Generate a fresh `codTrans`.
///
/// SHA-256 over the current nanosecond timestamp and a random UUID, truncated
/// to the first 30 lowercase hex characters. Every call yields a new code, so
/// retrying the same order never reuses a transaction code.
pub fn generate_cod_trans() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    let nonce = uuid::Uuid::new_v4();

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_string().as_bytes());
    hasher.update(nonce.as_bytes());
    let mut code = hex::encode(hasher.finalize());
    code.truncate(COD_TRANS_MAX_LEN);
    code
}

/// Convert an order total to minor units by truncating `total * 100` toward
/// zero: `12.3` gives `1230`, `0.005` gives `0`.
///
/// Callers should pre-round totals to two decimals; values such as `19.99`
/// are not exactly representable and may truncate one cent low.
pub fn amount_in_cents(order_total: f64) -> Result<u64> {
    if !order_total.is_finite() {
        return Err(XPayError::InvalidAmount(format!(
            "order total must be finite, got {order_total}"
        )));
    }
    if order_total < 0.0 {
        return Err(XPayError::InvalidAmount(format!(
            "order total must not be negative, got {order_total}"
        )));
    }
    let cents = (order_total * 100.0).trunc();
    if cents > u64::MAX as f64 {
        return Err(XPayError::InvalidAmount(format!(
            "order total {order_total} is out of range"
        )));
    }
    Ok(cents as u64)
}

/// Milliseconds since the Unix epoch, as the gateway's `timeStamp` string.
pub fn timestamp_millis() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cod_trans_is_30_lowercase_hex() {
        let code = generate_cod_trans();
        assert_eq!(code.len(), 30);
        assert!(code.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn cod_trans_differs_per_call() {
        assert_ne!(generate_cod_trans(), generate_cod_trans());
    }

    #[test]
    fn amount_truncates_toward_zero() {
        assert_eq!(amount_in_cents(12.3).unwrap(), 1230);
        assert_eq!(amount_in_cents(0.005).unwrap(), 0);
        assert_eq!(amount_in_cents(0.0).unwrap(), 0);
        assert_eq!(amount_in_cents(50.0).unwrap(), 5000);
        assert_eq!(amount_in_cents(12.345).unwrap(), 1234);
    }

    #[test]
    fn amount_rejects_negative_and_non_finite() {
        assert!(matches!(amount_in_cents(-1.0), Err(XPayError::InvalidAmount(_))));
        assert!(matches!(amount_in_cents(f64::NAN), Err(XPayError::InvalidAmount(_))));
        assert!(matches!(
            amount_in_cents(f64::INFINITY),
            Err(XPayError::InvalidAmount(_))
        ));
    }

    #[test]
    fn timestamp_is_milliseconds() {
        let ts = timestamp_millis();
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
        assert!(ts.len() >= 13);
    }
}
