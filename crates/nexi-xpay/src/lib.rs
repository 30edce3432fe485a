//! Signed payment requests and authenticated responses for the Nexi XPay
//! card gateway.
//!
//! Every money-moving request carries a MAC, `hex(SHA-1(canonical || key))`,
//! and every inbound result is re-validated against the same key before it
//! is trusted.
//!
//! # Flows
//!
//! - **Simple** ([`SimplePayment`]): one-shot charge on the hosted payment
//!   page; the result comes back on a browser callback checked with
//!   [`validate_callback`].
//! - **Recurring initial** ([`RecurringInitialPayment`]): same page and
//!   callback, plus the contract fields that set up the agreement.
//! - **Recurring subsequent** ([`SubsequentPaymentService`]): server-to-server
//!   JSON call charging an existing contract; the response is classified and
//!   MAC-checked by [`parse_subsequent_response`].
//!
//! # Quick example (callback)
//!
//! ```no_run
//! use xpay::{validate_callback, CallbackInput, PaymentSystemSettings, XPayConfig};
//!
//! # fn main() -> Result<(), xpay::XPayError> {
//! let settings = PaymentSystemSettings::new("ALIAS_WEB_00000001", "mac-key", "test")?;
//! let config = XPayConfig::default();
//!
//! let input = CallbackInput::from_query_and_body("codTrans=...&esito=OK&mac=...", "");
//! let payment = validate_callback(&input, &settings, &config)?.require_confirmed()?;
//! println!("paid {} cents", payment.amount_cents()?);
//! # Ok(())
//! # }
//! ```

// Configuration and errors
pub mod config;
pub mod error;
pub mod settings;

// Protocol primitives
pub mod esito;
pub mod grammar;
pub mod mac;
pub mod params;
pub mod transaction;

// Outbound
pub mod request;
pub mod subsequent;
pub mod transport;

// Inbound
pub mod callback;
pub mod classify;
pub mod extract;
pub mod input;
pub mod response;

// Re-exports
pub use callback::{validate_callback, ValidatedCallback};
pub use classify::{classify_subsequent, parse_subsequent_response};
pub use config::XPayConfig;
pub use error::{Result, XPayError};
pub use esito::Esito;
pub use grammar::Field;
pub use input::{CallbackInput, InputValidator};
pub use params::{ParamValue, RequestParameters};
pub use request::{
    CallbackUrls, RecurringInitialPayment, RecurringSubsequentPayment, SimplePayment,
};
pub use response::*;
pub use settings::{Environment, PaymentSystemSettings};
pub use subsequent::SubsequentPaymentService;
pub use transport::{HttpTransport, TransportRequest, TransportResponse};

#[cfg(feature = "full")]
pub use transport::ReqwestTransport;
