use std::time::Duration;

use crate::settings::Environment;

/// Sandbox base URL.
pub const API_URL_TEST: &str = "https://int-ecommerce.nexi.it/";

/// Live base URL.
pub const API_URL_PRODUCTION: &str = "https://ecommerce.nexi.it/";

/// Hosted payment page, used by simple payments and the first recurring payment.
pub const SIMPLE_PAYMENT_API_ENDPOINT: &str = "ecomm/ecomm/DispatcherServlet";

/// Server-to-server endpoint for subsequent recurring payments.
pub const RECURRING_PAYMENT_SUBSEQUENT_API_ENDPOINT: &str =
    "ecomm/api/recurring/pagamentoRicorrente";

/// Alphabetic currency code, used by simple and recurring-initial payments.
pub const CURRENCY: &str = "EUR";

/// ISO 4217 numeric code for the same currency, used by subsequent payments.
/// The gateway only accepts 978 (Euro) here.
pub const CURRENCY_CODE: u16 = 978;

/// Maximum transaction code length accepted by the gateway.
pub const COD_TRANS_MAX_LEN: usize = 30;

/// Default timeout for the subsequent-payment HTTP call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway-wide configuration. Built once and passed to every component that
/// needs it; nothing reads these values from statics at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPayConfig {
    pub currency: String,
    pub currency_code: u16,
    pub test_base_url: String,
    pub production_base_url: String,
    pub simple_payment_endpoint: String,
    pub recurring_subsequent_endpoint: String,
    pub request_timeout: Duration,
}

impl Default for XPayConfig {
    /// Defaults to the public Nexi XPay hosts and Euro.
    fn default() -> Self {
        Self {
            currency: CURRENCY.to_string(),
            currency_code: CURRENCY_CODE,
            test_base_url: API_URL_TEST.to_string(),
            production_base_url: API_URL_PRODUCTION.to_string(),
            simple_payment_endpoint: SIMPLE_PAYMENT_API_ENDPOINT.to_string(),
            recurring_subsequent_endpoint: RECURRING_PAYMENT_SUBSEQUENT_API_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl XPayConfig {
    pub fn base_url(&self, environment: Environment) -> &str {
        match environment {
            Environment::Test => &self.test_base_url,
            Environment::Production => &self.production_base_url,
        }
    }

    /// Hosted payment page URL (simple and recurring-initial share it).
    pub fn simple_payment_url(&self, environment: Environment) -> String {
        format!(
            "{}{}",
            self.base_url(environment),
            self.simple_payment_endpoint
        )
    }

    pub fn recurring_subsequent_url(&self, environment: Environment) -> String {
        format!(
            "{}{}",
            self.base_url(environment),
            self.recurring_subsequent_endpoint
        )
    }

    /// Point both environments at one host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.test_base_url = base_url.clone();
        self.production_base_url = base_url;
        self
    }
}
