//! Outbound request builders.
//!
//! Simple and recurring-initial payments post a form to the hosted payment
//! page and share one parameter builder; they differ only in the three
//! recurring fields appended at the end. Subsequent recurring payments are a
//! server-to-server JSON call with different field names and a numeric
//! currency code, so they have their own builder.

use crate::config::XPayConfig;
use crate::error::Result;
use crate::mac;
use crate::params::RequestParameters;
use crate::settings::PaymentSystemSettings;
use crate::transaction::{amount_in_cents, generate_cod_trans, timestamp_millis};

/// Service tag sent on the first recurring payment.
pub const RECURRING_SERVICE_TYPE: &str = "paga_multi";

/// Request-type tag sent on the first recurring payment.
pub const RECURRING_REQUEST_TYPE: &str = "PP";

/// Builds the merchant callback URLs for a given language and order.
pub trait CallbackUrls {
    /// Where the customer's browser lands after paying (`url`).
    fn return_url(&self, language_code: &str, order_id: &str) -> String;
    /// Server-to-server result notification (`urlpost`).
    fn notification_url(&self, language_code: &str, order_id: &str) -> String;
    /// Where the customer lands after cancelling (`url_back`).
    fn cancel_url(&self, language_code: &str, order_id: &str) -> String;
}

/// Which hosted-page flow a parameter set is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostedFlow {
    Simple,
    RecurringInitial,
}

/// Gateway language identifier for an ISO 639-1 code.
pub fn language_id(language_code: &str) -> &'static str {
    match language_code {
        "it" => "ITA",
        _ => "ENG",
    }
}

/// Shared builder for the hosted-page flows.
///
/// `order_id` is the order identifier for simple payments and the contract
/// number for recurring-initial payments.
pub fn build_hosted_parameters<U: CallbackUrls + ?Sized>(
    flow: HostedFlow,
    settings: &PaymentSystemSettings,
    config: &XPayConfig,
    urls: &U,
    language_code: &str,
    order_id: &str,
    order_total: f64,
) -> Result<RequestParameters> {
    let cod_trans = generate_cod_trans();
    let amount = amount_in_cents(order_total)?;
    let canonical = mac::simple_request_canonical(&cod_trans, &config.currency, amount);

    let params = RequestParameters::default()
        .with("alias", settings.alias())
        .with("codTrans", cod_trans.as_str())
        .with("divisa", config.currency.as_str())
        .with("importo", amount)
        .with("languageId", language_id(language_code))
        .with("mac", mac::sign(&canonical, settings.mac_calculation_key()))
        .with("url", urls.return_url(language_code, order_id))
        .with("urlpost", urls.notification_url(language_code, order_id))
        .with("url_back", urls.cancel_url(language_code, order_id));

    let params = match flow {
        HostedFlow::Simple => params,
        HostedFlow::RecurringInitial => params
            .with("num_contratto", order_id)
            .with("tipo_servizio", RECURRING_SERVICE_TYPE)
            .with("tipo_richiesta", RECURRING_REQUEST_TYPE),
    };

    tracing::debug!(
        ?flow,
        cod_trans = %cod_trans,
        importo = amount,
        environment = %settings.environment(),
        "built XPay hosted payment request"
    );
    Ok(params)
}

/// One-shot payment through the hosted payment page.
pub struct SimplePayment<'a, U: ?Sized> {
    settings: &'a PaymentSystemSettings,
    config: &'a XPayConfig,
    urls: &'a U,
}

impl<'a, U: CallbackUrls + ?Sized> SimplePayment<'a, U> {
    pub fn new(settings: &'a PaymentSystemSettings, config: &'a XPayConfig, urls: &'a U) -> Self {
        Self {
            settings,
            config,
            urls,
        }
    }

    pub fn request_parameters(
        &self,
        language_code: &str,
        order_id: &str,
        order_total: f64,
    ) -> Result<RequestParameters> {
        build_hosted_parameters(
            HostedFlow::Simple,
            self.settings,
            self.config,
            self.urls,
            language_code,
            order_id,
            order_total,
        )
    }

    pub fn start_url(&self) -> String {
        self.config.simple_payment_url(self.settings.environment())
    }
}

/// First payment of a recurring agreement, through the hosted payment page.
pub struct RecurringInitialPayment<'a, U: ?Sized> {
    settings: &'a PaymentSystemSettings,
    config: &'a XPayConfig,
    urls: &'a U,
}

impl<'a, U: CallbackUrls + ?Sized> RecurringInitialPayment<'a, U> {
    pub fn new(settings: &'a PaymentSystemSettings, config: &'a XPayConfig, urls: &'a U) -> Self {
        Self {
            settings,
            config,
            urls,
        }
    }

    pub fn request_parameters(
        &self,
        language_code: &str,
        contract_id: &str,
        order_total: f64,
    ) -> Result<RequestParameters> {
        build_hosted_parameters(
            HostedFlow::RecurringInitial,
            self.settings,
            self.config,
            self.urls,
            language_code,
            contract_id,
            order_total,
        )
    }

    /// Same endpoint as simple payments.
    pub fn start_url(&self) -> String {
        self.config.simple_payment_url(self.settings.environment())
    }
}

/// Follow-up charge against an existing recurring agreement.
pub struct RecurringSubsequentPayment<'a> {
    settings: &'a PaymentSystemSettings,
    config: &'a XPayConfig,
}

impl<'a> RecurringSubsequentPayment<'a> {
    pub fn new(settings: &'a PaymentSystemSettings, config: &'a XPayConfig) -> Self {
        Self { settings, config }
    }

    /// `expiry` is the card expiry (`yyyymm`) stored with the contract; it is
    /// sent as `scadenza` when given and is not covered by the MAC.
    pub fn request_parameters(
        &self,
        contract_id: &str,
        order_total: f64,
        expiry: Option<&str>,
    ) -> Result<RequestParameters> {
        let cod_trans = generate_cod_trans();
        let amount = amount_in_cents(order_total)?;
        let timestamp = timestamp_millis();
        let canonical = mac::subsequent_request_canonical(
            self.settings.alias(),
            contract_id,
            &cod_trans,
            amount,
            self.config.currency_code,
            &timestamp,
        );

        let params = RequestParameters::default()
            .with("apiKey", self.settings.alias())
            .with("codiceTransazione", cod_trans.as_str())
            .with("divisa", u64::from(self.config.currency_code))
            .with("importo", amount)
            .with("mac", mac::sign(&canonical, self.settings.mac_calculation_key()))
            .with("numeroContratto", contract_id)
            .with("timeStamp", timestamp.as_str());
        let params = match expiry {
            Some(scadenza) => params.with("scadenza", scadenza),
            None => params,
        };

        tracing::debug!(
            cod_trans = %cod_trans,
            importo = amount,
            environment = %self.settings.environment(),
            "built XPay subsequent payment request"
        );
        Ok(params)
    }

    pub fn url(&self) -> String {
        self.config
            .recurring_subsequent_url(self.settings.environment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use crate::settings::Environment;

    struct ShopUrls;

    impl CallbackUrls for ShopUrls {
        fn return_url(&self, lang: &str, order_id: &str) -> String {
            format!("https://shop.test/{lang}/payment/return/{order_id}")
        }
        fn notification_url(&self, lang: &str, order_id: &str) -> String {
            format!("https://shop.test/{lang}/payment/notify/{order_id}")
        }
        fn cancel_url(&self, lang: &str, order_id: &str) -> String {
            format!("https://shop.test/{lang}/payment/cancel/{order_id}")
        }
    }

    fn settings() -> PaymentSystemSettings {
        PaymentSystemSettings::with_environment("ALIAS_WEB_1", "testkey", Environment::Test)
    }

    fn str_field(params: &RequestParameters, name: &str) -> String {
        match params.get(name) {
            Some(ParamValue::Str(s)) => s.clone(),
            other => panic!("{name}: expected string, got {other:?}"),
        }
    }

    #[test]
    fn simple_parameters_are_signed() {
        let settings = settings();
        let config = XPayConfig::default();
        let payment = SimplePayment::new(&settings, &config, &ShopUrls);
        let params = payment.request_parameters("it", "order42", 12.3).unwrap();

        let names: Vec<_> = params.names().collect();
        assert_eq!(
            names,
            ["alias", "codTrans", "divisa", "importo", "languageId", "mac", "url", "urlpost", "url_back"]
        );
        assert_eq!(str_field(&params, "alias"), "ALIAS_WEB_1");
        assert_eq!(str_field(&params, "divisa"), "EUR");
        assert_eq!(params.get("importo"), Some(&ParamValue::Int(1230)));
        assert_eq!(str_field(&params, "languageId"), "ITA");
        assert_eq!(
            str_field(&params, "urlpost"),
            "https://shop.test/it/payment/notify/order42"
        );

        let cod_trans = str_field(&params, "codTrans");
        assert_eq!(cod_trans.len(), 30);
        let expected = mac::sign(
            &mac::simple_request_canonical(&cod_trans, "EUR", 1230),
            "testkey",
        );
        assert_eq!(str_field(&params, "mac"), expected);
    }

    #[test]
    fn non_italian_language_maps_to_english() {
        assert_eq!(language_id("it"), "ITA");
        assert_eq!(language_id("en"), "ENG");
        assert_eq!(language_id("de"), "ENG");
        assert_eq!(language_id("IT"), "ENG");
    }

    #[test]
    fn sub_cent_totals_truncate() {
        let settings = settings();
        let config = XPayConfig::default();
        let params = SimplePayment::new(&settings, &config, &ShopUrls)
            .request_parameters("en", "order42", 0.005)
            .unwrap();
        assert_eq!(params.get("importo"), Some(&ParamValue::Int(0)));
    }

    #[test]
    fn recurring_initial_appends_contract_fields() {
        let settings = settings();
        let config = XPayConfig::default();
        let payment = RecurringInitialPayment::new(&settings, &config, &ShopUrls);
        let params = payment.request_parameters("en", "contratto01", 9.99).unwrap();

        assert_eq!(params.len(), 12);
        assert_eq!(str_field(&params, "num_contratto"), "contratto01");
        assert_eq!(str_field(&params, "tipo_servizio"), "paga_multi");
        assert_eq!(str_field(&params, "tipo_richiesta"), "PP");
        assert_eq!(
            str_field(&params, "url"),
            "https://shop.test/en/payment/return/contratto01"
        );
        assert_eq!(payment.start_url(), SimplePayment::new(&settings, &config, &ShopUrls).start_url());
    }

    #[test]
    fn subsequent_parameters_use_numeric_currency() {
        let settings = settings();
        let config = XPayConfig::default();
        let payment = RecurringSubsequentPayment::new(&settings, &config);
        let params = payment
            .request_parameters("contratto01", 25.5, Some("203012"))
            .unwrap();

        assert_eq!(str_field(&params, "apiKey"), "ALIAS_WEB_1");
        assert_eq!(params.get("divisa"), Some(&ParamValue::Int(978)));
        assert_eq!(params.get("importo"), Some(&ParamValue::Int(2550)));
        assert_eq!(str_field(&params, "numeroContratto"), "contratto01");
        assert_eq!(str_field(&params, "scadenza"), "203012");

        let cod_trans = str_field(&params, "codiceTransazione");
        let timestamp = str_field(&params, "timeStamp");
        let canonical = mac::subsequent_request_canonical(
            "ALIAS_WEB_1",
            "contratto01",
            &cod_trans,
            2550,
            978,
            &timestamp,
        );
        assert_eq!(str_field(&params, "mac"), mac::sign(&canonical, "testkey"));
    }

    #[test]
    fn subsequent_without_expiry_omits_scadenza() {
        let settings = settings();
        let config = XPayConfig::default();
        let params = RecurringSubsequentPayment::new(&settings, &config)
            .request_parameters("contratto01", 1.0, None)
            .unwrap();
        assert!(params.get("scadenza").is_none());
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn urls_follow_settings_environment() {
        let config = XPayConfig::default();
        let live = PaymentSystemSettings::new("ALIAS", "k", "production").unwrap();
        assert_eq!(
            RecurringSubsequentPayment::new(&live, &config).url(),
            "https://ecommerce.nexi.it/ecomm/api/recurring/pagamentoRicorrente"
        );
        let test = settings();
        assert_eq!(
            SimplePayment::new(&test, &config, &ShopUrls).start_url(),
            "https://int-ecommerce.nexi.it/ecomm/ecomm/DispatcherServlet"
        );
    }

    #[test]
    fn each_request_gets_a_fresh_cod_trans() {
        let settings = settings();
        let config = XPayConfig::default();
        let payment = SimplePayment::new(&settings, &config, &ShopUrls);
        let a = payment.request_parameters("it", "order42", 1.0).unwrap();
        let b = payment.request_parameters("it", "order42", 1.0).unwrap();
        assert_ne!(str_field(&a, "codTrans"), str_field(&b, "codTrans"));
    }

    #[test]
    fn negative_total_is_rejected() {
        let settings = settings();
        let config = XPayConfig::default();
        let err = SimplePayment::new(&settings, &config, &ShopUrls)
            .request_parameters("it", "order42", -5.0)
            .unwrap_err();
        assert!(matches!(err, crate::XPayError::InvalidAmount(_)));
    }
}
