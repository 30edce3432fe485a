//! Server-to-server subsequent recurring payment.

use crate::classify::parse_subsequent_response;
use crate::config::XPayConfig;
use crate::error::Result;
use crate::request::RecurringSubsequentPayment;
use crate::response::ResponseOutcome;
use crate::settings::PaymentSystemSettings;
use crate::transport::{HttpTransport, TransportRequest, TransportResponse};

/// Charges an existing recurring contract through the XPay JSON API.
///
/// Each call is independent: fresh transaction code and timestamp, one HTTP
/// request, no retry.
pub struct SubsequentPaymentService<T: HttpTransport> {
    transport: T,
    settings: PaymentSystemSettings,
    config: XPayConfig,
}

impl<T: HttpTransport> SubsequentPaymentService<T> {
    pub fn new(transport: T, settings: PaymentSystemSettings, config: XPayConfig) -> Self {
        Self {
            transport,
            settings,
            config,
        }
    }

    pub fn settings(&self) -> &PaymentSystemSettings {
        &self.settings
    }

    /// Charge the contract and return the MAC-verified outcome.
    ///
    /// A [`ResponseOutcome::Negative`] is a verified refusal; use
    /// [`ResponseOutcome::into_positive`] to turn it into an error.
    pub async fn execute(
        &self,
        contract_id: &str,
        order_total: f64,
        expiry: Option<&str>,
    ) -> Result<ResponseOutcome> {
        let response = self.send(contract_id, order_total, expiry).await?;
        let outcome = parse_subsequent_response(&response, self.settings.mac_calculation_key())?;

        match &outcome {
            ResponseOutcome::Positive(p) => tracing::info!(
                contract_id,
                id_operazione = %p.base.id_operazione,
                "XPay subsequent payment authorized"
            ),
            ResponseOutcome::Negative(n) => tracing::info!(
                contract_id,
                esito = %n.base.esito,
                code = n.errore.codice,
                "XPay subsequent payment refused"
            ),
        }
        Ok(outcome)
    }

    /// Build, sign and POST the request; return the raw response untouched.
    pub async fn send(
        &self,
        contract_id: &str,
        order_total: f64,
        expiry: Option<&str>,
    ) -> Result<TransportResponse> {
        let payment = RecurringSubsequentPayment::new(&self.settings, &self.config);
        let params = payment.request_parameters(contract_id, order_total, expiry)?;
        let body = serde_json::to_vec(&params)?;
        let request = TransportRequest::json(payment.url(), body);

        tracing::debug!(url = %request.url, contract_id, "sending XPay subsequent payment");
        self.transport.send(request).await
    }
}
