//! Authentication of the browser-return and notification callbacks sent
//! after a hosted-page payment (simple or recurring-initial).

use serde::Serialize;

use crate::config::XPayConfig;
use crate::error::{Result, XPayError};
use crate::esito::Esito;
use crate::grammar::Field;
use crate::input::{CallbackInput, InputValidator};
use crate::mac::{self, CallbackMacFields};
use crate::settings::PaymentSystemSettings;

/// Callback fields that passed grammar validation and the MAC check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedCallback {
    pub esito: Esito,
    pub cod_trans: String,
    pub importo: String,
    pub divisa: String,
    pub data: String,
    pub orario: String,
    pub cod_aut: String,
}

impl ValidatedCallback {
    /// True only for `esito == OK`; the MAC is already verified.
    pub fn is_confirmed(&self) -> bool {
        self.esito.is_ok()
    }

    /// The callback, or [`XPayError::PaymentNotConfirmed`] for any outcome
    /// other than OK.
    pub fn require_confirmed(self) -> Result<Self> {
        if !self.is_confirmed() {
            return Err(XPayError::PaymentNotConfirmed(self.esito));
        }
        Ok(self)
    }

    /// Amount in minor units.
    pub fn amount_cents(&self) -> Result<u64> {
        self.importo
            .parse()
            .map_err(|_| XPayError::invalid_format(Field::Importo.key(), &self.importo))
    }
}

/// Validate every MAC-covered field, recompute the inbound MAC and compare it
/// with the supplied `mac`. The first invalid field aborts validation.
pub fn validate_callback(
    input: &CallbackInput,
    settings: &PaymentSystemSettings,
    config: &XPayConfig,
) -> Result<ValidatedCallback> {
    let validator = InputValidator::new(input, &config.currency);

    let supplied_mac = validator.get_validated(Field::Mac)?;
    let cod_trans = validator.get_validated(Field::CodTrans)?;
    let esito = validator.esito()?;
    let importo = validator.get_validated(Field::Importo)?;
    let divisa = validator.get_validated(Field::Divisa)?;
    let data = validator.get_validated(Field::Data)?;
    let orario = validator.get_validated(Field::Orario)?;
    let cod_aut = validator.get_validated(Field::CodAut)?;

    let canonical = mac::simple_response_canonical(&CallbackMacFields {
        cod_trans: &cod_trans,
        esito: esito.as_str(),
        importo: &importo,
        divisa: &divisa,
        data: &data,
        orario: &orario,
        cod_aut: &cod_aut,
    });
    if !mac::verify(&canonical, settings.mac_calculation_key(), &supplied_mac) {
        tracing::warn!(cod_trans = %cod_trans, esito = %esito, "XPay callback MAC mismatch");
        return Err(XPayError::MacMismatch);
    }

    tracing::info!(cod_trans = %cod_trans, esito = %esito, "XPay callback verified");
    Ok(ValidatedCallback {
        esito,
        cod_trans,
        importo,
        divisa,
        data,
        orario,
        cod_aut,
    })
}

/// Validated recurring contract id from a callback: `num_contratto` on the
/// first payment, `numeroContratto` otherwise.
pub fn contract_id(input: &CallbackInput, config: &XPayConfig, initial: bool) -> Result<String> {
    let field = if initial {
        Field::RecurringIdInitial
    } else {
        Field::RecurringIdSubsequent
    };
    InputValidator::new(input, &config.currency).get_validated(field)
}
