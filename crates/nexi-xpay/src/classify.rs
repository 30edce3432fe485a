//! Classification and authentication of subsequent-payment responses.

use serde_json::{Map, Value};

use crate::error::{Result, XPayError};
use crate::esito::Esito;
use crate::extract;
use crate::mac;
use crate::response::{
    BaseResponseData, Errore, Mandatory, NegativeResponse, Optional, PositiveResponse,
    ResponseOutcome, DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE,
};
use crate::transport::TransportResponse;

/// Full inbound pipeline for a subsequent payment: status, body, JSON,
/// classification, MAC.
///
/// The gateway answers 200 even on business errors, so the status check only
/// filters transport-level failures. The returned outcome is authoritative
/// only because the MAC has been verified.
pub fn parse_subsequent_response(
    response: &TransportResponse,
    mac_key: &str,
) -> Result<ResponseOutcome> {
    if response.status != 200 {
        tracing::warn!(status = response.status, "XPay returned non-200 status");
        return Err(XPayError::UpstreamHttpError {
            status: response.status,
        });
    }
    let body = decode_body(&response.body)?;
    let outcome = classify_subsequent(&body)?;
    authenticate_subsequent(outcome, mac_key)
}

/// Decode a response body into a JSON object.
pub fn decode_body(body: &str) -> Result<Map<String, Value>> {
    if body.is_empty() {
        return Err(XPayError::UpstreamBodyEmpty);
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(XPayError::UpstreamBodyMalformed(
            "expected a JSON object".to_string(),
        )),
        Err(e) => Err(XPayError::UpstreamBodyMalformed(e.to_string())),
    }
}

/// Classify without authenticating.
///
/// Negative when `esito` is not OK, or `idOperazione` or `mac` is empty.
/// The gateway has been seen to send a single space as `mac` on errors, so a
/// blank `mac` counts as empty.
pub fn classify_subsequent(body: &Map<String, Value>) -> Result<ResponseOutcome> {
    let base = base_response_data(body)?;

    if !base.esito.is_ok() || base.id_operazione.is_empty() || base.mac.trim().is_empty() {
        let errore = Errore {
            codice: extract::non_empty_int_or(body, "errore/codice", DEFAULT_ERROR_CODE)?,
            messaggio: extract::non_empty_string_or(
                body,
                "errore/messaggio",
                DEFAULT_ERROR_MESSAGE,
            )?,
        };
        tracing::debug!(
            esito = %base.esito,
            code = errore.codice,
            "classified XPay response as negative"
        );
        return Ok(ResponseOutcome::Negative(NegativeResponse { base, errore }));
    }

    let mandatory = Mandatory {
        codice_autorizzazione: extract::non_empty_string(body, "codiceAutorizzazione")?,
        data: extract::non_empty_string(body, "data")?,
        ora: extract::non_empty_string(body, "ora")?,
        nazione: extract::non_empty_string(body, "nazione")?,
        codice_convenzione: extract::non_empty_string(body, "codiceConvenzione")?,
        brand: extract::non_empty_string(body, "brand")?,
        tipo_transazione: extract::non_empty_string(body, "tipoTransazione")?,
    };
    let optional = Optional {
        regione: extract::string_or(body, "regione", "")?,
        tipo_prodotto: extract::string_or(body, "tipoProdotto", "")?,
        ppo: extract::string_or(body, "ppo", "")?,
    };
    Ok(ResponseOutcome::Positive(PositiveResponse {
        base,
        mandatory,
        optional,
    }))
}

/// Recompute the response MAC from `esito`, `idOperazione` and `timeStamp`.
/// A mismatch fails whatever the outcome, so a forged positive response is
/// never returned.
pub fn authenticate_subsequent(outcome: ResponseOutcome, mac_key: &str) -> Result<ResponseOutcome> {
    let base = outcome.base();
    let canonical =
        mac::subsequent_response_canonical(base.esito, &base.id_operazione, &base.time_stamp);
    if !mac::verify(&canonical, mac_key, &base.mac) {
        tracing::warn!(
            esito = %base.esito,
            id_operazione = %base.id_operazione,
            "XPay response MAC mismatch"
        );
        return Err(XPayError::MacMismatch);
    }
    tracing::debug!(
        esito = %base.esito,
        id_operazione = %base.id_operazione,
        "XPay response MAC verified"
    );
    Ok(outcome)
}

fn base_response_data(body: &Map<String, Value>) -> Result<BaseResponseData> {
    let esito_raw = extract::non_empty_string(body, "esito")?;
    let esito = Esito::parse(&esito_raw)
        .ok_or_else(|| XPayError::invalid_value("esito", format!("unknown outcome {esito_raw:?}")))?;
    Ok(BaseResponseData {
        esito,
        id_operazione: extract::string_or(body, "idOperazione", "")?,
        mac: extract::string_or(body, "mac", "")?,
        time_stamp: extract::non_empty_string(body, "timeStamp")?,
    })
}
