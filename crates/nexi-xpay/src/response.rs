use serde::{Deserialize, Serialize};

use crate::error::XPayError;
use crate::esito::Esito;

/// Error code reported when a negative response carries none.
pub const DEFAULT_ERROR_CODE: i64 = 500;

/// Error message reported when a negative response carries none.
pub const DEFAULT_ERROR_MESSAGE: &str = "Unknown XPay error.";

/// Fields present on every subsequent-payment response.
/// `id_operazione` and `mac` are empty on negative responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponseData {
    pub esito: Esito,
    pub id_operazione: String,
    pub mac: String,
    pub time_stamp: String,
}

/// Fields a positive response must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mandatory {
    pub codice_autorizzazione: String,
    pub data: String,
    pub ora: String,
    pub nazione: String,
    pub codice_convenzione: String,
    pub brand: String,
    pub tipo_transazione: String,
}

/// Fields a positive response may leave empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Optional {
    pub regione: String,
    pub tipo_prodotto: String,
    pub ppo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Errore {
    pub codice: i64,
    pub messaggio: String,
}

impl Default for Errore {
    fn default() -> Self {
        Self {
            codice: DEFAULT_ERROR_CODE,
            messaggio: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositiveResponse {
    pub base: BaseResponseData,
    pub mandatory: Mandatory,
    pub optional: Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeResponse {
    pub base: BaseResponseData,
    pub errore: Errore,
}

/// Classified subsequent-payment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ResponseOutcome {
    Positive(PositiveResponse),
    Negative(NegativeResponse),
}

impl ResponseOutcome {
    pub fn base(&self) -> &BaseResponseData {
        match self {
            Self::Positive(p) => &p.base,
            Self::Negative(n) => &n.base,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive(_))
    }

    /// The positive response, or [`XPayError::UpstreamBusinessError`] carrying
    /// the gateway's error code and message.
    pub fn into_positive(self) -> Result<PositiveResponse, XPayError> {
        match self {
            Self::Positive(p) => Ok(p),
            Self::Negative(n) => Err(XPayError::UpstreamBusinessError {
                code: n.errore.codice,
                message: n.errore.messaggio,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(esito: Esito) -> BaseResponseData {
        BaseResponseData {
            esito,
            id_operazione: String::new(),
            mac: String::new(),
            time_stamp: "1700000000000".to_string(),
        }
    }

    #[test]
    fn negative_into_positive_is_business_error() {
        let outcome = ResponseOutcome::Negative(NegativeResponse {
            base: base(Esito::Ko),
            errore: Errore::default(),
        });
        assert!(!outcome.is_positive());
        match outcome.into_positive() {
            Err(XPayError::UpstreamBusinessError { code, message }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "Unknown XPay error.");
            }
            other => panic!("expected business error, got {other:?}"),
        }
    }

    #[test]
    fn base_serializes_with_wire_names() {
        let json = serde_json::to_value(base(Esito::Ok)).unwrap();
        assert_eq!(json["esito"], "OK");
        assert_eq!(json["idOperazione"], "");
        assert_eq!(json["timeStamp"], "1700000000000");
    }
}
