//! Message authentication codes for XPay requests and responses.
//!
//! The gateway MAC is `hex(SHA-1(canonical || secret))`. Each protocol
//! variant has its own canonical string: `key=value` groups in a fixed order
//! with no separators between groups. Field order is part of the protocol.

use sha1::{Digest, Sha1};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::esito::Esito;

/// Compute the MAC for a canonical string.
/// Returns 40 lowercase hex characters.
pub fn sign(canonical: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(canonical.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Recompute the MAC for `canonical` and compare it with `supplied`.
///
/// The comparison hashes both sides to fixed-length digests and compares them
/// with `subtle`, so timing depends on neither content nor length.
pub fn verify(canonical: &str, secret: &str, supplied: &str) -> bool {
    let expected = sign(canonical, secret);
    constant_time_eq(expected.as_bytes(), supplied.as_bytes())
}

pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let ha = Sha256::digest(a);
    let hb = Sha256::digest(b);
    ha.ct_eq(&hb).into()
}

/// Outbound simple / recurring-initial request:
/// `codTrans=<>divisa=<>importo=<>`.
pub fn simple_request_canonical(cod_trans: &str, currency: &str, amount_cents: u64) -> String {
    format!("codTrans={cod_trans}divisa={currency}importo={amount_cents}")
}

/// Outbound recurring-subsequent request:
/// `apiKey=<>numeroContratto=<>codiceTransazione=<>importo=<>divisa=<>timeStamp=<>`.
pub fn subsequent_request_canonical(
    alias: &str,
    contract_id: &str,
    cod_trans: &str,
    amount_cents: u64,
    currency_code: u16,
    timestamp: &str,
) -> String {
    format!(
        "apiKey={alias}numeroContratto={contract_id}codiceTransazione={cod_trans}\
         importo={amount_cents}divisa={currency_code}timeStamp={timestamp}"
    )
}

/// Values covered by the MAC on the browser-return callback, in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackMacFields<'a> {
    pub cod_trans: &'a str,
    pub esito: &'a str,
    pub importo: &'a str,
    pub divisa: &'a str,
    pub data: &'a str,
    pub orario: &'a str,
    pub cod_aut: &'a str,
}

/// Inbound simple / recurring-initial callback:
/// `codTrans=<>esito=<>importo=<>divisa=<>data=<>orario=<>codAut=<>`.
pub fn simple_response_canonical(fields: &CallbackMacFields<'_>) -> String {
    format!(
        "codTrans={}esito={}importo={}divisa={}data={}orario={}codAut={}",
        fields.cod_trans,
        fields.esito,
        fields.importo,
        fields.divisa,
        fields.data,
        fields.orario,
        fields.cod_aut,
    )
}

/// Inbound recurring-subsequent JSON response:
/// `esito=<>idOperazione=<>timeStamp=<>`.
pub fn subsequent_response_canonical(esito: Esito, id_operazione: &str, timestamp: &str) -> String {
    format!("esito={esito}idOperazione={id_operazione}timeStamp={timestamp}")
}
