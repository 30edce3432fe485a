//! Validated access to callback parameters.
//!
//! The gateway delivers results either in the query string (browser return)
//! or in a form-encoded POST body (server notification). Lookups try the
//! query parameters first and fall back to the body.

use std::collections::HashMap;

use crate::error::{Result, XPayError};
use crate::esito::Esito;
use crate::grammar::{Field, Rule};

/// Raw callback parameters from both possible sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackInput {
    query: HashMap<String, String>,
    body: HashMap<String, String>,
}

impl CallbackInput {
    pub fn new(query: HashMap<String, String>, body: HashMap<String, String>) -> Self {
        Self { query, body }
    }

    /// Decode `application/x-www-form-urlencoded` query and body strings.
    /// When a key repeats, the first occurrence wins.
    pub fn from_query_and_body(query: &str, body: &str) -> Self {
        Self {
            query: decode_form(query),
            body: decode_form(body),
        }
    }

    /// Raw value for `key`: query first, then body. `None` only when the key
    /// is absent from both; a present-but-empty value is `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .or_else(|| self.body.get(key))
            .map(String::as_str)
    }
}

fn decode_form(encoded: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (k, v) in url::form_urlencoded::parse(encoded.trim_start_matches('?').as_bytes()) {
        map.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }
    map
}

/// Applies the field grammar to a [`CallbackInput`].
#[derive(Debug, Clone, Copy)]
pub struct InputValidator<'a> {
    input: &'a CallbackInput,
    currency: &'a str,
}

impl<'a> InputValidator<'a> {
    /// `currency` is the configured alphabetic currency code `divisa` must equal.
    pub fn new(input: &'a CallbackInput, currency: &'a str) -> Self {
        Self { input, currency }
    }

    /// Fetch `key` and validate it. Fails with `MissingField` when absent
    /// from both sources, and with `InvalidFieldFormat` for keys outside the
    /// grammar.
    pub fn get_validated_string(&self, key: &str) -> Result<String> {
        let value = self
            .input
            .get(key)
            .ok_or_else(|| XPayError::MissingField(key.to_string()))?;

        match Field::from_key(key) {
            Some(field) => self.check(field, value),
            None => {
                tracing::debug!(field = key, "rejecting unrecognized callback field");
                Err(XPayError::invalid_format(key, value))
            }
        }
    }

    pub fn get_validated(&self, field: Field) -> Result<String> {
        let value = self
            .input
            .get(field.key())
            .ok_or_else(|| XPayError::MissingField(field.key().to_string()))?;
        self.check(field, value)
    }

    /// `esito`, validated and parsed.
    pub fn esito(&self) -> Result<Esito> {
        let value = self.get_validated(Field::Esito)?;
        Esito::parse(&value).ok_or_else(|| XPayError::invalid_value(Field::Esito.key(), value))
    }

    fn check(&self, field: Field, value: &str) -> Result<String> {
        if value.is_empty() && field.is_blankable() {
            return Ok(String::new());
        }

        match field.rule() {
            Rule::Pattern(re) if !re.is_match(value) => {
                tracing::debug!(field = field.key(), "callback field failed grammar");
                Err(XPayError::invalid_format(field.key(), value))
            }
            Rule::ConfiguredCurrency if value != self.currency => {
                tracing::debug!(field = field.key(), "callback currency mismatch");
                Err(XPayError::invalid_value(
                    field.key(),
                    format!("expected {}, got {value:?}", self.currency),
                ))
            }
            Rule::Outcome if Esito::parse(value).is_none() => Err(XPayError::invalid_value(
                field.key(),
                format!("unknown outcome {value:?}"),
            )),
            _ => Ok(value.to_string()),
        }
    }
}
