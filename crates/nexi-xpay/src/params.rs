use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Scalar value of an outbound request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(u64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        Self::Int(n)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Int(n) => serializer.serialize_u64(*n),
        }
    }
}

/// Outbound request fields in insertion order.
///
/// Built fresh for every request. Serializes as a JSON object (subsequent
/// payments) or as form pairs for the hosted payment page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    fields: Vec<(&'static str, ParamValue)>,
}

impl RequestParameters {
    pub(crate) fn with(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    /// String form of a field, e.g. for rendering a hidden form input.
    pub fn get_str(&self, name: &str) -> Option<String> {
        self.get(name).map(ToString::to_string)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `(name, value)` pairs ready for an HTML form or URL-encoded POST.
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// `application/x-www-form-urlencoded` encoding of the fields.
    pub fn to_form_urlencoded(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.fields {
            serializer.append_pair(k, &v.to_string());
        }
        serializer.finish()
    }
}

impl Serialize for RequestParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RequestParameters {
        RequestParameters::default()
            .with("alias", "ALIAS_WEB_1")
            .with("importo", 1230u64)
            .with("url", "https://shop.test/ok?id=1&lang=it")
    }

    #[test]
    fn keeps_insertion_order() {
        let names: Vec<_> = sample().names().collect();
        assert_eq!(names, ["alias", "importo", "url"]);
    }

    #[test]
    fn json_keeps_integer_types() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"alias":"ALIAS_WEB_1","importo":1230,"url":"https://shop.test/ok?id=1&lang=it"}"#
        );
    }

    #[test]
    fn form_encoding_escapes_values() {
        assert_eq!(
            sample().to_form_urlencoded(),
            "alias=ALIAS_WEB_1&importo=1230&url=https%3A%2F%2Fshop.test%2Fok%3Fid%3D1%26lang%3Dit"
        );
    }

    #[test]
    fn lookup_by_name() {
        let params = sample();
        assert_eq!(params.get("importo"), Some(&ParamValue::Int(1230)));
        assert_eq!(params.get_str("alias").as_deref(), Some("ALIAS_WEB_1"));
        assert_eq!(params.get("mac"), None);
        assert_eq!(params.len(), 3);
    }
}
