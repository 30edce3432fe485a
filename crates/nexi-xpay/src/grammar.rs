//! Field grammar for values the gateway sends back to the merchant.

use std::sync::LazyLock;

use regex::Regex;

/// Fields received on the browser-return and server notification callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CodAut,
    CodTrans,
    Data,
    Divisa,
    Esito,
    Importo,
    Mac,
    Orario,
    /// `num_contratto`, sent back on the first recurring payment.
    RecurringIdInitial,
    /// `numeroContratto`, used by subsequent recurring payments.
    RecurringIdSubsequent,
}

/// Fields allowed to arrive empty. An empty value skips grammar validation.
pub const BLANKABLE_FIELDS: &[Field] = &[Field::CodAut];

impl Field {
    pub const ALL: [Field; 10] = [
        Field::CodAut,
        Field::CodTrans,
        Field::Data,
        Field::Divisa,
        Field::Esito,
        Field::Importo,
        Field::Mac,
        Field::Orario,
        Field::RecurringIdInitial,
        Field::RecurringIdSubsequent,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::CodAut => "codAut",
            Self::CodTrans => "codTrans",
            Self::Data => "data",
            Self::Divisa => "divisa",
            Self::Esito => "esito",
            Self::Importo => "importo",
            Self::Mac => "mac",
            Self::Orario => "orario",
            Self::RecurringIdInitial => "num_contratto",
            Self::RecurringIdSubsequent => "numeroContratto",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn is_blankable(&self) -> bool {
        BLANKABLE_FIELDS.contains(self)
    }

    pub fn rule(&self) -> Rule {
        match self {
            Self::CodAut => Rule::Pattern(&COD_AUT),
            Self::CodTrans => Rule::Pattern(&COD_TRANS),
            Self::Data => Rule::Pattern(&DATA),
            Self::Importo => Rule::Pattern(&IMPORTO),
            Self::Mac => Rule::Pattern(&MAC),
            Self::Orario => Rule::Pattern(&ORARIO),
            Self::RecurringIdInitial | Self::RecurringIdSubsequent => {
                Rule::Pattern(&RECURRING_ID)
            }
            Self::Divisa => Rule::ConfiguredCurrency,
            Self::Esito => Rule::Outcome,
        }
    }
}

/// How a field's value is checked.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Whole-value regular expression.
    Pattern(&'static Regex),
    /// Exact match against the configured alphabetic currency.
    ConfiguredCurrency,
    /// Must parse as an [`Esito`](crate::esito::Esito).
    Outcome,
}

// Mixed case; some acquirers return lower-case authorization codes.
static COD_AUT: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-zA-Z0-9]{2,6}$"));
static COD_TRANS: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-z0-9]{2,30}$"));
static DATA: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{8}$"));
static IMPORTO: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{1,8}$"));
static MAC: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9a-f]{40}$"));
static ORARIO: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{6}$"));
static RECURRING_ID: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-z0-9]{5,30}$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static field pattern is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(field: Field, value: &str) -> bool {
        match field.rule() {
            Rule::Pattern(re) => re.is_match(value),
            other => panic!("{field:?} has non-pattern rule {other:?}"),
        }
    }

    #[test]
    fn keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("alias"), None);
        assert_eq!(Field::from_key("CODTRANS"), None);
    }

    #[test]
    fn only_cod_aut_is_blankable() {
        for field in Field::ALL {
            assert_eq!(field.is_blankable(), field == Field::CodAut);
        }
    }

    #[test]
    fn cod_aut_grammar() {
        assert!(matches(Field::CodAut, "A1"));
        assert!(matches(Field::CodAut, "a1B2c3"));
        assert!(!matches(Field::CodAut, "A"));
        assert!(!matches(Field::CodAut, "A1B2C3D"));
        assert!(!matches(Field::CodAut, "A1-B2"));
    }

    #[test]
    fn cod_trans_grammar() {
        assert!(matches(Field::CodTrans, "ab"));
        assert!(matches(Field::CodTrans, &"a".repeat(30)));
        assert!(!matches(Field::CodTrans, &"a".repeat(31)));
        assert!(!matches(Field::CodTrans, "ABC123"));
    }

    #[test]
    fn numeric_grammars() {
        assert!(matches(Field::Data, "20240131"));
        assert!(!matches(Field::Data, "2024013"));
        assert!(matches(Field::Orario, "235959"));
        assert!(!matches(Field::Orario, "23:59:59"));
        assert!(matches(Field::Importo, "0"));
        assert!(matches(Field::Importo, "99999999"));
        assert!(!matches(Field::Importo, "123456789"));
        assert!(!matches(Field::Importo, "12.30"));
    }

    #[test]
    fn mac_grammar_is_lowercase_hex_40() {
        assert!(matches(Field::Mac, &"a".repeat(40)));
        assert!(!matches(Field::Mac, &"A".repeat(40)));
        assert!(!matches(Field::Mac, &"g".repeat(40)));
        assert!(!matches(Field::Mac, &"a".repeat(39)));
    }

    #[test]
    fn recurring_id_grammar() {
        assert!(matches(Field::RecurringIdInitial, "abc12"));
        assert!(matches(Field::RecurringIdSubsequent, &"z".repeat(30)));
        assert!(!matches(Field::RecurringIdSubsequent, "abcd"));
        assert!(!matches(Field::RecurringIdInitial, "abc+12"));
    }

    #[test]
    fn special_fields_bypass_regex() {
        assert!(matches!(Field::Divisa.rule(), Rule::ConfiguredCurrency));
        assert!(matches!(Field::Esito.rule(), Rule::Outcome));
    }
}
