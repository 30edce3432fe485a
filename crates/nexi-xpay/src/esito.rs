use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction outcome reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Esito {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "KO")]
    Ko,
    #[serde(rename = "ANNULLO")]
    Annullo,
    #[serde(rename = "ERRORE")]
    Errore,
}

impl Esito {
    pub const ALL: [Esito; 4] = [Esito::Annullo, Esito::Errore, Esito::Ko, Esito::Ok];

    /// Parse the wire value. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OK" => Some(Self::Ok),
            "KO" => Some(Self::Ko),
            "ANNULLO" => Some(Self::Annullo),
            "ERRORE" => Some(Self::Errore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Ko => "KO",
            Self::Annullo => "ANNULLO",
            Self::Errore => "ERRORE",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Esito {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
