//! Merchant credentials and target environment.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, XPayError};

/// Gateway environment. Each maps to exactly one base URL in
/// [`XPayConfig`](crate::config::XPayConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = XPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "test" => Ok(Self::Test),
            "production" => Ok(Self::Production),
            other => Err(XPayError::InvalidEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant alias, MAC calculation key and environment.
///
/// Supplied once by the hosting application and never mutated afterwards.
#[derive(Clone)]
pub struct PaymentSystemSettings {
    alias: String,
    mac_calculation_key: String,
    environment: Environment,
}

impl fmt::Debug for PaymentSystemSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentSystemSettings")
            .field("alias", &self.alias)
            .field("mac_calculation_key", &"[REDACTED]")
            .field("environment", &self.environment)
            .finish()
    }
}

impl PaymentSystemSettings {
    /// Build settings from raw strings. Fails with
    /// [`XPayError::InvalidEnvironment`] unless `environment` is `test` or
    /// `production`.
    pub fn new(
        alias: impl Into<String>,
        mac_calculation_key: impl Into<String>,
        environment: &str,
    ) -> Result<Self> {
        let environment = environment.parse()?;
        Ok(Self::with_environment(alias, mac_calculation_key, environment))
    }

    pub fn with_environment(
        alias: impl Into<String>,
        mac_calculation_key: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            alias: alias.into(),
            mac_calculation_key: mac_calculation_key.into(),
            environment,
        }
    }

    /// Read `XPAY_ALIAS`, `XPAY_MAC_KEY` and `XPAY_ENVIRONMENT`.
    pub fn from_env() -> Result<Self> {
        let alias = required_var("XPAY_ALIAS")?;
        let mac_calculation_key = required_var("XPAY_MAC_KEY")?;
        let environment = required_var("XPAY_ENVIRONMENT")?;

        let settings = Self::new(alias, mac_calculation_key, &environment)?;
        if settings.environment == Environment::Test {
            tracing::warn!(alias = %settings.alias, "XPay running against the sandbox environment");
        }
        Ok(settings)
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn mac_calculation_key(&self) -> &str {
        &self.mac_calculation_key
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}

fn required_var(name: &'static str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| XPayError::Config(format!("missing required environment variable: {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_environments() {
        let s = PaymentSystemSettings::new("ALIAS_WEB_1", "key", "test").unwrap();
        assert_eq!(s.environment(), Environment::Test);
        let s = PaymentSystemSettings::new("ALIAS_WEB_1", "key", "production").unwrap();
        assert_eq!(s.environment(), Environment::Production);
    }

    #[test]
    fn rejects_unknown_environment() {
        for bad in ["staging", "", "TEST", "Production"] {
            let err = PaymentSystemSettings::new("ALIAS_WEB_1", "key", bad).unwrap_err();
            assert!(matches!(err, XPayError::InvalidEnvironment(ref v) if v == bad));
        }
    }

    #[test]
    fn debug_redacts_mac_key() {
        let s = PaymentSystemSettings::new("ALIAS_WEB_1", "super-secret", "test").unwrap();
        let out = format!("{s:?}");
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("super-secret"));
        assert!(out.contains("ALIAS_WEB_1"));
    }

    #[test]
    fn environment_display_round_trips() {
        for env in [Environment::Test, Environment::Production] {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
    }
}
