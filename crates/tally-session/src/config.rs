//! # Session Configuration
//!
//! Tax rate, shipping tiers and discount rules for a checkout session.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_TAX_RATE=0.08                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     TALLY_CONFIG_PATH, or                                              │
//! │     ~/.config/checkout/checkout.toml (Linux)                           │
//! │     ~/Library/Application Support/com.tally.checkout/checkout.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     tax 14%, shipping 10.00 / 20.00 / 30.00, no discounts              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [checkout]
//! tax_rate = "0.14"
//!
//! [checkout.shipping_tiers]
//! tier1 = 1000   # cents, 1-5 items
//! tier2 = 2000   # 6-10 items
//! tier3 = 3000   # 11+ items
//!
//! [[discounts]]
//! id = "spring-sale"
//! name = "Spring sale"
//! kind = { type = "percentage", rate = "0.10" }
//! minimum_purchase = 5000
//!
//! [[discounts]]
//! id = "sweets-3-for-2"
//! name = "Sweets: buy 2 get 1"
//! kind = { type = "buy_x_get_y", buy = 2, free = 1 }
//! applicable_categories = ["Sweets"]
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{CheckoutConfig, DiscountRule, Money, Rate, ShippingTiers};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// Overrides the tax rate (decimal fraction, e.g. `0.08`).
pub const ENV_TAX_RATE: &str = "TALLY_TAX_RATE";

/// Overrides the config file location.
pub const ENV_CONFIG_PATH: &str = "TALLY_CONFIG_PATH";

const CONFIG_FILE_NAME: &str = "checkout.toml";

// =============================================================================
// Checkout Settings
// =============================================================================

/// The `[checkout]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Tax rate applied at checkout. Default: 0.14
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Rate,

    /// Shipping fees in cents. Default: 1000 / 2000 / 3000
    #[serde(default = "default_shipping_tiers")]
    pub shipping_tiers: ShippingTiers,
}

fn default_tax_rate() -> Rate {
    Rate::from_bps(1400).unwrap_or_default()
}

fn default_shipping_tiers() -> ShippingTiers {
    ShippingTiers {
        tier1: Money::from_cents(1000),
        tier2: Money::from_cents(2000),
        tier3: Money::from_cents(3000),
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            tax_rate: default_tax_rate(),
            shipping_tiers: default_shipping_tiers(),
        }
    }
}

impl From<CheckoutSettings> for CheckoutConfig {
    fn from(settings: CheckoutSettings) -> Self {
        CheckoutConfig::new(settings.tax_rate, settings.shipping_tiers)
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Tax and shipping.
    #[serde(default)]
    pub checkout: CheckoutSettings,

    /// Discount rules, in priority order for ties.
    #[serde(default)]
    pub discounts: Vec<DiscountRule>,
}

impl SessionConfig {
    /// Creates a config with defaults and no discount rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `TALLY_CONFIG_PATH`, else the
    ///    platform config directory); a missing file is not an error
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses and validates a TOML document. No environment overrides.
    pub fn from_toml_str(contents: &str) -> SessionResult<Self> {
        let config: SessionConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// ## Rules
    /// - Shipping tiers are not negative
    /// - Every discount rule is valid on its own
    /// - Discount rule ids are unique
    pub fn validate(&self) -> SessionResult<()> {
        self.checkout.shipping_tiers.validate()?;

        let mut seen = BTreeSet::new();
        for rule in &self.discounts {
            rule.validate().map_err(|e| {
                SessionError::InvalidConfig(format!("discount rule '{}': {}", rule.id, e))
            })?;

            if !seen.insert(rule.id.as_str()) {
                return Err(SessionError::InvalidConfig(format!(
                    "duplicate discount rule id '{}'",
                    rule.id
                )));
            }
        }

        Ok(())
    }

    /// The pricing configuration handed to checkout.
    pub fn checkout_config(&self) -> CheckoutConfig {
        self.checkout.into()
    }

    /// Number of rules that are switched on.
    pub fn active_rule_count(&self) -> usize {
        self.discounts.iter().filter(|rule| rule.active).count()
    }

    fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> SessionResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| lookup(ENV_CONFIG_PATH).map(PathBuf::from))
            .or_else(Self::default_config_path);

        match path {
            Some(path) if path.is_dir() => {
                return Err(SessionError::ConfigLoad(format!(
                    "{} is a directory, not a config file",
                    path.display()
                )));
            }
            Some(path) if path.exists() => {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            }
            Some(path) => debug!(?path, "Config file not found, using defaults"),
            None => debug!("No config directory available, using defaults"),
        }

        config.apply_overrides(lookup)?;
        config.validate()?;

        info!(
            tax_rate = %config.checkout.tax_rate,
            rules = config.discounts.len(),
            active_rules = config.active_rule_count(),
            "Session config loaded"
        );

        Ok(config)
    }

    /// Applies overrides read through `lookup` (the process environment in
    /// production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> SessionResult<()> {
        if let Some(raw) = lookup(ENV_TAX_RATE) {
            let value: Decimal = raw.trim().parse().map_err(|_| {
                SessionError::InvalidConfig(format!("{ENV_TAX_RATE} is not a decimal: '{raw}'"))
            })?;
            let rate = Rate::new(value)
                .map_err(|e| SessionError::InvalidConfig(format!("{ENV_TAX_RATE}: {e}")))?;

            debug!(tax_rate = %rate, "Overriding tax rate from environment");
            self.checkout.tax_rate = rate;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "checkout")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tally_core::DiscountKind;

    const SAMPLE: &str = r#"
        [checkout]
        tax_rate = "0.08"

        [checkout.shipping_tiers]
        tier1 = 500
        tier2 = 900
        tier3 = 1500

        [[discounts]]
        id = "spring-sale"
        name = "Spring sale"
        kind = { type = "percentage", rate = "0.10" }
        minimum_purchase = 5000

        [[discounts]]
        id = "sweets-3-for-2"
        name = "Sweets: buy 2 get 1"
        kind = { type = "buy_x_get_y", buy = 2, free = 1 }
        applicable_categories = ["Sweets"]
        active = false
    "#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn missing_path() -> Option<PathBuf> {
        Some(std::env::temp_dir().join("tally-session-tests-does-not-exist.toml"))
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();

        assert_eq!(config.checkout.tax_rate.value(), Decimal::new(14, 2));
        assert_eq!(config.checkout.shipping_tiers.tier1, Money::from_cents(1000));
        assert_eq!(config.checkout.shipping_tiers.tier3, Money::from_cents(3000));
        assert!(config.discounts.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str() {
        let config = SessionConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.checkout.tax_rate.value(), Decimal::new(8, 2));
        assert_eq!(config.checkout.shipping_tiers.tier2, Money::from_cents(900));
        assert_eq!(config.discounts.len(), 2);
        assert_eq!(config.active_rule_count(), 1);

        let spring = &config.discounts[0];
        assert_eq!(
            spring.kind,
            DiscountKind::Percentage {
                rate: Rate::new(Decimal::new(10, 2)).unwrap()
            }
        );
        assert_eq!(spring.minimum_purchase, Some(Money::from_cents(5000)));
        assert!(spring.active);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str("[checkout]\ntax_rate = \"0.05\"\n").unwrap();

        assert_eq!(config.checkout.tax_rate.value(), Decimal::new(5, 2));
        assert_eq!(config.checkout.shipping_tiers, default_shipping_tiers());

        let empty = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(empty, SessionConfig::default());
    }

    #[test]
    fn test_toml_rejects_out_of_range_rate() {
        let result = SessionConfig::from_toml_str("[checkout]\ntax_rate = \"1.5\"\n");
        assert!(matches!(result, Err(SessionError::TomlParse(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_rule_ids() {
        let mut config = SessionConfig::from_toml_str(SAMPLE).unwrap();
        let mut copy = config.discounts[0].clone();
        copy.name = "Another".to_string();
        config.discounts.push(copy);

        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_rule() {
        let toml = r#"
            [[discounts]]
            id = "broken"
            name = "Broken"
            kind = { type = "buy_x_get_y", buy = 0, free = 1 }
        "#;

        assert!(matches!(
            SessionConfig::from_toml_str(toml),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_shipping() {
        let mut config = SessionConfig::default();
        config.checkout.shipping_tiers.tier2 = Money::from_cents(-1);

        assert!(matches!(config.validate(), Err(SessionError::Core(_))));
    }

    #[test]
    fn test_env_overrides_tax_rate() {
        let config = SessionConfig::load_with(missing_path(), env(&[(ENV_TAX_RATE, "0.2")])).unwrap();
        assert_eq!(config.checkout.tax_rate.value(), Decimal::new(2, 1));
    }

    #[test]
    fn test_env_rejects_bad_tax_rate() {
        assert!(matches!(
            SessionConfig::load_with(missing_path(), env(&[(ENV_TAX_RATE, "abc")])),
            Err(SessionError::InvalidConfig(_))
        ));
        assert!(matches!(
            SessionConfig::load_with(missing_path(), env(&[(ENV_TAX_RATE, "1.01")])),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = SessionConfig::load_with(missing_path(), env(&[])).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_directory_path_fails() {
        assert!(matches!(
            SessionConfig::load_with(Some(std::env::temp_dir()), env(&[])),
            Err(SessionError::ConfigLoad(_))
        ));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = SessionConfig::load_or_default(Some(std::env::temp_dir()));
        assert!(config.discounts.is_empty());
        assert_eq!(config.checkout.shipping_tiers, default_shipping_tiers());
    }

    #[test]
    fn test_load_file_then_env() {
        let path = std::env::temp_dir().join(format!("tally-session-{}.toml", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();

        let config = SessionConfig::load_with(Some(path.clone()), env(&[(ENV_TAX_RATE, "0.12")]));
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.checkout.tax_rate.value(), Decimal::new(12, 2));
        assert_eq!(config.checkout.shipping_tiers.tier1, Money::from_cents(500));
        assert_eq!(config.discounts.len(), 2);
    }

    #[test]
    fn test_config_path_from_env() {
        let path = std::env::temp_dir().join(format!("tally-session-env-{}.toml", std::process::id()));
        std::fs::write(&path, "[checkout]\ntax_rate = \"0.03\"\n").unwrap();

        let lookup = env(&[(ENV_CONFIG_PATH, path.to_str().unwrap())]);
        let config = SessionConfig::load_with(None, lookup);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.unwrap().checkout.tax_rate.value(), Decimal::new(3, 2));
    }

    #[test]
    fn test_checkout_config_conversion() {
        let config = SessionConfig::from_toml_str(SAMPLE).unwrap();
        let checkout = config.checkout_config();

        assert_eq!(checkout.tax_rate, config.checkout.tax_rate);
        assert_eq!(checkout.shipping_tiers, config.checkout.shipping_tiers);
    }
}
