//! # Rate Configuration
//!
//! Loads the zone, method, weight and tax tables for the rate engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VERDANT_STATE_TAX_RATES={"NC":4.75,"CA":0.0725}                    │
//! │     VERDANT_DEFAULT_TAX_RATE=0                                         │
//! │     VERDANT_DEFAULT_WEIGHT_LB=2.5                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <PATH>, else $VERDANT_RATES_CONFIG, else                  │
//! │     ~/.config/verdant/rates.toml (Linux)                               │
//! │     ~/Library/Application Support/com.verdant.verdant/rates.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     The storefront reference tables                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A section present in the file replaces the whole default table. Tax
//! rates from the environment are merged over the configured ones.
//!
//! ## Configuration File Format
//! ```toml
//! # rates.toml
//! [[zones]]
//! id = "zone1"
//! name = "Local"
//! regions = ["NC", "SC", "VA"]
//! multiplier = "0.8"
//!
//! [[methods]]
//! id = "standard"
//! name = "Standard Shipping"
//! min_days = 5
//! max_days = 8
//! base_cost_cents = 499
//! weight_multiplier = "1.50"
//! free_above_cents = 5000
//! business_days_only = true
//!
//! [weights]
//! default_lb = "2.5"
//! [weights.products]
//! NWS_001 = "2.5"
//!
//! [tax]
//! default_rate = "0"
//! [tax.rates]
//! NC = "0.0475"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use verdant_core::{reference, ProductWeightTable, RateEngine, ShippingMethod, ShippingZone, TaxRateTable, ZoneTable};

use crate::error::CheckoutResult;

/// Config file path override.
pub const ENV_CONFIG_PATH: &str = "VERDANT_RATES_CONFIG";

/// JSON object of region → rate, merged over the configured rates.
pub const ENV_STATE_TAX_RATES: &str = "VERDANT_STATE_TAX_RATES";

pub const ENV_DEFAULT_TAX_RATE: &str = "VERDANT_DEFAULT_TAX_RATE";

pub const ENV_DEFAULT_WEIGHT_LB: &str = "VERDANT_DEFAULT_WEIGHT_LB";

// =============================================================================
// Weight Settings
// =============================================================================

/// Product weight table settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSettings {
    /// Weight (lb) for products missing from `products`.
    #[serde(default = "reference::default_product_weight")]
    pub default_lb: Decimal,

    /// `product_id → weight (lb)`.
    #[serde(default)]
    pub products: BTreeMap<String, Decimal>,
}

impl Default for WeightSettings {
    fn default() -> Self {
        WeightSettings {
            default_lb: reference::default_product_weight(),
            products: reference::product_weights()
                .into_iter()
                .map(|(id, lb)| (id.to_string(), lb))
                .collect(),
        }
    }
}

// =============================================================================
// Tax Settings
// =============================================================================

/// Sales tax settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Rate for regions missing from `rates`.
    #[serde(default)]
    pub default_rate: Decimal,

    /// `region → rate` as fractions (`0.0475` = 4.75%).
    #[serde(default)]
    pub rates: BTreeMap<String, Decimal>,
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            default_rate: Decimal::ZERO,
            rates: reference::tax_rates()
                .into_iter()
                .map(|(region, rate)| (region.to_string(), rate))
                .collect(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete rate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Zones in resolution order; the last is the catch-all.
    #[serde(default = "reference::zones")]
    pub zones: Vec<ShippingZone>,

    #[serde(default = "reference::methods")]
    pub methods: Vec<ShippingMethod>,

    #[serde(default)]
    pub weights: WeightSettings,

    #[serde(default)]
    pub tax: TaxSettings,
}

impl Default for RateConfig {
    fn default() -> Self {
        RateConfig {
            zones: reference::zones(),
            methods: reference::methods(),
            weights: WeightSettings::default(),
            tax: TaxSettings::default(),
        }
    }
}

impl RateConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Override with the config file (if it exists)
    /// 3. Override with environment variables
    /// 4. Validate by building the engine
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    /// [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| env(ENV_CONFIG_PATH).map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading rate config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns the reference tables if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load rate config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> CheckoutResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Effective configuration as TOML.
    pub fn to_toml(&self) -> CheckoutResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every table invariant.
    pub fn validate(&self) -> CheckoutResult<()> {
        self.build_engine().map(|_| ())
    }

    /// Builds the validated rate engine from this configuration.
    pub fn build_engine(&self) -> CheckoutResult<RateEngine> {
        let zones = ZoneTable::new(self.zones.clone())?;
        let weights = ProductWeightTable::new(
            self.weights.products.iter().map(|(id, lb)| (id.clone(), *lb)),
            self.weights.default_lb,
        )?;
        let taxes = TaxRateTable::new(
            self.tax.rates.iter().map(|(region, rate)| (region.as_str(), *rate)),
            self.tax.default_rate,
        )?;

        Ok(RateEngine::new(zones, self.methods.clone(), weights, taxes)?)
    }

    /// Applies environment variable overrides.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(ENV_STATE_TAX_RATES) {
            match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw) {
                Ok(map) => {
                    for (region, value) in map {
                        match decimal_from_json(&value) {
                            Some(raw_rate) => match normalize_rate(raw_rate) {
                                Some(rate) => {
                                    let region = region.trim().to_uppercase();
                                    debug!(region = %region, rate = %rate, "Overriding tax rate from environment");
                                    self.tax.rates.insert(region, rate);
                                }
                                None => warn!(region = %region, rate = %raw_rate, "Ignoring out-of-range tax rate"),
                            },
                            None => warn!(region = %region, value = %value, "Ignoring non-numeric tax rate"),
                        }
                    }
                }
                Err(e) => warn!(error = %e, "Unable to parse {} as a JSON object", ENV_STATE_TAX_RATES),
            }
        }

        if let Some(raw) = env(ENV_DEFAULT_TAX_RATE) {
            match raw.trim().parse::<Decimal>() {
                Ok(raw_rate) => match normalize_rate(raw_rate) {
                    Some(rate) => {
                        self.tax.default_rate = rate;
                        debug!(rate = %rate, "Overriding default tax rate from environment");
                    }
                    None => warn!(value = %raw, "Ignoring out-of-range {}", ENV_DEFAULT_TAX_RATE),
                },
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_DEFAULT_TAX_RATE),
            }
        }

        if let Some(raw) = env(ENV_DEFAULT_WEIGHT_LB) {
            match raw.trim().parse::<Decimal>() {
                Ok(lb) => {
                    debug!(weight = %lb, "Overriding default product weight from environment");
                    self.weights.default_lb = lb;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_DEFAULT_WEIGHT_LB),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "verdant", "verdant").map(|dirs| dirs.config_dir().join("rates.toml"))
    }
}

/// Reads an environment rate: values of 1 or more are percentages, values
/// at or below 0 mean "no tax". Returns `None` for a percentage of 100 or
/// more.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use verdant_checkout::config::normalize_rate;
///
/// assert_eq!(normalize_rate(Decimal::new(475, 2)), Some(Decimal::new(475, 4)));
/// assert_eq!(normalize_rate(Decimal::new(-5, 2)), Some(Decimal::ZERO));
/// assert_eq!(normalize_rate(Decimal::ONE_HUNDRED), None);
/// ```
pub fn normalize_rate(value: Decimal) -> Option<Decimal> {
    let rate = if value <= Decimal::ZERO {
        Decimal::ZERO
    } else if value >= Decimal::ONE {
        value / Decimal::ONE_HUNDRED
    } else {
        value
    };
    (rate < Decimal::ONE).then_some(rate)
}

fn decimal_from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => n.to_string().parse().ok(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use std::collections::HashMap;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("verdant-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn missing_path() -> PathBuf {
        std::env::temp_dir().join(format!("verdant-missing-{}.toml", std::process::id()))
    }

    #[test]
    fn test_default_config_is_reference_tables() {
        let config = RateConfig::default();
        assert_eq!(config.zones.len(), 7);
        assert_eq!(config.methods.len(), 4);
        assert_eq!(config.weights.products.len(), 12);
        assert_eq!(config.tax.rates.get("NC"), Some(&d("0.0475")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = RateConfig::load_with_env(Some(missing_path()), no_env).unwrap();
        assert_eq!(config, RateConfig::default());
    }

    #[test]
    fn test_file_sections_replace_defaults() {
        let path = temp_config(
            "sections",
            r#"
[[zones]]
id = "near"
name = "Near"
regions = ["nc"]
multiplier = "1.0"

[[zones]]
id = "far"
name = "Far"
multiplier = "2.0"

[tax]
default_rate = "0.05"
"#,
        );
        let config = RateConfig::load_with_env(Some(path.clone()), no_env).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.methods, reference::methods());
        assert!(config.tax.rates.is_empty());

        let engine = config.build_engine().unwrap();
        assert_eq!(engine.resolve_zone("NC").id, "near");
        assert_eq!(engine.resolve_zone("CA").id, "far");
        assert_eq!(engine.tax_rate("NC").fraction(), d("0.05"));
    }

    #[test]
    fn test_config_path_from_environment() {
        let path = temp_config("envpath", "[weights]\ndefault_lb = \"4\"\n");
        let env = env_of(&[(ENV_CONFIG_PATH, path.to_str().unwrap())]);
        let config = RateConfig::load_with_env(None, env).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.weights.default_lb, d("4"));
        assert!(config.weights.products.is_empty());
    }

    #[test]
    fn test_invalid_table_fails_load() {
        let path = temp_config(
            "overlap",
            r#"
[[zones]]
id = "a"
name = "A"
regions = ["NC"]
multiplier = "1.0"

[[zones]]
id = "b"
name = "B"
regions = ["NC"]
multiplier = "2.0"
"#,
        );
        let result = RateConfig::load_with_env(Some(path.clone()), no_env);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(CheckoutError::Core(_))));
    }

    #[test]
    fn test_malformed_toml_fails_load() {
        let path = temp_config("malformed", "zones = 'not a list'\n");
        let result = RateConfig::load_with_env(Some(path.clone()), no_env);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(CheckoutError::ConfigLoadFailed(_))));
    }

    #[test]
    fn test_env_tax_rates_merge_and_normalize() {
        let env = env_of(&[
            (ENV_STATE_TAX_RATES, r#"{"or": 5, "NC": "0.05", "XX": "abc", "TX": -1}"#),
            (ENV_DEFAULT_TAX_RATE, "2"),
        ]);
        let config = RateConfig::load_with_env(Some(missing_path()), env).unwrap();

        assert_eq!(config.tax.rates.get("OR"), Some(&d("0.05")));
        assert_eq!(config.tax.rates.get("NC"), Some(&d("0.05")));
        assert_eq!(config.tax.rates.get("TX"), Some(&Decimal::ZERO));
        assert_eq!(config.tax.rates.get("CA"), Some(&d("0.0725")));
        assert!(!config.tax.rates.contains_key("XX"));
        assert_eq!(config.tax.default_rate, d("0.02"));
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let env = env_of(&[
            (ENV_STATE_TAX_RATES, "{not json"),
            (ENV_DEFAULT_WEIGHT_LB, "heavy"),
        ]);
        let config = RateConfig::load_with_env(Some(missing_path()), env).unwrap();
        assert_eq!(config, RateConfig::default());
    }

    #[test]
    fn test_env_default_weight_is_validated() {
        let env = env_of(&[(ENV_DEFAULT_WEIGHT_LB, "0")]);
        assert!(RateConfig::load_with_env(Some(missing_path()), env).is_err());
    }

    #[test]
    fn test_normalize_rate() {
        assert_eq!(normalize_rate(d("0.0725")), Some(d("0.0725")));
        assert_eq!(normalize_rate(d("8")), Some(d("0.08")));
        assert_eq!(normalize_rate(d("1")), Some(d("0.01")));
        assert_eq!(normalize_rate(Decimal::ZERO), Some(Decimal::ZERO));
        assert_eq!(normalize_rate(d("100")), None);
    }

    #[test]
    fn test_env_rate_of_one_does_not_break_load() {
        let env = env_of(&[
            (ENV_STATE_TAX_RATES, r#"{"OR": 1, "WA": 150}"#),
            (ENV_DEFAULT_TAX_RATE, "100"),
        ]);
        let config = RateConfig::load_with_env(Some(missing_path()), env).unwrap();

        assert_eq!(config.tax.rates.get("OR"), Some(&d("0.01")));
        assert!(!config.tax.rates.contains_key("WA"));
        assert_eq!(config.tax.default_rate, Decimal::ZERO);
        assert!(config.build_engine().is_ok());
    }

    #[test]
    fn test_toml_output_reloads() {
        let config = RateConfig::default();
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("[[zones]]"));
        assert!(toml_str.contains("[tax.rates]"));

        let reparsed: RateConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_default_config_path_names_rates_file() {
        if let Some(path) = RateConfig::default_config_path() {
            assert!(path.ends_with("rates.toml"));
        }
    }
}
