use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_APPROVAL_AMOUNT, DEFAULT_CHAIN, DEFAULT_INACTIVITY_DAYS};
use crate::errors::{Error, Result};
use crate::payload::AssetAddressResolver;

/// What to do with a requested share outside 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutOfRangePolicy {
    /// Clamp into range and log a warning
    #[default]
    Clamp,
    /// Fail with `OutOfRangeShare`
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub out_of_range_policy: OutOfRangePolicy,
}

/// A supported chain and the contracts deployed on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    pub chain_id: u64,
    /// Address of the will contract. Empty until deployed.
    pub will_contract: String,
    /// Asset id -> token contract address
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassdownConfig {
    pub networks: BTreeMap<String, NetworkConfig>,
    pub default_chain: String,
    pub default_inactivity_days: u32,
    /// Token allowance granted to the will contract, as a decimal string
    pub approval_amount: String,
    pub engine: EngineConfig,
}

impl Default for PassdownConfig {
    fn default() -> Self {
        let base_sepolia = NetworkConfig {
            chain_id: 84532,
            will_contract: String::new(),
            tokens: BTreeMap::from([(
                "USDC".to_string(),
                "0x52Bf57b19c37Bd2A92b54018aE18AA4D651a6a43".to_string(),
            )]),
        };
        Self {
            networks: BTreeMap::from([(DEFAULT_CHAIN.to_string(), base_sepolia)]),
            default_chain: DEFAULT_CHAIN.to_string(),
            default_inactivity_days: DEFAULT_INACTIVITY_DAYS,
            approval_amount: DEFAULT_APPROVAL_AMOUNT.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl PassdownConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.networks.contains_key(&self.default_chain) {
            return Err(Error::Config(format!(
                "default chain '{}' has no network entry",
                self.default_chain
            )));
        }
        if self.default_inactivity_days == 0 {
            return Err(Error::Config(
                "defaultInactivityDays must be at least 1".to_string(),
            ));
        }
        if self.approval_amount.is_empty()
            || !self.approval_amount.chars().all(|c| c.is_ascii_digit())
        {
            return Err(Error::Config(format!(
                "approvalAmount '{}' is not a decimal integer",
                self.approval_amount
            )));
        }
        for (name, network) in &self.networks {
            if network.tokens.is_empty() {
                return Err(Error::Config(format!("network '{}' lists no tokens", name)));
            }
        }
        Ok(())
    }

    pub fn network(&self, chain: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(chain)
            .ok_or_else(|| Error::UnsupportedChain(chain.to_string()))
    }

    /// Asset ids available on `chain`, in registry order.
    pub fn token_catalogue(&self, chain: &str) -> Result<Vec<String>> {
        Ok(self.network(chain)?.tokens.keys().cloned().collect())
    }

    pub fn resolver_for(&self, chain: &str) -> Result<ChainAssetResolver<'_>> {
        Ok(ChainAssetResolver {
            network: self.network(chain)?,
        })
    }
}

/// Resolves asset ids through one network's token registry.
#[derive(Debug, Clone, Copy)]
pub struct ChainAssetResolver<'a> {
    network: &'a NetworkConfig,
}

impl AssetAddressResolver for ChainAssetResolver<'_> {
    fn resolve(&self, asset: &str) -> Option<String> {
        self.network.tokens.get(asset).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PassdownConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_inactivity_days, 365);
        assert_eq!(config.network("baseSepolia").unwrap().chain_id, 84532);
        assert_eq!(config.token_catalogue("baseSepolia").unwrap(), vec!["USDC"]);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = PassdownConfig::from_json_str(
            r#"{ "engine": { "outOfRangePolicy": "REJECT" }, "defaultInactivityDays": 30 }"#,
        )
        .unwrap();
        assert_eq!(config.engine.out_of_range_policy, OutOfRangePolicy::Reject);
        assert_eq!(config.default_inactivity_days, 30);
        assert_eq!(config.default_chain, "baseSepolia");
    }

    #[test]
    fn test_full_json_config() {
        let config = PassdownConfig::from_json_str(
            r#"{
                "networks": {
                    "base": {
                        "chainId": 8453,
                        "willContract": "0xwill",
                        "tokens": { "USDC": "0xusdc", "WETH": "0xweth" }
                    }
                },
                "defaultChain": "base"
            }"#,
        )
        .unwrap();
        assert_eq!(config.token_catalogue("base").unwrap(), vec!["USDC", "WETH"]);
        let resolver = config.resolver_for("base").unwrap();
        assert_eq!(resolver.resolve("WETH"), Some("0xweth".to_string()));
        assert_eq!(resolver.resolve("DAI"), None);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert!(matches!(
            PassdownConfig::from_json_str(r#"{ "defaultChain": "mainnet" }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PassdownConfig::from_json_str(r#"{ "defaultInactivityDays": 0 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PassdownConfig::from_json_str(r#"{ "approvalAmount": "1e9" }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            PassdownConfig::from_json_str("not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_chain() {
        let config = PassdownConfig::default();
        assert_eq!(
            config.network("polygon").unwrap_err(),
            Error::UnsupportedChain("polygon".to_string())
        );
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passdown.json");
        std::fs::write(&path, r#"{ "defaultInactivityDays": 90 }"#).unwrap();

        let config = PassdownConfig::from_path(&path).unwrap();
        assert_eq!(config.default_inactivity_days, 90);
        assert!(matches!(
            PassdownConfig::from_path(dir.path().join("missing.json")),
            Err(Error::Config(_))
        ));
    }
}
