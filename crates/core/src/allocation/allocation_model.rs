//! Allocation models for will beneficiaries.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::constants::{FULL_SHARE, SHARE_TOLERANCE};
use crate::errors::{Error, Result};

/// How shares are kept across the asset catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionMode {
    /// One pooled percentage per beneficiary, mirrored into every asset.
    Equal,
    /// Each asset is rebalanced independently.
    #[default]
    PerAsset,
}

/// A single heir and their percentage of each asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    /// Chain account identifier. Not validated here.
    pub address: String,
    /// Percentage (0-100) held per asset id
    pub shares: HashMap<String, f64>,
}

impl Beneficiary {
    pub(crate) fn with_uniform_share(assets: &[String], value: f64) -> Self {
        Self {
            address: String::new(),
            shares: assets.iter().map(|a| (a.clone(), value)).collect(),
        }
    }

    /// Returns the share held for `asset`, if the asset is known.
    pub fn share(&self, asset: &str) -> Option<f64> {
        self.shares.get(asset).copied()
    }
}

/// Ordered beneficiaries plus the active mode and the fixed asset catalogue.
///
/// Fields are private: every mutation goes through
/// [`AllocationEngine`](super::AllocationEngine) so the per-asset sum stays at 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSet {
    pub(crate) assets: Vec<String>,
    pub(crate) mode: DistributionMode,
    pub(crate) beneficiaries: Vec<Beneficiary>,
}

impl AllocationSet {
    /// Creates a set with one beneficiary holding 100% of every asset.
    pub fn new(assets: Vec<String>, mode: DistributionMode) -> Result<Self> {
        validate_catalogue(&assets)?;
        let beneficiaries = vec![Beneficiary::with_uniform_share(&assets, FULL_SHARE)];
        Ok(Self {
            assets,
            mode,
            beneficiaries,
        })
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn mode(&self) -> DistributionMode {
        self.mode
    }

    pub fn beneficiaries(&self) -> &[Beneficiary] {
        &self.beneficiaries
    }

    pub fn len(&self) -> usize {
        self.beneficiaries.len()
    }

    /// Always false for a set built through [`AllocationSet::new`].
    pub fn is_empty(&self) -> bool {
        self.beneficiaries.is_empty()
    }

    pub fn contains_asset(&self, asset: &str) -> bool {
        self.assets.iter().any(|a| a == asset)
    }

    pub fn beneficiary(&self, index: usize) -> Result<&Beneficiary> {
        self.beneficiaries
            .get(index)
            .ok_or_else(|| Error::invalid_index(index, self.beneficiaries.len()))
    }

    pub fn share(&self, index: usize, asset: &str) -> Result<f64> {
        let beneficiary = self.beneficiary(index)?;
        beneficiary
            .share(asset)
            .ok_or_else(|| Error::UnknownAsset(asset.to_string()))
    }

    /// Sum of all beneficiaries' shares for `asset`.
    pub fn total(&self, asset: &str) -> Result<f64> {
        if !self.contains_asset(asset) {
            return Err(Error::UnknownAsset(asset.to_string()));
        }
        Ok(self.column(asset).iter().sum())
    }

    /// True when every asset sums to 100 and every share lies in 0..=100.
    pub fn is_balanced(&self) -> bool {
        self.assets.iter().all(|asset| {
            let column = self.column(asset);
            let total: f64 = column.iter().sum();
            (total - FULL_SHARE).abs() <= 1e-6
                && column
                    .iter()
                    .all(|s| *s >= -SHARE_TOLERANCE && *s <= FULL_SHARE + SHARE_TOLERANCE)
        })
    }

    pub(crate) fn column(&self, asset: &str) -> Vec<f64> {
        self.beneficiaries
            .iter()
            .map(|b| b.share(asset).unwrap_or(0.0))
            .collect()
    }

    /// Writes `column` (one value per beneficiary) into each of `assets`.
    pub(crate) fn write_column(&mut self, assets: &[String], column: &[f64]) {
        for (beneficiary, value) in self.beneficiaries.iter_mut().zip(column) {
            for asset in assets {
                beneficiary.shares.insert(asset.clone(), *value);
            }
        }
    }
}

fn validate_catalogue(assets: &[String]) -> Result<()> {
    if assets.is_empty() {
        return Err(Error::InvalidCatalogue(
            "at least one asset is required".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for asset in assets {
        if asset.trim().is_empty() {
            return Err(Error::InvalidCatalogue("asset id is empty".to_string()));
        }
        if !seen.insert(asset.as_str()) {
            return Err(Error::InvalidCatalogue(format!("duplicate asset '{}'", asset)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_set_gives_sole_beneficiary_everything() {
        let set = AllocationSet::new(assets(&["ETH", "USDC"]), DistributionMode::PerAsset).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.share(0, "ETH").unwrap(), 100.0);
        assert_eq!(set.share(0, "USDC").unwrap(), 100.0);
        assert_eq!(set.beneficiaries()[0].address, "");
        assert!(set.is_balanced());
    }

    #[test]
    fn test_new_set_rejects_bad_catalogue() {
        assert!(matches!(
            AllocationSet::new(vec![], DistributionMode::Equal),
            Err(Error::InvalidCatalogue(_))
        ));
        assert!(matches!(
            AllocationSet::new(assets(&["USDC", "USDC"]), DistributionMode::Equal),
            Err(Error::InvalidCatalogue(_))
        ));
        assert!(matches!(
            AllocationSet::new(assets(&[" "]), DistributionMode::Equal),
            Err(Error::InvalidCatalogue(_))
        ));
    }

    #[test]
    fn test_lookups_report_bad_index_and_asset() {
        let set = AllocationSet::new(assets(&["USDC"]), DistributionMode::PerAsset).unwrap();
        assert_eq!(set.share(3, "USDC"), Err(Error::InvalidIndex { index: 3, len: 1 }));
        assert_eq!(set.share(0, "DAI"), Err(Error::UnknownAsset("DAI".to_string())));
        assert_eq!(set.total("DAI"), Err(Error::UnknownAsset("DAI".to_string())));
    }

    #[test]
    fn test_distribution_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&DistributionMode::PerAsset).unwrap(),
            "\"PER_ASSET\""
        );
        let mode: DistributionMode = serde_json::from_str("\"EQUAL\"").unwrap();
        assert_eq!(mode, DistributionMode::Equal);
    }
}
