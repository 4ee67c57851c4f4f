//! Payload models handed to the transaction-building layer and to renderers.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Maps an asset id to the address of its token contract.
pub trait AssetAddressResolver {
    fn resolve(&self, asset: &str) -> Option<String>;
}

impl AssetAddressResolver for HashMap<String, String> {
    fn resolve(&self, asset: &str) -> Option<String> {
        self.get(asset).cloned()
    }
}

impl AssetAddressResolver for BTreeMap<String, String> {
    fn resolve(&self, asset: &str) -> Option<String> {
        self.get(asset).cloned()
    }
}

/// One beneficiary's cut of a token, in basis points (10 000 = 100%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryAllocation {
    pub beneficiary_address: String,
    pub percentage: u32,
}

/// Distribution of a single token across all beneficiaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDistribution {
    pub token_address: String,
    pub beneficiaries: Vec<BeneficiaryAllocation>,
}

impl TokenDistribution {
    pub fn total_basis_points(&self) -> u32 {
        self.beneficiaries.iter().map(|b| b.percentage).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDisplay {
    pub asset: String,
    /// Two-decimal percentage, e.g. "33.33"
    pub percentage: String,
}

/// Read-only view of one beneficiary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryDisplay {
    pub address: String,
    pub shares: Vec<ShareDisplay>,
}
