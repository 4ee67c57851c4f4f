//! Will domain models.

use serde::{Deserialize, Serialize};

use crate::payload::TokenDistribution;

/// A dead-man's-switch condition that can trigger distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeathCondition {
    /// Owner has not transacted for the given period.
    Inactivity {
        #[serde(rename = "periodSeconds")]
        period_seconds: u64,
    },
    /// Any of these wallets attests to the owner's death.
    TrustedWalletAttestation { wallets: Vec<String> },
    /// An external oracle confirms the death record.
    OracleCheck,
}

/// Everything the transaction layer needs to encode a create-will call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWillRequest {
    pub chain_id: u64,
    pub contract_address: String,
    pub token_details: Vec<TokenDistribution>,
    pub trusted_wallets: Vec<String>,
    pub inactivity_period_seconds: u64,
}

/// Token allowance the will contract needs before the will can be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub chain_id: u64,
    pub token_address: String,
    pub spender: String,
    pub amount: String,
}
