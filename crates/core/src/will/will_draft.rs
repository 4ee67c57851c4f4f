use chrono::Duration;
use log::{debug, info};

use crate::allocation::{AllocationEngine, DistributionMode};
use crate::config::{NetworkConfig, PassdownConfig};
use crate::errors::{Error, Result, ValidationError};
use crate::payload::{derive_submission_payload, AssetAddressResolver};

use super::{ApprovalRequest, CreateWillRequest, DeathCondition};

/// A will being edited: target chain, beneficiary allocation and the
/// conditions that release it.
#[derive(Debug, Clone)]
pub struct WillDraft {
    chain: String,
    allocation: AllocationEngine,
    inactivity_period: Duration,
    trusted_wallets: Vec<String>,
}

impl WillDraft {
    /// Starts a draft on the configured default chain.
    pub fn new(config: &PassdownConfig) -> Result<Self> {
        Self::for_chain(config, &config.default_chain, DistributionMode::PerAsset)
    }

    /// Starts a draft whose asset catalogue is every token registered on `chain`.
    pub fn for_chain(config: &PassdownConfig, chain: &str, mode: DistributionMode) -> Result<Self> {
        let assets = config.token_catalogue(chain)?;
        let allocation = AllocationEngine::with_config(assets, mode, config.engine)?;
        Ok(Self {
            chain: chain.to_string(),
            allocation,
            inactivity_period: Duration::days(i64::from(config.default_inactivity_days)),
            trusted_wallets: vec![String::new()],
        })
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn allocation(&self) -> &AllocationEngine {
        &self.allocation
    }

    pub fn allocation_mut(&mut self) -> &mut AllocationEngine {
        &mut self.allocation
    }

    /// Moves the draft to another chain. Every asset already in the
    /// allocation must have a token address there.
    pub fn select_chain(&mut self, config: &PassdownConfig, chain: &str) -> Result<()> {
        let resolver = config.resolver_for(chain)?;
        if let Some(missing) = self
            .allocation
            .set()
            .assets()
            .iter()
            .find(|asset| resolver.resolve(asset).is_none())
        {
            return Err(Error::UnresolvedAsset(missing.clone()));
        }
        debug!("Draft moved from {} to {}", self.chain, chain);
        self.chain = chain.to_string();
        Ok(())
    }

    pub fn inactivity_period(&self) -> Duration {
        self.inactivity_period
    }

    pub fn inactivity_period_days(&self) -> i64 {
        self.inactivity_period.num_days()
    }

    pub fn set_inactivity_period_days(&mut self, days: u32) -> Result<()> {
        if days == 0 {
            return Err(ValidationError::InvalidInput(
                "inactivity period must be at least one day".to_string(),
            )
            .into());
        }
        self.inactivity_period = Duration::days(i64::from(days));
        Ok(())
    }

    pub fn trusted_wallets(&self) -> &[String] {
        &self.trusted_wallets
    }

    pub fn add_trusted_wallet(&mut self) -> usize {
        self.trusted_wallets.push(String::new());
        self.trusted_wallets.len() - 1
    }

    pub fn set_trusted_wallet(&mut self, index: usize, address: impl Into<String>) -> Result<()> {
        let len = self.trusted_wallets.len();
        let slot = self
            .trusted_wallets
            .get_mut(index)
            .ok_or_else(|| Error::invalid_index(index, len))?;
        *slot = address.into();
        Ok(())
    }

    pub fn remove_trusted_wallet(&mut self, index: usize) -> Result<String> {
        let len = self.trusted_wallets.len();
        if index >= len {
            return Err(Error::invalid_index(index, len));
        }
        if len == 1 {
            return Err(Error::SoleTrustedWalletRemoval);
        }
        Ok(self.trusted_wallets.remove(index))
    }

    /// Trusted wallets with blank rows dropped.
    fn filled_trusted_wallets(&self) -> Vec<String> {
        self.trusted_wallets
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn deployed_network<'a>(&self, config: &'a PassdownConfig) -> Result<&'a NetworkConfig> {
        let network = config.network(&self.chain)?;
        if network.will_contract.is_empty() {
            return Err(Error::Config(format!(
                "no will contract configured for chain '{}'",
                self.chain
            )));
        }
        Ok(network)
    }

    fn inactivity_period_seconds(&self) -> u64 {
        self.inactivity_period.num_seconds().max(0) as u64
    }

    /// Conditions that release this will, in evaluation order.
    pub fn death_conditions(&self) -> Vec<DeathCondition> {
        let mut conditions = vec![DeathCondition::Inactivity {
            period_seconds: self.inactivity_period_seconds(),
        }];
        let wallets = self.filled_trusted_wallets();
        if !wallets.is_empty() {
            conditions.push(DeathCondition::TrustedWalletAttestation { wallets });
        }
        conditions.push(DeathCondition::OracleCheck);
        conditions
    }

    pub fn build_create_will_request(&self, config: &PassdownConfig) -> Result<CreateWillRequest> {
        let network = self.deployed_network(config)?;
        let resolver = config.resolver_for(&self.chain)?;
        let token_details = derive_submission_payload(self.allocation.set(), &resolver)?;

        let request = CreateWillRequest {
            chain_id: network.chain_id,
            contract_address: network.will_contract.clone(),
            token_details,
            trusted_wallets: self.filled_trusted_wallets(),
            inactivity_period_seconds: self.inactivity_period_seconds(),
        };
        info!(
            "Built create-will request for chain {} with {} beneficiaries across {} tokens",
            request.chain_id,
            self.allocation.set().len(),
            request.token_details.len()
        );
        Ok(request)
    }

    /// One allowance request per token in the allocation.
    pub fn build_approval_requests(&self, config: &PassdownConfig) -> Result<Vec<ApprovalRequest>> {
        let network = self.deployed_network(config)?;
        let resolver = config.resolver_for(&self.chain)?;
        self.allocation
            .set()
            .assets()
            .iter()
            .map(|asset| {
                let token_address = resolver
                    .resolve(asset)
                    .ok_or_else(|| Error::UnresolvedAsset(asset.clone()))?;
                Ok(ApprovalRequest {
                    chain_id: network.chain_id,
                    token_address,
                    spender: network.will_contract.clone(),
                    amount: config.approval_amount.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config() -> PassdownConfig {
        let mut config = PassdownConfig::default();
        config.networks.insert(
            "base".to_string(),
            NetworkConfig {
                chain_id: 8453,
                will_contract: "0xwill".to_string(),
                tokens: BTreeMap::from([
                    ("USDC".to_string(), "0xusdc".to_string()),
                    ("WETH".to_string(), "0xweth".to_string()),
                ]),
            },
        );
        config.networks.get_mut("baseSepolia").unwrap().will_contract = "0xtestwill".to_string();
        config
    }

    #[test]
    fn test_new_draft_uses_defaults() {
        let draft = WillDraft::new(&config()).unwrap();
        assert_eq!(draft.chain(), "baseSepolia");
        assert_eq!(draft.inactivity_period_days(), 365);
        assert_eq!(draft.trusted_wallets(), &[String::new()]);
        assert_eq!(draft.allocation().set().assets(), &["USDC".to_string()]);
        assert_eq!(draft.allocation().set().share(0, "USDC").unwrap(), 100.0);
    }

    #[test]
    fn test_inactivity_period_must_be_positive() {
        let mut draft = WillDraft::new(&config()).unwrap();
        assert!(matches!(
            draft.set_inactivity_period_days(0),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
        draft.set_inactivity_period_days(30).unwrap();
        assert_eq!(draft.inactivity_period(), Duration::days(30));
    }

    #[test]
    fn test_trusted_wallet_editing() {
        let mut draft = WillDraft::new(&config()).unwrap();
        assert_eq!(draft.remove_trusted_wallet(0), Err(Error::SoleTrustedWalletRemoval));

        let index = draft.add_trusted_wallet();
        draft.set_trusted_wallet(index, "0xfriend").unwrap();
        assert_eq!(
            draft.set_trusted_wallet(5, "0xnobody"),
            Err(Error::InvalidIndex { index: 5, len: 2 })
        );
        assert_eq!(draft.remove_trusted_wallet(0).unwrap(), "");
        assert_eq!(draft.trusted_wallets(), &["0xfriend".to_string()]);
    }

    #[test]
    fn test_death_conditions_skip_blank_wallets() {
        let mut draft = WillDraft::new(&config()).unwrap();
        assert_eq!(
            draft.death_conditions(),
            vec![
                DeathCondition::Inactivity {
                    period_seconds: 31_536_000
                },
                DeathCondition::OracleCheck,
            ]
        );

        draft.set_trusted_wallet(0, " 0xfriend ").unwrap();
        assert_eq!(
            draft.death_conditions()[1],
            DeathCondition::TrustedWalletAttestation {
                wallets: vec!["0xfriend".to_string()]
            }
        );
    }

    #[test]
    fn test_build_create_will_request() {
        let config = config();
        let mut draft =
            WillDraft::for_chain(&config, "base", DistributionMode::PerAsset).unwrap();
        let allocation = draft.allocation_mut();
        allocation.add_beneficiary();
        allocation.set_address(0, "0xalice").unwrap();
        allocation.set_address(1, "0xbob").unwrap();
        allocation.set_share(1, "WETH", 25.0).unwrap();
        draft.set_trusted_wallet(0, "0xfriend").unwrap();

        let request = draft.build_create_will_request(&config).unwrap();

        assert_eq!(request.chain_id, 8453);
        assert_eq!(request.contract_address, "0xwill");
        assert_eq!(request.inactivity_period_seconds, 31_536_000);
        assert_eq!(request.trusted_wallets, vec!["0xfriend".to_string()]);
        assert_eq!(request.token_details.len(), 2);
        assert_eq!(request.token_details[0].token_address, "0xusdc");
        let weth: Vec<u32> = request.token_details[1]
            .beneficiaries
            .iter()
            .map(|b| b.percentage)
            .collect();
        assert_eq!(weth, vec![7500, 2500]);
    }

    #[test]
    fn test_request_requires_deployed_contract() {
        let config = PassdownConfig::default();
        let draft = WillDraft::new(&config).unwrap();
        assert!(matches!(
            draft.build_create_will_request(&config),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            draft.build_approval_requests(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_build_approval_requests() {
        let config = config();
        let draft = WillDraft::for_chain(&config, "base", DistributionMode::Equal).unwrap();
        let approvals = draft.build_approval_requests(&config).unwrap();

        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals[1].token_address, "0xweth");
        assert_eq!(approvals[1].spender, "0xwill");
        assert_eq!(approvals[1].amount, "100000000000000");
    }

    #[test]
    fn test_select_chain_requires_matching_tokens() {
        let config = config();
        let mut draft = WillDraft::for_chain(&config, "base", DistributionMode::PerAsset).unwrap();
        assert_eq!(
            draft.select_chain(&config, "baseSepolia"),
            Err(Error::UnresolvedAsset("WETH".to_string()))
        );
        assert_eq!(
            draft.select_chain(&config, "polygon"),
            Err(Error::UnsupportedChain("polygon".to_string()))
        );

        let mut draft = WillDraft::new(&config).unwrap();
        draft.select_chain(&config, "base").unwrap();
        assert_eq!(draft.chain(), "base");
    }
}
