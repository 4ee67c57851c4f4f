use std::path::Path;

use anyhow::Context;
use passdown_core::allocation::{AllocationCommand, DistributionMode};
use passdown_core::config::PassdownConfig;
use passdown_core::will::WillDraft;
use serde::Deserialize;

/// A will-editing session recorded as JSON.
///
/// Edits are applied in order, each one finishing before the next starts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WillScript {
    pub chain: Option<String>,
    pub mode: Option<DistributionMode>,
    pub inactivity_days: Option<u32>,
    pub trusted_wallets: Vec<String>,
    pub edits: Vec<AllocationCommand>,
}

impl WillScript {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse script {}", path.display()))
    }

    pub fn build_draft(&self, config: &PassdownConfig) -> anyhow::Result<WillDraft> {
        let chain = self.chain.as_deref().unwrap_or(&config.default_chain);
        let mut draft = WillDraft::for_chain(config, chain, self.mode.unwrap_or_default())?;

        if let Some(days) = self.inactivity_days {
            draft.set_inactivity_period_days(days)?;
        }
        for (index, wallet) in self.trusted_wallets.iter().enumerate() {
            if index > 0 {
                draft.add_trusted_wallet();
            }
            draft.set_trusted_wallet(index, wallet.as_str())?;
        }

        for (step, edit) in self.edits.iter().enumerate() {
            tracing::debug!(step, ?edit, "Applying edit");
            draft
                .allocation_mut()
                .apply(edit.clone())
                .with_context(|| format!("edit #{} ({:?}) was rejected", step, edit))?;
        }
        Ok(draft)
    }
}
