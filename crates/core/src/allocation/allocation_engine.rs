//! Rebalancing engine that keeps every asset's shares summing to 100.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, OutOfRangePolicy};
use crate::constants::{ALL_ASSETS, FULL_SHARE, SHARE_TOLERANCE};
use crate::errors::{Error, Result};

use super::{AllocationSet, Beneficiary, DistributionMode};

/// A single edit, as replayed by hosts that receive edits as events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum AllocationCommand {
    AddBeneficiary,
    RemoveBeneficiary { index: usize },
    SetAddress { index: usize, address: String },
    SetShare { index: usize, asset: String, value: f64 },
    SwitchMode { mode: DistributionMode },
    AdjustAllEqual,
}

/// Owns one [`AllocationSet`] for the length of a will-editing session.
///
/// Every operation either leaves the set balanced or fails without touching it.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    set: AllocationSet,
    config: EngineConfig,
}

impl AllocationEngine {
    pub fn new(assets: Vec<String>, mode: DistributionMode) -> Result<Self> {
        Self::with_config(assets, mode, EngineConfig::default())
    }

    pub fn with_config(
        assets: Vec<String>,
        mode: DistributionMode,
        config: EngineConfig,
    ) -> Result<Self> {
        Ok(Self {
            set: AllocationSet::new(assets, mode)?,
            config,
        })
    }

    pub fn set(&self) -> &AllocationSet {
        &self.set
    }

    pub fn into_set(self) -> AllocationSet {
        self.set
    }

    /// Appends a beneficiary holding 0 of every asset and returns its index.
    pub fn add_beneficiary(&mut self) -> usize {
        self.set
            .beneficiaries
            .push(Beneficiary::with_uniform_share(&self.set.assets, 0.0));
        let index = self.set.len() - 1;
        debug!("Added beneficiary at index {}", index);
        index
    }

    /// Removes a beneficiary. The last remaining beneficiary cannot be removed.
    ///
    /// Equal mode resets everyone to an equal split; per-asset mode spreads the
    /// freed share uniformly over the survivors.
    pub fn remove_beneficiary(&mut self, index: usize) -> Result<Beneficiary> {
        let len = self.set.len();
        if index >= len {
            return Err(Error::invalid_index(index, len));
        }
        if len == 1 {
            return Err(Error::SoleBeneficiaryRemoval);
        }

        let removed = self.set.beneficiaries.remove(index);
        match self.set.mode {
            DistributionMode::Equal => self.adjust_all_equal(),
            DistributionMode::PerAsset => {
                let assets = self.set.assets.clone();
                for asset in &assets {
                    let mut column = self.set.column(asset);
                    correct_remainder(&mut column);
                    self.set.write_column(std::slice::from_ref(asset), &column);
                }
            }
        }
        debug!("Removed beneficiary at index {} ({} left)", index, self.set.len());
        Ok(removed)
    }

    pub fn set_address(&mut self, index: usize, address: impl Into<String>) -> Result<()> {
        let len = self.set.len();
        let beneficiary = self
            .set
            .beneficiaries
            .get_mut(index)
            .ok_or_else(|| Error::invalid_index(index, len))?;
        beneficiary.address = address.into();
        Ok(())
    }

    /// Moves one beneficiary's share of `asset` to `value` and rebalances the rest.
    ///
    /// In equal mode `asset` may be [`ALL_ASSETS`] or any catalogue asset; the
    /// pooled result is written to every asset.
    pub fn set_share(&mut self, index: usize, asset: &str, value: f64) -> Result<()> {
        let len = self.set.len();
        if index >= len {
            return Err(Error::invalid_index(index, len));
        }
        let (source, targets) = self.column_keys(asset)?;
        let value = self.admit_share(value)?;

        let mut column = self.set.column(&source);
        rebalance_column(&mut column, index, value);
        self.set.write_column(&targets, &column);

        debug!(
            "Set share of beneficiary {} for {} to {:.4} (now {:.4})",
            index, asset, value, column[index]
        );
        Ok(())
    }

    /// Switches distribution mode.
    ///
    /// Entering equal mode discards custom values in favour of `100 / n`.
    /// Leaving it broadcasts the pooled value into every asset.
    pub fn switch_mode(&mut self, mode: DistributionMode) {
        if self.set.mode == mode {
            return;
        }
        match mode {
            DistributionMode::Equal => {
                self.set.mode = mode;
                self.adjust_all_equal();
            }
            DistributionMode::PerAsset => {
                let pooled = self.set.column(&self.set.assets[0]);
                let assets = self.set.assets.clone();
                self.set.write_column(&assets, &pooled);
                self.set.mode = mode;
            }
        }
        debug!("Switched distribution mode to {:?}", mode);
    }

    /// Gives every beneficiary `100 / n` of every asset.
    pub fn adjust_all_equal(&mut self) {
        let equal = FULL_SHARE / self.set.len() as f64;
        let column = vec![equal; self.set.len()];
        let assets = self.set.assets.clone();
        self.set.write_column(&assets, &column);
    }

    pub fn apply(&mut self, command: AllocationCommand) -> Result<()> {
        match command {
            AllocationCommand::AddBeneficiary => {
                self.add_beneficiary();
            }
            AllocationCommand::RemoveBeneficiary { index } => {
                self.remove_beneficiary(index)?;
            }
            AllocationCommand::SetAddress { index, address } => {
                self.set_address(index, address)?;
            }
            AllocationCommand::SetShare {
                index,
                asset,
                value,
            } => self.set_share(index, &asset, value)?,
            AllocationCommand::SwitchMode { mode } => self.switch_mode(mode),
            AllocationCommand::AdjustAllEqual => self.adjust_all_equal(),
        }
        Ok(())
    }

    /// Resolves which asset column an edit reads from and which it writes to.
    fn column_keys(&self, asset: &str) -> Result<(String, Vec<String>)> {
        match self.set.mode {
            DistributionMode::PerAsset => {
                if !self.set.contains_asset(asset) {
                    return Err(Error::UnknownAsset(asset.to_string()));
                }
                Ok((asset.to_string(), vec![asset.to_string()]))
            }
            DistributionMode::Equal => {
                if asset != ALL_ASSETS && !self.set.contains_asset(asset) {
                    return Err(Error::UnknownAsset(asset.to_string()));
                }
                Ok((self.set.assets[0].clone(), self.set.assets.clone()))
            }
        }
    }

    fn admit_share(&self, value: f64) -> Result<f64> {
        if (0.0..=FULL_SHARE).contains(&value) {
            return Ok(value);
        }
        match self.config.out_of_range_policy {
            OutOfRangePolicy::Reject => Err(Error::OutOfRangeShare(value)),
            OutOfRangePolicy::Clamp => {
                let clamped = if value.is_nan() {
                    0.0
                } else {
                    value.clamp(0.0, FULL_SHARE)
                };
                warn!("Share {} is out of range, clamped to {}", value, clamped);
                Ok(clamped)
            }
        }
    }
}

/// Sets `column[index]` to `value`, pushes the difference back evenly onto the
/// other rows (never below zero) and corrects any remainder.
fn rebalance_column(column: &mut [f64], index: usize, value: f64) {
    let n = column.len();
    let diff = value - column[index];
    if n > 1 {
        let push_back = diff / (n - 1) as f64;
        for (i, share) in column.iter_mut().enumerate() {
            if i != index {
                *share = (*share - push_back).max(0.0);
            }
        }
    }
    column[index] = value;
    correct_remainder(column);
}

/// Adds `(100 - total) / n` to every row, then settles any row pushed out of bounds.
fn correct_remainder(column: &mut [f64]) {
    let total: f64 = column.iter().sum();
    if (FULL_SHARE - total).abs() > SHARE_TOLERANCE {
        let adjustment = (FULL_SHARE - total) / column.len() as f64;
        column.iter_mut().for_each(|share| *share += adjustment);
    }
    settle_into_bounds(column);
}

/// Clamps rows into 0..=100 and spreads the residual over rows with room left.
///
/// Each pass either clears the residual or pins at least one more row to a
/// bound, so `n + 1` passes always suffice.
fn settle_into_bounds(column: &mut [f64]) {
    if column.iter().all(|s| (0.0..=FULL_SHARE).contains(s)) {
        return;
    }
    debug!("Settling out-of-bounds shares {:?}", column);

    for _ in 0..=column.len() {
        column
            .iter_mut()
            .for_each(|share| *share = share.clamp(0.0, FULL_SHARE));
        let residual = FULL_SHARE - column.iter().sum::<f64>();
        if residual.abs() <= SHARE_TOLERANCE {
            return;
        }

        let open: Vec<usize> = column
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                (residual > 0.0 && **s < FULL_SHARE) || (residual < 0.0 && **s > 0.0)
            })
            .map(|(i, _)| i)
            .collect();
        if open.is_empty() {
            return;
        }
        let step = residual / open.len() as f64;
        for i in open {
            column[i] += step;
        }
    }
    column
        .iter_mut()
        .for_each(|share| *share = share.clamp(0.0, FULL_SHARE));
}
