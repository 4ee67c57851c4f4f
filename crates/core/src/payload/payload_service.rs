//! Converts an allocation set into contract-facing and display-facing forms.

use std::cmp::Ordering;

use log::debug;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::allocation::{AllocationSet, DistributionMode};
use crate::constants::{
    ALL_ASSETS, BASIS_POINTS_PER_PERCENT, DISPLAY_DECIMAL_PRECISION, TOTAL_BASIS_POINTS,
};
use crate::errors::{Error, Result};

use super::{
    AssetAddressResolver, BeneficiaryAllocation, BeneficiaryDisplay, ShareDisplay,
    TokenDistribution,
};

/// Builds one [`TokenDistribution`] per catalogue asset, in catalogue order.
///
/// Fails with `UnresolvedAsset` if the resolver has no address for an asset.
pub fn derive_submission_payload(
    set: &AllocationSet,
    resolver: &dyn AssetAddressResolver,
) -> Result<Vec<TokenDistribution>> {
    set.assets()
        .iter()
        .map(|asset| {
            let token_address = resolver
                .resolve(asset)
                .ok_or_else(|| Error::UnresolvedAsset(asset.clone()))?;
            let points = to_basis_points(&set.column(asset));
            let beneficiaries = set
                .beneficiaries()
                .iter()
                .zip(points)
                .map(|(b, percentage)| BeneficiaryAllocation {
                    beneficiary_address: b.address.clone(),
                    percentage,
                })
                .collect();
            debug!("Derived distribution for {} at {}", asset, token_address);
            Ok(TokenDistribution {
                token_address,
                beneficiaries,
            })
        })
        .collect()
}

/// Scales percentage shares to basis points so the column sums to exactly
/// 10 000, handing leftover units to the largest fractional parts first.
/// Every entry stays within one unit of `round(share * 100)`.
pub(crate) fn to_basis_points(shares: &[f64]) -> Vec<u32> {
    let scaled: Vec<f64> = shares
        .iter()
        .map(|s| s.max(0.0) * f64::from(BASIS_POINTS_PER_PERCENT))
        .collect();
    let mut points: Vec<u32> = scaled.iter().map(|v| v.floor() as u32).collect();

    let assigned: u32 = points.iter().sum();
    let mut remaining = TOTAL_BASIS_POINTS.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = scaled[a] - scaled[a].floor();
        let frac_b = scaled[b] - scaled[b].floor();
        frac_b
            .partial_cmp(&frac_a)
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    for i in order {
        if remaining == 0 {
            break;
        }
        points[i] += 1;
        remaining -= 1;
    }
    points
}

/// Formats a share as a two-decimal percentage string.
pub fn format_share(value: f64) -> String {
    let decimal = Decimal::from_f64(value.max(0.0))
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(
            DISPLAY_DECIMAL_PRECISION,
            RoundingStrategy::MidpointAwayFromZero,
        );
    format!("{:.2}", decimal)
}

/// Rows for read-only rendering. Equal mode shows a single pooled `ALL` entry.
pub fn display_rows(set: &AllocationSet) -> Vec<BeneficiaryDisplay> {
    set.beneficiaries()
        .iter()
        .map(|b| {
            let shares = match set.mode() {
                DistributionMode::Equal => vec![ShareDisplay {
                    asset: ALL_ASSETS.to_string(),
                    percentage: format_share(b.share(&set.assets()[0]).unwrap_or(0.0)),
                }],
                DistributionMode::PerAsset => set
                    .assets()
                    .iter()
                    .map(|asset| ShareDisplay {
                        asset: asset.clone(),
                        percentage: format_share(b.share(asset).unwrap_or(0.0)),
                    })
                    .collect(),
            };
            BeneficiaryDisplay {
                address: b.address.clone(),
                shares,
            }
        })
        .collect()
}
