//! Payload module - submission payloads and display formatting.

mod payload_model;
mod payload_service;

pub use payload_model::{
    AssetAddressResolver, BeneficiaryAllocation, BeneficiaryDisplay, ShareDisplay,
    TokenDistribution,
};
pub use payload_service::{derive_submission_payload, display_rows, format_share};
