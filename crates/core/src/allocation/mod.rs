//! Allocation module - beneficiary shares and the rebalancing engine.

mod allocation_engine;
mod allocation_model;


pub use allocation_engine::{AllocationCommand, AllocationEngine};
pub use allocation_model::{AllocationSet, Beneficiary, DistributionMode};
