//! Passdown Core - the allocation model behind a digital will.
//!
//! This crate owns the beneficiary allocation, the rebalancing rules that keep
//! every asset at exactly 100%, and the conversion into the payload handed to
//! the transaction-building layer. It performs no I/O beyond loading
//! configuration.

pub mod allocation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod payload;
pub mod will;

pub use allocation::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
