//! Configuration for networks, token registries and engine behaviour.
//!
//! Everything here is plain serde data with defaults, so hosts can load a
//! partial JSON file and fall back to built-in values for the rest.

mod config_model;

pub use config_model::{
    ChainAssetResolver, EngineConfig, NetworkConfig, OutOfRangePolicy, PassdownConfig,
};
