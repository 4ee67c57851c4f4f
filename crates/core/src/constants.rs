/// Sentinel asset id used for the pooled value in equal-distribution mode
pub const ALL_ASSETS: &str = "ALL";

/// Every asset column must sum to this value
pub const FULL_SHARE: f64 = 100.0;

/// Tolerance used when comparing share sums and bounds
pub const SHARE_TOLERANCE: f64 = 1e-9;

/// Multiplier from a percentage share to contract basis points
pub const BASIS_POINTS_PER_PERCENT: u32 = 100;

/// Basis points held by a fully allocated asset
pub const TOTAL_BASIS_POINTS: u32 = 10_000;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Default chain selected for a new will
pub const DEFAULT_CHAIN: &str = "baseSepolia";

/// Default inactivity period before the will triggers
pub const DEFAULT_INACTIVITY_DAYS: u32 = 365;

/// Default token allowance granted to the will contract
pub const DEFAULT_APPROVAL_AMOUNT: &str = "100000000000000";
