//! Economic constants shared by every crate in the workspace

/// Token decimals (base units per token = 10^18)
pub const TOKEN_DECIMALS: usize = 18;

/// Seconds in one staking day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Fixed-point scale used by reward-per-second and C-Share math
pub const SCALE_DECIMALS: usize = 18;

/// Maximum token supply in whole tokens (100 billion)
pub const MAX_SUPPLY_TOKENS: u64 = 100_000_000_000;

/// Quantity bonus ceiling in whole tokens (150 million)
pub const QUANTITY_BONUS_CAP_TOKENS: u64 = 150_000_000;

/// Quantity bonus divisor in whole tokens (1.5 billion)
pub const QUANTITY_BONUS_DIVISOR_TOKENS: u64 = 1_500_000_000;

/// Days after which the time bonus stops growing (~10 years)
pub const MAX_TIME_BONUS_DAYS: u64 = 3641;

/// Time bonus divisor (days)
pub const TIME_BONUS_DIVISOR: u64 = 1820;

/// Window after a stake's end during which no late penalty applies
pub const GRACE_PERIOD_DAYS: u64 = 14;

pub const GRACE_PERIOD_SECONDS: u64 = GRACE_PERIOD_DAYS * SECONDS_PER_DAY;

/// Late penalty per day, in parts per [`LATE_PENALTY_DENOMINATOR`]
pub const LATE_PENALTY_RATE_PER_DAY: u64 = 143;

pub const LATE_PENALTY_DENOMINATOR: u64 = 100_000;

/// Stakes shorter than this use the fixed early-penalty threshold
pub const SHORT_STAKE_THRESHOLD_DAYS: u64 = 180;

/// Early-penalty threshold for short stakes
pub const SHORT_STAKE_PENALTY_DAYS: u64 = 90;

/// Penalty split (percent); treasury receives the remainder
pub const PENALTY_BURN_PERCENT: u64 = 25;
pub const PENALTY_POOL_PERCENT: u64 = 50;

/// Starting value of the global C-Share rate
pub const INITIAL_CSHARE_RATE: u64 = 100_000;

/// Daily distribution percentage denominator (parts per million)
pub const PPM_DENOMINATOR: u64 = 1_000_000;

/// Default daily emission: 0.01% of supply
pub const DEFAULT_DAILY_EMISSION_PPM: u64 = 100;
