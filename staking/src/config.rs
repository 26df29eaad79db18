//! Staking pool configuration (TOML)
//!
//! Example:
//! ```toml
//! owner = "0xowner"
//! pool_account = "staking-pool"
//! treasury_account = "treasury"
//! min_stake = "1000000000000000000"
//! max_stake = "100000000000000000000000000000"
//! min_days = 1
//! max_days = 5555
//! early_penalty_percent = 100
//! daily_emission_ppm = 100
//! bonus_policy = "clamp_at_cap"
//! penalty_distribution = "split"
//! paused = false
//! ```

use economics::BonusPolicy;
use serde::{Deserialize, Serialize};
use stake_core::constants::{
    DEFAULT_DAILY_EMISSION_PPM, INITIAL_CSHARE_RATE, PPM_DENOMINATOR, SECONDS_PER_DAY,
};
use stake_core::{max_supply, Address, Amount};
use std::fs;
use std::path::Path;
use thiserror::Error;
use treasury::PenaltyDistribution;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StakingConfig {
    /// Only this address may change configuration
    pub owner: Address,

    /// Account holding the reward reserve and retained penalties
    pub pool_account: Address,

    /// Account receiving the treasury share of penalties
    pub treasury_account: Address,

    pub min_stake: Amount,
    pub max_stake: Amount,
    pub min_days: u64,
    pub max_days: u64,

    /// Scales the early-penalty formula before it is capped at the reward
    pub early_penalty_percent: u64,

    /// Tokens emitted per second across the whole pool
    pub reward_rate_per_second: Amount,

    /// Default daily distribution, in parts per million of total supply
    pub daily_emission_ppm: u64,

    pub bonus_policy: BonusPolicy,
    pub penalty_distribution: PenaltyDistribution,
    pub initial_cshare_rate: Amount,
    pub paused: bool,
}

impl Default for StakingConfig {
    fn default() -> Self {
        // 0.01% of max supply per day, spread over the day's seconds
        let reward_rate_per_second = max_supply()
            .mul_div_u64(DEFAULT_DAILY_EMISSION_PPM, PPM_DENOMINATOR * SECONDS_PER_DAY)
            .unwrap_or(Amount::ZERO);

        Self {
            owner: "owner".to_string(),
            pool_account: "staking-pool".to_string(),
            treasury_account: "treasury".to_string(),
            min_stake: Amount::from_tokens(1),
            max_stake: max_supply(),
            min_days: 1,
            max_days: 5555,
            early_penalty_percent: 100,
            reward_rate_per_second,
            daily_emission_ppm: DEFAULT_DAILY_EMISSION_PPM,
            bonus_policy: BonusPolicy::default(),
            penalty_distribution: PenaltyDistribution::default(),
            initial_cshare_rate: Amount::from(INITIAL_CSHARE_RATE),
            paused: false,
        }
    }
}

impl StakingConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: StakingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_stake.is_zero() {
            return Err(ConfigError::Invalid("min_stake must be positive".to_string()));
        }
        if self.min_stake > self.max_stake {
            return Err(ConfigError::Invalid(format!(
                "min_stake {} exceeds max_stake {}",
                self.min_stake, self.max_stake
            )));
        }
        if self.min_days == 0 || self.min_days > self.max_days {
            return Err(ConfigError::Invalid(format!(
                "invalid duration bounds [{}, {}]",
                self.min_days, self.max_days
            )));
        }
        if self.early_penalty_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "early_penalty_percent must be <= 100, got {}",
                self.early_penalty_percent
            )));
        }
        if self.daily_emission_ppm > PPM_DENOMINATOR {
            return Err(ConfigError::Invalid(format!(
                "daily_emission_ppm must be <= {}, got {}",
                PPM_DENOMINATOR, self.daily_emission_ppm
            )));
        }
        if self.pool_account == self.treasury_account {
            return Err(ConfigError::Invalid(
                "pool_account and treasury_account must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StakingConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.reward_rate_per_second.is_zero());
    }

    #[test]
    fn test_parse_partial_file() {
        let content = r#"
owner = "0xadmin"
min_stake = "500"
max_stake = 1000000
min_days = 7
bonus_policy = "flat_ten_percent"
penalty_distribution = "split"
"#;
        let config = StakingConfig::parse(content).unwrap();
        assert_eq!(config.owner, "0xadmin");
        assert_eq!(config.min_stake, Amount::from(500u64));
        assert_eq!(config.max_stake, Amount::from(1_000_000u64));
        assert_eq!(config.min_days, 7);
        assert_eq!(config.max_days, 5555);
        assert_eq!(config.bonus_policy, BonusPolicy::FlatTenPercent);
        assert_eq!(config.penalty_distribution, PenaltyDistribution::Split);
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let content = r#"
min_stake = "10"
max_stake = "5"
"#;
        assert!(matches!(
            StakingConfig::parse(content),
            Err(ConfigError::Invalid(_))
        ));

        let config = StakingConfig {
            min_days: 30,
            max_days: 10,
            ..StakingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staking.toml");

        let config = StakingConfig {
            early_penalty_percent: 80,
            ..StakingConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = StakingConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
