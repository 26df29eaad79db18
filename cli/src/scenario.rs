//! Scenario replay
//!
//! A scenario funds a token ledger and lists pool operations, each pinned to
//! a day offset from `start_time`. Every step runs as its own all-or-nothing
//! transaction; a rejected step is recorded and the replay moves on unless
//! `strict` is set. Time never runs backwards: a step dated before the one
//! preceding it is rejected without running.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use stake_core::constants::SECONDS_PER_DAY;
use stake_core::{Address, Amount, StakeId, Timestamp};
use staking::{
    BonusPolicy, DistributionReport, SharedPool, StakingConfig, StakingPool, UnstakeReceipt,
};
use std::collections::BTreeMap;
use std::path::Path;
use treasury::{InMemoryToken, TokenLedger};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub start_time: Timestamp,
    /// Opening balances in whole tokens
    #[serde(default)]
    pub balances: BTreeMap<Address, u64>,
    /// Whole tokens minted into the pool account before the first step
    #[serde(default)]
    pub reserve_tokens: u64,
    #[serde(default)]
    pub max_supply_tokens: Option<u64>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub day: u64,
    #[serde(default)]
    pub seconds: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Stake {
        account: Address,
        tokens: u64,
        days: u64,
    },
    Unstake {
        account: Address,
        stake_id: StakeId,
    },
    UnstakeAt {
        account: Address,
        index: usize,
    },
    Claim {
        account: Address,
    },
    Distribute {
        #[serde(default)]
        ppm: Option<u64>,
    },
    Checkpoint {
        account: Address,
        stake_id: StakeId,
    },
    SetPaused {
        caller: Address,
        paused: bool,
    },
    SetStakeLimits {
        caller: Address,
        min_tokens: u64,
        max_tokens: u64,
    },
    SetDurationLimits {
        caller: Address,
        min_days: u64,
        max_days: u64,
    },
    SetEarlyPenaltyPercent {
        caller: Address,
        percent: u64,
    },
    SetDailyEmissionPpm {
        caller: Address,
        ppm: u64,
    },
    SetBonusPolicy {
        caller: Address,
        policy: BonusPolicy,
    },
}

impl Action {
    pub fn label(&self) -> String {
        match self {
            Action::Stake {
                account,
                tokens,
                days,
            } => format!("stake {} tokens for {} days by {}", tokens, days, account),
            Action::Unstake { account, stake_id } => format!("unstake {} by {}", stake_id, account),
            Action::UnstakeAt { account, index } => {
                format!("unstake position {} by {}", index, account)
            }
            Action::Claim { account } => format!("claim rewards for {}", account),
            Action::Distribute { ppm: Some(ppm) } => format!("distribute {} ppm of supply", ppm),
            Action::Distribute { ppm: None } => "distribute daily rewards".to_string(),
            Action::Checkpoint { account, stake_id } => {
                format!("checkpoint {} of {}", stake_id, account)
            }
            Action::SetPaused { paused, .. } => format!("set paused = {}", paused),
            Action::SetStakeLimits {
                min_tokens,
                max_tokens,
                ..
            } => format!("set stake limits [{}, {}] tokens", min_tokens, max_tokens),
            Action::SetDurationLimits {
                min_days, max_days, ..
            } => format!("set duration limits [{}, {}] days", min_days, max_days),
            Action::SetEarlyPenaltyPercent { percent, .. } => {
                format!("set early penalty to {}%", percent)
            }
            Action::SetDailyEmissionPpm { ppm, .. } => format!("set daily emission to {} ppm", ppm),
            Action::SetBonusPolicy { policy, .. } => format!("set bonus policy {:?}", policy),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResult {
    Staked { stake_id: StakeId },
    Unstaked(UnstakeReceipt),
    Claimed { amount: Amount },
    Distributed(DistributionReport),
    Checkpointed { accrued: Amount },
    ConfigChanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub at: Timestamp,
    pub action: Action,
    pub result: std::result::Result<StepResult, String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Final state of a replay
pub struct Replay {
    pub outcomes: Vec<StepOutcome>,
    pub pool: StakingPool,
    pub token: InMemoryToken,
    pub end_time: Timestamp,
}

impl Replay {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok()).count()
    }
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn time_of(&self, step: &Step) -> Timestamp {
        self.start_time
            .saturating_add(step.day.saturating_mul(SECONDS_PER_DAY))
            .saturating_add(step.seconds)
    }

    /// Token ledger holding the opening balances and the pool reserve
    pub fn opening_ledger(&self, config: &StakingConfig) -> Result<InMemoryToken> {
        let mut token = match self.max_supply_tokens {
            Some(cap) => InMemoryToken::with_max_supply(Amount::from_tokens(cap)),
            None => InMemoryToken::new(),
        };
        for (account, tokens) in &self.balances {
            token
                .mint(account, Amount::from_tokens(*tokens))
                .with_context(|| format!("funding {}", account))?;
        }
        if self.reserve_tokens > 0 {
            token
                .mint(&config.pool_account, Amount::from_tokens(self.reserve_tokens))
                .context("funding pool reserve")?;
        }
        Ok(token)
    }

    pub fn replay(&self, config: StakingConfig, strict: bool) -> Result<Replay> {
        let token = self.opening_ledger(&config)?;
        let pool = StakingPool::new(config).context("invalid staking configuration")?;
        let shared = SharedPool::new(pool, token);

        let mut outcomes = Vec::with_capacity(self.steps.len());
        let mut end_time = self.start_time;

        for (index, step) in self.steps.iter().enumerate() {
            let at = self.time_of(step);
            let result = if at < end_time {
                Err(format!(
                    "step time {} precedes the previous step at {}",
                    at, end_time
                ))
            } else {
                end_time = at;
                shared
                    .transaction(|pool, token| apply(pool, token, &step.action, at))
                    .map_err(|e| e.to_string())
            };
            if let Err(e) = &result {
                log::warn!("Step {} ({}) rejected: {}", index, step.action.label(), e);
                if strict {
                    bail!("step {} ({}) failed: {}", index, step.action.label(), e);
                }
            }

            outcomes.push(StepOutcome {
                index,
                at,
                action: step.action.clone(),
                result,
            });
        }

        let (pool, token) = shared.into_inner();
        Ok(Replay {
            outcomes,
            pool,
            token,
            end_time,
        })
    }
}

fn apply<T: TokenLedger>(
    pool: &mut StakingPool,
    token: &mut T,
    action: &Action,
    now: Timestamp,
) -> staking::Result<StepResult> {
    let result = match action {
        Action::Stake {
            account,
            tokens,
            days,
        } => StepResult::Staked {
            stake_id: pool.stake(token, account, Amount::from_tokens(*tokens), *days, now)?,
        },
        Action::Unstake { account, stake_id } => {
            StepResult::Unstaked(pool.unstake(token, account, *stake_id, now)?)
        }
        Action::UnstakeAt { account, index } => {
            StepResult::Unstaked(pool.unstake_specific(token, account, *index, now)?)
        }
        Action::Claim { account } => StepResult::Claimed {
            amount: pool.claim_rewards(token, account, now)?,
        },
        Action::Distribute { ppm } => {
            StepResult::Distributed(pool.distribute_daily_rewards(token, *ppm, now)?)
        }
        Action::Checkpoint { account, stake_id } => StepResult::Checkpointed {
            accrued: pool.update_stake_reward_calculation(account, *stake_id, now)?,
        },
        Action::SetPaused { caller, paused } => {
            pool.set_paused(caller, *paused)?;
            StepResult::ConfigChanged
        }
        Action::SetStakeLimits {
            caller,
            min_tokens,
            max_tokens,
        } => {
            pool.set_stake_limits(
                caller,
                Amount::from_tokens(*min_tokens),
                Amount::from_tokens(*max_tokens),
            )?;
            StepResult::ConfigChanged
        }
        Action::SetDurationLimits {
            caller,
            min_days,
            max_days,
        } => {
            pool.set_duration_limits(caller, *min_days, *max_days)?;
            StepResult::ConfigChanged
        }
        Action::SetEarlyPenaltyPercent { caller, percent } => {
            pool.set_early_penalty_percent(caller, *percent)?;
            StepResult::ConfigChanged
        }
        Action::SetDailyEmissionPpm { caller, ppm } => {
            pool.set_daily_emission_ppm(caller, *ppm)?;
            StepResult::ConfigChanged
        }
        Action::SetBonusPolicy { caller, policy } => {
            pool.set_bonus_policy(caller, *policy)?;
            StepResult::ConfigChanged
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "start_time": 1000,
        "balances": { "alice": 1000, "bob": 1000 },
        "reserve_tokens": 500,
        "steps": [
            { "day": 0, "action": "stake", "account": "alice", "tokens": 100, "days": 30 },
            { "day": 0, "action": "stake", "account": "bob", "tokens": 100, "days": 30 },
            { "day": 1, "action": "distribute" },
            { "day": 2, "action": "set_paused", "caller": "mallory", "paused": true },
            { "day": 30, "action": "unstake", "account": "alice", "stake_id": 1 },
            { "day": 31, "action": "unstake_at", "account": "bob", "index": 0 }
        ]
    }"#;

    fn config() -> StakingConfig {
        StakingConfig {
            reward_rate_per_second: Amount::from(1_000u64),
            ..StakingConfig::default()
        }
    }

    #[test]
    fn test_parse_steps() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).unwrap();
        assert_eq!(scenario.steps.len(), 6);
        assert_eq!(scenario.steps[2].action, Action::Distribute { ppm: None });
        assert_eq!(scenario.time_of(&scenario.steps[4]), 1000 + 30 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_replay_records_rejections() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).unwrap();
        let replay = scenario.replay(config(), false).unwrap();

        assert_eq!(replay.outcomes.len(), 6);
        assert_eq!(replay.failures(), 1);
        assert!(!replay.outcomes[3].is_ok());
        assert!(!replay.pool.is_paused());
        assert_eq!(replay.pool.total_staked(), Amount::ZERO);
        replay.pool.check_invariants().unwrap();
    }

    #[test]
    fn test_step_dated_before_previous_is_rejected() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "balances": { "alice": 1000 },
                "reserve_tokens": 500,
                "steps": [
                    { "day": 5, "action": "stake", "account": "alice", "tokens": 100, "days": 30 },
                    { "day": 3, "action": "stake", "account": "alice", "tokens": 100, "days": 30 },
                    { "day": 5, "seconds": 60, "action": "stake", "account": "alice", "tokens": 50, "days": 30 }
                ]
            }"#,
        )
        .unwrap();

        let replay = scenario.replay(config(), false).unwrap();
        assert_eq!(replay.failures(), 1);
        assert!(replay.outcomes[1]
            .result
            .as_ref()
            .unwrap_err()
            .contains("precedes"));
        assert!(replay.outcomes[2].is_ok());
        assert_eq!(replay.pool.stake_count("alice"), 2);
        assert_eq!(replay.pool.total_staked(), Amount::from_tokens(150));
        assert_eq!(replay.end_time, 5 * SECONDS_PER_DAY + 60);

        assert!(scenario.replay(config(), true).is_err());
    }

    #[test]
    fn test_strict_replay_stops_on_failure() {
        let scenario: Scenario = serde_json::from_str(SCENARIO).unwrap();
        assert!(scenario.replay(config(), true).is_err());
    }
}
