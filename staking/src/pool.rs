//! Staking pool aggregate
//!
//! Owns every stake, the global totals, the active-user registry and the
//! C-Share oracle. Each operation takes the token ledger and the current
//! time explicitly. Validation and arithmetic run before any token movement,
//! and pool state is written only after the token side succeeded.

use economics::{
    BonusCalculator, BonusPolicy, CShareRateOracle, CShareSample, PenaltyEngine, PenaltyInput,
    StakeTiming,
};
use serde::{Deserialize, Serialize};
use stake_core::constants::PPM_DENOMINATOR;
use stake_core::{Address, Amount, StakeId, Timestamp};
use treasury::{TokenLedger, TreasuryPool, TreasurySource};

use crate::accrual::RewardAccrual;
use crate::config::StakingConfig;
use crate::error::{Result, StakingError};
use crate::events::{
    DistributionPayout, DistributionReport, StakingEvent, UnstakeReceipt,
};
use crate::ledger::StakeLedger;
use crate::registry::ActiveUserRegistry;
use crate::stake::Stake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingPool {
    config: StakingConfig,
    ledger: StakeLedger,
    active_users: ActiveUserRegistry,
    total_staked: Amount,
    total_users: u64,
    total_paid: Amount,
    oracle: CShareRateOracle,
    treasury: TreasuryPool,
    journal: Vec<StakingEvent>,
}

impl StakingPool {
    pub fn new(config: StakingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            oracle: CShareRateOracle::new(config.initial_cshare_rate),
            treasury: TreasuryPool::new(config.treasury_account.clone()),
            config,
            ledger: StakeLedger::new(),
            active_users: ActiveUserRegistry::new(),
            total_staked: Amount::ZERO,
            total_users: 0,
            total_paid: Amount::ZERO,
            journal: Vec::new(),
        })
    }

    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    pub fn ledger(&self) -> &StakeLedger {
        &self.ledger
    }

    pub fn active_users(&self) -> &ActiveUserRegistry {
        &self.active_users
    }

    pub fn total_staked(&self) -> Amount {
        self.total_staked
    }

    pub fn total_users(&self) -> u64 {
        self.total_users
    }

    pub fn total_paid(&self) -> Amount {
        self.total_paid
    }

    pub fn cshare_rate(&self) -> Amount {
        self.oracle.rate()
    }

    pub fn treasury(&self) -> &TreasuryPool {
        &self.treasury
    }

    pub fn journal(&self) -> &[StakingEvent] {
        &self.journal
    }

    /// Copy of the pool state with empty journal and treasury trail.
    /// Only entries recorded on the copy are carried back by [`Self::commit`].
    pub(crate) fn staged(&self) -> Self {
        Self {
            config: self.config.clone(),
            ledger: self.ledger.clone(),
            active_users: self.active_users.clone(),
            total_staked: self.total_staked,
            total_users: self.total_users,
            total_paid: self.total_paid,
            oracle: self.oracle,
            treasury: self.treasury.staged(),
            journal: Vec::new(),
        }
    }

    pub(crate) fn commit(&mut self, staged: StakingPool) {
        let StakingPool {
            config,
            ledger,
            active_users,
            total_staked,
            total_users,
            total_paid,
            oracle,
            treasury,
            journal,
        } = staged;
        self.config = config;
        self.ledger = ledger;
        self.active_users = active_users;
        self.total_staked = total_staked;
        self.total_users = total_users;
        self.total_paid = total_paid;
        self.oracle = oracle;
        self.treasury.commit(treasury);
        self.journal.extend(journal);
    }

    pub fn is_paused(&self) -> bool {
        self.config.paused
    }

    pub fn stakes_of(&self, account: &str) -> Vec<&Stake> {
        self.ledger.stakes_of(account)
    }

    pub fn stake_count(&self, account: &str) -> usize {
        self.ledger.stake_count(account)
    }

    fn accrual(&self) -> RewardAccrual {
        RewardAccrual::new(self.config.reward_rate_per_second)
    }

    fn bonuses(&self) -> BonusCalculator {
        BonusCalculator::new(self.config.bonus_policy)
    }

    fn penalties(&self) -> Result<PenaltyEngine> {
        Ok(PenaltyEngine::new(self.config.early_penalty_percent)?)
    }

    fn owned_stake(&self, account: &str, stake_id: StakeId) -> Result<&Stake> {
        self.ledger
            .get_owned(account, stake_id)
            .ok_or_else(|| StakingError::StakeNotFound {
                account: account.to_string(),
                stake_id,
            })
    }

    fn ensure_reserve<T: TokenLedger>(&self, token: &T, required: Amount) -> Result<()> {
        let available = token.balance_of(&self.config.pool_account);
        if available < required {
            log::warn!(
                "Pool reserve {} cannot cover {} (available {})",
                self.config.pool_account,
                required,
                available
            );
            return Err(StakingError::InsufficientTreasury {
                required,
                available,
            });
        }
        Ok(())
    }

    /// Open a stake. The principal is burned from `account` and re-minted on unstake.
    pub fn stake<T: TokenLedger>(
        &mut self,
        token: &mut T,
        account: &str,
        amount: Amount,
        days: u64,
        now: Timestamp,
    ) -> Result<StakeId> {
        if self.config.paused {
            log::warn!("Rejected stake from {}: staking paused", account);
            return Err(StakingError::StakingPaused);
        }
        if amount < self.config.min_stake || amount > self.config.max_stake {
            return Err(StakingError::InvalidAmount {
                amount,
                min: self.config.min_stake,
                max: self.config.max_stake,
            });
        }
        if days < self.config.min_days || days > self.config.max_days {
            return Err(StakingError::InvalidDuration {
                days,
                min: self.config.min_days,
                max: self.config.max_days,
            });
        }

        let total_staked = self.total_staked.checked_add(amount)?;
        token.burn(account, amount)?;

        let first_stake = !self.ledger.has_stakes(account);
        let stake_id = self.ledger.open(account, amount, days, now);
        if first_stake {
            self.total_users += 1;
            self.active_users.register(account);
        }
        self.total_staked = total_staked;

        self.journal.push(StakingEvent::Staked {
            stake_id,
            account: account.to_string(),
            principal: amount,
            days_committed: days,
            timestamp: now,
        });
        log::info!(
            "Stake {} opened by {}: {} for {} days (total staked {})",
            stake_id,
            account,
            amount,
            days,
            self.total_staked
        );

        Ok(stake_id)
    }

    /// Pending reward of one stake; zero when the pool is empty
    pub fn stake_pending_reward(&self, stake: &Stake, now: Timestamp) -> Result<Amount> {
        self.accrual().pending_reward(stake, self.total_staked, now)
    }

    /// Pending reward across all of an account's stakes (zero for unknown accounts)
    pub fn pending_reward(&self, account: &str, now: Timestamp) -> Result<Amount> {
        let mut total = Amount::ZERO;
        for stake in self.ledger.stakes_of(account) {
            total = total.checked_add(self.stake_pending_reward(stake, now)?)?;
        }
        Ok(total)
    }

    pub fn stake_cshares(&self, stake: &Stake, now: Timestamp) -> Result<Amount> {
        self.accrual()
            .cshares(stake, self.total_staked, &self.bonuses(), now)
    }

    /// Effective C-Share weight of an account
    pub fn cshares_of(&self, account: &str, now: Timestamp) -> Result<Amount> {
        let mut total = Amount::ZERO;
        for stake in self.ledger.stakes_of(account) {
            total = total.checked_add(self.stake_cshares(stake, now)?)?;
        }
        Ok(total)
    }

    /// Fold pending reward into the stake and advance its checkpoint
    pub fn update_stake_reward_calculation(
        &mut self,
        account: &str,
        stake_id: StakeId,
        now: Timestamp,
    ) -> Result<Amount> {
        self.owned_stake(account, stake_id)?;
        let accrual = self.accrual();
        let total_staked = self.total_staked;

        let stake = self
            .ledger
            .get_mut(stake_id)
            .ok_or_else(|| StakingError::StakeNotFound {
                account: account.to_string(),
                stake_id,
            })?;
        accrual.checkpoint(stake, total_staked, now)
    }

    /// Compute what closing `stake_id` at `now` would pay, without mutating anything
    pub fn quote_unstake(
        &self,
        account: &str,
        stake_id: StakeId,
        now: Timestamp,
    ) -> Result<UnstakeReceipt> {
        let stake = self.owned_stake(account, stake_id)?;

        let reward = self.stake_pending_reward(stake, now)?;
        let cshares = self.stake_cshares(stake, now)?;
        let breakdown = self.penalties()?.assess(
            &PenaltyInput {
                principal: stake.principal,
                reward,
                start_time: stake.start_time,
                end_time: stake.end_time,
                days_committed: stake.days_committed,
            },
            now,
        )?;
        let penalty_split = self
            .config
            .penalty_distribution
            .split(breakdown.total_penalty)?;

        let principal_paid = breakdown.payout.min(stake.principal);
        let reward_paid = breakdown.payout.checked_sub(principal_paid)?;

        Ok(UnstakeReceipt {
            stake_id,
            account: account.to_string(),
            principal: stake.principal,
            days_committed: stake.days_committed,
            days_served: stake.days_served(now),
            timing: breakdown.timing,
            reward,
            early_penalty: breakdown.early_penalty,
            late_penalty: breakdown.late_penalty,
            total_penalty: breakdown.total_penalty,
            penalty_split,
            payout: breakdown.payout,
            principal_paid,
            reward_paid,
            cshares,
            cshare_rate_updated: false,
        })
    }

    /// Close a stake by its stable id
    pub fn unstake<T: TokenLedger>(
        &mut self,
        token: &mut T,
        account: &str,
        stake_id: StakeId,
        now: Timestamp,
    ) -> Result<UnstakeReceipt> {
        let mut receipt = self.quote_unstake(account, stake_id, now)?;

        self.ensure_reserve(token, receipt.reserve_draw()?)?;

        let total_staked = self.total_staked.checked_sub(receipt.principal)?;
        let total_paid = self.total_paid.checked_add(receipt.reward_paid)?;
        let mut oracle = self.oracle;
        receipt.cshare_rate_updated = oracle.observe(&CShareSample {
            total_paid: receipt.reward_paid,
            shares: receipt.cshares,
            days_staked: receipt.days_served,
        })?;

        let pool_account = self.config.pool_account.clone();
        let split = receipt.penalty_split;
        token.mint(&pool_account, receipt.principal)?;
        token.transfer(&pool_account, account, receipt.payout)?;
        if !split.burn.is_zero() {
            token.burn(&pool_account, split.burn)?;
        }
        if !split.treasury.is_zero() {
            token.transfer(&pool_account, &self.config.treasury_account, split.treasury)?;
            self.treasury
                .deposit(TreasurySource::PenaltyShare { stake_id }, split.treasury, now)?;
        }

        self.ledger.remove_by_id(account, stake_id);
        self.total_staked = total_staked;
        self.total_paid = total_paid;
        if !self.ledger.has_stakes(account) {
            self.total_users = self.total_users.saturating_sub(1);
            self.active_users.deregister(account);
        }
        self.oracle = oracle;

        if receipt.cshare_rate_updated {
            self.journal.push(StakingEvent::CShareRateUpdated {
                rate: oracle.rate(),
                timestamp: now,
            });
        }
        self.journal.push(StakingEvent::Unstaked {
            receipt: receipt.clone(),
            timestamp: now,
        });
        log::info!(
            "Stake {} closed by {} ({:?}): payout {} (reward {}, penalty {})",
            stake_id,
            account,
            receipt.timing,
            receipt.payout,
            receipt.reward,
            receipt.total_penalty
        );

        Ok(receipt)
    }

    /// Close the stake at `index` in the account's ledger.
    ///
    /// The last stake moves into `index` afterwards; re-read positions before
    /// issuing another positional call for the same account.
    pub fn unstake_specific<T: TokenLedger>(
        &mut self,
        token: &mut T,
        account: &str,
        index: usize,
        now: Timestamp,
    ) -> Result<UnstakeReceipt> {
        let stake_id =
            self.ledger
                .id_at(account, index)
                .ok_or_else(|| StakingError::InvalidStakeIndex {
                    account: account.to_string(),
                    index,
                    count: self.ledger.stake_count(account),
                })?;
        self.unstake(token, account, stake_id, now)
    }

    /// Pay out the reward of every stake inside its grace window, leaving the
    /// stakes open.
    ///
    /// Stakes that are still running or already late are skipped: their reward
    /// leaves only through `unstake`, where the penalties apply.
    pub fn claim_rewards<T: TokenLedger>(
        &mut self,
        token: &mut T,
        account: &str,
        now: Timestamp,
    ) -> Result<Amount> {
        let mut claims = Vec::new();
        let mut total = Amount::ZERO;
        for stake in self.ledger.stakes_of(account) {
            if StakeTiming::classify(stake.end_time, now) != StakeTiming::OnTime {
                continue;
            }
            let pending = self.stake_pending_reward(stake, now)?;
            total = total.checked_add(pending)?;
            claims.push((stake.id, stake.accrual_horizon(now)));
        }

        if total.is_zero() {
            return Err(StakingError::NoRewardsAvailable(account.to_string()));
        }
        self.ensure_reserve(token, total)?;
        let total_paid = self.total_paid.checked_add(total)?;

        token.transfer(&self.config.pool_account, account, total)?;

        for (stake_id, horizon) in claims {
            if let Some(stake) = self.ledger.get_mut(stake_id) {
                stake.accrued_reward = Amount::ZERO;
                stake.last_accrual_time = stake.last_accrual_time.max(horizon);
            }
        }
        self.total_paid = total_paid;

        self.journal.push(StakingEvent::RewardsClaimed {
            account: account.to_string(),
            amount: total,
            timestamp: now,
        });
        log::info!("{} claimed {} in rewards", account, total);

        Ok(total)
    }

    /// Share `percentage_ppm` of total supply (or the configured daily rate)
    /// across active users in proportion to their C-Shares.
    pub fn distribute_daily_rewards<T: TokenLedger>(
        &mut self,
        token: &mut T,
        percentage_ppm: Option<u64>,
        now: Timestamp,
    ) -> Result<DistributionReport> {
        let percentage_ppm = percentage_ppm.unwrap_or(self.config.daily_emission_ppm);
        if percentage_ppm > PPM_DENOMINATOR {
            return Err(StakingError::InvalidPercentage(percentage_ppm));
        }
        let daily_pool = token
            .total_supply()
            .mul_div_u64(percentage_ppm, PPM_DENOMINATOR)?;

        // First pass: weights
        let mut weights = Vec::with_capacity(self.active_users.len());
        let mut total_cshares = Amount::ZERO;
        for account in self.active_users.users() {
            let cshares = self.cshares_of(account, now)?;
            total_cshares = total_cshares.checked_add(cshares)?;
            weights.push((account.clone(), cshares));
        }

        let mut report = DistributionReport {
            percentage_ppm,
            daily_pool,
            total_cshares,
            distributed: Amount::ZERO,
            dust: Amount::ZERO,
            payouts: Vec::new(),
            timestamp: now,
        };
        if daily_pool.is_zero() || total_cshares.is_zero() {
            log::info!("Daily distribution skipped: nothing to share");
            return Ok(report);
        }
        self.ensure_reserve(token, daily_pool)?;

        // Second pass: pro-rata amounts
        let mut payouts = Vec::with_capacity(weights.len());
        let mut distributed = Amount::ZERO;
        for (account, cshares) in weights {
            let amount = daily_pool.mul_div(cshares, total_cshares)?;
            distributed = distributed.checked_add(amount)?;
            payouts.push(DistributionPayout {
                account,
                cshares,
                amount,
            });
        }
        let total_paid = self.total_paid.checked_add(distributed)?;

        for payout in payouts.iter().filter(|p| !p.amount.is_zero()) {
            token.transfer(&self.config.pool_account, &payout.account, payout.amount)?;
        }
        self.total_paid = total_paid;

        report.distributed = distributed;
        report.dust = daily_pool.checked_sub(distributed)?;
        report.payouts = payouts;

        self.journal.push(StakingEvent::RewardsDistributed {
            daily_pool,
            distributed,
            recipients: report.payouts.len(),
            timestamp: now,
        });
        log::info!(
            "Distributed {} of {} across {} users",
            distributed,
            daily_pool,
            report.payouts.len()
        );

        Ok(report)
    }

    fn ensure_owner(&self, caller: &str) -> Result<()> {
        if caller != self.config.owner {
            log::warn!("Rejected configuration change from {}", caller);
            return Err(StakingError::Unauthorized(caller.to_string()));
        }
        Ok(())
    }

    fn apply_config(&mut self, config: StakingConfig, field: &str, value: String) -> Result<()> {
        config.validate()?;
        self.config = config;
        log::info!("Configuration updated: {} = {}", field, value);
        self.journal.push(StakingEvent::ConfigUpdated {
            field: field.to_string(),
            value,
        });
        Ok(())
    }

    pub fn set_stake_limits(&mut self, caller: &str, min: Amount, max: Amount) -> Result<()> {
        self.ensure_owner(caller)?;
        let config = StakingConfig {
            min_stake: min,
            max_stake: max,
            ..self.config.clone()
        };
        self.apply_config(config, "stake_limits", format!("[{}, {}]", min, max))
    }

    pub fn set_duration_limits(&mut self, caller: &str, min_days: u64, max_days: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        let config = StakingConfig {
            min_days,
            max_days,
            ..self.config.clone()
        };
        self.apply_config(
            config,
            "duration_limits",
            format!("[{}, {}]", min_days, max_days),
        )
    }

    pub fn set_paused(&mut self, caller: &str, paused: bool) -> Result<()> {
        self.ensure_owner(caller)?;
        let config = StakingConfig {
            paused,
            ..self.config.clone()
        };
        self.apply_config(config, "paused", paused.to_string())
    }

    pub fn set_early_penalty_percent(&mut self, caller: &str, percent: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        let config = StakingConfig {
            early_penalty_percent: percent,
            ..self.config.clone()
        };
        self.apply_config(config, "early_penalty_percent", percent.to_string())
    }

    pub fn set_daily_emission_ppm(&mut self, caller: &str, ppm: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        let config = StakingConfig {
            daily_emission_ppm: ppm,
            ..self.config.clone()
        };
        self.apply_config(config, "daily_emission_ppm", ppm.to_string())
    }

    pub fn set_bonus_policy(&mut self, caller: &str, policy: BonusPolicy) -> Result<()> {
        self.ensure_owner(caller)?;
        let config = StakingConfig {
            bonus_policy: policy,
            ..self.config.clone()
        };
        self.apply_config(config, "bonus_policy", format!("{:?}", policy))
    }

    /// Cross-check the global totals against the ledger and registry
    pub fn check_invariants(&self) -> Result<()> {
        let principal = self.ledger.total_principal()?;
        if principal != self.total_staked {
            return Err(StakingError::InvariantViolation(format!(
                "total_staked {} != sum of principals {}",
                self.total_staked, principal
            )));
        }

        let accounts = self.ledger.account_count() as u64;
        if accounts != self.total_users || self.active_users.len() as u64 != self.total_users {
            return Err(StakingError::InvariantViolation(format!(
                "total_users {} disagrees with ledger accounts {} / registry {}",
                self.total_users,
                accounts,
                self.active_users.len()
            )));
        }

        let unregistered: Vec<&Address> = self
            .ledger
            .accounts()
            .filter(|account| !self.active_users.contains(account))
            .collect();
        if !unregistered.is_empty() {
            return Err(StakingError::InvariantViolation(format!(
                "accounts with stakes missing from registry: {:?}",
                unregistered
            )));
        }

        Ok(())
    }
}
