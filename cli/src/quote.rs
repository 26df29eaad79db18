//! Bonus and penalty quote for a hypothetical stake

use anyhow::Result;
use economics::{BonusBreakdown, BonusCalculator, BonusPolicy, PenaltyBreakdown, PenaltyEngine, PenaltyInput};
use serde::Serialize;
use stake_core::constants::SECONDS_PER_DAY;
use stake_core::Amount;

#[derive(Debug, Clone, Serialize)]
pub struct QuoteRequest {
    pub tokens: u64,
    pub days: u64,
    pub exit_day: u64,
    pub reward_tokens: u64,
    pub policy: BonusPolicy,
    pub early_penalty_percent: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub request: QuoteRequest,
    pub principal: Amount,
    pub reward: Amount,
    pub bonuses: BonusBreakdown,
    /// Reward plus bonuses
    pub cshares: Amount,
    pub forfeiture_day: u64,
    pub penalty: PenaltyBreakdown,
}

pub fn quote(request: QuoteRequest) -> Result<Quote> {
    let principal = Amount::from_tokens(request.tokens);
    let reward = Amount::from_tokens(request.reward_tokens);

    let bonuses = BonusCalculator::new(request.policy).bonuses(principal, request.days)?;
    let cshares = reward.checked_add(bonuses.total()?)?;

    let engine = PenaltyEngine::new(request.early_penalty_percent)?;
    let input = PenaltyInput {
        principal,
        reward,
        start_time: 0,
        end_time: request.days.saturating_mul(SECONDS_PER_DAY),
        days_committed: request.days,
    };
    let penalty = engine.assess(&input, request.exit_day.saturating_mul(SECONDS_PER_DAY))?;

    Ok(Quote {
        forfeiture_day: PenaltyEngine::forfeiture_threshold(request.days),
        request,
        principal,
        reward,
        bonuses,
        cshares,
        penalty,
    })
}
