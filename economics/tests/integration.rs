use economics::*;
use stake_core::constants::SECONDS_PER_DAY;
use stake_core::Amount;

const DAY: u64 = SECONDS_PER_DAY;

fn input(principal: Amount, reward: Amount, days_committed: u64) -> PenaltyInput {
    PenaltyInput {
        principal,
        reward,
        start_time: 0,
        end_time: days_committed * DAY,
        days_committed,
    }
}

#[test]
fn test_bonus_policies_agree_below_cap() {
    let flat = BonusCalculator::new(BonusPolicy::FlatTenPercent);
    let clamp = BonusCalculator::new(BonusPolicy::ClampAtCap);

    for tokens in [1u64, 1_000, 42_000_000, 150_000_000] {
        let principal = Amount::from_tokens(tokens);
        assert_eq!(
            flat.quantity_bonus(principal).unwrap(),
            clamp.quantity_bonus(principal).unwrap()
        );
    }

    // At the cap the bonus is exactly 10% of principal
    let cap = Amount::from_tokens(150_000_000);
    assert_eq!(
        clamp.quantity_bonus(cap).unwrap(),
        Amount::from_tokens(15_000_000)
    );
}

#[test]
fn test_bonus_policies_diverge_above_cap() {
    let principal = Amount::from_tokens(300_000_000);
    let flat = BonusCalculator::new(BonusPolicy::FlatTenPercent)
        .quantity_bonus(principal)
        .unwrap();
    let clamp = BonusCalculator::new(BonusPolicy::ClampAtCap)
        .quantity_bonus(principal)
        .unwrap();

    assert_eq!(flat, Amount::from_tokens(30_000_000));
    assert_eq!(clamp, Amount::from_tokens(15_000_000));
}

#[test]
fn test_time_bonus_doubles_at_ten_years() {
    let calc = BonusCalculator::default();
    let principal = Amount::from_tokens(1_820);

    assert_eq!(calc.time_bonus(principal, 1).unwrap(), Amount::ZERO);
    assert_eq!(
        calc.time_bonus(principal, 1_821).unwrap(),
        principal
    );
    assert_eq!(
        calc.time_bonus(principal, 3_641).unwrap(),
        Amount::from_tokens(3_640)
    );
    assert_eq!(
        calc.time_bonus(principal, 5_555).unwrap(),
        calc.time_bonus(principal, 3_641).unwrap()
    );
}

#[test]
fn test_early_exit_curve_is_continuous_at_threshold() {
    let engine = PenaltyEngine::default();
    let reward = Amount::from_tokens(1_000);
    let stake = input(Amount::from_tokens(10_000), reward, 400);

    // Threshold for a 400-day stake is 200 days
    let at = engine.early_penalty(&stake, 200 * DAY).unwrap();
    let before = engine.early_penalty(&stake, 199 * DAY).unwrap();
    let after = engine.early_penalty(&stake, 201 * DAY).unwrap();

    assert_eq!(at, reward);
    assert_eq!(before, reward);
    assert!(after < reward);
    assert!(after > Amount::ZERO);
}

#[test]
fn test_early_penalty_shrinks_toward_end() {
    let engine = PenaltyEngine::default();
    let reward = Amount::from_tokens(1_000);
    let stake = input(Amount::from_tokens(10_000), reward, 400);

    let mut last = reward;
    for day in (200..400).step_by(20) {
        let penalty = engine.early_penalty(&stake, day * DAY).unwrap();
        assert!(penalty <= last);
        last = penalty;
    }
}

#[test]
fn test_reduced_early_penalty_percent() {
    let half = PenaltyEngine::new(50).unwrap();
    let reward = Amount::from_tokens(1_000);
    let stake = input(Amount::from_tokens(10_000), reward, 120);

    // At the 90-day threshold the raw penalty equals the reward
    assert_eq!(
        half.early_penalty(&stake, 90 * DAY).unwrap(),
        Amount::from_tokens(500)
    );
    assert!(PenaltyEngine::new(101).is_err());
}

#[test]
fn test_late_exit_can_consume_principal() {
    let engine = PenaltyEngine::default();
    let stake = input(Amount::from_tokens(1_000), Amount::from_tokens(100), 30);

    // 1000 days past the grace window: 143% of the balance, capped
    let now = (30 + 14 + 1_000) * DAY;
    let breakdown = engine.assess(&stake, now).unwrap();

    assert_eq!(breakdown.timing, StakeTiming::Late);
    assert_eq!(breakdown.total_penalty, Amount::from_tokens(1_100));
    assert_eq!(breakdown.payout, Amount::ZERO);
}

#[test]
fn test_oracle_learns_from_closed_stakes() {
    let mut oracle = CShareRateOracle::default();
    let calc = BonusCalculator::default();
    let principal = Amount::from_tokens(100);
    let paid = Amount::from(2_592_000_000u64);

    let shares = calc
        .bonuses(principal, 30)
        .unwrap()
        .total()
        .unwrap()
        .checked_add(paid)
        .unwrap();

    let sample = CShareSample {
        total_paid: paid,
        shares,
        days_staked: 30,
    };
    assert!(oracle.observe(&sample).unwrap());
    let learned = oracle.rate();

    // Replaying the same sample cannot move the rate again
    assert!(!oracle.observe(&sample).unwrap());
    assert_eq!(oracle.rate(), learned);

    // Nothing paid carries no information
    let empty = CShareSample {
        total_paid: Amount::ZERO,
        ..sample
    };
    assert!(!oracle.observe(&empty).unwrap());
}
