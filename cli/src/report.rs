//! Terminal rendering for replays, quotes and snapshots

use owo_colors::OwoColorize;
use stake_core::{scale, Address, Amount, Timestamp};
use stake_storage::{PoolSnapshot, SnapshotSummary};

use crate::quote::Quote;
use crate::scenario::{Replay, StepResult};

/// Whole tokens with four decimals
pub fn tokens(amount: Amount) -> String {
    let unit = scale().raw();
    let raw = amount.raw();
    let fraction = (raw % unit) / (unit / 10_000u64);
    format!("{}.{:04}", raw / unit, fraction.low_u64())
}

fn timestamp(ts: Timestamp) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "═══════════════════════════════════════".bright_black());
}

pub fn print_replay(replay: &Replay) {
    header("Scenario Replay");

    for outcome in &replay.outcomes {
        let label = outcome.action.label();
        match &outcome.result {
            Ok(result) => println!(
                "  {:>3}  {}  {}  {}",
                outcome.index,
                timestamp(outcome.at).bright_black(),
                "✓".green(),
                describe(&label, result)
            ),
            Err(e) => println!(
                "  {:>3}  {}  {}  {} ({})",
                outcome.index,
                timestamp(outcome.at).bright_black(),
                "✗".red(),
                label,
                e.red()
            ),
        }
    }

    let failures = replay.failures();
    println!(
        "\n{} steps, {} rejected",
        replay.outcomes.len(),
        if failures == 0 {
            failures.to_string().green().to_string()
        } else {
            failures.to_string().yellow().to_string()
        }
    );
}

fn describe(label: &str, result: &StepResult) -> String {
    match result {
        StepResult::Staked { stake_id } => format!("{} -> {}", label, stake_id),
        StepResult::Unstaked(receipt) => format!(
            "{} -> {:?}, payout {} (reward {}, penalty {})",
            label,
            receipt.timing,
            tokens(receipt.payout),
            tokens(receipt.reward),
            tokens(receipt.total_penalty)
        ),
        StepResult::Claimed { amount } => format!("{} -> {}", label, tokens(*amount)),
        StepResult::Distributed(report) => format!(
            "{} -> {} across {} users",
            label,
            tokens(report.distributed),
            report.payouts.len()
        ),
        StepResult::Checkpointed { accrued } => {
            format!("{} -> accrued {}", label, tokens(*accrued))
        }
        StepResult::ConfigChanged => label.to_string(),
    }
}

pub fn print_summary(summary: &SnapshotSummary) {
    header("Pool State");
    println!("{}: {}", "As of".yellow().bold(), timestamp(summary.taken_at));
    println!(
        "{}: {}",
        "Total Staked".yellow().bold(),
        tokens(summary.total_staked).green()
    );
    println!("{}: {}", "Active Users".yellow().bold(), summary.total_users);
    println!("{}: {}", "Open Stakes".yellow().bold(), summary.open_stakes);
    println!("{}: {}", "Total Paid".yellow().bold(), tokens(summary.total_paid));
    println!("{}: {}", "C-Share Rate".yellow().bold(), summary.cshare_rate);
    println!("{}: {}", "Token Supply".yellow().bold(), tokens(summary.token_supply));
    println!("{}: {}", "Pool Reserve".yellow().bold(), tokens(summary.pool_reserve));
    println!(
        "{}: {}",
        "Treasury".yellow().bold(),
        tokens(summary.treasury_balance)
    );
    println!("{}: {}", "Journal Events".yellow().bold(), summary.events);
}

/// Non-zero balances, largest first, flagged when the account has open stakes
pub fn holder_rows(snapshot: &PoolSnapshot) -> Vec<(Address, Amount, bool)> {
    snapshot
        .token
        .holders()
        .into_iter()
        .map(|(account, balance)| {
            let staking = snapshot.pool.ledger().has_stakes(account);
            (account.clone(), balance, staking)
        })
        .collect()
}

pub fn print_holders(snapshot: &PoolSnapshot) {
    println!("\n{}", "Token Holders".yellow().bold());
    for (account, balance, staking) in holder_rows(snapshot) {
        let marker = if staking { "*" } else { " " };
        println!("  {} {:<24} {}", marker.cyan(), account, tokens(balance));
    }
}

pub fn print_quote(quote: &Quote) {
    header("Stake Quote");
    let request = &quote.request;
    println!(
        "{}: {} tokens for {} days, exit on day {}",
        "Stake".yellow().bold(),
        request.tokens,
        request.days,
        request.exit_day
    );
    println!("{}: {:?}", "Bonus Policy".yellow().bold(), request.policy);
    println!(
        "{}: {}",
        "Quantity Bonus".yellow().bold(),
        tokens(quote.bonuses.quantity_bonus)
    );
    println!(
        "{}: {}",
        "Time Bonus".yellow().bold(),
        tokens(quote.bonuses.time_bonus)
    );
    println!("{}: {}", "C-Shares".yellow().bold(), tokens(quote.cshares));
    println!(
        "{}: day {}",
        "Full Forfeiture".yellow().bold(),
        quote.forfeiture_day
    );

    let penalty = &quote.penalty;
    println!("{}: {:?}", "Timing".yellow().bold(), penalty.timing);
    println!(
        "{}: {}",
        "Early Penalty".yellow().bold(),
        tokens(penalty.early_penalty).red()
    );
    println!(
        "{}: {}",
        "Late Penalty".yellow().bold(),
        tokens(penalty.late_penalty).red()
    );
    println!(
        "{}: {}",
        "Payout".yellow().bold(),
        tokens(penalty.payout).green().bold()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_formatting() {
        assert_eq!(tokens(Amount::ZERO), "0.0000");
        assert_eq!(tokens(Amount::from_tokens(12)), "12.0000");
        let half = Amount::from_tokens(3)
            .checked_add(Amount::from_tokens(1).checked_div_u64(2).unwrap())
            .unwrap();
        assert_eq!(tokens(half), "3.5000");
        // Below the displayed precision
        assert_eq!(tokens(Amount::from(1_000u64)), "0.0000");
    }
}
