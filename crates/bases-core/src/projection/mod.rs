//! Projection Pipeline
//!
//! Advances a snapshot one month at a time:
//!
//! 1. take the previous month's snapshot (month 0 is the account as it is now)
//! 2. add that month's cash flow to reserves
//! 3. pipe the result through every strategy, in list order
//!
//! Strategies are chained: each one receives the snapshot produced by the strategy
//! before it in the same month, never a shared or mutated value. No reordering or
//! deduplication is performed.
//!
//! Every call recomputes from scratch, so projecting twice with the same inputs
//! yields identical sequences.

pub mod compound;
pub mod strategy;

pub use compound::{compound_interest, CompoundProjection};
pub use strategy::{ProjectionStrategy, StrategyKind};

use crate::error::{Error, Result};
use crate::models::{Account, Snapshot};

/// Upper bound on the up-front allocation; longer horizons grow as they go
const MAX_PREALLOCATED_MONTHS: u32 = 1200;

/// Project an account forward `horizon_months` months.
///
/// Returns one snapshot per month; month 1 is at index 0.
pub fn project_months(
    account: &Account,
    horizon_months: u32,
    strategies: &[ProjectionStrategy],
) -> Result<Vec<Snapshot>> {
    project_from(account.snapshot_now(), horizon_months, strategies)
}

/// Project starting from an arbitrary snapshot
pub fn project_from(
    start: Snapshot,
    horizon_months: u32,
    strategies: &[ProjectionStrategy],
) -> Result<Vec<Snapshot>> {
    if horizon_months == 0 {
        return Err(Error::InvalidHorizon(0));
    }

    let mut months = Vec::with_capacity(horizon_months.min(MAX_PREALLOCATED_MONTHS) as usize);
    let mut previous = start;

    for month in 1..=horizon_months {
        let next = advance(&previous, month, strategies);
        months.push(next);
        previous = next;
    }

    tracing::trace!(
        months = horizon_months,
        strategies = strategies.len(),
        final_reserves = previous.reserves(),
        "Projection complete"
    );

    Ok(months)
}

/// One projection step: accrue cash flow, then apply the strategy pipe
fn advance(previous: &Snapshot, month: u32, strategies: &[ProjectionStrategy]) -> Snapshot {
    let cash_flow = previous.indicators().cash_flow;
    let interim = previous.with_reserves(previous.reserves() + cash_flow);

    strategies
        .iter()
        .fold(interim, |snapshot, strategy| strategy.apply(&snapshot, month))
}
