//! Strategy adapter: the pool's position at the yield venue.
//!
//! The venue balance is the only source of yield. `yield_snapshot` holds the
//! balance the ledger has already accounted for; whatever the venue reports
//! above it is new yield for [`Period::advance`]. Moving idle tokens in or
//! out of the venue shifts the snapshot by the same amount so that transfers
//! are never mistaken for yield.

use superpool_interface::fixed_point::from_scaled_ceil;

use crate::{
    SuperPoolError,
    state::{Period, PeriodDelta},
};

/// Report the venue balance and distribute what it gained since the last
/// report.
///
/// A balance below the snapshot distributes nothing and leaves the snapshot
/// in place, so the loss is absorbed by future gains. Yield the period could
/// not distribute (empty pool) stays above the snapshot for a later report.
///
/// # Errors
/// Propagates [`Period::advance`] errors.
pub fn report_yield(period: &mut Period, venue_balance: u64, now: u64) -> Result<PeriodDelta, SuperPoolError> {
    let accrued = (venue_balance as u128).saturating_sub(period.yield_snapshot);
    let accrued = u64::try_from(accrued).map_err(|_| SuperPoolError::ArithmeticOverflow)?;

    let delta = period.advance(now, accrued)?;
    period.yield_snapshot = period
        .yield_snapshot
        .checked_add(delta.yield_distributed as u128)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    Ok(delta)
}

/// Idle tokens in the vault that may be pushed to the venue: everything but
/// the (rounded up) outflow buffer.
pub fn pushable(period: &Period, idle_balance: u64) -> u64 {
    let reserved = from_scaled_ceil(period.out_flow_buffer).unwrap_or(u64::MAX);
    idle_balance.saturating_sub(reserved)
}

/// Account for `amount` idle tokens deposited into the venue.
///
/// The caller must report yield first so the snapshot is current.
///
/// # Errors
/// - `InvalidAmount` for zero
/// - `InsufficientBalance` if `amount` would dip into the outflow buffer
pub fn push_idle(period: &mut Period, amount: u64, idle_balance: u64) -> Result<(), SuperPoolError> {
    if amount == 0 {
        return Err(SuperPoolError::InvalidAmount);
    }
    if amount > pushable(period, idle_balance) {
        return Err(SuperPoolError::InsufficientBalance);
    }
    period.yield_snapshot = period
        .yield_snapshot
        .checked_add(amount as u128)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    Ok(())
}

/// Account for `amount` tokens withdrawn from the venue to cover a payout.
///
/// The caller must report yield first so the snapshot is current.
///
/// # Errors
/// `InsufficientBalance` if the venue holds less than `amount`.
pub fn pull_for_withdraw(period: &mut Period, amount: u64) -> Result<(), SuperPoolError> {
    period.yield_snapshot = period
        .yield_snapshot
        .checked_sub(amount as u128)
        .ok_or(SuperPoolError::InsufficientBalance)?;
    Ok(())
}

/// Tokens missing from the vault to pay out `needed`.
pub const fn shortfall(idle_balance: u64, needed: u64) -> u64 {
    needed.saturating_sub(idle_balance)
}
