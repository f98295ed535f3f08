//! Share accounting.
//!
//! Shares track ownership proportional to deposit at the moment of each call:
//! ```text
//! shares_delta = amount × total_shares / share_base
//! ```
//! where the share base is `total_deposit` plus the outflow buffer. The first
//! depositor (or any depositor into an empty pool) mints one share per token
//! unit. Callers mint and burn *before* moving `amount` in or out of
//! `total_deposit`.

use superpool_interface::{SCALE, mul_div};

use crate::{
    SuperPoolError,
    state::{Period, Supplier},
};

/// Shares worth `amount` scaled units at the current ratio.
fn shares_for(period: &Period, amount: u128) -> Result<u128, SuperPoolError> {
    let base = period.share_base();
    if period.total_shares == 0 || base == 0 {
        return Ok(amount / SCALE);
    }
    mul_div(amount, period.total_shares, base).ok_or(SuperPoolError::ArithmeticOverflow)
}

/// Mint shares for `amount` scaled units entering the supplier's deposit.
///
/// # Errors
/// `ArithmeticOverflow` on overflow.
pub fn mint(period: &mut Period, supplier: &mut Supplier, amount: u128) -> Result<u128, SuperPoolError> {
    let minted = shares_for(period, amount)?;
    supplier.shares = supplier
        .shares
        .checked_add(minted)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    period.total_shares = period
        .total_shares
        .checked_add(minted)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    Ok(minted)
}

/// Burn shares for `amount` scaled units leaving the supplier's deposit.
///
/// Burns at most the supplier's shares; rounding never burns someone else's.
///
/// # Errors
/// `ArithmeticOverflow` on overflow.
pub fn burn(period: &mut Period, supplier: &mut Supplier, amount: u128) -> Result<u128, SuperPoolError> {
    let burned = if period.share_base() == 0 {
        supplier.shares
    } else {
        shares_for(period, amount)?.min(supplier.shares)
    };
    remove(period, supplier, burned)?;
    Ok(burned)
}

/// Burn every share the supplier holds.
///
/// # Errors
/// `ArithmeticOverflow` if the period total is inconsistent.
pub fn burn_all(period: &mut Period, supplier: &mut Supplier) -> Result<u128, SuperPoolError> {
    let burned = supplier.shares;
    remove(period, supplier, burned)?;
    Ok(burned)
}

/// Move shares worth `amount` scaled units from `from` to `to`.
///
/// Moving the sender's whole deposit moves all of its shares. Both suppliers
/// must already be checkpointed.
///
/// # Errors
/// `InsufficientShares` if the shares exceed the sender's balance.
pub fn move_shares(
    period: &Period,
    from: &mut Supplier,
    to: &mut Supplier,
    amount: u128,
) -> Result<u128, SuperPoolError> {
    let moved = if amount == from.deposit && !from.has_outflow() {
        from.shares
    } else {
        shares_for(period, amount)?
    };
    if moved > from.shares {
        return Err(SuperPoolError::InsufficientShares);
    }
    from.shares -= moved;
    to.shares = to
        .shares
        .checked_add(moved)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    Ok(moved)
}

fn remove(period: &mut Period, supplier: &mut Supplier, shares: u128) -> Result<(), SuperPoolError> {
    supplier.shares = supplier
        .shares
        .checked_sub(shares)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    period.total_shares = period
        .total_shares
        .checked_sub(shares)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    Ok(())
}
