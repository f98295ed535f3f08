//! Accounting core.
//!
//! Every operation follows the same sequence against copies of the period
//! and the touched suppliers:
//! 1. Catch the period up to now, reporting venue yield ([`catch_up`])
//! 2. Checkpoint the calling supplier
//! 3. Apply the operation's own delta
//!
//! The copies are committed only when the whole sequence succeeds. No
//! operation iterates over suppliers. External effects (token transfers,
//! stream changes, automation tasks) are returned as outcomes for the
//! instruction handler to perform.

pub mod inflow;
pub mod outflow;
pub mod shares;
pub mod strategy;

use superpool_interface::{TaskKind, TaskPayload, from_scaled, to_scaled};

use crate::{
    SuperPoolError,
    state::{Period, PeriodDelta, Supplier},
};

/// What the handler observed before running an operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    /// Current unix time
    pub now: u64,
    /// Pool's position balance at the yield venue, in token units
    pub venue_balance: u64,
}

impl Observation {
    /// Observation at `now` with the venue reporting `venue_balance`.
    pub const fn new(now: u64, venue_balance: u64) -> Self {
        Self { now, venue_balance }
    }
}

/// Change the handler must make to the supplier's outgoing stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamAction {
    /// Leave the stream alone
    #[default]
    None,
    /// Open a stream at the rate
    Create(u64),
    /// Change the stream's rate
    Update(u64),
    /// Close the stream
    Delete,
}

/// Automation task changes the handler must make.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskChange {
    /// Task to cancel
    pub cancel: Option<[u8; 32]>,
    /// Task to register
    pub register: Option<TaskPayload>,
}

/// Result of a lump-sum deposit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositOutcome {
    /// Period catch-up performed first
    pub period_delta: PeriodDelta,
    /// Shares minted for the deposit
    pub shares_minted: u128,
}

/// Result of a lump-sum redemption or account close.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedeemOutcome {
    /// Period catch-up performed first
    pub period_delta: PeriodDelta,
    /// Token units to pay out of the pool
    pub amount: u64,
    /// Shares burned
    pub shares_burned: u128,
    /// Outgoing stream change (close only)
    pub stream: StreamAction,
    /// Task changes (close only)
    pub tasks: TaskChange,
}

/// Result of a supplier-to-supplier transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Period catch-up performed first
    pub period_delta: PeriodDelta,
    /// Shares moved
    pub shares_moved: u128,
}

/// Run `op` on copies of the period and supplier, committing only on success.
pub(crate) fn transactional<T>(
    period: &mut Period,
    supplier: &mut Supplier,
    op: impl FnOnce(&mut Period, &mut Supplier) -> Result<T, SuperPoolError>,
) -> Result<T, SuperPoolError> {
    let mut period_copy = *period;
    let mut supplier_copy = *supplier;
    let out = op(&mut period_copy, &mut supplier_copy)?;
    *period = period_copy;
    *supplier = supplier_copy;
    Ok(out)
}

/// Catch the period up to `obs.now`, distributing venue yield.
///
/// # Errors
/// Propagates [`Period::advance`] errors.
pub fn catch_up(period: &mut Period, obs: Observation) -> Result<PeriodDelta, SuperPoolError> {
    strategy::report_yield(period, obs.venue_balance, obs.now)
}

/// Parse a wire flow rate, rejecting zero and negative rates.
///
/// # Errors
/// `InvalidRate` for `rate <= 0`.
pub fn positive_rate(rate: i64) -> Result<u64, SuperPoolError> {
    if rate <= 0 {
        return Err(SuperPoolError::InvalidRate);
    }
    Ok(rate as u64)
}

/// Nonzero task id, `None` for the all-zero placeholder.
pub(crate) fn registered(task_id: [u8; 32]) -> Option<[u8; 32]> {
    (task_id != [0u8; 32]).then_some(task_id)
}

/// Lump-sum deposit of `amount` token units.
///
/// # Errors
/// `InvalidAmount` for zero, plus catch-up and arithmetic errors.
pub fn deposit(
    period: &mut Period,
    supplier: &mut Supplier,
    amount: u64,
    obs: Observation,
) -> Result<DepositOutcome, SuperPoolError> {
    if amount == 0 {
        return Err(SuperPoolError::InvalidAmount);
    }
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;

        let scaled = to_scaled(amount);
        let shares_minted = shares::mint(period, supplier, scaled)?;
        supplier.deposit = supplier
            .deposit
            .checked_add(scaled)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        period.total_deposit = period
            .total_deposit
            .checked_add(scaled)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        Ok(DepositOutcome {
            period_delta,
            shares_minted,
        })
    })
}

/// Lump-sum withdrawal of `amount` token units.
///
/// Bounded by the supplier's available balance, which excludes the buffer
/// reserved for an outgoing stream.
///
/// # Errors
/// - `InvalidAmount` for zero
/// - `InsufficientBalance` if `amount` exceeds the available balance
pub fn redeem_deposit(
    period: &mut Period,
    supplier: &mut Supplier,
    amount: u64,
    obs: Observation,
) -> Result<RedeemOutcome, SuperPoolError> {
    if amount == 0 {
        return Err(SuperPoolError::InvalidAmount);
    }
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;

        let scaled = to_scaled(amount);
        if scaled > supplier.available(period)? {
            return Err(SuperPoolError::InsufficientBalance);
        }

        let shares_burned = withdraw_scaled(period, supplier, scaled)?;

        Ok(RedeemOutcome {
            period_delta,
            amount,
            shares_burned,
            ..RedeemOutcome::default()
        })
    })
}

/// Move `amount` token units of balance (and the matching shares) from one
/// supplier to another. Both are checkpointed at the same period.
///
/// # Errors
/// - `SelfTransfer` if both records are the same owner
/// - `InsufficientBalance` if `amount` exceeds the sender's available balance
/// - `InsufficientShares` if the matching shares exceed the sender's shares
pub fn transfer(
    period: &mut Period,
    from: &mut Supplier,
    to: &mut Supplier,
    amount: u64,
    obs: Observation,
) -> Result<TransferOutcome, SuperPoolError> {
    if amount == 0 {
        return Err(SuperPoolError::InvalidAmount);
    }
    if from.owner == to.owner {
        return Err(SuperPoolError::SelfTransfer);
    }

    let (mut period_copy, mut from_copy, mut to_copy) = (*period, *from, *to);
    let period_delta = catch_up(&mut period_copy, obs)?;
    from_copy.checkpoint(&mut period_copy)?;
    to_copy.checkpoint(&mut period_copy)?;

    let scaled = to_scaled(amount);
    if scaled > from_copy.available(&period_copy)? {
        return Err(SuperPoolError::InsufficientBalance);
    }

    let shares_moved = shares::move_shares(&period_copy, &mut from_copy, &mut to_copy, scaled)?;
    from_copy.deposit = from_copy
        .deposit
        .checked_sub(scaled)
        .ok_or(SuperPoolError::InsufficientBalance)?;
    to_copy.deposit = to_copy
        .deposit
        .checked_add(scaled)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;

    *period = period_copy;
    *from = from_copy;
    *to = to_copy;

    Ok(TransferOutcome {
        period_delta,
        shares_moved,
    })
}

/// Withdraw the supplier's whole realtime balance and zero the record.
///
/// A live outgoing stream is closed first and its buffer released. Fractions
/// of a token unit stay in the pool.
///
/// # Errors
/// `InflowStillActive` while the supplier still streams into the pool.
pub fn close_account(
    period: &mut Period,
    supplier: &mut Supplier,
    obs: Observation,
) -> Result<RedeemOutcome, SuperPoolError> {
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;

        if supplier.has_inflow() {
            return Err(SuperPoolError::InflowStillActive);
        }

        let mut outcome = RedeemOutcome {
            period_delta,
            ..RedeemOutcome::default()
        };
        if supplier.has_outflow() {
            let released = outflow::release(period, supplier)?;
            outcome.stream = StreamAction::Delete;
            outcome.tasks.cancel = registered(released);
        }

        let balance = supplier.deposit;
        outcome.amount = from_scaled(balance).ok_or(SuperPoolError::ArithmeticOverflow)?;
        outcome.shares_burned = shares::burn_all(period, supplier)?;
        period.total_deposit = period
            .total_deposit
            .checked_sub(balance)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        supplier.zero();

        Ok(outcome)
    })
}

/// Remove `scaled` units from the supplier's deposit, burning the matching
/// shares (all of them when the deposit is drained).
pub(crate) fn withdraw_scaled(
    period: &mut Period,
    supplier: &mut Supplier,
    scaled: u128,
) -> Result<u128, SuperPoolError> {
    let drains = scaled == supplier.deposit && !supplier.has_outflow() && !supplier.has_inflow();
    let burned = if drains {
        shares::burn_all(period, supplier)?
    } else {
        shares::burn(period, supplier, scaled)?
    };
    supplier.deposit = supplier
        .deposit
        .checked_sub(scaled)
        .ok_or(SuperPoolError::InsufficientBalance)?;
    period.total_deposit = period
        .total_deposit
        .checked_sub(scaled)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    Ok(burned)
}

/// Outcome of running an automation task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task no longer matches the supplier; nothing changed
    Stale,
    /// One buffer step was deducted and the next step registered
    Stepped {
        /// Period catch-up performed first
        period_delta: PeriodDelta,
        /// Units deducted from the supplier
        step_amount: u64,
        /// The fired task and its successor
        tasks: TaskChange,
    },
    /// The buffer ran out; the stream must be closed
    Terminated {
        /// Period catch-up performed first
        period_delta: PeriodDelta,
        /// The fired task
        tasks: TaskChange,
    },
    /// A timed inflow reached its end; the flow must be deleted
    InflowStopped {
        /// Period catch-up performed first
        period_delta: PeriodDelta,
        /// Rate of the stopped inflow
        flow_rate: u64,
        /// The fired task
        tasks: TaskChange,
    },
}

/// Whether `ExecuteTask` would act on `payload` at `now`.
///
/// Stale, unknown, and not-yet-due tasks answer `false`.
pub fn check_task(supplier: &Supplier, payload: &TaskPayload, now: u64) -> bool {
    let stored = match payload.task_kind() {
        Some(TaskKind::OutflowStep) if supplier.has_outflow() => supplier.out_stream.cancel_task_id,
        Some(TaskKind::InflowStop) if supplier.has_inflow() => supplier.in_stream.cancel_task_id,
        _ => return false,
    };
    if superpool_interface::task_id(&supplier.pool, payload) != stored {
        return false;
    }
    payload.due_time().is_some_and(|due| now >= due)
}

/// Run an automation task against its supplier.
///
/// Stale tasks, detected by recomputing the task id from the payload and
/// comparing it to the id stored on the supplier, resolve to
/// [`TaskOutcome::Stale`] without touching any state.
///
/// # Errors
/// `TaskNotReady` if a live task fires before its due time.
pub fn execute_task(
    period: &mut Period,
    supplier: &mut Supplier,
    payload: &TaskPayload,
    obs: Observation,
) -> Result<TaskOutcome, SuperPoolError> {
    match payload.task_kind() {
        Some(TaskKind::OutflowStep) => outflow::execute_step(period, supplier, payload, obs),
        Some(TaskKind::InflowStop) => inflow::execute_stop(period, supplier, payload, obs),
        None => Ok(TaskOutcome::Stale),
    }
}
