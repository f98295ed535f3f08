//! Outflow buffer scheduler.
//!
//! An outgoing stream is backed by `min_balance` units reserved out of the
//! supplier's deposit into the period's outflow buffer. Every `step_time`
//! seconds an automation task deducts `step_amount` from the deposit and
//! rolls `init_time` forward, so the reserve always covers what the stream
//! pays between steps plus a five hour margin. When the deposit can no longer
//! cover what has streamed, the task terminates the stream instead.

use superpool_interface::{OutflowPlan, SCALE, TaskPayload, plan_outflow, task_id, to_scaled};

use crate::{
    SuperPoolError,
    ledger::{
        Observation, StreamAction, TaskChange, TaskOutcome, catch_up, positive_rate, registered,
        shares, transactional,
    },
    state::{OutStream, Period, PeriodDelta, Supplier},
};

/// Result of opening, resizing, or closing an outgoing stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutflowOutcome {
    /// Period catch-up performed first
    pub period_delta: PeriodDelta,
    /// Stream change for the handler
    pub stream: StreamAction,
    /// Task changes for the handler
    pub tasks: TaskChange,
    /// The new schedule, default when closing
    pub plan: OutflowPlan,
}

/// Open or resize the supplier's outgoing stream at `rate` units/sec.
///
/// Resizing first releases the current buffer (folding unstreamed reserve
/// back into deposit) and then plans against the new realtime balance.
///
/// # Errors
/// - `InvalidRate` for `rate <= 0`
/// - `InsufficientBalance` if the balance cannot fund a one-second step or
///   the reserve
pub fn redeem_flow(
    period: &mut Period,
    supplier: &mut Supplier,
    rate: i64,
    obs: Observation,
) -> Result<OutflowOutcome, SuperPoolError> {
    let rate = positive_rate(rate)?;
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;

        let resizing = supplier.has_outflow();
        let previous_task = if resizing {
            registered(release(period, supplier)?)
        } else {
            None
        };

        let realtime = supplier.resolve(period)?.units();
        let plan = plan_outflow(realtime, rate).ok_or(SuperPoolError::ArithmeticOverflow)?;
        if !plan.is_fundable(realtime) {
            return Err(SuperPoolError::InsufficientBalance);
        }

        let next_task = reserve(period, supplier, rate, plan)?;

        Ok(OutflowOutcome {
            period_delta,
            stream: if resizing {
                StreamAction::Update(rate)
            } else {
                StreamAction::Create(rate)
            },
            tasks: TaskChange {
                cancel: previous_task,
                register: Some(next_task),
            },
            plan,
        })
    })
}

/// Close the supplier's outgoing stream and release its buffer.
///
/// # Errors
/// `NoActiveOutflow` if no stream is live.
pub fn redeem_flow_stop(
    period: &mut Period,
    supplier: &mut Supplier,
    obs: Observation,
) -> Result<OutflowOutcome, SuperPoolError> {
    if !supplier.has_outflow() {
        return Err(SuperPoolError::NoActiveOutflow);
    }
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;
        let previous_task = release(period, supplier)?;

        Ok(OutflowOutcome {
            period_delta,
            stream: StreamAction::Delete,
            tasks: TaskChange {
                cancel: registered(previous_task),
                register: None,
            },
            plan: OutflowPlan::default(),
        })
    })
}

/// Run a step task: deduct one step and re-arm, or terminate the stream.
///
/// # Errors
/// `TaskNotReady` if the task fires before `init_time + step_time`.
pub fn execute_step(
    period: &mut Period,
    supplier: &mut Supplier,
    payload: &TaskPayload,
    obs: Observation,
) -> Result<TaskOutcome, SuperPoolError> {
    if !supplier.has_outflow() || task_id(&supplier.pool, payload) != supplier.out_stream.cancel_task_id {
        return Ok(TaskOutcome::Stale);
    }
    let due = payload.due_time().ok_or(SuperPoolError::ArithmeticOverflow)?;
    if obs.now < due {
        return Err(SuperPoolError::TaskNotReady);
    }

    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;

        let fired = supplier.out_stream.cancel_task_id;
        let out = supplier.out_stream;
        let realtime = supplier.resolve(period)?.balance;

        if realtime < to_scaled(out.min_balance) {
            release(period, supplier)?;
            return Ok(TaskOutcome::Terminated {
                period_delta,
                tasks: TaskChange {
                    cancel: Some(fired),
                    register: None,
                },
            });
        }

        let step = to_scaled(out.step_amount);
        shares::burn(period, supplier, step)?;
        supplier.deposit = supplier
            .deposit
            .checked_sub(step)
            .ok_or(SuperPoolError::InsufficientBalance)?;
        period.total_deposit = period
            .total_deposit
            .checked_sub(step)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        let init_time = out
            .init_time
            .checked_add(out.step_time)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        let next = TaskPayload::outflow_step(supplier.owner, init_time, out.step_time);
        supplier.out_stream.init_time = init_time;
        supplier.out_stream.cancel_task_id = task_id(&supplier.pool, &next);

        Ok(TaskOutcome::Stepped {
            period_delta,
            step_amount: out.step_amount,
            tasks: TaskChange {
                cancel: Some(fired),
                register: Some(next),
            },
        })
    })
}

/// Reserve `plan.min_balance` out of the deposit and arm the first step.
fn reserve(
    period: &mut Period,
    supplier: &mut Supplier,
    rate: u64,
    plan: OutflowPlan,
) -> Result<TaskPayload, SuperPoolError> {
    let reserved = to_scaled(plan.min_balance);
    supplier.deposit = supplier
        .deposit
        .checked_sub(reserved)
        .ok_or(SuperPoolError::InsufficientBalance)?;
    period.total_deposit = period
        .total_deposit
        .checked_sub(reserved)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    period.out_flow_buffer = period
        .out_flow_buffer
        .checked_add(reserved)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    period.replace_out_flow_rate(0, rate)?;

    let init_time = period.timestamp;
    let payload = TaskPayload::outflow_step(supplier.owner, init_time, plan.step_time);
    supplier.out_stream = OutStream {
        flow_rate: rate,
        step_amount: plan.step_amount,
        step_time: plan.step_time,
        init_time,
        min_balance: plan.min_balance,
        cancel_task_id: task_id(&supplier.pool, &payload),
    };
    Ok(payload)
}

/// Fold the live stream back into deposit and release its buffer.
///
/// What streamed since `init_time` leaves the deposit for good (and burns the
/// matching shares); the rest of the reserve returns to deposit. Returns the
/// id of the task that was armed for the stream.
pub(crate) fn release(period: &mut Period, supplier: &mut Supplier) -> Result<[u8; 32], SuperPoolError> {
    let out = supplier.out_stream;
    let streaming_for = period.timestamp.saturating_sub(out.init_time);
    let streamed = (out.flow_rate as u128)
        .checked_mul(streaming_for as u128)
        .and_then(|units| units.checked_mul(SCALE))
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    let reserved = to_scaled(out.min_balance);

    if streamed > 0 {
        shares::burn(period, supplier, streamed)?;
    }

    if reserved >= streamed {
        let refund = reserved - streamed;
        supplier.deposit = supplier
            .deposit
            .checked_add(refund)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        period.total_deposit = period
            .total_deposit
            .checked_add(refund)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
    } else {
        let overdraw = (streamed - reserved).min(supplier.deposit);
        supplier.deposit -= overdraw;
        period.total_deposit = period
            .total_deposit
            .checked_sub(overdraw)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
    }

    period.out_flow_buffer = period
        .out_flow_buffer
        .checked_sub(reserved)
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    period.replace_out_flow_rate(out.flow_rate, 0)?;
    supplier.out_stream = OutStream::default();

    if supplier.deposit == 0 && !supplier.has_inflow() {
        shares::burn_all(period, supplier)?;
    }

    Ok(out.cancel_task_id)
}
