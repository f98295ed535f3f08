//! Inflow stream adapter.
//!
//! Reacts to the streaming protocol's flow lifecycle callbacks. An inflow is
//! just a rate on the supplier record plus a term in the period's aggregate
//! rate; what it delivers is derived lazily at each checkpoint. A flow opened
//! with an end time also arms a stop task that closes it when due.

use superpool_interface::{TaskPayload, task_id};

use crate::{
    SuperPoolError,
    ledger::{Observation, TaskChange, TaskOutcome, catch_up, positive_rate, registered, transactional},
    state::{InStream, Period, PeriodDelta, Supplier},
};

/// Result of a flow lifecycle callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InflowOutcome {
    /// Period catch-up performed first
    pub period_delta: PeriodDelta,
    /// Stop task changes for the handler
    pub tasks: TaskChange,
}

/// A flow from the supplier to the pool was opened.
///
/// # Errors
/// - `InvalidRate` for `rate <= 0`
/// - `InflowAlreadyActive` if the supplier already streams in
pub fn on_flow_created(
    period: &mut Period,
    supplier: &mut Supplier,
    rate: i64,
    end_time: u64,
    obs: Observation,
) -> Result<InflowOutcome, SuperPoolError> {
    let rate = positive_rate(rate)?;
    if supplier.has_inflow() {
        return Err(SuperPoolError::InflowAlreadyActive);
    }
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;

        period.replace_in_flow_rate(0, rate)?;
        supplier.in_stream = InStream {
            flow_rate: rate,
            ..InStream::default()
        };
        let register = schedule_stop(period, supplier, end_time);

        Ok(InflowOutcome {
            period_delta,
            tasks: TaskChange {
                cancel: None,
                register,
            },
        })
    })
}

/// The supplier's flow changed rate or end time.
///
/// # Errors
/// - `InvalidRate` for `rate <= 0`
/// - `NoActiveInflow` if the supplier has no inflow to update
pub fn on_flow_updated(
    period: &mut Period,
    supplier: &mut Supplier,
    rate: i64,
    end_time: u64,
    obs: Observation,
) -> Result<InflowOutcome, SuperPoolError> {
    let rate = positive_rate(rate)?;
    if !supplier.has_inflow() {
        return Err(SuperPoolError::NoActiveInflow);
    }
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;

        period.replace_in_flow_rate(supplier.in_stream.flow_rate, rate)?;
        supplier.in_stream.flow_rate = rate;

        let mut tasks = TaskChange::default();
        if end_time != supplier.in_stream.end_time {
            tasks.cancel = registered(supplier.in_stream.cancel_task_id);
            supplier.in_stream.cancel_task_id = [0; 32];
            supplier.in_stream.end_time = 0;
            tasks.register = schedule_stop(period, supplier, end_time);
        }

        Ok(InflowOutcome { period_delta, tasks })
    })
}

/// The supplier's flow was closed.
///
/// A supplier without an inflow is left untouched: the streaming protocol
/// may report the deletion of a flow the pool already stopped.
///
/// # Errors
/// Catch-up and arithmetic errors only.
pub fn on_flow_deleted(
    period: &mut Period,
    supplier: &mut Supplier,
    obs: Observation,
) -> Result<InflowOutcome, SuperPoolError> {
    if !supplier.has_inflow() {
        return Ok(InflowOutcome::default());
    }
    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;
        let cancel = registered(stop(period, supplier)?);

        Ok(InflowOutcome {
            period_delta,
            tasks: TaskChange {
                cancel,
                register: None,
            },
        })
    })
}

/// Run a stop task: fold the inflow up to now and remove it.
///
/// # Errors
/// `TaskNotReady` if the task fires before the inflow's end time.
pub fn execute_stop(
    period: &mut Period,
    supplier: &mut Supplier,
    payload: &TaskPayload,
    obs: Observation,
) -> Result<TaskOutcome, SuperPoolError> {
    if !supplier.has_inflow() || task_id(&supplier.pool, payload) != supplier.in_stream.cancel_task_id {
        return Ok(TaskOutcome::Stale);
    }
    let due = payload.due_time().ok_or(SuperPoolError::ArithmeticOverflow)?;
    if obs.now < due {
        return Err(SuperPoolError::TaskNotReady);
    }

    transactional(period, supplier, |period, supplier| {
        let period_delta = catch_up(period, obs)?;
        supplier.checkpoint(period)?;
        let flow_rate = supplier.in_stream.flow_rate;
        let fired = stop(period, supplier)?;

        Ok(TaskOutcome::InflowStopped {
            period_delta,
            flow_rate,
            tasks: TaskChange {
                cancel: Some(fired),
                register: None,
            },
        })
    })
}

/// Arm a stop task for `end_time` if it lies in the future.
fn schedule_stop(period: &Period, supplier: &mut Supplier, end_time: u64) -> Option<TaskPayload> {
    if end_time <= period.timestamp {
        return None;
    }
    let payload = TaskPayload::inflow_stop(supplier.owner, end_time);
    supplier.in_stream.end_time = end_time;
    supplier.in_stream.cancel_task_id = task_id(&supplier.pool, &payload);
    Some(payload)
}

/// Remove the checkpointed inflow. Returns the stop task id it carried.
fn stop(period: &mut Period, supplier: &mut Supplier) -> Result<[u8; 32], SuperPoolError> {
    let stream = supplier.in_stream;
    period.replace_in_flow_rate(stream.flow_rate, 0)?;
    supplier.in_stream = InStream::default();
    Ok(stream.cancel_task_id)
}
