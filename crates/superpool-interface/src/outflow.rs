//! Buffer and step sizing for outgoing continuous withdrawals.
//!
//! An outgoing stream is backed by a reserved buffer that the automation
//! network replenishes in discrete steps:
//! ```text
//! step_time   = realtime_balance / TARGET_STEPS / flow_rate
//! step_amount = flow_rate × step_time
//! min_balance = flow_rate × BUFFER_SECONDS + step_amount
//! ```

/// Number of replenishment cycles targeted to exhaust the current balance.
pub const TARGET_STEPS: u64 = 10;

/// Safety reserve held back for the streaming protocol's deposit (5 hours).
pub const BUFFER_SECONDS: u64 = 5 * 3600;

/// Step schedule backing one outgoing stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutflowPlan {
    /// Seconds between automation steps
    pub step_time: u64,
    /// Units deducted from the supplier's deposit at each step
    pub step_amount: u64,
    /// Units reserved into the pool's outflow buffer
    pub min_balance: u64,
}

impl OutflowPlan {
    /// Whether the plan can be backed by `realtime_balance` units.
    ///
    /// A zero step time means the balance cannot cover even one second per
    /// step, and the buffer must be fully covered by the current balance.
    pub const fn is_fundable(&self, realtime_balance: u64) -> bool {
        self.step_time > 0 && self.min_balance <= realtime_balance
    }
}

/// Size the step schedule for streaming `flow_rate` units/sec out of
/// `realtime_balance` units.
///
/// # Example
/// ```
/// use superpool_interface::plan_outflow;
///
/// let plan = plan_outflow(27_272, 200).unwrap();
/// assert_eq!(plan.step_time, 13);
/// assert_eq!(plan.step_amount, 2_600);
/// assert_eq!(plan.min_balance, 200 * 18_000 + 2_600);
/// ```
///
/// # Returns
/// `None` for a zero rate or on arithmetic overflow.
pub fn plan_outflow(realtime_balance: u64, flow_rate: u64) -> Option<OutflowPlan> {
    if flow_rate == 0 {
        return None;
    }
    let step_time = realtime_balance / TARGET_STEPS / flow_rate;
    let step_amount = flow_rate.checked_mul(step_time)?;
    let min_balance = flow_rate
        .checked_mul(BUFFER_SECONDS)?
        .checked_add(step_amount)?;

    Some(OutflowPlan {
        step_time,
        step_amount,
        min_balance,
    })
}
