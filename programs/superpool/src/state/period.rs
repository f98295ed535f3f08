//! Period ledger: the pool-wide snapshot and its index update.

use bytemuck::{Pod, Zeroable};
use superpool_interface::{SCALE, mul_div, to_scaled};

use crate::SuperPoolError;

/// Seconds in a 365-day year, for APY annualisation.
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 3600;

/// Basis points precision (10000 = 100%).
pub const BASIS_POINTS: u128 = 10_000;

/// Starting value of `yield_token_index`: a growth factor of 1.
pub const INDEX_ONE: u128 = SCALE * SCALE;

/// Time-weighted running APY.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Apy {
    /// Seconds covered by the running average
    pub span: u64,
    /// Annualised yield in basis points
    pub value: u64,
}

/// Pool-wide accounting snapshot, valid from `timestamp` until the next
/// [`advance`](Period::advance).
///
/// Every balance is scaled by [`SCALE`]; rates are unscaled units/sec.
/// `yield_snapshot` is in token units because it mirrors the venue balance.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Period {
    // =========================================================================
    // Aggregates (160 bytes)
    // =========================================================================
    /// Sum of every supplier's shares.
    pub total_shares: u128,

    /// Principal plus compounded deposit yield across all suppliers (scaled).
    ///
    /// **Updates on:** deposit, redeem, checkpoint (inflow fold), advance
    /// (deposit yield), outflow step/release.
    pub total_deposit: u128,

    /// Inflow, and yield earned by inflow rates, not yet folded into
    /// `total_deposit` by a supplier checkpoint (scaled).
    pub deposit_from_in_flow_rate: u128,

    /// Sum of reserved outflow buffers (scaled).
    pub out_flow_buffer: u128,

    /// Compounded growth of one unit of deposit since inception, with
    /// [`INDEX_ONE`] as 1. Never decreases.
    pub yield_token_index: u128,

    /// Cumulative yield per unit/sec of inflow rate (scaled). Never decreases.
    pub yield_in_flow_rate_index: u128,

    /// Yield distributed by the latest advance (scaled).
    pub yield_accrued: u128,

    /// Venue balance at the last report, in token units.
    pub yield_snapshot: u128,

    /// Yield distributed since inception (scaled).
    pub total_yield: u128,

    /// Informational running estimate of the pool's external balance (scaled).
    pub pool_total_balance: u128,

    // =========================================================================
    // Clock and rates (64 bytes)
    // =========================================================================
    /// Monotonic sequence, incremented by every advance that moves state.
    pub id: u64,

    /// Unix time of the last advance.
    pub timestamp: u64,

    /// Sum of live inflow rates (units/sec).
    pub in_flow_rate: u64,

    /// Sum of live outflow rates (units/sec).
    pub out_flow_rate: u64,

    /// Informational APY.
    pub apy: Apy,

    /// Unix time of the last distributed yield report.
    pub last_yield_timestamp: u64,

    /// Padding for 16-byte alignment
    pub _padding: u64,
}

/// What one [`Period::advance`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodDelta {
    /// Seconds covered
    pub elapsed: u64,
    /// Yield folded into the indices, in token units
    pub yield_distributed: u64,
    /// Increase of `yield_token_index`
    pub deposit_index_delta: u128,
    /// Increase of `yield_in_flow_rate_index`
    pub flow_index_delta: u128,
}

impl PeriodDelta {
    /// Whether the advance moved any state.
    pub const fn is_noop(&self) -> bool {
        self.elapsed == 0 && self.yield_distributed == 0
    }
}

impl Period {
    /// Start a period at `now`.
    pub fn new(now: u64) -> Self {
        Self {
            timestamp: now,
            last_yield_timestamp: now,
            yield_token_index: INDEX_ONE,
            ..Self::default()
        }
    }

    /// Catch the period up to `now`, distributing `yield_accrued` token units.
    ///
    /// The window's yield is split between flat deposits and live inflows by
    /// their unit-seconds:
    /// ```text
    /// deposit_seconds = total_deposit × elapsed
    /// flow_seconds    = deposit_from_in_flow_rate × elapsed + in_flow_rate × elapsed² / 2 × SCALE
    /// Yd = Y × deposit_seconds / (deposit_seconds + flow_seconds),   Yf = Y − Yd
    /// yield_token_index        ×= (total_deposit + Yd) / total_deposit
    /// yield_in_flow_rate_index += Yf × SCALE / in_flow_rate
    /// ```
    /// `Yd` joins `total_deposit` at once and compounds with it. `Yf` waits in
    /// `deposit_from_in_flow_rate` until its suppliers checkpoint.
    ///
    /// A zero-length window weighs the instantaneous stakes instead. When no
    /// one holds a stake the yield is left undistributed and
    /// `yield_distributed` is zero, so the caller can report it later.
    ///
    /// # Errors
    /// - `InvalidTimestamp` if `now` precedes the period
    /// - `ArithmeticOverflow` on overflow
    pub fn advance(&mut self, now: u64, yield_accrued: u64) -> Result<PeriodDelta, SuperPoolError> {
        let elapsed = now
            .checked_sub(self.timestamp)
            .ok_or(SuperPoolError::InvalidTimestamp)?;
        if elapsed == 0 && yield_accrued == 0 {
            return Ok(PeriodDelta::default());
        }

        let (deposit_weight, flow_weight) = self.contribution_weights(elapsed)?;
        let mut delta = PeriodDelta {
            elapsed,
            ..PeriodDelta::default()
        };

        let yield_scaled = to_scaled(yield_accrued);
        let total_weight = deposit_weight
            .checked_add(flow_weight)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        if yield_scaled > 0 && total_weight > 0 {
            let deposit_share = mul_div(yield_scaled, deposit_weight, total_weight)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            let flow_share = yield_scaled - deposit_share;

            if deposit_share > 0 {
                let grown = self
                    .total_deposit
                    .checked_add(deposit_share)
                    .ok_or(SuperPoolError::ArithmeticOverflow)?;
                let index = mul_div(self.yield_token_index, grown, self.total_deposit)
                    .ok_or(SuperPoolError::ArithmeticOverflow)?;
                delta.deposit_index_delta = index - self.yield_token_index;
            }
            if flow_share > 0 {
                delta.flow_index_delta = mul_div(flow_share, SCALE, self.in_flow_rate as u128)
                    .ok_or(SuperPoolError::ArithmeticOverflow)?;
            }

            self.record_apy(yield_scaled, now)?;
            self.total_deposit = self
                .total_deposit
                .checked_add(deposit_share)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            self.deposit_from_in_flow_rate = self
                .deposit_from_in_flow_rate
                .checked_add(flow_share)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            self.total_yield = self
                .total_yield
                .checked_add(yield_scaled)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            self.yield_accrued = yield_scaled;
            delta.yield_distributed = yield_accrued;
        } else {
            self.yield_accrued = 0;
        }

        if delta.is_noop() {
            return Ok(delta);
        }

        let elapsed_u128 = elapsed as u128;
        let inflow = (self.in_flow_rate as u128)
            .checked_mul(elapsed_u128)
            .and_then(|v| v.checked_mul(SCALE))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        let outflow = (self.out_flow_rate as u128)
            .checked_mul(elapsed_u128)
            .and_then(|v| v.checked_mul(SCALE))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        self.pool_total_balance = self
            .pool_total_balance
            .saturating_add(if delta.yield_distributed > 0 { yield_scaled } else { 0 })
            .saturating_add(inflow)
            .saturating_sub(outflow);
        self.deposit_from_in_flow_rate = self
            .deposit_from_in_flow_rate
            .checked_add(inflow)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        self.yield_token_index = self
            .yield_token_index
            .checked_add(delta.deposit_index_delta)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        self.yield_in_flow_rate_index = self
            .yield_in_flow_rate_index
            .checked_add(delta.flow_index_delta)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        self.timestamp = now;
        self.id = self
            .id
            .checked_add(1)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        Ok(delta)
    }

    /// Deposit and inflow weights for a window of `elapsed` seconds.
    ///
    /// Inflow weight is only counted while some inflow is live, so the flow
    /// index always has a non-zero rate to divide by. Less than one token
    /// unit of deposit is rounding dust left by exits and holds no stake.
    fn contribution_weights(&self, elapsed: u64) -> Result<(u128, u128), SuperPoolError> {
        let has_deposit = self.total_deposit >= SCALE;
        let has_inflow = self.in_flow_rate > 0;

        if elapsed == 0 {
            let deposit_weight = if has_deposit { self.total_deposit } else { 0 };
            let flow_weight = if has_inflow { self.deposit_from_in_flow_rate } else { 0 };
            return Ok((deposit_weight, flow_weight));
        }

        let elapsed = elapsed as u128;
        let deposit_seconds = if has_deposit {
            self.total_deposit
                .checked_mul(elapsed)
                .ok_or(SuperPoolError::ArithmeticOverflow)?
        } else {
            0
        };
        if !has_inflow {
            return Ok((deposit_seconds, 0));
        }

        let accrued_seconds = self
            .deposit_from_in_flow_rate
            .checked_mul(elapsed)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        let rate_seconds = (self.in_flow_rate as u128)
            .checked_mul(elapsed)
            .and_then(|v| v.checked_mul(SCALE))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        // Triangle under a rate that grows linearly across the window.
        let triangle = mul_div(rate_seconds, elapsed, 2).ok_or(SuperPoolError::ArithmeticOverflow)?;
        let flow_seconds = accrued_seconds
            .checked_add(triangle)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        Ok((deposit_seconds, flow_seconds))
    }

    /// Fold a distributed report into the running APY.
    fn record_apy(&mut self, yield_scaled: u128, now: u64) -> Result<(), SuperPoolError> {
        let window = now.saturating_sub(self.last_yield_timestamp);
        self.last_yield_timestamp = now;
        if window == 0 || self.total_deposit == 0 {
            return Ok(());
        }

        let annual = mul_div(
            yield_scaled,
            SECONDS_PER_YEAR as u128 * BASIS_POINTS,
            self.total_deposit,
        )
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
        let window_apy = annual / window as u128;

        let span = self.apy.span as u128;
        let weighted = (self.apy.value as u128)
            .checked_mul(span)
            .and_then(|v| v.checked_add(window_apy.checked_mul(window as u128)?))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        let new_span = span + window as u128;

        self.apy.value = u64::try_from(weighted / new_span).unwrap_or(u64::MAX);
        self.apy.span = u64::try_from(new_span).unwrap_or(u64::MAX);
        Ok(())
    }

    /// Adjust the aggregate inflow rate by `old_rate → new_rate`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the aggregate would leave `u64`.
    pub fn replace_in_flow_rate(&mut self, old_rate: u64, new_rate: u64) -> Result<(), SuperPoolError> {
        self.in_flow_rate = self
            .in_flow_rate
            .checked_sub(old_rate)
            .and_then(|v| v.checked_add(new_rate))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Adjust the aggregate outflow rate by `old_rate → new_rate`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the aggregate would leave `u64`.
    pub fn replace_out_flow_rate(&mut self, old_rate: u64, new_rate: u64) -> Result<(), SuperPoolError> {
        self.out_flow_rate = self
            .out_flow_rate
            .checked_sub(old_rate)
            .and_then(|v| v.checked_add(new_rate))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Deposit backing the outstanding shares: checkpointed deposits plus
    /// the buffers reserved for outgoing streams (scaled).
    pub fn share_base(&self) -> u128 {
        self.total_deposit.saturating_add(self.out_flow_buffer)
    }

    /// Value of one share in scaled units, `SCALE` for an empty pool.
    pub fn share_price(&self) -> u128 {
        if self.total_shares == 0 {
            return SCALE;
        }
        self.share_base() / self.total_shares
    }
}
