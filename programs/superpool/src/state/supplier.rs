//! Supplier ledger: per-depositor record and its lazy balance resolution.

use bytemuck::{Pod, Zeroable};
use pinocchio::pubkey::Pubkey;
use superpool_interface::{SCALE, from_scaled, mul_div, to_scaled};

use crate::{
    SuperPoolError,
    ledger::shares,
    state::{Period, ProgramAccount, SuperPoolAccount},
};

/// Live inflow from the supplier into the pool.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct InStream {
    /// Units/sec, 0 when no inflow
    pub flow_rate: u64,
    /// Unix time the inflow is scheduled to stop, 0 for open-ended
    pub end_time: u64,
    /// Id of the registered stop task, zeroes when none
    pub cancel_task_id: [u8; 32],
}

/// Live outgoing stream from the pool to the supplier.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct OutStream {
    /// Units/sec, 0 when no outflow
    pub flow_rate: u64,
    /// Units deducted from deposit at each step
    pub step_amount: u64,
    /// Seconds between steps
    pub step_time: u64,
    /// Start of the current step window
    pub init_time: u64,
    /// Units reserved in the pool's outflow buffer
    pub min_balance: u64,
    /// Id of the registered step task
    pub cancel_task_id: [u8; 32],
}

/// Per-depositor ledger record. PDA: ["supplier", pool_config, owner].
///
/// Balances are never stored in realtime form: [`Supplier::resolve`] derives
/// them from the checkpointed fields and the period's indices.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Supplier {
    /// Depositor address.
    pub owner: Pubkey,
    /// Pool config this record belongs to.
    pub pool: Pubkey,

    /// Ownership shares.
    pub shares: u128,
    /// Checkpointed principal plus folded yield and inflow (scaled).
    pub deposit: u128,
    /// Yield folded into `deposit` over the supplier's lifetime (scaled).
    pub cumulated_yield: u128,
    /// `Period::yield_token_index` at the last checkpoint; `deposit` grows by
    /// the index's ratio since then.
    pub yield_token_index: u128,
    /// `Period::yield_in_flow_rate_index` at the last checkpoint.
    pub yield_in_flow_rate_index: u128,

    /// Sequence number assigned at creation.
    pub id: u64,
    /// Period timestamp at the last checkpoint.
    pub timestamp: u64,

    /// Inflow state.
    pub in_stream: InStream,
    /// Outflow state.
    pub out_stream: OutStream,

    /// PDA bump.
    pub bump: u8,
    /// Padding for 16-byte alignment
    pub _padding: [u8; 7],
}

impl ProgramAccount for Supplier {
    const DISCRIMINATOR: SuperPoolAccount = SuperPoolAccount::Supplier;
}

/// Derived balance of a supplier at the period's timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RealtimeBalance {
    /// Realtime balance (scaled), including the reserved outflow buffer
    pub balance: u128,
    /// Yield earned since the checkpoint (scaled)
    pub yield_since_checkpoint: u128,
    /// Part of the yield earned by the inflow rate, still pending in the
    /// period's inflow bucket (scaled)
    pub flow_yield: u128,
    /// Inflow received since the checkpoint (scaled)
    pub inflow_accrued: u128,
    /// Outflow streamed since the step window opened (scaled)
    pub outflow_streamed: u128,
}

impl RealtimeBalance {
    /// Balance in token units, rounded down.
    pub fn units(&self) -> u64 {
        from_scaled(self.balance).unwrap_or(u64::MAX)
    }
}

impl Supplier {
    /// Fresh record checkpointed at the period's current indices.
    pub fn new(pool: Pubkey, owner: Pubkey, id: u64, bump: u8, period: &Period) -> Self {
        Self {
            owner,
            pool,
            id,
            bump,
            timestamp: period.timestamp,
            yield_token_index: period.yield_token_index,
            yield_in_flow_rate_index: period.yield_in_flow_rate_index,
            ..Self::default()
        }
    }

    /// Whether an inflow is live.
    pub const fn has_inflow(&self) -> bool {
        self.in_stream.flow_rate > 0
    }

    /// Whether an outgoing stream is live.
    pub const fn has_outflow(&self) -> bool {
        self.out_stream.flow_rate > 0
    }

    /// Whether the record holds nothing and can be treated as closed.
    pub const fn is_empty(&self) -> bool {
        self.shares == 0 && self.deposit == 0 && !self.has_inflow() && !self.has_outflow()
    }

    /// Resolve the realtime balance at `period.timestamp` without mutating.
    ///
    /// ```text
    /// yield   = deposit × (yield_token_index / checkpoint index − 1) + in_rate × Δyield_in_flow_rate_index / SCALE
    /// inflow  = in_rate × (period.timestamp − timestamp) × SCALE
    /// balance = deposit + yield + inflow [+ min_balance × SCALE − out_rate × (period.timestamp − init_time) × SCALE]
    /// ```
    ///
    /// # Errors
    /// - `InvalidTimestamp` if the period is behind the checkpoint
    /// - `ArithmeticOverflow` on overflow
    pub fn resolve(&self, period: &Period) -> Result<RealtimeBalance, SuperPoolError> {
        let elapsed = period
            .timestamp
            .checked_sub(self.timestamp)
            .ok_or(SuperPoolError::InvalidTimestamp)?;

        let flow_index_delta = period
            .yield_in_flow_rate_index
            .checked_sub(self.yield_in_flow_rate_index)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        let deposit_yield = if self.deposit == 0 || period.yield_token_index == self.yield_token_index {
            0
        } else {
            mul_div(self.deposit, period.yield_token_index, self.yield_token_index)
                .and_then(|grown| grown.checked_sub(self.deposit))
                .ok_or(SuperPoolError::ArithmeticOverflow)?
        };
        let flow_yield = mul_div(self.in_stream.flow_rate as u128, flow_index_delta, SCALE)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        let yield_since_checkpoint = deposit_yield
            .checked_add(flow_yield)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        let inflow_accrued = (self.in_stream.flow_rate as u128)
            .checked_mul(elapsed as u128)
            .and_then(|v| v.checked_mul(SCALE))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        let mut balance = self
            .deposit
            .checked_add(yield_since_checkpoint)
            .and_then(|v| v.checked_add(inflow_accrued))
            .ok_or(SuperPoolError::ArithmeticOverflow)?;

        let mut outflow_streamed = 0;
        if self.has_outflow() {
            let streaming_for = period.timestamp.saturating_sub(self.out_stream.init_time);
            outflow_streamed = (self.out_stream.flow_rate as u128)
                .checked_mul(streaming_for as u128)
                .and_then(|v| v.checked_mul(SCALE))
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            balance = balance
                .checked_add(to_scaled(self.out_stream.min_balance))
                .ok_or(SuperPoolError::ArithmeticOverflow)?
                .saturating_sub(outflow_streamed);
        }

        Ok(RealtimeBalance {
            balance,
            yield_since_checkpoint,
            flow_yield,
            inflow_accrued,
            outflow_streamed,
        })
    }

    /// Balance that can leave as a lump sum or transfer (scaled): the
    /// realtime balance minus the reserved outflow buffer.
    ///
    /// # Errors
    /// Propagates [`Supplier::resolve`] errors.
    pub fn available(&self, period: &Period) -> Result<u128, SuperPoolError> {
        let resolved = self.resolve(period)?;
        if !self.has_outflow() {
            return Ok(resolved.balance);
        }
        Ok(resolved
            .balance
            .saturating_sub(to_scaled(self.out_stream.min_balance)))
    }

    /// Commit the resolved balance into the record at `period.timestamp`.
    ///
    /// Yield is folded into `deposit`. Inflow received since the last
    /// checkpoint, and the yield its rate earned, move from the period's
    /// pending inflow bucket into `total_deposit` and mint shares. Deposit
    /// yield is already part of `total_deposit`. The period must already be
    /// advanced to the current time.
    ///
    /// # Errors
    /// Propagates [`Supplier::resolve`] errors, `ArithmeticOverflow` on overflow.
    pub fn checkpoint(&mut self, period: &mut Period) -> Result<RealtimeBalance, SuperPoolError> {
        let resolved = self.resolve(period)?;

        if resolved.yield_since_checkpoint > 0 {
            self.deposit = self
                .deposit
                .checked_add(resolved.yield_since_checkpoint)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            self.cumulated_yield = self
                .cumulated_yield
                .checked_add(resolved.yield_since_checkpoint)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
        }

        let pending = resolved
            .inflow_accrued
            .checked_add(resolved.flow_yield)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        if pending > 0 {
            shares::mint(period, self, pending)?;
            period.deposit_from_in_flow_rate = period
                .deposit_from_in_flow_rate
                .checked_sub(pending)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            period.total_deposit = period
                .total_deposit
                .checked_add(pending)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
            self.deposit = self
                .deposit
                .checked_add(resolved.inflow_accrued)
                .ok_or(SuperPoolError::ArithmeticOverflow)?;
        }

        self.yield_token_index = period.yield_token_index;
        self.yield_in_flow_rate_index = period.yield_in_flow_rate_index;
        self.timestamp = period.timestamp;

        Ok(resolved)
    }

    /// Reset every balance and stream field, keeping identity.
    pub fn zero(&mut self) {
        *self = Self {
            owner: self.owner,
            pool: self.pool,
            id: self.id,
            bump: self.bump,
            timestamp: self.timestamp,
            yield_token_index: self.yield_token_index,
            yield_in_flow_rate_index: self.yield_in_flow_rate_index,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period_at(now: u64) -> Period {
        Period::new(now)
    }

    #[test]
    fn test_resolve_is_pure() {
        let mut period = period_at(0);
        let mut supplier = Supplier::new([1; 32], [2; 32], 1, 255, &period);
        supplier.deposit = to_scaled(100);
        period.total_deposit = to_scaled(100);
        period.total_shares = 100;
        supplier.shares = 100;
        period.advance(10, 50).unwrap();

        let before = supplier;
        let resolved = supplier.resolve(&period).unwrap();
        assert_eq!(supplier, before);
        assert_eq!(resolved.balance, to_scaled(150));
        assert_eq!(resolved.yield_since_checkpoint, to_scaled(50));
    }

    #[test]
    fn test_checkpoint_folds_inflow_and_mints() {
        let mut period = period_at(0);
        let mut supplier = Supplier::new([1; 32], [2; 32], 1, 255, &period);
        supplier.in_stream.flow_rate = 5;
        period.in_flow_rate = 5;
        period.advance(20, 0).unwrap();

        let resolved = supplier.checkpoint(&mut period).unwrap();
        assert_eq!(resolved.inflow_accrued, to_scaled(100));
        assert_eq!(supplier.deposit, to_scaled(100));
        assert_eq!(supplier.shares, 100);
        assert_eq!(period.total_shares, 100);
        assert_eq!(period.total_deposit, to_scaled(100));
        assert_eq!(period.deposit_from_in_flow_rate, 0);
        assert_eq!(supplier.timestamp, 20);
    }

    #[test]
    fn test_yield_compounds_without_checkpoint() {
        let mut period = period_at(0);
        let mut supplier = Supplier::new([1; 32], [2; 32], 1, 255, &period);
        supplier.deposit = to_scaled(1_000);
        supplier.shares = 1_000;
        period.total_deposit = to_scaled(1_000);
        period.total_shares = 1_000;

        for (at, venue_gain) in [(10, 100), (20, 110), (30, 121)] {
            period.advance(at, venue_gain).unwrap();
        }

        let resolved = supplier.resolve(&period).unwrap();
        assert_eq!(resolved.balance, to_scaled(1_331));
        assert_eq!(resolved.balance, period.total_deposit);
    }

    #[test]
    fn test_checkpoint_moves_flow_yield_out_of_pending_bucket() {
        let mut period = period_at(0);
        let mut supplier = Supplier::new([1; 32], [2; 32], 1, 255, &period);
        supplier.in_stream.flow_rate = 10;
        period.in_flow_rate = 10;
        // Only the inflow holds a stake, so all 40 units of yield go to it
        period.advance(10, 40).unwrap();
        assert_eq!(period.deposit_from_in_flow_rate, to_scaled(140));

        let resolved = supplier.checkpoint(&mut period).unwrap();
        assert_eq!(resolved.flow_yield, to_scaled(40));
        assert_eq!(supplier.deposit, to_scaled(140));
        assert_eq!(period.total_deposit, to_scaled(140));
        assert_eq!(period.deposit_from_in_flow_rate, 0);
        assert_eq!(supplier.shares, 140);
    }

    #[test]
    fn test_outflow_balance_includes_buffer_minus_streamed() {
        let period = {
            let mut p = period_at(0);
            p.timestamp = 30;
            p
        };
        let mut supplier = Supplier::new([1; 32], [2; 32], 1, 255, &period_at(0));
        supplier.timestamp = 30;
        supplier.deposit = to_scaled(1_000);
        supplier.out_stream = OutStream {
            flow_rate: 2,
            step_amount: 20,
            step_time: 10,
            init_time: 0,
            min_balance: 100,
            cancel_task_id: [0; 32],
        };

        let resolved = supplier.resolve(&period).unwrap();
        assert_eq!(resolved.outflow_streamed, to_scaled(60));
        assert_eq!(resolved.balance, to_scaled(1_040));
        assert_eq!(supplier.available(&period).unwrap(), to_scaled(940));
    }

    #[test]
    fn test_zero_keeps_identity() {
        let period = period_at(7);
        let mut supplier = Supplier::new([1; 32], [2; 32], 3, 254, &period);
        supplier.deposit = 10;
        supplier.shares = 10;
        supplier.zero();
        assert!(supplier.is_empty());
        assert_eq!(supplier.owner, [2; 32]);
        assert_eq!(supplier.id, 3);
        assert_eq!(supplier.bump, 254);
    }
}
