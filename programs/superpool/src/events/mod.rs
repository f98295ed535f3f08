//! Event definitions for the Superpool program.
//!
//! Events are emitted via self-invocation of the Log instruction, which
//! records event data in transaction logs without truncation.
//!
//! # Event Pattern
//!
//! Every event is a `#[repr(C)]` Pod struct tied to an [`EventType`]
//! discriminator through the [`Event`] trait. The Log payload is the
//! little-endian discriminator followed by the struct bytes.
//!
//! The period's history is the stream of [`PeriodAdvancedEvent`]s.

use bytemuck::{Pod, Zeroable};
use pinocchio::{
    ProgramResult,
    account_info::AccountInfo,
    cpi::invoke_signed,
    instruction::{AccountMeta, Instruction, Signer},
    pubkey::Pubkey,
};

use crate::{
    ID,
    instructions::SuperPoolInstruction,
    state::{Period, PeriodDelta},
};

/// Event type discriminators for identifying event types in logs.
///
/// # Ranges
/// - **1-15**: Supplier events
/// - **16-31**: Ledger and strategy events
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
pub enum EventType {
    // =========================================================================
    // Supplier Events (1-15)
    // =========================================================================
    /// Lump-sum deposit
    SupplierDeposit = 1,
    /// Lump-sum redemption
    SupplierRedeem = 2,
    /// Outgoing stream opened, resized, or closed
    OutflowUpdated = 3,
    /// Outgoing stream stepped or terminated by automation
    OutflowStepped = 4,
    /// Inflow opened, changed, or closed
    InflowUpdated = 5,
    /// Balance moved between suppliers
    SharesTransferred = 6,
    /// Supplier withdrew everything and its record was zeroed
    AccountClosed = 7,
    // Reserved: 8-15

    // =========================================================================
    // Ledger Events (16-31)
    // =========================================================================
    /// Period advanced
    PeriodAdvanced = 16,
    /// Idle liquidity moved to the venue
    YieldPushed = 17,
    /// Stale automation task ignored
    TaskSkipped = 18,
}

/// A Pod event with a fixed discriminator.
pub trait Event: Pod {
    /// Discriminator written before the event bytes.
    const TYPE: EventType;

    /// Serialize as `[discriminator (8 bytes LE), fields...]`.
    fn to_event_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + core::mem::size_of::<Self>());
        out.extend_from_slice(&(Self::TYPE as u64).to_le_bytes());
        out.extend_from_slice(bytemuck::bytes_of(self));
        out
    }
}

macro_rules! impl_event {
    ($($event:ty => $kind:ident),* $(,)?) => {
        $(impl Event for $event {
            const TYPE: EventType = EventType::$kind;
        })*
    };
}

/// Emitted on a lump-sum deposit.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SupplierDepositEvent {
    /// Supplier owner
    pub owner: Pubkey,
    /// Shares minted
    pub shares_minted: u128,
    /// Supplier's checkpointed deposit afterwards (scaled)
    pub deposit: u128,
    /// Token units deposited
    pub amount: u64,
    /// Unix time
    pub timestamp: u64,
}

/// Emitted on a lump-sum redemption.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SupplierRedeemEvent {
    /// Supplier owner
    pub owner: Pubkey,
    /// Shares burned
    pub shares_burned: u128,
    /// Supplier's checkpointed deposit afterwards (scaled)
    pub deposit: u128,
    /// Token units paid out
    pub amount: u64,
    /// Tokens pulled from the venue to cover the payout
    pub pulled: u64,
}

/// Emitted when an outgoing stream is opened, resized, or closed.
///
/// A closed stream reports a zero rate.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct OutflowUpdatedEvent {
    /// Supplier owner
    pub owner: Pubkey,
    /// Id of the registered step task, zeroes when closed
    pub task_id: [u8; 32],
    /// Units/sec
    pub flow_rate: u64,
    /// Units deducted per step
    pub step_amount: u64,
    /// Seconds between steps
    pub step_time: u64,
    /// Units reserved in the buffer
    pub min_balance: u64,
    /// Unix time
    pub timestamp: u64,
    /// Padding for 16-byte alignment
    pub _padding: u64,
}

/// Emitted when an automation task steps or terminates an outgoing stream.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct OutflowSteppedEvent {
    /// Supplier owner
    pub owner: Pubkey,
    /// Id of the next step task, zeroes when terminated
    pub next_task_id: [u8; 32],
    /// Units deducted
    pub step_amount: u64,
    /// Unix time
    pub timestamp: u64,
    /// 1 when the buffer ran out and the stream was closed
    pub terminated: u8,
    /// Padding for 16-byte alignment
    pub _padding: [u8; 15],
}

/// Emitted when an inflow is opened, changed, or closed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct InflowUpdatedEvent {
    /// Flow sender (supplier owner)
    pub owner: Pubkey,
    /// New rate, 0 when closed
    pub flow_rate: u64,
    /// Scheduled end, 0 for open-ended
    pub end_time: u64,
    /// Pool-wide inflow rate afterwards
    pub pool_in_flow_rate: u64,
    /// Unix time
    pub timestamp: u64,
}

/// Emitted when balance moves between suppliers.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SharesTransferredEvent {
    /// Sender
    pub from: Pubkey,
    /// Recipient
    pub to: Pubkey,
    /// Shares moved
    pub shares: u128,
    /// Token units moved
    pub amount: u64,
    /// Unix time
    pub timestamp: u64,
}

/// Emitted when a supplier withdraws everything and its record is zeroed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct AccountClosedEvent {
    /// Supplier owner
    pub owner: Pubkey,
    /// Shares burned
    pub shares_burned: u128,
    /// Token units paid out
    pub amount: u64,
    /// Unix time
    pub timestamp: u64,
}

/// Emitted for every advance that moved time or distributed yield.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PeriodAdvancedEvent {
    /// Total shares
    pub total_shares: u128,
    /// Total checkpointed deposit (scaled)
    pub total_deposit: u128,
    /// Deposit yield index
    pub yield_token_index: u128,
    /// Inflow yield index
    pub yield_in_flow_rate_index: u128,
    /// Period sequence number
    pub id: u64,
    /// Period timestamp
    pub timestamp: u64,
    /// Seconds covered
    pub elapsed: u64,
    /// Token units distributed
    pub yield_distributed: u64,
    /// Running APY in basis points
    pub apy_bps: u64,
    /// Padding for 16-byte alignment
    pub _padding: u64,
}

impl PeriodAdvancedEvent {
    /// Snapshot of `period` after an advance described by `delta`.
    pub fn new(period: &Period, delta: &PeriodDelta) -> Self {
        Self {
            total_shares: period.total_shares,
            total_deposit: period.total_deposit,
            yield_token_index: period.yield_token_index,
            yield_in_flow_rate_index: period.yield_in_flow_rate_index,
            id: period.id,
            timestamp: period.timestamp,
            elapsed: delta.elapsed,
            yield_distributed: delta.yield_distributed,
            apy_bps: period.apy.value,
            _padding: 0,
        }
    }
}

/// Emitted when idle liquidity is moved to the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct YieldPushedEvent {
    /// Venue balance accounted for afterwards
    pub yield_snapshot: u128,
    /// Token units pushed
    pub amount: u64,
    /// Unix time
    pub timestamp: u64,
}

/// Emitted when a stale automation task is ignored.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TaskSkippedEvent {
    /// Supplier the task targeted
    pub owner: Pubkey,
    /// Id recomputed from the payload
    pub task_id: [u8; 32],
    /// Task kind tag
    pub kind: u8,
    /// Padding for 8-byte alignment
    pub _padding: [u8; 7],
    /// Unix time
    pub timestamp: u64,
}

impl_event! {
    SupplierDepositEvent => SupplierDeposit,
    SupplierRedeemEvent => SupplierRedeem,
    OutflowUpdatedEvent => OutflowUpdated,
    OutflowSteppedEvent => OutflowStepped,
    InflowUpdatedEvent => InflowUpdated,
    SharesTransferredEvent => SharesTransferred,
    AccountClosedEvent => AccountClosed,
    PeriodAdvancedEvent => PeriodAdvanced,
    YieldPushedEvent => YieldPushed,
    TaskSkippedEvent => TaskSkipped,
}

/// Emit an event via self-invocation of the Log instruction.
///
/// Instruction data: `[Log discriminator, length (4 bytes LE), event bytes]`.
/// The pool config PDA signs so that only this program's code paths can log.
///
/// # Arguments
/// * `pool_config` - The pool config PDA account (used as signer)
/// * `superpool_program` - This program's account (required for self-CPI)
/// * `signer` - Signer seeds for the pool config PDA
/// * `event` - The event to emit
pub fn emit_event<T: Event>(
    pool_config: &AccountInfo,
    superpool_program: &AccountInfo,
    signer: Signer,
    event: &T,
) -> ProgramResult {
    let event_data = event.to_event_bytes();

    let mut instruction_data = Vec::with_capacity(1 + 4 + event_data.len());
    instruction_data.push(SuperPoolInstruction::Log as u8);
    instruction_data.extend_from_slice(&(event_data.len() as u32).to_le_bytes());
    instruction_data.extend_from_slice(&event_data);

    let instruction = Instruction {
        program_id: &ID,
        accounts: &[AccountMeta::readonly_signer(pool_config.key())],
        data: &instruction_data,
    };

    invoke_signed(&instruction, &[pool_config, superpool_program], &[signer])
}

/// Emit a [`PeriodAdvancedEvent`] unless the advance was a no-op.
///
/// # Errors
/// Propagates [`emit_event`] errors.
pub fn emit_period_advanced(
    pool_config: &AccountInfo,
    superpool_program: &AccountInfo,
    signer: Signer,
    period: &Period,
    delta: &PeriodDelta,
) -> ProgramResult {
    if delta.is_noop() {
        return Ok(());
    }
    emit_event(pool_config, superpool_program, signer, &PeriodAdvancedEvent::new(period, delta))
}
