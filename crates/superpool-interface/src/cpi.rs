//! Instruction builders for the pool's collaborators.
//!
//! Three external programs sit at the edge of the accounting core:
//! - The streaming protocol moves tokens per second and calls the pool's
//!   flow hooks when a flow targeting the pool changes.
//! - The automation network polls `CheckTask` and calls `ExecuteTask`.
//! - The yield venue takes idle liquidity and reports a position balance.
//!
//! Each builder returns the raw instruction data; callers supply accounts in
//! the order given by the matching `*_accounts` module.
//!
//! Flows the pool opens or closes itself never call back into the pool's
//! hooks, so a pool instruction is never re-entered mid-update.

use bytemuck::{Pod, Zeroable};
use pinocchio::pubkey::Pubkey;

use crate::task::TaskPayload;

// ============================================================================
// Pool Hooks (called by collaborators)
// ============================================================================

/// Discriminators of the pool instructions collaborators invoke.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolHook {
    /// A flow into the pool was opened
    OnFlowCreated = 32,
    /// A flow into the pool changed rate
    OnFlowUpdated = 33,
    /// A flow into the pool was closed
    OnFlowDeleted = 34,
    /// Ask whether a task is ready (answers via return data)
    CheckTask = 40,
    /// Run a ready task
    ExecuteTask = 41,
}

/// Parameters of a flow hook, identical for create, update, and delete.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct FlowCallbackParams {
    /// Owner of the flow (becomes the supplier)
    pub sender: Pubkey,
    /// Flow receiver, must be the pool config
    pub receiver: Pubkey,
    /// Flow rate in units/sec (signed on the wire, must be positive)
    pub flow_rate: i64,
    /// Unix time the sender wants the flow closed, 0 for open-ended
    pub end_time: u64,
}

impl FlowCallbackParams {
    /// Size of the params in bytes.
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        bytemuck::try_pod_read_unaligned(data.get(..Self::LEN)?).ok()
    }
}

/// Build instruction data for a flow hook.
///
/// Layout: [discriminator: u8, params: FlowCallbackParams (80 bytes)]
pub fn build_flow_hook_data(hook: PoolHook, params: &FlowCallbackParams) -> [u8; 81] {
    let mut data = [0u8; 81];
    data[0] = hook as u8;
    data[1..].copy_from_slice(bytemuck::bytes_of(params));
    data
}

/// Build instruction data for `CheckTask` or `ExecuteTask`.
///
/// Layout: [discriminator: u8, payload: TaskPayload (56 bytes)]
pub fn build_task_hook_data(hook: PoolHook, payload: &TaskPayload) -> [u8; 57] {
    let mut data = [0u8; 57];
    data[0] = hook as u8;
    data[1..].copy_from_slice(bytemuck::bytes_of(payload));
    data
}

// ============================================================================
// Streaming Protocol
// ============================================================================

/// Streaming protocol instructions the pool invokes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamInstruction {
    /// Open a flow from `source` to `destination`
    CreateFlow = 0,
    /// Change a flow's rate
    UpdateFlow = 1,
    /// Close a flow
    DeleteFlow = 2,
}

/// Build instruction data for a streaming protocol call.
///
/// Layout: [discriminator: u8, flow_rate: i64 LE]. `DeleteFlow` ignores the rate.
pub fn build_stream_data(instruction: StreamInstruction, flow_rate: i64) -> [u8; 9] {
    let mut data = [0u8; 9];
    data[0] = instruction as u8;
    data[1..].copy_from_slice(&flow_rate.to_le_bytes());
    data
}

/// Account indices for streaming protocol calls.
///
/// 0. authority (signer) - Pool config PDA, as sender or as flow operator
/// 1. source (mut) - Token account the flow draws from
/// 2. destination (mut) - Token account the flow pays into
/// 3. flow (mut) - Streaming protocol's flow record
/// 4. token_program - SPL Token program
pub mod stream_accounts {
    /// Pool config PDA (signer)
    pub const AUTHORITY: usize = 0;
    /// Flow source token account
    pub const SOURCE: usize = 1;
    /// Flow destination token account
    pub const DESTINATION: usize = 2;
    /// Flow record
    pub const FLOW: usize = 3;
    /// Token program
    pub const TOKEN_PROGRAM: usize = 4;
    /// Total number of accounts
    pub const COUNT: usize = 5;
}

// ============================================================================
// Automation Network
// ============================================================================

/// Automation network instructions the pool invokes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutomationInstruction {
    /// Register a task record keyed by its id
    CreateTask = 0,
    /// Remove a task record
    CancelTask = 1,
}

/// Task record registered with the automation network.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TaskRegistration {
    /// Deterministic id from [`crate::task_id`]
    pub task_id: [u8; 32],
    /// Program whose `CheckTask`/`ExecuteTask` hooks run the task
    pub target_program: Pubkey,
    /// Payload echoed back to the hooks
    pub payload: TaskPayload,
}

/// Build instruction data for `CreateTask`.
///
/// Layout: [discriminator: u8, registration: TaskRegistration (120 bytes)]
pub fn build_create_task_data(registration: &TaskRegistration) -> [u8; 121] {
    let mut data = [0u8; 121];
    data[0] = AutomationInstruction::CreateTask as u8;
    data[1..].copy_from_slice(bytemuck::bytes_of(registration));
    data
}

/// Build instruction data for `CancelTask`.
///
/// Layout: [discriminator: u8, task_id: [u8; 32]]
pub fn build_cancel_task_data(task_id: &[u8; 32]) -> [u8; 33] {
    let mut data = [0u8; 33];
    data[0] = AutomationInstruction::CancelTask as u8;
    data[1..].copy_from_slice(task_id);
    data
}

/// Account indices for automation network calls.
///
/// 0. owner (signer) - Pool config PDA
/// 1. task (mut) - Task record, derived by the network from (owner, task_id)
/// 2. payer (signer, mut) - Rent payer for new task records
/// 3. system_program - System program
pub mod automation_accounts {
    /// Pool config PDA (signer)
    pub const OWNER: usize = 0;
    /// Task record
    pub const TASK: usize = 1;
    /// Rent payer
    pub const PAYER: usize = 2;
    /// System program
    pub const SYSTEM_PROGRAM: usize = 3;
    /// Total number of accounts
    pub const COUNT: usize = 4;
}

// ============================================================================
// Yield Venue
// ============================================================================

/// Yield venue instructions the pool invokes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VenueInstruction {
    /// Move tokens from the owner's account into the position
    Deposit = 0,
    /// Move tokens from the position back to the owner's account
    Withdraw = 1,
}

/// Build instruction data for a venue call.
///
/// Layout: [discriminator: u8, amount: u64 LE]
pub fn build_venue_data(instruction: VenueInstruction, amount: u64) -> [u8; 9] {
    let mut data = [0u8; 9];
    data[0] = instruction as u8;
    data[1..].copy_from_slice(&amount.to_le_bytes());
    data
}

/// Account indices for yield venue calls.
///
/// 0. owner (signer) - Pool config PDA
/// 1. owner_token (mut) - Pool vault
/// 2. position (mut) - Pool's position at the venue
/// 3. reserve (mut) - Venue reserve token account
/// 4. token_program - SPL Token program
pub mod venue_accounts {
    /// Pool config PDA (signer)
    pub const OWNER: usize = 0;
    /// Pool vault
    pub const OWNER_TOKEN: usize = 1;
    /// Venue position record
    pub const POSITION: usize = 2;
    /// Venue reserve token account
    pub const RESERVE: usize = 3;
    /// Token program
    pub const TOKEN_PROGRAM: usize = 4;
    /// Total number of accounts
    pub const COUNT: usize = 5;
}

/// Venue position record layout.
///
/// Layout: [discriminator: 8 bytes, owner: Pubkey, balance: u64 LE]. The
/// balance includes yield accrued at the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct VenuePosition {
    /// Position discriminator assigned by the venue
    pub discriminator: u64,
    /// Position owner (the pool config PDA)
    pub owner: Pubkey,
    /// Redeemable balance in token units
    pub balance: u64,
}

impl VenuePosition {
    /// Size of the position record in bytes.
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Read a position from raw account data.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        bytemuck::try_pod_read_unaligned(data.get(..Self::LEN)?).ok()
    }
}
