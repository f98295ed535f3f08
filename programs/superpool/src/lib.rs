//! Superpool Program
//!
//! A yield-bearing liquidity pool that accepts lump-sum deposits and
//! continuous inflow streams, invests idle liquidity at a yield venue, and
//! pays suppliers out as a lump sum or as a continuous outgoing stream.
//!
//! # Architecture
//!
//! The accounting core never iterates over suppliers. The pool keeps one
//! live [`Period`](state::Period) with two cumulative yield indices; each
//! [`Supplier`](state::Supplier) keeps a checkpoint of those indices and
//! derives its realtime balance lazily. Every operation catches the period
//! up to now, checkpoints the calling supplier, then applies its own delta
//! (see [`ledger`]).
//!
//! Outgoing streams are backed by a buffer reserved from the supplier's
//! deposit and replenished in steps by automation tasks whose ids are
//! derived deterministically, so a superseded task is recognised and
//! skipped.
//!
//! # Instructions
//!
//! - Supplier: `Deposit`, `RedeemDeposit`, `RedeemFlow`, `RedeemFlowStop`,
//!   `Transfer`, `CloseAccount`
//! - Streaming protocol: `OnFlowCreated`, `OnFlowUpdated`, `OnFlowDeleted`
//! - Automation network: `CheckTask`, `ExecuteTask`
//! - Permissionless: `PushIdle`, `ReportYield`
//! - Admin: `InitPool`, `SetPoolActive`, `TransferAuthority`, `AcceptAuthority`

pub mod accounts;
pub mod collaborator_cpi;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod pda;
pub mod state;
pub mod utils;

// Error and event types
pub use errors::SuperPoolError;
pub use events::{EventType, emit_event};

// Instruction enum for dispatch
pub use instructions::SuperPoolInstruction;

// PDA derivation helpers
pub use pda::*;

// State types
pub use state::{Period, PoolConfig, Supplier};

use pinocchio::{ProgramResult, account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey};
use pinocchio_log::log;

/// Program ID, selected at compile time by the network feature.
pub const ID: Pubkey = five8_const::decode_32_const(superpool_program_ids::SUPERPOOL_ID);

#[cfg(not(feature = "no-entrypoint"))]
pinocchio::entrypoint!(process_instruction);

/// Dispatch an instruction by its first byte.
///
/// # Errors
/// - `IncorrectProgramId` if invoked under another program id
/// - `InvalidInstructionData` for empty data or an unknown discriminator
pub fn process_instruction(program_id: &Pubkey, accounts: &[AccountInfo], instruction_data: &[u8]) -> ProgramResult {
    if program_id != &ID {
        return Err(ProgramError::IncorrectProgramId);
    }

    let (&discriminator, data) = instruction_data
        .split_first()
        .ok_or(ProgramError::InvalidInstructionData)?;

    let instruction = SuperPoolInstruction::try_from(discriminator).map_err(|_| {
        log!("Unknown instruction: {}", discriminator);
        ProgramError::InvalidInstructionData
    })?;

    let name: &str = instruction.as_ref();
    log!("Instruction: {}", name);

    use instructions::*;
    match instruction {
        SuperPoolInstruction::Deposit => process_deposit(accounts, data),
        SuperPoolInstruction::RedeemDeposit => process_redeem_deposit(accounts, data),
        SuperPoolInstruction::RedeemFlow => process_redeem_flow(accounts, data),
        SuperPoolInstruction::RedeemFlowStop => process_redeem_flow_stop(accounts),
        SuperPoolInstruction::Transfer => process_transfer(accounts, data),
        SuperPoolInstruction::CloseAccount => process_close_account(accounts),
        SuperPoolInstruction::OnFlowCreated => process_on_flow_created(accounts, data),
        SuperPoolInstruction::OnFlowUpdated => process_on_flow_updated(accounts, data),
        SuperPoolInstruction::OnFlowDeleted => process_on_flow_deleted(accounts, data),
        SuperPoolInstruction::CheckTask => process_check_task(accounts, data),
        SuperPoolInstruction::ExecuteTask => process_execute_task(accounts, data),
        SuperPoolInstruction::PushIdle => process_push_idle(accounts, data),
        SuperPoolInstruction::ReportYield => process_report_yield(accounts),
        SuperPoolInstruction::InitPool => process_init_pool(accounts),
        SuperPoolInstruction::SetPoolActive => process_set_pool_active(accounts, data),
        SuperPoolInstruction::TransferAuthority => process_transfer_authority(accounts),
        SuperPoolInstruction::AcceptAuthority => process_accept_authority(accounts),
        SuperPoolInstruction::Log => process_log(accounts, data),
    }
}
