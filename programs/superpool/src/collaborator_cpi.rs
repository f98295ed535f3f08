//! CPI helpers for the pool's collaborators.
//!
//! Every call is signed by the pool config PDA. Instruction data comes from
//! the builders in `superpool-interface`; account order follows its
//! `*_accounts` modules.

use pinocchio::{
    ProgramResult,
    account_info::AccountInfo,
    cpi::invoke_signed,
    instruction::{AccountMeta, Instruction, Signer},
};
use pinocchio_token::instructions::Transfer;
use superpool_interface::{
    AUTOMATION_PROGRAM_ID, STREAM_PROGRAM_ID, StreamInstruction, TaskPayload,
    TaskRegistration, VenueInstruction, YIELD_VENUE_PROGRAM_ID, build_cancel_task_data, build_create_task_data,
    build_stream_data, build_venue_data,
};

use crate::ledger::StreamAction;

// ============================================================================
// Streaming Protocol
// ============================================================================

/// Accounts of a streaming protocol call.
pub struct StreamAccounts<'a> {
    /// Pool config PDA (signer)
    pub authority: &'a AccountInfo,
    /// Token account the flow draws from
    pub source: &'a AccountInfo,
    /// Token account the flow pays into
    pub destination: &'a AccountInfo,
    /// Flow record
    pub flow: &'a AccountInfo,
    /// SPL Token program
    pub token_program: &'a AccountInfo,
    /// Streaming protocol program
    pub stream_program: &'a AccountInfo,
}

/// Apply a ledger stream action through the streaming protocol.
///
/// # Errors
/// Propagates CPI errors.
pub fn apply_stream_action(accounts: &StreamAccounts, action: StreamAction, signer: Signer) -> ProgramResult {
    let (instruction, rate) = match action {
        StreamAction::None => return Ok(()),
        StreamAction::Create(rate) => (StreamInstruction::CreateFlow, rate),
        StreamAction::Update(rate) => (StreamInstruction::UpdateFlow, rate),
        StreamAction::Delete => (StreamInstruction::DeleteFlow, 0),
    };
    let data = build_stream_data(instruction, i64::try_from(rate).unwrap_or(i64::MAX));

    let account_metas = [
        AccountMeta::readonly_signer(accounts.authority.key()),
        AccountMeta::writable(accounts.source.key()),
        AccountMeta::writable(accounts.destination.key()),
        AccountMeta::writable(accounts.flow.key()),
        AccountMeta::readonly(accounts.token_program.key()),
    ];
    let ix = Instruction {
        program_id: &STREAM_PROGRAM_ID,
        accounts: &account_metas,
        data: &data,
    };

    invoke_signed(
        &ix,
        &[
            accounts.authority,
            accounts.source,
            accounts.destination,
            accounts.flow,
            accounts.token_program,
            accounts.stream_program,
        ],
        &[signer],
    )
}

// ============================================================================
// Automation Network
// ============================================================================

/// Accounts of an automation network call.
pub struct AutomationAccounts<'a> {
    /// Pool config PDA (signer, task owner)
    pub owner: &'a AccountInfo,
    /// Task record
    pub task: &'a AccountInfo,
    /// Pays for (or receives the rent of) the task record
    pub payer: &'a AccountInfo,
    /// System program
    pub system_program: &'a AccountInfo,
    /// Automation network program
    pub automation_program: &'a AccountInfo,
}

/// Register `payload` with the automation network under `task_id`.
///
/// # Errors
/// Propagates CPI errors.
pub fn create_task(
    accounts: &AutomationAccounts,
    task_id: [u8; 32],
    payload: &TaskPayload,
    signer: Signer,
) -> ProgramResult {
    let data = build_create_task_data(&TaskRegistration {
        task_id,
        target_program: crate::ID,
        payload: *payload,
    });
    invoke_automation(accounts, &data, signer)
}

/// Cancel the task registered under `task_id`.
///
/// # Errors
/// Propagates CPI errors.
pub fn cancel_task(accounts: &AutomationAccounts, task_id: &[u8; 32], signer: Signer) -> ProgramResult {
    invoke_automation(accounts, &build_cancel_task_data(task_id), signer)
}

fn invoke_automation(accounts: &AutomationAccounts, data: &[u8], signer: Signer) -> ProgramResult {
    let account_metas = [
        AccountMeta::readonly_signer(accounts.owner.key()),
        AccountMeta::writable(accounts.task.key()),
        AccountMeta::writable_signer(accounts.payer.key()),
        AccountMeta::readonly(accounts.system_program.key()),
    ];
    let ix = Instruction {
        program_id: &AUTOMATION_PROGRAM_ID,
        accounts: &account_metas,
        data,
    };

    invoke_signed(
        &ix,
        &[
            accounts.owner,
            accounts.task,
            accounts.payer,
            accounts.system_program,
            accounts.automation_program,
        ],
        &[signer],
    )
}

// ============================================================================
// Yield Venue
// ============================================================================

/// Accounts of a yield venue call.
pub struct VenueAccounts<'a> {
    /// Pool config PDA (signer, position owner)
    pub owner: &'a AccountInfo,
    /// Pool vault
    pub vault: &'a AccountInfo,
    /// Pool's position record
    pub position: &'a AccountInfo,
    /// Venue reserve token account
    pub reserve: &'a AccountInfo,
    /// SPL Token program
    pub token_program: &'a AccountInfo,
    /// Yield venue program
    pub venue_program: &'a AccountInfo,
}

/// Move `amount` tokens between the vault and the venue position.
///
/// # Errors
/// Propagates CPI errors.
pub fn invoke_venue(
    accounts: &VenueAccounts,
    instruction: VenueInstruction,
    amount: u64,
    signer: Signer,
) -> ProgramResult {
    let data = build_venue_data(instruction, amount);
    let account_metas = [
        AccountMeta::readonly_signer(accounts.owner.key()),
        AccountMeta::writable(accounts.vault.key()),
        AccountMeta::writable(accounts.position.key()),
        AccountMeta::writable(accounts.reserve.key()),
        AccountMeta::readonly(accounts.token_program.key()),
    ];
    let ix = Instruction {
        program_id: &YIELD_VENUE_PROGRAM_ID,
        accounts: &account_metas,
        data: &data,
    };

    invoke_signed(
        &ix,
        &[
            accounts.owner,
            accounts.vault,
            accounts.position,
            accounts.reserve,
            accounts.token_program,
            accounts.venue_program,
        ],
        &[signer],
    )
}

// ============================================================================
// Vault
// ============================================================================

/// Pay `amount` tokens out of the vault.
///
/// # Errors
/// Propagates CPI errors.
pub fn pay_out(
    vault: &AccountInfo,
    destination: &AccountInfo,
    pool_config: &AccountInfo,
    amount: u64,
    signer: Signer,
) -> ProgramResult {
    if amount == 0 {
        return Ok(());
    }
    Transfer {
        from: vault,
        to: destination,
        authority: pool_config,
        amount,
    }
    .invoke_signed(&[signer])
}
