//! Superpool instruction builders.
//!
//! Account orders follow the handlers' `# Accounts` docs. Collaborator
//! accounts that a path never touches (flow and task records) are fresh
//! addresses.

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;
use superpool::SuperPoolInstruction;
use superpool_interface::{FlowCallbackParams, PoolHook, TaskPayload, build_flow_hook_data, build_task_hook_data};

use super::pda::{
    AUTOMATION_PROGRAM_ID, SPL_TOKEN_PROGRAM_ID, STREAM_PROGRAM_ID, SUPERPOOL_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    YIELD_VENUE_PROGRAM_ID, find_pool_config_pda, find_supplier_pda, find_vault_pda,
};
use super::setup::TestPool;

/// Build instruction data from a discriminator and a little-endian argument.
fn build_instruction_data(instruction: SuperPoolInstruction, arg: &[u8]) -> Vec<u8> {
    let mut data = vec![instruction as u8];
    data.extend_from_slice(arg);
    data
}

// ============================================================================
// Admin
// ============================================================================

pub fn build_init_pool_ix(mint: &Pubkey, venue_position: &Pubkey, authority: &Pubkey) -> Instruction {
    let (pool_config, _) = find_pool_config_pda(mint);
    let (vault, _) = find_vault_pda(&pool_config);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(pool_config, false),
            AccountMeta::new(vault, false),
            AccountMeta::new_readonly(*venue_position, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::InitPool, &[]),
    }
}

pub fn build_set_pool_active_ix(pool_config: &Pubkey, authority: &Pubkey, is_active: bool) -> Instruction {
    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*pool_config, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: build_instruction_data(SuperPoolInstruction::SetPoolActive, &[u8::from(is_active)]),
    }
}

pub fn build_transfer_authority_ix(pool_config: &Pubkey, authority: &Pubkey, new_authority: &Pubkey) -> Instruction {
    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*pool_config, false),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(*new_authority, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::TransferAuthority, &[]),
    }
}

pub fn build_accept_authority_ix(pool_config: &Pubkey, pending_authority: &Pubkey) -> Instruction {
    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*pool_config, false),
            AccountMeta::new_readonly(*pending_authority, true),
        ],
        data: build_instruction_data(SuperPoolInstruction::AcceptAuthority, &[]),
    }
}

// ============================================================================
// Supplier Operations
// ============================================================================

pub fn build_deposit_ix(pool: &TestPool, owner: &Pubkey, owner_token: &Pubkey, amount: u64) -> Instruction {
    let (supplier, _) = find_supplier_pda(&pool.pool_config, owner);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(supplier, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new(*owner_token, false),
            AccountMeta::new(pool.vault, false),
            AccountMeta::new_readonly(pool.venue_position, false),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            // Self-CPI target for emit_event
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::Deposit, &amount.to_le_bytes()),
    }
}

pub fn build_redeem_deposit_ix(pool: &TestPool, owner: &Pubkey, owner_token: &Pubkey, amount: u64) -> Instruction {
    let (supplier, _) = find_supplier_pda(&pool.pool_config, owner);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(supplier, false),
            AccountMeta::new_readonly(*owner, true),
            AccountMeta::new(*owner_token, false),
            AccountMeta::new(pool.vault, false),
            AccountMeta::new(pool.venue_position, false),
            AccountMeta::new(pool.venue_reserve, false),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(YIELD_VENUE_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::RedeemDeposit, &amount.to_le_bytes()),
    }
}

pub fn build_redeem_flow_ix(pool: &TestPool, owner: &Pubkey, owner_token: &Pubkey, flow_rate: i64) -> Instruction {
    let (supplier, _) = find_supplier_pda(&pool.pool_config, owner);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(supplier, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new(*owner_token, false),
            AccountMeta::new(pool.vault, false),
            AccountMeta::new(pool.venue_position, false),
            AccountMeta::new(pool.venue_reserve, false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(STREAM_PROGRAM_ID, false),
            AccountMeta::new_readonly(AUTOMATION_PROGRAM_ID, false),
            AccountMeta::new_readonly(YIELD_VENUE_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::RedeemFlow, &flow_rate.to_le_bytes()),
    }
}

pub fn build_redeem_flow_stop_ix(pool: &TestPool, owner: &Pubkey, owner_token: &Pubkey) -> Instruction {
    let (supplier, _) = find_supplier_pda(&pool.pool_config, owner);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(supplier, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new(*owner_token, false),
            AccountMeta::new(pool.vault, false),
            AccountMeta::new_readonly(pool.venue_position, false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(STREAM_PROGRAM_ID, false),
            AccountMeta::new_readonly(AUTOMATION_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::RedeemFlowStop, &[]),
    }
}

pub fn build_transfer_ix(pool: &TestPool, owner: &Pubkey, recipient: &Pubkey, amount: u64) -> Instruction {
    let (from_supplier, _) = find_supplier_pda(&pool.pool_config, owner);
    let (to_supplier, _) = find_supplier_pda(&pool.pool_config, recipient);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(from_supplier, false),
            AccountMeta::new(to_supplier, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(*recipient, false),
            AccountMeta::new_readonly(pool.venue_position, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::Transfer, &amount.to_le_bytes()),
    }
}

pub fn build_close_account_ix(pool: &TestPool, owner: &Pubkey, owner_token: &Pubkey) -> Instruction {
    let (supplier, _) = find_supplier_pda(&pool.pool_config, owner);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(supplier, false),
            AccountMeta::new(*owner, true),
            AccountMeta::new(*owner_token, false),
            AccountMeta::new(pool.vault, false),
            AccountMeta::new(pool.venue_position, false),
            AccountMeta::new(pool.venue_reserve, false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(STREAM_PROGRAM_ID, false),
            AccountMeta::new_readonly(AUTOMATION_PROGRAM_ID, false),
            AccountMeta::new_readonly(YIELD_VENUE_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::CloseAccount, &[]),
    }
}

// ============================================================================
// Collaborator Hooks
// ============================================================================

/// Build a flow hook call. `caller` stands in for the streaming protocol's
/// authority and signs only when `caller_signs` is set.
pub fn build_flow_hook_ix(
    pool: &TestPool,
    hook: PoolHook,
    sender: &Pubkey,
    caller: &Pubkey,
    caller_signs: bool,
    payer: &Pubkey,
    flow_rate: i64,
) -> Instruction {
    let (supplier, _) = find_supplier_pda(&pool.pool_config, sender);
    let params = FlowCallbackParams {
        sender: sender.to_bytes(),
        receiver: pool.pool_config.to_bytes(),
        flow_rate,
        end_time: 0,
    };

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(supplier, false),
            AccountMeta::new_readonly(*caller, caller_signs),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(pool.venue_position, false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(AUTOMATION_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_flow_hook_data(hook, &params).to_vec(),
    }
}

pub fn build_check_task_ix(pool: &TestPool, payload: &TaskPayload) -> Instruction {
    let supplier_owner = Pubkey::new_from_array(payload.supplier);
    let (supplier, _) = find_supplier_pda(&pool.pool_config, &supplier_owner);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(pool.pool_config, false),
            AccountMeta::new_readonly(supplier, false),
        ],
        data: build_task_hook_data(PoolHook::CheckTask, payload).to_vec(),
    }
}

/// Build an ExecuteTask call with `executor` standing in for the automation
/// network's executor.
pub fn build_execute_task_ix(
    pool: &TestPool,
    payload: &TaskPayload,
    executor: &Pubkey,
    payer: &Pubkey,
    supplier_token: &Pubkey,
) -> Instruction {
    let supplier_owner = Pubkey::new_from_array(payload.supplier);
    let (supplier, _) = find_supplier_pda(&pool.pool_config, &supplier_owner);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(supplier, false),
            AccountMeta::new_readonly(*executor, true),
            AccountMeta::new(*payer, true),
            AccountMeta::new(*supplier_token, false),
            AccountMeta::new(pool.vault, false),
            AccountMeta::new(pool.venue_position, false),
            AccountMeta::new(pool.venue_reserve, false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new(Pubkey::new_unique(), false),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(STREAM_PROGRAM_ID, false),
            AccountMeta::new_readonly(AUTOMATION_PROGRAM_ID, false),
            AccountMeta::new_readonly(YIELD_VENUE_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_task_hook_data(PoolHook::ExecuteTask, payload).to_vec(),
    }
}

// ============================================================================
// Strategy
// ============================================================================

pub fn build_push_idle_ix(pool: &TestPool, amount: u64) -> Instruction {
    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new(pool.vault, false),
            AccountMeta::new(pool.venue_position, false),
            AccountMeta::new(pool.venue_reserve, false),
            AccountMeta::new_readonly(SPL_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(YIELD_VENUE_PROGRAM_ID, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::PushIdle, &amount.to_le_bytes()),
    }
}

pub fn build_report_yield_ix(pool: &TestPool) -> Instruction {
    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(pool.pool_config, false),
            AccountMeta::new_readonly(pool.venue_position, false),
            AccountMeta::new_readonly(SUPERPOOL_PROGRAM_ID, false),
        ],
        data: build_instruction_data(SuperPoolInstruction::ReportYield, &[]),
    }
}

/// Build a Log call with `authority` signing as the event authority.
pub fn build_log_ix(authority: &Pubkey, event: &[u8]) -> Instruction {
    let mut data = vec![SuperPoolInstruction::Log as u8];
    data.extend_from_slice(&(event.len() as u32).to_le_bytes());
    data.extend_from_slice(event);

    Instruction {
        program_id: SUPERPOOL_PROGRAM_ID,
        accounts: vec![AccountMeta::new_readonly(*authority, true)],
        data,
    }
}
