//! Streaming protocol hooks: OnFlowCreated, OnFlowUpdated, OnFlowDeleted.
//!
//! Only the streaming protocol's authority PDA may call these. A timed flow
//! (non-zero `end_time`) gets a stop task registered with the automation
//! network.
//!
//! # Accounts
//! 0. `[mut]` pool_config - Pool config PDA (the flow receiver)
//! 1. `[mut]` supplier - Supplier PDA of the flow sender
//! 2. `[signer]` stream_authority - Streaming protocol's hook-signing PDA
//! 3. `[mut, signer]` payer - Pays for new supplier and task records
//! 4. `[]` venue_position - Pool's position at the yield venue
//! 5. `[mut]` next_task - Record of the stop task to register
//! 6. `[mut]` previous_task - Record of the stop task to cancel
//! 7. `[]` system_program
//! 8. `[]` automation_program
//! 9. `[]` superpool_program - For self-CPI events
//!
//! Data: [`FlowCallbackParams`].

use pinocchio::{
    ProgramResult, account_info::AccountInfo, instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
};
use pinocchio_log::log;
use superpool_interface::{AUTOMATION_PROGRAM_ID, FlowCallbackParams, validate_stream_authority};

use crate::{
    SuperPoolError,
    accounts::{load_or_create_supplier, load_supplier},
    collaborator_cpi::AutomationAccounts,
    emit_event,
    events::{InflowUpdatedEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::{apply_task_change, load_active_pool, load_pool},
    ledger::inflow,
    state::{is_uninitialized, store},
    utils::{observe, validate_program, validate_system_program},
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum FlowHook {
    Created,
    Updated,
    Deleted,
}

/// Process OnFlowCreated: start accruing the sender's inflow.
pub fn process_on_flow_created(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    process_flow_hook(accounts, data, FlowHook::Created)
}

/// Process OnFlowUpdated: re-rate the sender's inflow.
pub fn process_on_flow_updated(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    process_flow_hook(accounts, data, FlowHook::Updated)
}

/// Process OnFlowDeleted: fold and remove the sender's inflow.
pub fn process_on_flow_deleted(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    process_flow_hook(accounts, data, FlowHook::Deleted)
}

fn process_flow_hook(accounts: &[AccountInfo], data: &[u8], hook: FlowHook) -> ProgramResult {
    let [
        pool_config,
        supplier_acc,
        stream_authority,
        payer,
        venue_position,
        next_task,
        previous_task,
        system_program,
        automation_program,
        superpool_program,
        ..,
    ] = accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !stream_authority.is_signer() || !validate_stream_authority(stream_authority.key()) {
        log!("flow_hook: caller is not the streaming protocol");
        return Err(SuperPoolError::UnauthorizedCaller.into());
    }
    validate_system_program(system_program)?;
    validate_program(automation_program, &AUTOMATION_PROGRAM_ID)?;

    let params = FlowCallbackParams::from_bytes(data).ok_or(SuperPoolError::InvalidInstructionData)?;
    if params.receiver != *pool_config.key() {
        log!("flow_hook: flow does not target this pool");
        return Err(SuperPoolError::InvalidAccountData.into());
    }

    // Updates and deletions must land even while paused, or the ledger would
    // drift from the streaming protocol
    let mut config = match hook {
        FlowHook::Created => load_active_pool(pool_config)?,
        FlowHook::Updated | FlowHook::Deleted => load_pool(pool_config)?,
    };
    let obs = observe(&config, pool_config.key(), venue_position)?;

    if hook == FlowHook::Deleted && is_uninitialized(supplier_acc) {
        log!("flow_hook: deleted flow has no supplier record");
        return Ok(());
    }
    let mut supplier = match hook {
        FlowHook::Created => {
            if !payer.is_signer() {
                return Err(ProgramError::MissingRequiredSignature);
            }
            load_or_create_supplier(supplier_acc, payer, pool_config.key(), &params.sender, &mut config)?
        }
        FlowHook::Updated | FlowHook::Deleted => load_supplier(supplier_acc, pool_config.key(), &params.sender)?,
    };

    let outcome = match hook {
        FlowHook::Created => inflow::on_flow_created(
            &mut config.period,
            &mut supplier,
            params.flow_rate,
            params.end_time,
            obs,
        ),
        FlowHook::Updated => inflow::on_flow_updated(
            &mut config.period,
            &mut supplier,
            params.flow_rate,
            params.end_time,
            obs,
        ),
        FlowHook::Deleted => inflow::on_flow_deleted(&mut config.period, &mut supplier, obs),
    }
    .inspect_err(|e| match e {
        SuperPoolError::InvalidRate => {
            log!("flow_hook: rate must be positive");
        }
        SuperPoolError::InflowAlreadyActive => {
            log!("flow_hook: sender already streams into the pool");
        }
        SuperPoolError::NoActiveInflow => {
            log!("flow_hook: sender has no inflow");
        }
        _ => {}
    })?;

    let (mint, bump) = (config.mint, [config.bump]);
    let seeds = gen_pool_config_seeds(&mint, &bump);

    let cancel = AutomationAccounts {
        owner: pool_config,
        task: previous_task,
        payer,
        system_program,
        automation_program,
    };
    let register = AutomationAccounts {
        task: next_task,
        ..cancel
    };
    apply_task_change(pool_config.key(), &outcome.tasks, &cancel, &register, &seeds)?;

    store(pool_config, &config)?;
    store(supplier_acc, &supplier)?;

    emit_period_advanced(
        pool_config,
        superpool_program,
        PinocchioSigner::from(&seeds),
        &config.period,
        &outcome.period_delta,
    )?;
    emit_event(
        pool_config,
        superpool_program,
        PinocchioSigner::from(&seeds),
        &InflowUpdatedEvent {
            owner: params.sender,
            flow_rate: supplier.in_stream.flow_rate,
            end_time: supplier.in_stream.end_time,
            pool_in_flow_rate: config.period.in_flow_rate,
            timestamp: obs.now,
        },
    )?;

    Ok(())
}
