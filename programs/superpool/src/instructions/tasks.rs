//! Automation network hooks: CheckTask and ExecuteTask.
//!
//! Tasks carry only a [`TaskPayload`]. Both hooks reload the supplier the
//! payload names and recompute the task id; a payload whose id no longer
//! matches the supplier's stored id is stale and does nothing.

use bytemuck::bytes_of;
use pinocchio::{
    ProgramResult,
    account_info::AccountInfo,
    instruction::{Seed, Signer as PinocchioSigner},
    program::set_return_data,
    program_error::ProgramError,
};
use pinocchio_log::log;
use superpool_interface::{
    AUTOMATION_PROGRAM_ID, CheckTaskReturnData, STREAM_PROGRAM_ID, TaskPayload, YIELD_VENUE_PROGRAM_ID,
    task_id, validate_automation_authority,
};

use crate::{
    SuperPoolError,
    accounts::load_supplier,
    collaborator_cpi::{AutomationAccounts, StreamAccounts, VenueAccounts, apply_stream_action},
    emit_event,
    events::{InflowUpdatedEvent, OutflowSteppedEvent, TaskSkippedEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::{apply_task_change, check_vault, ensure_liquidity, load_pool, reserved_liquidity},
    ledger::{self, StreamAction, TaskOutcome},
    state::{is_uninitialized, store},
    utils::{
        observe, unix_now, validate_program, validate_system_program, validate_token_account,
        validate_token_program,
    },
};

/// Process CheckTask: answer whether ExecuteTask would act on the payload.
///
/// Never fails on a stale or foreign payload; the answer is just `false`.
///
/// # Accounts
/// 0. `[]` pool_config - Pool config PDA
/// 1. `[]` supplier - Supplier PDA the payload names
///
/// Data: [`TaskPayload`]. Returns [`CheckTaskReturnData`].
pub fn process_check_task(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [pool_config, supplier_acc, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let payload = TaskPayload::from_bytes(data).ok_or(SuperPoolError::InvalidInstructionData)?;
    load_pool(pool_config)?;
    let now = unix_now()?;

    let can_execute = load_supplier(supplier_acc, pool_config.key(), &payload.supplier)
        .is_ok_and(|supplier| ledger::check_task(&supplier, &payload, now));

    let answer = CheckTaskReturnData {
        can_execute: u8::from(can_execute),
        _padding: [0; 7],
        payload,
    };
    set_return_data(bytes_of(&answer));
    Ok(())
}

/// Process ExecuteTask: run an outflow step or an inflow stop.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[mut]` supplier - Supplier PDA the payload names
/// 2. `[signer]` executor - Automation network's executor PDA
/// 3. `[mut, signer]` payer - Pays for the next task record
/// 4. `[mut]` supplier_token - Supplier's token account (flow endpoint)
/// 5. `[mut]` vault - Pool vault
/// 6. `[mut]` venue_position - Pool's position at the yield venue
/// 7. `[mut]` venue_reserve - Venue reserve token account
/// 8. `[mut]` flow - Streaming protocol flow record
/// 9. `[mut]` fired_task - Record of the task being executed
/// 10. `[mut]` next_task - Record of the follow-up task
/// 11. `[]` token_program
/// 12. `[]` system_program
/// 13. `[]` stream_program
/// 14. `[]` automation_program
/// 15. `[]` venue_program
/// 16. `[]` superpool_program - For self-CPI events
///
/// Data: [`TaskPayload`].
pub fn process_execute_task(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [
        pool_config,
        supplier_acc,
        executor,
        payer,
        supplier_token,
        vault,
        venue_position,
        venue_reserve,
        flow,
        fired_task,
        next_task,
        token_program,
        system_program,
        stream_program,
        automation_program,
        venue_program,
        superpool_program,
        ..,
    ] = accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !executor.is_signer() || !validate_automation_authority(executor.key()) {
        log!("execute_task: caller is not the automation network");
        return Err(SuperPoolError::UnauthorizedCaller.into());
    }
    validate_token_program(token_program)?;
    validate_system_program(system_program)?;
    validate_program(stream_program, &STREAM_PROGRAM_ID)?;
    validate_program(automation_program, &AUTOMATION_PROGRAM_ID)?;
    validate_program(venue_program, &YIELD_VENUE_PROGRAM_ID)?;

    let payload = TaskPayload::from_bytes(data).ok_or(SuperPoolError::InvalidInstructionData)?;

    // Scheduled work runs while paused so streams never outlive their buffer
    let mut config = load_pool(pool_config)?;
    check_vault(&config, vault)?;
    validate_token_account(supplier_token, &config.mint, &payload.supplier)?;

    let obs = observe(&config, pool_config.key(), venue_position)?;
    let (mint, bump) = (config.mint, [config.bump]);
    let seeds = gen_pool_config_seeds(&mint, &bump);

    if is_uninitialized(supplier_acc) {
        return skip_stale_task(pool_config, superpool_program, &seeds, &payload, obs.now);
    }
    let mut supplier = load_supplier(supplier_acc, pool_config.key(), &payload.supplier)?;

    let outcome = ledger::execute_task(&mut config.period, &mut supplier, &payload, obs).inspect_err(|e| {
        if *e == SuperPoolError::TaskNotReady {
            log!("execute_task: task is not due yet");
        }
    })?;

    let (period_delta, tasks) = match outcome {
        TaskOutcome::Stale => {
            return skip_stale_task(pool_config, superpool_program, &seeds, &payload, obs.now);
        }
        TaskOutcome::Stepped {
            period_delta, tasks, ..
        } => {
            let venue = VenueAccounts {
                owner: pool_config,
                vault,
                position: venue_position,
                reserve: venue_reserve,
                token_program,
                venue_program,
            };
            let reserved = reserved_liquidity(&config);
            ensure_liquidity(&mut config, &venue, reserved, &seeds)?;
            (period_delta, tasks)
        }
        TaskOutcome::Terminated { period_delta, tasks } => {
            let outflow = StreamAccounts {
                authority: pool_config,
                source: vault,
                destination: supplier_token,
                flow,
                token_program,
                stream_program,
            };
            apply_stream_action(&outflow, StreamAction::Delete, PinocchioSigner::from(&seeds))?;
            (period_delta, tasks)
        }
        TaskOutcome::InflowStopped {
            period_delta, tasks, ..
        } => {
            let inflow = StreamAccounts {
                authority: pool_config,
                source: supplier_token,
                destination: vault,
                flow,
                token_program,
                stream_program,
            };
            apply_stream_action(&inflow, StreamAction::Delete, PinocchioSigner::from(&seeds))?;
            (period_delta, tasks)
        }
    };

    let cancel = AutomationAccounts {
        owner: pool_config,
        task: fired_task,
        payer,
        system_program,
        automation_program,
    };
    let register = AutomationAccounts {
        task: next_task,
        ..cancel
    };
    apply_task_change(pool_config.key(), &tasks, &cancel, &register, &seeds)?;

    store(pool_config, &config)?;
    store(supplier_acc, &supplier)?;

    emit_period_advanced(
        pool_config,
        superpool_program,
        PinocchioSigner::from(&seeds),
        &config.period,
        &period_delta,
    )?;

    match outcome {
        TaskOutcome::Stepped { step_amount, .. } => emit_event(
            pool_config,
            superpool_program,
            PinocchioSigner::from(&seeds),
            &OutflowSteppedEvent {
                owner: payload.supplier,
                next_task_id: supplier.out_stream.cancel_task_id,
                step_amount,
                timestamp: obs.now,
                terminated: 0,
                _padding: [0; 15],
            },
        ),
        TaskOutcome::Terminated { .. } => emit_event(
            pool_config,
            superpool_program,
            PinocchioSigner::from(&seeds),
            &OutflowSteppedEvent {
                owner: payload.supplier,
                next_task_id: [0; 32],
                step_amount: 0,
                timestamp: obs.now,
                terminated: 1,
                _padding: [0; 15],
            },
        ),
        TaskOutcome::InflowStopped { .. } => emit_event(
            pool_config,
            superpool_program,
            PinocchioSigner::from(&seeds),
            &InflowUpdatedEvent {
                owner: payload.supplier,
                flow_rate: 0,
                end_time: 0,
                pool_in_flow_rate: config.period.in_flow_rate,
                timestamp: obs.now,
            },
        ),
        TaskOutcome::Stale => Ok(()),
    }
}

/// Log and emit the skip of a task that no longer matches any supplier state.
fn skip_stale_task(
    pool_config: &AccountInfo,
    superpool_program: &AccountInfo,
    seeds: &[Seed],
    payload: &TaskPayload,
    now: u64,
) -> ProgramResult {
    log!("execute_task: stale task skipped");
    emit_event(
        pool_config,
        superpool_program,
        PinocchioSigner::from(seeds),
        &TaskSkippedEvent {
            owner: payload.supplier,
            task_id: task_id(pool_config.key(), payload),
            kind: payload.kind,
            _padding: [0; 7],
            timestamp: now,
        },
    )
}
