//! RedeemFlow and RedeemFlowStop instruction handlers.
//!
//! The pool opens a flow from its vault to the supplier's token account and
//! registers a step task with the automation network. Resizing replaces
//! both; stopping deletes the flow and cancels the task.

use pinocchio::{
    ProgramResult, account_info::AccountInfo, instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
};
use pinocchio_log::log;
use superpool_interface::{AUTOMATION_PROGRAM_ID, STREAM_PROGRAM_ID, YIELD_VENUE_PROGRAM_ID};

use crate::{
    SuperPoolError,
    accounts::load_supplier,
    collaborator_cpi::{AutomationAccounts, StreamAccounts, VenueAccounts, apply_stream_action},
    emit_event,
    events::{OutflowUpdatedEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::{
        apply_task_change, check_vault, ensure_liquidity, load_active_pool, load_pool, reserved_liquidity,
    },
    ledger::{outflow, outflow::OutflowOutcome},
    state::{Supplier, store},
    utils::{
        observe, parse_i64, validate_program, validate_system_program, validate_token_account,
        validate_token_program,
    },
};

/// Process RedeemFlow: open or resize the supplier's outgoing stream.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[mut]` supplier - Supplier PDA of `owner`
/// 2. `[mut, signer]` owner - Supplier owner, pays for the task record
/// 3. `[mut]` owner_token - Stream destination
/// 4. `[mut]` vault - Pool vault (stream source)
/// 5. `[mut]` venue_position - Pool's position at the yield venue
/// 6. `[mut]` venue_reserve - Venue reserve token account
/// 7. `[mut]` flow - Streaming protocol flow record
/// 8. `[mut]` next_task - Record of the step task to register
/// 9. `[mut]` previous_task - Record of the step task to cancel on resize
/// 10. `[]` token_program
/// 11. `[]` system_program
/// 12. `[]` stream_program
/// 13. `[]` automation_program
/// 14. `[]` venue_program
/// 15. `[]` superpool_program - For self-CPI events
pub fn process_redeem_flow(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [
        pool_config,
        supplier_acc,
        owner,
        owner_token,
        vault,
        venue_position,
        venue_reserve,
        flow,
        next_task,
        previous_task,
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

    if !owner.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }
    validate_token_program(token_program)?;
    validate_system_program(system_program)?;
    validate_program(stream_program, &STREAM_PROGRAM_ID)?;
    validate_program(automation_program, &AUTOMATION_PROGRAM_ID)?;
    validate_program(venue_program, &YIELD_VENUE_PROGRAM_ID)?;

    let rate = parse_i64(data)?;
    let mut config = load_active_pool(pool_config)?;
    check_vault(&config, vault)?;
    validate_token_account(owner_token, &config.mint, owner.key())?;

    let obs = observe(&config, pool_config.key(), venue_position)?;
    let mut supplier = load_supplier(supplier_acc, pool_config.key(), owner.key())?;

    let outcome = outflow::redeem_flow(&mut config.period, &mut supplier, rate, obs).inspect_err(|e| match e {
        SuperPoolError::InsufficientBalance => {
            log!("redeem_flow: balance cannot back the stream");
        }
        SuperPoolError::InvalidRate => {
            log!("redeem_flow: rate must be positive");
        }
        _ => {}
    })?;

    let (mint, bump) = (config.mint, [config.bump]);
    let seeds = gen_pool_config_seeds(&mint, &bump);

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

    let stream = StreamAccounts {
        authority: pool_config,
        source: vault,
        destination: owner_token,
        flow,
        token_program,
        stream_program,
    };
    apply_stream_action(&stream, outcome.stream, PinocchioSigner::from(&seeds))?;

    let cancel = AutomationAccounts {
        owner: pool_config,
        task: previous_task,
        payer: owner,
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
        &outflow_event(&supplier, &outcome, obs.now),
    )?;

    Ok(())
}

/// Process RedeemFlowStop: close the supplier's outgoing stream.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[mut]` supplier - Supplier PDA of `owner`
/// 2. `[mut, signer]` owner - Supplier owner, receives the task record rent
/// 3. `[mut]` owner_token - Stream destination
/// 4. `[mut]` vault - Pool vault (stream source)
/// 5. `[]` venue_position - Pool's position at the yield venue
/// 6. `[mut]` flow - Streaming protocol flow record
/// 7. `[mut]` task - Record of the step task to cancel
/// 8. `[]` token_program
/// 9. `[]` system_program
/// 10. `[]` stream_program
/// 11. `[]` automation_program
/// 12. `[]` superpool_program - For self-CPI events
pub fn process_redeem_flow_stop(accounts: &[AccountInfo]) -> ProgramResult {
    let [
        pool_config,
        supplier_acc,
        owner,
        owner_token,
        vault,
        venue_position,
        flow,
        task,
        token_program,
        system_program,
        stream_program,
        automation_program,
        superpool_program,
        ..,
    ] = accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !owner.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }
    validate_token_program(token_program)?;
    validate_system_program(system_program)?;
    validate_program(stream_program, &STREAM_PROGRAM_ID)?;
    validate_program(automation_program, &AUTOMATION_PROGRAM_ID)?;

    // Closing a stream stays possible while the pool is paused
    let mut config = load_pool(pool_config)?;
    check_vault(&config, vault)?;

    let obs = observe(&config, pool_config.key(), venue_position)?;
    let mut supplier = load_supplier(supplier_acc, pool_config.key(), owner.key())?;

    let outcome = outflow::redeem_flow_stop(&mut config.period, &mut supplier, obs).inspect_err(|e| {
        if *e == SuperPoolError::NoActiveOutflow {
            log!("redeem_flow_stop: no active outgoing stream");
        }
    })?;

    let (mint, bump) = (config.mint, [config.bump]);
    let seeds = gen_pool_config_seeds(&mint, &bump);

    let stream = StreamAccounts {
        authority: pool_config,
        source: vault,
        destination: owner_token,
        flow,
        token_program,
        stream_program,
    };
    apply_stream_action(&stream, outcome.stream, PinocchioSigner::from(&seeds))?;

    let automation = AutomationAccounts {
        owner: pool_config,
        task,
        payer: owner,
        system_program,
        automation_program,
    };
    apply_task_change(pool_config.key(), &outcome.tasks, &automation, &automation, &seeds)?;

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
        &outflow_event(&supplier, &outcome, obs.now),
    )?;

    Ok(())
}

fn outflow_event(supplier: &Supplier, outcome: &OutflowOutcome, now: u64) -> OutflowUpdatedEvent {
    OutflowUpdatedEvent {
        owner: supplier.owner,
        task_id: supplier.out_stream.cancel_task_id,
        flow_rate: supplier.out_stream.flow_rate,
        step_amount: outcome.plan.step_amount,
        step_time: outcome.plan.step_time,
        min_balance: outcome.plan.min_balance,
        timestamp: now,
        _padding: 0,
    }
}
