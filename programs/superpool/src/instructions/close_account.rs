//! CloseAccount instruction handler.
//!
//! Closes a live outgoing stream, pays the supplier's whole balance out,
//! and leaves the supplier record zeroed in place. Fractions of a token unit
//! stay in the pool. A step task still queued for the closed stream finds
//! the zeroed record and resolves as stale.
//!
//! # Accounts
//! 0. `[mut]` pool_config - Pool config PDA
//! 1. `[mut]` supplier - Supplier PDA of `owner`
//! 2. `[mut, signer]` owner - Supplier owner, receives the task record rent
//! 3. `[mut]` owner_token - Destination token account
//! 4. `[mut]` vault - Pool vault
//! 5. `[mut]` venue_position - Pool's position at the yield venue
//! 6. `[mut]` venue_reserve - Venue reserve token account
//! 7. `[mut]` flow - Outgoing flow record (unused without a stream)
//! 8. `[mut]` task - Step task record (unused without a stream)
//! 9. `[]` token_program
//! 10. `[]` system_program
//! 11. `[]` stream_program
//! 12. `[]` automation_program
//! 13. `[]` venue_program
//! 14. `[]` superpool_program - For self-CPI events

use pinocchio::{
    ProgramResult, account_info::AccountInfo, instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
};
use pinocchio_log::log;
use superpool_interface::{AUTOMATION_PROGRAM_ID, STREAM_PROGRAM_ID, YIELD_VENUE_PROGRAM_ID};

use crate::{
    SuperPoolError,
    accounts::load_supplier,
    collaborator_cpi::{AutomationAccounts, StreamAccounts, VenueAccounts, apply_stream_action, pay_out},
    emit_event,
    events::{AccountClosedEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::{apply_task_change, check_vault, ensure_liquidity, load_active_pool, reserved_liquidity},
    ledger,
    state::store,
    utils::{
        observe, validate_program, validate_system_program, validate_token_account, validate_token_program,
    },
};

/// Process CloseAccount.
pub fn process_close_account(accounts: &[AccountInfo]) -> ProgramResult {
    let [
        pool_config,
        supplier_acc,
        owner,
        owner_token,
        vault,
        venue_position,
        venue_reserve,
        flow,
        task,
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

    let mut config = load_active_pool(pool_config)?;
    check_vault(&config, vault)?;
    validate_token_account(owner_token, &config.mint, owner.key())?;

    let obs = observe(&config, pool_config.key(), venue_position)?;
    let mut supplier = load_supplier(supplier_acc, pool_config.key(), owner.key())?;

    let outcome = ledger::close_account(&mut config.period, &mut supplier, obs).inspect_err(|e| {
        if *e == SuperPoolError::InflowStillActive {
            log!("close_account: inflow still active");
        }
    })?;
    if outcome.amount > 0 {
        config.record_redeem(outcome.amount)?;
    }

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

    let venue = VenueAccounts {
        owner: pool_config,
        vault,
        position: venue_position,
        reserve: venue_reserve,
        token_program,
        venue_program,
    };
    let needed = outcome
        .amount
        .checked_add(reserved_liquidity(&config))
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    ensure_liquidity(&mut config, &venue, needed, &seeds)?;
    pay_out(vault, owner_token, pool_config, outcome.amount, PinocchioSigner::from(&seeds))?;

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
        &AccountClosedEvent {
            owner: *owner.key(),
            shares_burned: outcome.shares_burned,
            amount: outcome.amount,
            timestamp: obs.now,
        },
    )?;

    Ok(())
}
