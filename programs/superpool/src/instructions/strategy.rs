//! PushIdle and ReportYield instruction handlers.
//!
//! Both are permissionless. ReportYield distributes whatever the venue has
//! gained since the last report; PushIdle reports first, then moves idle
//! vault tokens into the venue.

use pinocchio::{
    ProgramResult, account_info::AccountInfo, instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
};
use pinocchio_log::log;
use superpool_interface::{VenueInstruction, YIELD_VENUE_PROGRAM_ID};

use crate::{
    SuperPoolError,
    collaborator_cpi::{VenueAccounts, invoke_venue},
    emit_event,
    events::{YieldPushedEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::{check_vault, load_active_pool},
    ledger::strategy,
    state::store,
    utils::{observe, parse_u64, read_token_account_balance, validate_program, validate_token_program},
};

/// Process PushIdle: deposit idle vault tokens into the yield venue.
///
/// The outflow buffer always stays in the vault.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[mut]` vault - Pool vault
/// 2. `[mut]` venue_position - Pool's position at the yield venue
/// 3. `[mut]` venue_reserve - Venue reserve token account
/// 4. `[]` token_program
/// 5. `[]` venue_program
/// 6. `[]` superpool_program - For self-CPI events
///
/// Data: `amount: u64`.
pub fn process_push_idle(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [
        pool_config,
        vault,
        venue_position,
        venue_reserve,
        token_program,
        venue_program,
        superpool_program,
        ..,
    ] = accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    validate_token_program(token_program)?;
    validate_program(venue_program, &YIELD_VENUE_PROGRAM_ID)?;

    let amount = parse_u64(data)?;
    let mut config = load_active_pool(pool_config)?;
    check_vault(&config, vault)?;

    let obs = observe(&config, pool_config.key(), venue_position)?;
    let period_delta = strategy::report_yield(&mut config.period, obs.venue_balance, obs.now)?;

    let idle = read_token_account_balance(vault)?;
    strategy::push_idle(&mut config.period, amount, idle).inspect_err(|e| {
        if *e == SuperPoolError::InsufficientBalance {
            log!("push_idle: amount would dip into the outflow buffer");
        }
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
    invoke_venue(&venue, VenueInstruction::Deposit, amount, PinocchioSigner::from(&seeds))?;

    store(pool_config, &config)?;

    emit_period_advanced(
        pool_config,
        superpool_program,
        PinocchioSigner::from(&seeds),
        &config.period,
        &period_delta,
    )?;
    emit_event(
        pool_config,
        superpool_program,
        PinocchioSigner::from(&seeds),
        &YieldPushedEvent {
            yield_snapshot: config.period.yield_snapshot,
            amount,
            timestamp: obs.now,
        },
    )?;

    Ok(())
}

/// Process ReportYield: advance the period with the venue's new yield.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[]` venue_position - Pool's position at the yield venue
/// 2. `[]` superpool_program - For self-CPI events
pub fn process_report_yield(accounts: &[AccountInfo]) -> ProgramResult {
    let [pool_config, venue_position, superpool_program, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let mut config = load_active_pool(pool_config)?;
    let obs = observe(&config, pool_config.key(), venue_position)?;
    let period_delta = strategy::report_yield(&mut config.period, obs.venue_balance, obs.now)?;

    store(pool_config, &config)?;

    log!("report_yield: distributed {}", period_delta.yield_distributed);

    let (mint, bump) = (config.mint, [config.bump]);
    let seeds = gen_pool_config_seeds(&mint, &bump);
    emit_period_advanced(
        pool_config,
        superpool_program,
        PinocchioSigner::from(&seeds),
        &config.period,
        &period_delta,
    )
}
