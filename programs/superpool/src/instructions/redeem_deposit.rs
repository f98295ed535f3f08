//! RedeemDeposit instruction handler.
//!
//! # Accounts
//! 0. `[mut]` pool_config - Pool config PDA
//! 1. `[mut]` supplier - Supplier PDA of `owner`
//! 2. `[signer]` owner - Supplier owner
//! 3. `[mut]` owner_token - Destination token account
//! 4. `[mut]` vault - Pool vault
//! 5. `[mut]` venue_position - Pool's position at the yield venue
//! 6. `[mut]` venue_reserve - Venue reserve token account
//! 7. `[]` token_program
//! 8. `[]` venue_program
//! 9. `[]` superpool_program - For self-CPI events

use pinocchio::{
    ProgramResult, account_info::AccountInfo, instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
};
use pinocchio_log::log;
use superpool_interface::YIELD_VENUE_PROGRAM_ID;

use crate::{
    SuperPoolError,
    accounts::load_supplier,
    collaborator_cpi::{VenueAccounts, pay_out},
    emit_event,
    events::{SupplierRedeemEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::{check_vault, ensure_liquidity, load_active_pool, reserved_liquidity},
    ledger,
    state::store,
    utils::{observe, parse_u64, validate_program, validate_token_account, validate_token_program},
};

/// Process a lump-sum withdrawal.
///
/// 1. Catches up and checkpoints, then burns shares for `amount`
/// 2. Pulls any shortfall from the venue, keeping the outflow buffer in the vault
/// 3. Pays `amount` out of the vault
pub fn process_redeem_deposit(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [
        pool_config,
        supplier_acc,
        owner,
        owner_token,
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

    if !owner.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }
    validate_token_program(token_program)?;
    validate_program(venue_program, &YIELD_VENUE_PROGRAM_ID)?;

    let amount = parse_u64(data)?;
    let mut config = load_active_pool(pool_config)?;
    check_vault(&config, vault)?;
    validate_token_account(owner_token, &config.mint, owner.key())?;

    let obs = observe(&config, pool_config.key(), venue_position)?;
    let mut supplier = load_supplier(supplier_acc, pool_config.key(), owner.key())?;

    let outcome = ledger::redeem_deposit(&mut config.period, &mut supplier, amount, obs).inspect_err(|e| {
        if *e == SuperPoolError::InsufficientBalance {
            log!("redeem_deposit: insufficient balance");
        }
    })?;
    config.record_redeem(amount)?;

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
    let needed = amount
        .checked_add(reserved_liquidity(&config))
        .ok_or(SuperPoolError::ArithmeticOverflow)?;
    let pulled = ensure_liquidity(&mut config, &venue, needed, &seeds)?;

    pay_out(vault, owner_token, pool_config, amount, PinocchioSigner::from(&seeds))?;

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
        &SupplierRedeemEvent {
            owner: *owner.key(),
            shares_burned: outcome.shares_burned,
            deposit: supplier.deposit,
            amount,
            pulled,
        },
    )?;

    Ok(())
}
