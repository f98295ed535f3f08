//! Deposit instruction handler.
//!
//! # Accounts
//! 0. `[mut]` pool_config - Pool config PDA
//! 1. `[mut]` supplier - Supplier PDA of `owner` (created if missing)
//! 2. `[mut, signer]` owner - Depositor and rent payer
//! 3. `[mut]` owner_token - Depositor's token account
//! 4. `[mut]` vault - Pool vault
//! 5. `[]` venue_position - Pool's position at the yield venue
//! 6. `[]` token_program
//! 7. `[]` system_program
//! 8. `[]` superpool_program - For self-CPI events

use pinocchio::{
    ProgramResult, account_info::AccountInfo, instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
};
use pinocchio_log::log;
use pinocchio_token::instructions::Transfer;

use crate::{
    accounts::load_or_create_supplier,
    emit_event,
    events::{SupplierDepositEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::{check_vault, load_active_pool},
    ledger,
    state::store,
    utils::{observe, parse_u64, validate_system_program, validate_token_account, validate_token_program},
};

/// Process a lump-sum deposit.
///
/// 1. Catches the period up (reporting venue yield) and checkpoints the supplier
/// 2. Mints shares for `amount` and adds it to the supplier's deposit
/// 3. Transfers `amount` from the depositor into the vault
pub fn process_deposit(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [
        pool_config,
        supplier_acc,
        owner,
        owner_token,
        vault,
        venue_position,
        token_program,
        system_program,
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

    let amount = parse_u64(data)?;
    let mut config = load_active_pool(pool_config)?;
    check_vault(&config, vault)?;
    validate_token_account(owner_token, &config.mint, owner.key())?;

    let obs = observe(&config, pool_config.key(), venue_position)?;
    let mut supplier = load_or_create_supplier(supplier_acc, owner, pool_config.key(), owner.key(), &mut config)?;

    let outcome = ledger::deposit(&mut config.period, &mut supplier, amount, obs).inspect_err(|_| {
        log!("deposit: ledger rejected deposit");
    })?;
    config.record_deposit(amount)?;

    Transfer {
        from: owner_token,
        to: vault,
        authority: owner,
        amount,
    }
    .invoke()?;

    store(pool_config, &config)?;
    store(supplier_acc, &supplier)?;

    let (mint, bump) = (config.mint, [config.bump]);
    let seeds = gen_pool_config_seeds(&mint, &bump);
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
        &SupplierDepositEvent {
            owner: *owner.key(),
            shares_minted: outcome.shares_minted,
            deposit: supplier.deposit,
            amount,
            timestamp: obs.now,
        },
    )?;

    Ok(())
}
