//! Transfer instruction handler.
//!
//! Moves balance between two suppliers of the same pool without touching
//! tokens: both records are checkpointed at the same period and the
//! matching shares change hands.
//!
//! # Accounts
//! 0. `[mut]` pool_config - Pool config PDA
//! 1. `[mut]` from_supplier - Sender's supplier PDA
//! 2. `[mut]` to_supplier - Recipient's supplier PDA (created if missing)
//! 3. `[mut, signer]` owner - Sender, pays for the recipient record
//! 4. `[]` recipient - Recipient address
//! 5. `[]` venue_position - Pool's position at the yield venue
//! 6. `[]` system_program
//! 7. `[]` superpool_program - For self-CPI events

use pinocchio::{
    ProgramResult, account_info::AccountInfo, instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
};
use pinocchio_log::log;

use crate::{
    SuperPoolError,
    accounts::{load_or_create_supplier, load_supplier},
    emit_event,
    events::{SharesTransferredEvent, emit_period_advanced},
    gen_pool_config_seeds,
    instructions::load_active_pool,
    ledger,
    state::store,
    utils::{observe, parse_u64, validate_system_program},
};

/// Process a supplier-to-supplier transfer of `amount` token units.
pub fn process_transfer(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [
        pool_config,
        from_acc,
        to_acc,
        owner,
        recipient,
        venue_position,
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
    validate_system_program(system_program)?;
    if owner.key() == recipient.key() {
        log!("transfer: sender and recipient are the same");
        return Err(SuperPoolError::SelfTransfer.into());
    }

    let amount = parse_u64(data)?;
    let mut config = load_active_pool(pool_config)?;
    let obs = observe(&config, pool_config.key(), venue_position)?;

    let mut from = load_supplier(from_acc, pool_config.key(), owner.key())?;
    let mut to = load_or_create_supplier(to_acc, owner, pool_config.key(), recipient.key(), &mut config)?;

    let outcome = ledger::transfer(&mut config.period, &mut from, &mut to, amount, obs).inspect_err(|e| match e {
        SuperPoolError::InsufficientBalance => {
            log!("transfer: insufficient balance");
        }
        SuperPoolError::InsufficientShares => {
            log!("transfer: insufficient shares");
        }
        _ => {}
    })?;

    store(pool_config, &config)?;
    store(from_acc, &from)?;
    store(to_acc, &to)?;

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
        &SharesTransferredEvent {
            from: from.owner,
            to: to.owner,
            shares: outcome.shares_moved,
            amount,
            timestamp: obs.now,
        },
    )?;

    Ok(())
}
