//! Supplier account lifecycle.
//!
//! Supplier records are created lazily by the first deposit, transfer in,
//! or inflow. `CloseAccount` zeroes a record but never deletes it.

use pinocchio::{
    account_info::AccountInfo,
    instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvars::{Sysvar, rent::Rent},
};
use pinocchio_log::log;
use pinocchio_system::instructions::CreateAccount;

use crate::{
    SuperPoolError, find_supplier_pda, gen_supplier_seeds,
    state::{PoolConfig, ProgramAccount, Supplier, is_uninitialized, load},
};

/// Load the supplier record of `owner`, creating it if it does not exist.
///
/// A created record is checkpointed at the config's live period and takes
/// the next supplier id. It is written to the account by the caller's
/// `store`.
///
/// # Errors
/// - `InvalidPda` if `supplier` is not the owner's supplier PDA
/// - `InvalidAccountData` if an existing record belongs elsewhere
pub fn load_or_create_supplier(
    supplier: &AccountInfo,
    payer: &AccountInfo,
    pool_config_key: &Pubkey,
    owner: &Pubkey,
    config: &mut PoolConfig,
) -> Result<Supplier, ProgramError> {
    let (expected, bump) = find_supplier_pda(pool_config_key, owner);
    if supplier.key() != &expected {
        log!("supplier: invalid supplier PDA");
        return Err(SuperPoolError::InvalidPda.into());
    }

    if !is_uninitialized(supplier) {
        return load_supplier(supplier, pool_config_key, owner);
    }

    let bump_bytes = [bump];
    let seeds = gen_supplier_seeds(pool_config_key, owner, &bump_bytes);
    CreateAccount {
        from: payer,
        to: supplier,
        lamports: Rent::get()?.minimum_balance(Supplier::SIZE),
        space: Supplier::SIZE as u64,
        owner: &crate::ID,
    }
    .invoke_signed(&[PinocchioSigner::from(&seeds)])?;

    let id = config.next_supplier_id()?;
    Ok(Supplier::new(*pool_config_key, *owner, id, bump, &config.period))
}

/// Load an existing supplier record and check that it belongs to `owner` in
/// this pool.
///
/// # Errors
/// `InvalidAccountData` if the record is missing or belongs elsewhere.
pub fn load_supplier(supplier: &AccountInfo, pool_config_key: &Pubkey, owner: &Pubkey) -> Result<Supplier, ProgramError> {
    let record: Supplier = load(supplier)?;
    if record.pool != *pool_config_key || record.owner != *owner {
        log!("supplier: record belongs to another owner or pool");
        return Err(SuperPoolError::InvalidAccountData.into());
    }
    Ok(record)
}
