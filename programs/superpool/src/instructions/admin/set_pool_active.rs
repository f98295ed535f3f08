//! Pause or resume a pool.

use pinocchio::{ProgramResult, account_info::AccountInfo, program_error::ProgramError};
use pinocchio_log::log;

use crate::{
    SuperPoolError,
    instructions::load_pool,
    state::store,
};

/// Set the active flag.
///
/// A paused pool rejects deposits, redemptions, transfers, new inflows, and
/// strategy calls. Stream shutdowns, inflow updates, and scheduled tasks
/// still run.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[signer]` authority - Must match the pool authority
///
/// Data: `is_active: u8` (1 = active, 0 = paused).
pub fn process_set_pool_active(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [pool_config, authority, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !authority.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }
    let &is_active = data.first().ok_or(SuperPoolError::InvalidInstructionData)?;
    if is_active > 1 {
        return Err(SuperPoolError::InvalidInstructionData.into());
    }

    let mut config = load_pool(pool_config)?;
    config.require_authority(authority.key())?;
    config.is_active = is_active;
    store(pool_config, &config)?;

    log!("set_pool_active: is_active = {}", is_active);
    Ok(())
}
