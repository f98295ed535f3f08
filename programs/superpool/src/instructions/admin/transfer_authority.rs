//! `TransferAuthority` instruction handler.
//!
//! Starts a two-step authority transfer by setting `pending_authority`. The
//! nominee completes it with `AcceptAuthority`.

use pinocchio::{ProgramResult, account_info::AccountInfo, program_error::ProgramError};
use pinocchio_log::log;
use superpool_interface::authority::transfer_authority;

use crate::{instructions::load_pool, state::store};

/// Process TransferAuthority.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[signer]` authority - Current authority
/// 2. `[]` new_authority - Nominee
pub fn process_transfer_authority(accounts: &[AccountInfo]) -> ProgramResult {
    let [pool_config, authority, new_authority, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !authority.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut config = load_pool(pool_config)?;
    transfer_authority(&mut config, authority.key(), new_authority.key())?;
    store(pool_config, &config)?;

    log!("transfer_authority: pending authority set");
    Ok(())
}
