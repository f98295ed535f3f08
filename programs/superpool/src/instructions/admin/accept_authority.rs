//! `AcceptAuthority` instruction handler.

use pinocchio::{ProgramResult, account_info::AccountInfo, program_error::ProgramError};
use pinocchio_log::log;
use superpool_interface::authority::accept_authority;

use crate::{instructions::load_pool, state::store};

/// Process AcceptAuthority: the pending authority takes over.
///
/// # Accounts
/// 0. `[mut]` pool_config - Pool config PDA
/// 1. `[signer]` pending_authority - Nominee from `TransferAuthority`
pub fn process_accept_authority(accounts: &[AccountInfo]) -> ProgramResult {
    let [pool_config, pending_authority, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !pending_authority.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let mut config = load_pool(pool_config)?;
    accept_authority(&mut config, pending_authority.key())?;
    store(pool_config, &config)?;

    log!("accept_authority: authority transferred");
    Ok(())
}
