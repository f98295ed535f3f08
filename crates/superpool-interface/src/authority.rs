//! Two-step authority transfer.
//!
//! The current authority nominates a successor, and the successor must sign
//! an acceptance before the role moves. Handlers for `TransferAuthority` and
//! `AcceptAuthority` only differ in which of the two helpers they call.

use pinocchio::{program_error::ProgramError, pubkey::Pubkey};

/// Config accounts that carry an authority and a pending successor.
pub trait HasAuthority {
    /// Current authority.
    fn authority(&self) -> &Pubkey;
    /// Nominated successor, all zeroes when none.
    fn pending_authority(&self) -> &Pubkey;
    /// Overwrite both slots.
    fn set_authorities(&mut self, authority: Pubkey, pending: Pubkey);
}

/// Nominate `new_authority` as the pending authority.
///
/// # Errors
/// `IllegalOwner` if `signer` is not the current authority.
pub fn transfer_authority<T: HasAuthority>(
    config: &mut T,
    signer: &Pubkey,
    new_authority: &Pubkey,
) -> Result<(), ProgramError> {
    if config.authority() != signer {
        return Err(ProgramError::IllegalOwner);
    }
    let current = *config.authority();
    config.set_authorities(current, *new_authority);
    Ok(())
}

/// Complete a transfer started by [`transfer_authority`].
///
/// # Errors
/// - `UninitializedAccount` if no transfer is pending
/// - `IllegalOwner` if `signer` is not the pending authority
pub fn accept_authority<T: HasAuthority>(config: &mut T, signer: &Pubkey) -> Result<(), ProgramError> {
    if *config.pending_authority() == Pubkey::default() {
        return Err(ProgramError::UninitializedAccount);
    }
    if config.pending_authority() != signer {
        return Err(ProgramError::IllegalOwner);
    }
    config.set_authorities(*signer, Pubkey::default());
    Ok(())
}
