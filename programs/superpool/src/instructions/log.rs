//! Log instruction handler for emitting events.
//!
//! Invoked only through self-CPI by [`crate::emit_event`]. The signer must be
//! an account owned by this program, which only this program can sign for.

use pinocchio::{ProgramResult, account_info::AccountInfo, program_error::ProgramError};
use pinocchio_log::log;

/// Process a Log instruction.
///
/// # Accounts
/// 0. `[signer]` authority - Pool config PDA that signed the self-CPI
///
/// Data: `[length: u32 LE, event bytes]`, where the event bytes start with
/// the 8-byte event discriminator.
pub fn process_log(accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [authority, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !authority.is_signer() {
        log!("log: authority must be a signer");
        return Err(ProgramError::MissingRequiredSignature);
    }
    if authority.owner() != &crate::ID {
        log!("log: authority must be owned by this program");
        return Err(ProgramError::IllegalOwner);
    }

    let event = read_event(data).ok_or(ProgramError::InvalidInstructionData)?;
    pinocchio::log::sol_log_data(&[event]);
    Ok(())
}

/// Split the length-prefixed event out of the instruction data.
fn read_event(data: &[u8]) -> Option<&[u8]> {
    let (len, rest) = data.split_first_chunk::<4>()?;
    rest.get(..u32::from_le_bytes(*len) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_event() {
        let data = [3, 0, 0, 0, 7, 8, 9, 10];
        assert_eq!(read_event(&data), Some(&[7u8, 8, 9][..]));
        assert_eq!(read_event(&[5, 0, 0, 0, 1]), None);
        assert_eq!(read_event(&[1, 0]), None);
    }
}
