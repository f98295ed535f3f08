//! Account readers and validation shared by the instruction handlers.

use pinocchio::{
    account_info::AccountInfo,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvars::{Sysvar, clock::Clock},
};
use pinocchio_log::log;
use pinocchio_token::state::TokenAccount;
use superpool_interface::{VenuePosition, YIELD_VENUE_PROGRAM_ID};

use crate::{SuperPoolError, ledger::Observation, state::PoolConfig};

/// Read the balance from a token account using pinocchio_token typed access.
///
/// # Errors
/// `InvalidAccountData` if the account is not a token account.
pub fn read_token_account_balance(account: &AccountInfo) -> Result<u64, SuperPoolError> {
    let token_account =
        TokenAccount::from_account_info(account).map_err(|_| SuperPoolError::InvalidAccountData)?;
    Ok(token_account.amount())
}

/// Check that `account` is a token account of `mint` held by `owner`.
///
/// # Errors
/// - `InvalidMint` if the mint differs
/// - `IllegalOwner` if the token account owner differs
pub fn validate_token_account(account: &AccountInfo, mint: &Pubkey, owner: &Pubkey) -> Result<(), ProgramError> {
    let token_account = TokenAccount::from_account_info(account)?;
    if token_account.mint() != mint {
        return Err(SuperPoolError::InvalidMint.into());
    }
    if token_account.owner() != owner {
        return Err(ProgramError::IllegalOwner);
    }
    Ok(())
}

/// Check that `token_program` is the SPL Token program.
///
/// # Errors
/// `InvalidTokenProgram` otherwise.
pub fn validate_token_program(token_program: &AccountInfo) -> Result<(), SuperPoolError> {
    if token_program.key() != &pinocchio_token::ID {
        return Err(SuperPoolError::InvalidTokenProgram);
    }
    Ok(())
}

/// Check that `system_program` is the System program.
///
/// # Errors
/// `InvalidSystemProgram` otherwise.
pub fn validate_system_program(system_program: &AccountInfo) -> Result<(), SuperPoolError> {
    if system_program.key() != &pinocchio_system::ID {
        return Err(SuperPoolError::InvalidSystemProgram);
    }
    Ok(())
}

/// Check that `program` is the collaborator at `expected`.
///
/// # Errors
/// `InvalidCollaboratorProgram` otherwise.
pub fn validate_program(program: &AccountInfo, expected: &Pubkey) -> Result<(), SuperPoolError> {
    if program.key() != expected {
        return Err(SuperPoolError::InvalidCollaboratorProgram);
    }
    Ok(())
}

/// Current unix time from the Clock sysvar.
///
/// # Errors
/// `InvalidTimestamp` for a pre-epoch clock.
pub fn unix_now() -> Result<u64, ProgramError> {
    let now = Clock::get()?.unix_timestamp;
    u64::try_from(now).map_err(|_| SuperPoolError::InvalidTimestamp.into())
}

/// Read the pool's balance at the yield venue.
///
/// # Errors
/// `InvalidVenuePosition` unless `position` is the configured position, is
/// owned by the venue, and names the pool config as its owner.
pub fn read_venue_balance(
    config: &PoolConfig,
    pool_config_key: &Pubkey,
    position: &AccountInfo,
) -> Result<u64, ProgramError> {
    if position.key() != &config.venue_position || position.owner() != &YIELD_VENUE_PROGRAM_ID {
        log!("venue: unexpected position account");
        return Err(SuperPoolError::InvalidVenuePosition.into());
    }
    let data = position.try_borrow_data()?;
    let record = VenuePosition::from_bytes(&data).ok_or(SuperPoolError::InvalidVenuePosition)?;
    if record.owner != *pool_config_key {
        log!("venue: position owned by another pool");
        return Err(SuperPoolError::InvalidVenuePosition.into());
    }
    Ok(record.balance)
}

/// What the ledger needs to catch up: the clock and the venue balance.
///
/// # Errors
/// See [`unix_now`] and [`read_venue_balance`].
pub fn observe(config: &PoolConfig, pool_config_key: &Pubkey, position: &AccountInfo) -> Result<Observation, ProgramError> {
    Ok(Observation::new(
        unix_now()?,
        read_venue_balance(config, pool_config_key, position)?,
    ))
}

/// Parse a little-endian `u64` argument.
///
/// # Errors
/// `InvalidInstructionData` if `data` is shorter than 8 bytes.
pub fn parse_u64(data: &[u8]) -> Result<u64, SuperPoolError> {
    let bytes: [u8; 8] = data
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .ok_or(SuperPoolError::InvalidInstructionData)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Parse a little-endian `i64` argument.
///
/// # Errors
/// `InvalidInstructionData` if `data` is shorter than 8 bytes.
pub fn parse_i64(data: &[u8]) -> Result<i64, SuperPoolError> {
    parse_u64(data).map(|v| v as i64)
}
