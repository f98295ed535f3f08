//! Account state for the Superpool program.
//!
//! Accounts are `#[repr(C)]` Pod structs prefixed by an 8-byte little-endian
//! discriminator. Handlers copy an account out with [`load`], mutate the copy
//! through the ledger, and write it back with [`store`] once every CPI has
//! succeeded.

mod period;
mod pool_config;
mod supplier;

pub use period::{Apy, INDEX_ONE, Period, PeriodDelta, SECONDS_PER_YEAR};
pub use pool_config::PoolConfig;
pub use supplier::{InStream, OutStream, RealtimeBalance, Supplier};

use bytemuck::Pod;
use pinocchio::{ProgramResult, account_info::AccountInfo, program_error::ProgramError};

use crate::SuperPoolError;

/// Length of the discriminator prefix on every program account.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Account discriminators.
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuperPoolAccount {
    /// Pool-wide config and live period
    PoolConfig = 1,
    /// Per-depositor ledger record
    Supplier = 2,
}

/// A Pod account owned by this program.
pub trait ProgramAccount: Pod {
    /// Discriminator written at offset 0.
    const DISCRIMINATOR: SuperPoolAccount;

    /// Total account size including the discriminator.
    const SIZE: usize = DISCRIMINATOR_LEN + core::mem::size_of::<Self>();
}

/// Read a copy of a program account.
///
/// # Errors
/// `InvalidAccountData` if the account is not owned by this program, is too
/// small, or carries another discriminator.
pub fn load<T: ProgramAccount>(account: &AccountInfo) -> Result<T, ProgramError> {
    if account.owner() != &crate::ID {
        return Err(SuperPoolError::InvalidAccountData.into());
    }
    let data = account.try_borrow_data()?;
    if data.len() < T::SIZE || read_discriminator(&data) != Some(T::DISCRIMINATOR as u64) {
        return Err(SuperPoolError::InvalidAccountData.into());
    }
    Ok(bytemuck::pod_read_unaligned(&data[DISCRIMINATOR_LEN..T::SIZE]))
}

/// Write a program account back, keeping its discriminator.
///
/// # Errors
/// `InvalidAccountData` if the account is too small.
pub fn store<T: ProgramAccount>(account: &AccountInfo, value: &T) -> ProgramResult {
    let mut data = account.try_borrow_mut_data()?;
    if data.len() < T::SIZE {
        return Err(SuperPoolError::InvalidAccountData.into());
    }
    data[..DISCRIMINATOR_LEN].copy_from_slice(&(T::DISCRIMINATOR as u64).to_le_bytes());
    data[DISCRIMINATOR_LEN..T::SIZE].copy_from_slice(bytemuck::bytes_of(value));
    Ok(())
}

/// Whether the account holds no program data yet.
pub fn is_uninitialized(account: &AccountInfo) -> bool {
    account.data_is_empty() || account.lamports() == 0
}

fn read_discriminator(data: &[u8]) -> Option<u64> {
    let bytes: [u8; DISCRIMINATOR_LEN] = data.get(..DISCRIMINATOR_LEN)?.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}
