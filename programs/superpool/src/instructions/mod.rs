//! Superpool instruction handlers.
//!
//! Every handler follows the same shape: load the pool config (and the
//! supplier), run one ledger operation against the copies, perform the
//! token movements and collaborator CPIs the outcome asks for, write the
//! accounts back, then emit events.

// Admin instructions (initialization, pausing, authority)
pub mod admin;

// Supplier operations
mod close_account;
mod deposit;
mod redeem_deposit;
mod redeem_flow;
mod transfer;

// Collaborator hooks
mod flow_hooks;
mod tasks;

// Permissionless strategy operations
mod strategy;

// Internal
mod log;

pub use admin::*;
pub use close_account::process_close_account;
pub use deposit::process_deposit;
pub use flow_hooks::{process_on_flow_created, process_on_flow_deleted, process_on_flow_updated};
pub use log::process_log;
pub use redeem_deposit::process_redeem_deposit;
pub use redeem_flow::{process_redeem_flow, process_redeem_flow_stop};
pub use strategy::{process_push_idle, process_report_yield};
pub use tasks::{process_check_task, process_execute_task};
pub use transfer::process_transfer;

use pinocchio::{
    ProgramResult,
    account_info::AccountInfo,
    instruction::{Seed, Signer as PinocchioSigner},
    program_error::ProgramError,
    pubkey::Pubkey,
};
use pinocchio_log::log;
use superpool_interface::{VenueInstruction, task_id};

use crate::{
    collaborator_cpi::{AutomationAccounts, VenueAccounts, cancel_task, create_task, invoke_venue},
    ledger::{TaskChange, strategy as ledger_strategy},
    state::{PoolConfig, load},
    utils::read_token_account_balance,
};

/// Superpool instruction set.
///
/// The first byte of instruction data selects the instruction; the rest is
/// passed to the handler.
///
/// # Discriminator Ranges
/// - **0-31**: Supplier operations
/// - **32-63**: Collaborator hooks and permissionless strategy calls
/// - **192-255**: Admin and internal
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, num_enum::TryFromPrimitive, strum::AsRefStr)]
pub enum SuperPoolInstruction {
    // =========================================================================
    // Supplier Operations (0-31)
    // =========================================================================
    /// Lump-sum deposit. Data: `amount: u64`.
    Deposit = 0,

    /// Lump-sum withdrawal. Data: `amount: u64`.
    RedeemDeposit = 1,

    /// Open or resize an outgoing stream. Data: `flow_rate: i64`.
    RedeemFlow = 2,

    /// Close the outgoing stream.
    RedeemFlowStop = 3,

    /// Move balance to another supplier. Data: `amount: u64`.
    Transfer = 4,

    /// Withdraw everything and zero the supplier record.
    CloseAccount = 5,
    // Reserved: 6-31

    // =========================================================================
    // Collaborator Hooks (32-63)
    // =========================================================================
    /// Streaming protocol: a flow into the pool was opened.
    OnFlowCreated = 32,

    /// Streaming protocol: a flow into the pool changed.
    OnFlowUpdated = 33,

    /// Streaming protocol: a flow into the pool was closed.
    OnFlowDeleted = 34,
    // Reserved: 35-39

    /// Automation network: is the task ready? Answers via return data.
    CheckTask = 40,

    /// Automation network: run the task.
    ExecuteTask = 41,
    // Reserved: 42-47

    /// Move idle vault liquidity to the yield venue. Data: `amount: u64`.
    PushIdle = 48,

    /// Distribute yield the venue accrued since the last report.
    ReportYield = 49,
    // Reserved: 50-63

    // =========================================================================
    // Admin Operations (192-255)
    // =========================================================================
    /// Create the pool config and vault for a mint.
    InitPool = 192,

    /// Pause or resume the pool. Data: `is_active: u8`.
    SetPoolActive = 193,

    /// Nominate a new authority.
    TransferAuthority = 194,

    /// Accept a pending authority nomination.
    AcceptAuthority = 195,
    // Reserved: 196-254

    /// Log an event via self-CPI (internal use only).
    Log = 255,
}

/// Load the pool config and check it is the canonical PDA for its mint.
///
/// # Errors
/// `InvalidAccountData` or `InvalidPda`.
pub(crate) fn load_pool(pool_config: &AccountInfo) -> Result<PoolConfig, ProgramError> {
    let config: PoolConfig = load(pool_config)?;
    config.validate_pda(pool_config.key())?;
    Ok(config)
}

/// [`load_pool`], additionally requiring the pool to be active.
///
/// # Errors
/// `PoolPaused` when inactive.
pub(crate) fn load_active_pool(pool_config: &AccountInfo) -> Result<PoolConfig, ProgramError> {
    let config = load_pool(pool_config)?;
    config.require_active()?;
    Ok(config)
}

/// Check that `vault` is the config's vault.
///
/// # Errors
/// `InvalidVault` otherwise.
pub(crate) fn check_vault(config: &PoolConfig, vault: &AccountInfo) -> Result<(), ProgramError> {
    if vault.key() != &config.vault {
        log!("vault: unexpected vault account");
        return Err(crate::SuperPoolError::InvalidVault.into());
    }
    Ok(())
}

/// Make sure the vault holds `needed` tokens, pulling the shortfall from the
/// venue. The period must already be caught up. Returns the amount pulled.
///
/// # Errors
/// `InsufficientBalance` if the venue cannot cover the shortfall.
pub(crate) fn ensure_liquidity(
    config: &mut PoolConfig,
    venue: &VenueAccounts,
    needed: u64,
    seeds: &[Seed],
) -> Result<u64, ProgramError> {
    let idle = read_token_account_balance(venue.vault)?;
    let shortfall = ledger_strategy::shortfall(idle, needed);
    if shortfall == 0 {
        return Ok(0);
    }

    ledger_strategy::pull_for_withdraw(&mut config.period, shortfall)?;
    invoke_venue(venue, VenueInstruction::Withdraw, shortfall, PinocchioSigner::from(seeds))?;
    log!("liquidity: pulled {} from venue", shortfall);
    Ok(shortfall)
}

/// Cancel and register automation tasks as a ledger outcome asks.
///
/// `cancel` names the record of the task being cancelled and `register` the
/// record the new task is created in.
///
/// # Errors
/// Propagates CPI errors.
pub(crate) fn apply_task_change(
    pool_config_key: &Pubkey,
    change: &TaskChange,
    cancel: &AutomationAccounts,
    register: &AutomationAccounts,
    seeds: &[Seed],
) -> ProgramResult {
    if let Some(id) = change.cancel {
        cancel_task(cancel, &id, PinocchioSigner::from(seeds))?;
    }
    if let Some(payload) = change.register {
        create_task(
            register,
            task_id(pool_config_key, &payload),
            &payload,
            PinocchioSigner::from(seeds),
        )?;
    }
    Ok(())
}

/// Tokens the vault must keep for the outflow buffer.
pub(crate) fn reserved_liquidity(config: &PoolConfig) -> u64 {
    superpool_interface::fixed_point::from_scaled_ceil(config.period.out_flow_buffer).unwrap_or(u64::MAX)
}
