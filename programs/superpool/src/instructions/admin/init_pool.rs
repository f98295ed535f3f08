//! Initialize a pool for one mint.

use pinocchio::{
    ProgramResult,
    account_info::AccountInfo,
    instruction::Signer as PinocchioSigner,
    program_error::ProgramError,
    sysvars::{Sysvar, rent::Rent},
};
use pinocchio_log::log;
use pinocchio_system::instructions::CreateAccount;
use pinocchio_token::{
    instructions::InitializeAccount3,
    state::{Mint, TokenAccount},
};
use superpool_interface::YIELD_VENUE_PROGRAM_ID;

use crate::{
    SuperPoolError, find_pool_config_pda, find_vault_pda, gen_pool_config_seeds, gen_vault_seeds,
    state::{Period, PoolConfig, ProgramAccount, is_uninitialized, store},
    utils::{unix_now, validate_system_program, validate_token_program},
};

/// Create the pool config PDA and its vault token account.
///
/// The signer becomes the authority. The pool starts active with an empty
/// period anchored at the current time.
///
/// # Accounts
/// 0. `[]` mint - SPL Token mint of the pooled asset
/// 1. `[mut]` pool_config - Pool config PDA ["superpool", mint] to create
/// 2. `[mut]` vault - Vault PDA ["vault", pool_config] to create
/// 3. `[]` venue_position - Pool's position record at the yield venue
/// 4. `[mut, signer]` authority - Pool authority, pays for both accounts
/// 5. `[]` token_program
/// 6. `[]` system_program
pub fn process_init_pool(accounts: &[AccountInfo]) -> ProgramResult {
    let [
        mint,
        pool_config,
        vault,
        venue_position,
        authority,
        token_program,
        system_program,
        ..,
    ] = accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !authority.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }
    validate_system_program(system_program)?;
    validate_token_program(token_program)?;

    Mint::from_account_info(mint).map_err(|_| {
        log!("init_pool: mint is not an SPL Token mint");
        SuperPoolError::InvalidMint
    })?;

    if venue_position.owner() != &YIELD_VENUE_PROGRAM_ID {
        log!("init_pool: venue position is not owned by the venue");
        return Err(SuperPoolError::InvalidVenuePosition.into());
    }

    let (expected_config, config_bump) = find_pool_config_pda(mint.key());
    if pool_config.key() != &expected_config {
        log!("init_pool: invalid pool config PDA");
        return Err(SuperPoolError::InvalidPda.into());
    }
    let (expected_vault, vault_bump) = find_vault_pda(&expected_config);
    if vault.key() != &expected_vault {
        log!("init_pool: invalid vault PDA");
        return Err(SuperPoolError::InvalidVault.into());
    }
    if !is_uninitialized(pool_config) {
        return Err(SuperPoolError::AlreadyInitialized.into());
    }

    let rent = Rent::get()?;

    let config_bump_bytes = [config_bump];
    let config_seeds = gen_pool_config_seeds(mint.key(), &config_bump_bytes);
    CreateAccount {
        from: authority,
        to: pool_config,
        lamports: rent.minimum_balance(PoolConfig::SIZE),
        space: PoolConfig::SIZE as u64,
        owner: &crate::ID,
    }
    .invoke_signed(&[PinocchioSigner::from(&config_seeds)])?;

    // The vault is a token account owned by the token program, with the
    // pool config as its token authority
    let vault_bump_bytes = [vault_bump];
    let vault_seeds = gen_vault_seeds(&expected_config, &vault_bump_bytes);
    CreateAccount {
        from: authority,
        to: vault,
        lamports: rent.minimum_balance(TokenAccount::LEN),
        space: TokenAccount::LEN as u64,
        owner: &pinocchio_token::ID,
    }
    .invoke_signed(&[PinocchioSigner::from(&vault_seeds)])?;

    InitializeAccount3 {
        account: vault,
        mint,
        owner: &expected_config,
    }
    .invoke()?;

    let config = PoolConfig {
        authority: *authority.key(),
        mint: *mint.key(),
        vault: expected_vault,
        venue_position: *venue_position.key(),
        period: Period::new(unix_now()?),
        is_active: 1,
        bump: config_bump,
        vault_bump,
        ..PoolConfig::default()
    };
    store(pool_config, &config)?;

    log!("init_pool: pool initialized");
    Ok(())
}
