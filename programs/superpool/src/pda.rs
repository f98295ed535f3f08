//! Program Derived Address (PDA) helpers
//!
//! | Account     | Seeds                               |
//! |-------------|-------------------------------------|
//! | Pool config | `["superpool", mint]`               |
//! | Vault       | `["vault", pool_config]`            |
//! | Supplier    | `["supplier", pool_config, owner]`  |
//!
//! `find_*` derives an address and bump; `gen_*_seeds` builds the signer
//! seeds for CPIs.

use pinocchio::{instruction::Seed, pubkey::Pubkey};

/// Seed prefix of the pool config PDA.
pub const POOL_CONFIG_SEED: &[u8] = b"superpool";

/// Seed prefix of the vault token account PDA.
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed prefix of supplier record PDAs.
pub const SUPPLIER_SEED: &[u8] = b"supplier";

/// Derive the pool config PDA for `mint`.
pub fn find_pool_config_pda(mint: &Pubkey) -> (Pubkey, u8) {
    pinocchio::pubkey::find_program_address(&[POOL_CONFIG_SEED, mint], &crate::ID)
}

/// Derive the vault PDA for `pool_config`.
pub fn find_vault_pda(pool_config: &Pubkey) -> (Pubkey, u8) {
    pinocchio::pubkey::find_program_address(&[VAULT_SEED, pool_config], &crate::ID)
}

/// Derive the supplier PDA of `owner` in `pool_config`.
pub fn find_supplier_pda(pool_config: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    pinocchio::pubkey::find_program_address(&[SUPPLIER_SEED, pool_config, owner], &crate::ID)
}

/// Signer seeds of the pool config PDA.
pub fn gen_pool_config_seeds<'a>(mint: &'a Pubkey, bump: &'a [u8; 1]) -> [Seed<'a>; 3] {
    [Seed::from(POOL_CONFIG_SEED), Seed::from(mint), Seed::from(bump)]
}

/// Signer seeds of the vault PDA.
pub fn gen_vault_seeds<'a>(pool_config: &'a Pubkey, bump: &'a [u8; 1]) -> [Seed<'a>; 3] {
    [Seed::from(VAULT_SEED), Seed::from(pool_config), Seed::from(bump)]
}

/// Signer seeds of a supplier PDA.
pub fn gen_supplier_seeds<'a>(pool_config: &'a Pubkey, owner: &'a Pubkey, bump: &'a [u8; 1]) -> [Seed<'a>; 4] {
    [
        Seed::from(SUPPLIER_SEED),
        Seed::from(pool_config),
        Seed::from(owner),
        Seed::from(bump),
    ]
}
