//! PDA derivation helpers and program ids for the litesvm tests.

use solana_pubkey::Pubkey;

// ============================================================================
// Program IDs
// ============================================================================

/// Superpool program ID (from the centralized superpool-program-ids crate)
pub const SUPERPOOL_PROGRAM_ID: Pubkey = Pubkey::new_from_array(superpool::ID);

/// Streaming protocol program ID
pub const STREAM_PROGRAM_ID: Pubkey = Pubkey::new_from_array(superpool_interface::STREAM_PROGRAM_ID);

/// Automation network program ID
pub const AUTOMATION_PROGRAM_ID: Pubkey = Pubkey::new_from_array(superpool_interface::AUTOMATION_PROGRAM_ID);

/// Yield venue program ID
pub const YIELD_VENUE_PROGRAM_ID: Pubkey = Pubkey::new_from_array(superpool_interface::YIELD_VENUE_PROGRAM_ID);

/// SPL Token program ID
pub const SPL_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array(pinocchio_token::ID);

/// System program ID
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_system_interface::program::ID;

// ============================================================================
// Superpool PDAs
// ============================================================================

/// Derive the pool config PDA for a mint
pub fn find_pool_config_pda(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[superpool::POOL_CONFIG_SEED, mint.as_ref()], &SUPERPOOL_PROGRAM_ID)
}

/// Derive the vault PDA of a pool
pub fn find_vault_pda(pool_config: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[superpool::VAULT_SEED, pool_config.as_ref()], &SUPERPOOL_PROGRAM_ID)
}

/// Derive a supplier record PDA
pub fn find_supplier_pda(pool_config: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[superpool::SUPPLIER_SEED, pool_config.as_ref(), owner.as_ref()],
        &SUPERPOOL_PROGRAM_ID,
    )
}

// ============================================================================
// Collaborator PDAs
// ============================================================================

/// The streaming protocol's hook-signing PDA
pub fn stream_authority() -> Pubkey {
    Pubkey::find_program_address(&[superpool_interface::STREAM_AUTHORITY_SEED], &STREAM_PROGRAM_ID).0
}

/// The automation network's executor PDA
pub fn automation_authority() -> Pubkey {
    Pubkey::find_program_address(&[superpool_interface::AUTOMATION_AUTHORITY_SEED], &AUTOMATION_PROGRAM_ID).0
}
