//! Program ID constants and collaborator authority PDAs.
//!
//! IDs are imported from the `superpool-program-ids` crate and selected at
//! compile time by the network feature.

use pinocchio::pubkey::Pubkey;

// =============================================================================
// Program IDs (imported from superpool-program-ids crate)
// =============================================================================

/// Superpool program ID.
pub const SUPERPOOL_PROGRAM_ID: Pubkey =
    five8_const::decode_32_const(superpool_program_ids::SUPERPOOL_ID);

/// Continuous payment stream protocol program ID.
pub const STREAM_PROGRAM_ID: Pubkey =
    five8_const::decode_32_const(superpool_program_ids::STREAM_PROGRAM_ID);

/// Automation network program ID.
pub const AUTOMATION_PROGRAM_ID: Pubkey =
    five8_const::decode_32_const(superpool_program_ids::AUTOMATION_PROGRAM_ID);

/// Yield venue program ID.
pub const YIELD_VENUE_PROGRAM_ID: Pubkey =
    five8_const::decode_32_const(superpool_program_ids::YIELD_VENUE_ID);

// =============================================================================
// Collaborator Authorities
// =============================================================================

/// Seed of the streaming protocol's hook-signing PDA.
pub const STREAM_AUTHORITY_SEED: &[u8] = b"stream_authority";

/// Seed of the automation network's executor PDA.
pub const AUTOMATION_AUTHORITY_SEED: &[u8] = b"automation_authority";

/// Derive the PDA the streaming protocol signs flow hooks with.
///
/// Returns (address, bump).
pub fn find_stream_authority_pda() -> (Pubkey, u8) {
    pinocchio::pubkey::find_program_address(&[STREAM_AUTHORITY_SEED], &STREAM_PROGRAM_ID)
}

/// Check that `authority` is the streaming protocol's hook-signing PDA.
pub fn validate_stream_authority(authority: &Pubkey) -> bool {
    let (expected, _) = find_stream_authority_pda();
    *authority == expected
}

/// Derive the PDA the automation network signs task executions with.
///
/// Returns (address, bump).
pub fn find_automation_authority_pda() -> (Pubkey, u8) {
    pinocchio::pubkey::find_program_address(&[AUTOMATION_AUTHORITY_SEED], &AUTOMATION_PROGRAM_ID)
}

/// Check that `authority` is the automation network's executor PDA.
pub fn validate_automation_authority(authority: &Pubkey) -> bool {
    let (expected, _) = find_automation_authority_pda();
    *authority == expected
}
