//! Account creation and inspection helpers for the litesvm tests.

use litesvm::LiteSVM;
use litesvm_token::{CreateAccount, CreateMint, MintTo};
use solana_account::Account;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use superpool::{PoolConfig, Supplier, state::DISCRIMINATOR_LEN};
use superpool_interface::VenuePosition;

use super::pda::YIELD_VENUE_PROGRAM_ID;

// ============================================================================
// Tokens
// ============================================================================

/// Create a real SPL Token mint using litesvm-token
pub fn create_real_mint(svm: &mut LiteSVM, authority: &Keypair, decimals: u8) -> Pubkey {
    CreateMint::new(svm, authority)
        .decimals(decimals)
        .authority(&authority.pubkey())
        .send()
        .expect("create mint")
}

/// Create a real SPL Token account holding `balance`, minted by `mint_authority`
pub fn create_real_token_account(
    svm: &mut LiteSVM,
    mint_authority: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
    balance: u64,
) -> Pubkey {
    let token_account = CreateAccount::new(svm, mint_authority, mint)
        .owner(owner)
        .send()
        .expect("create token account");

    if balance > 0 {
        MintTo::new(svm, mint_authority, mint, &token_account, balance)
            .owner(mint_authority)
            .send()
            .expect("mint to");
    }

    token_account
}

/// Read a token account's balance
pub fn get_token_balance(svm: &LiteSVM, token_account: &Pubkey) -> u64 {
    let account = svm.get_account(token_account).expect("token account should exist");
    u64::from_le_bytes(account.data[64..72].try_into().unwrap())
}

// ============================================================================
// Yield Venue
// ============================================================================

/// Create the pool's position record at the yield venue.
///
/// No venue program is deployed; the record only has to be owned by the
/// venue's program id for the pool to read its balance.
pub fn create_venue_position(svm: &mut LiteSVM, pool_config: &Pubkey, balance: u64) -> Pubkey {
    let position = Pubkey::new_unique();
    write_venue_position(svm, &position, pool_config, balance);
    position
}

/// Overwrite the venue's reported balance, simulating accrued yield
pub fn set_venue_balance(svm: &mut LiteSVM, position: &Pubkey, pool_config: &Pubkey, balance: u64) {
    write_venue_position(svm, position, pool_config, balance);
}

fn write_venue_position(svm: &mut LiteSVM, position: &Pubkey, pool_config: &Pubkey, balance: u64) {
    let record = VenuePosition {
        discriminator: 1,
        owner: pool_config.to_bytes(),
        balance,
    };
    let account = Account {
        lamports: 1_000_000_000,
        data: bytemuck::bytes_of(&record).to_vec(),
        owner: YIELD_VENUE_PROGRAM_ID,
        executable: false,
        rent_epoch: 0,
    };
    svm.set_account(*position, account).unwrap();
}

// ============================================================================
// Program State
// ============================================================================

/// Read the pool config record
pub fn read_pool_config(svm: &LiteSVM, pool_config: &Pubkey) -> PoolConfig {
    let account = svm.get_account(pool_config).expect("pool_config should exist");
    bytemuck::pod_read_unaligned(&account.data[DISCRIMINATOR_LEN..DISCRIMINATOR_LEN + size_of::<PoolConfig>()])
}

/// Read a supplier record
pub fn read_supplier(svm: &LiteSVM, supplier: &Pubkey) -> Supplier {
    let account = svm.get_account(supplier).expect("supplier should exist");
    bytemuck::pod_read_unaligned(&account.data[DISCRIMINATOR_LEN..DISCRIMINATOR_LEN + size_of::<Supplier>()])
}
