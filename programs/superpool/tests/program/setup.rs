//! Program deployment and pool bootstrap helpers for the litesvm tests.

use litesvm::{LiteSVM, types::TransactionResult};
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use solana_transaction::Transaction;
use superpool::SuperPoolError;

use super::instructions::build_init_pool_ix;
use super::mock_accounts::{create_real_mint, create_real_token_account, create_venue_position};
use super::pda::{SUPERPOOL_PROGRAM_ID, find_pool_config_pda, find_vault_pda};

/// Token decimals of every test mint
pub const DECIMALS: u8 = 6;

/// Deploy the superpool program
pub fn deploy_superpool_program(svm: &mut LiteSVM) -> Pubkey {
    let program_data = include_bytes!("../../../../target/deploy/superpool.so");
    svm.add_program(SUPERPOOL_PROGRAM_ID, program_data).unwrap();
    SUPERPOOL_PROGRAM_ID
}

/// An initialized pool and the accounts around it.
pub struct TestPool {
    pub authority: Keypair,
    pub mint: Pubkey,
    pub pool_config: Pubkey,
    pub vault: Pubkey,
    pub venue_position: Pubkey,
    pub venue_reserve: Pubkey,
}

/// Deploy the program and initialize a pool over a fresh mint.
///
/// The authority also holds the mint authority, so it can fund suppliers.
pub fn setup_pool(svm: &mut LiteSVM) -> TestPool {
    deploy_superpool_program(svm);

    let authority = Keypair::new();
    svm.airdrop(&authority.pubkey(), 10_000_000_000).unwrap();

    let mint = create_real_mint(svm, &authority, DECIMALS);
    let (pool_config, _) = find_pool_config_pda(&mint);
    let (vault, _) = find_vault_pda(&pool_config);
    let venue_position = create_venue_position(svm, &pool_config, 0);

    send(
        svm,
        build_init_pool_ix(&mint, &venue_position, &authority.pubkey()),
        &authority,
        &[],
    )
    .expect("InitPool should succeed");

    TestPool {
        authority,
        mint,
        pool_config,
        vault,
        venue_position,
        venue_reserve: Pubkey::new_unique(),
    }
}

/// Create a supplier wallet with SOL for fees and `balance` tokens.
///
/// Returns the keypair and its token account.
pub fn fund_supplier(svm: &mut LiteSVM, pool: &TestPool, balance: u64) -> (Keypair, Pubkey) {
    let supplier = Keypair::new();
    svm.airdrop(&supplier.pubkey(), 1_000_000_000).unwrap();
    let token = create_real_token_account(svm, &pool.authority, &pool.mint, &supplier.pubkey(), balance);
    (supplier, token)
}

/// Sign and send one instruction with `payer` paying and signing, plus any
/// extra signers.
pub fn send(svm: &mut LiteSVM, ix: Instruction, payer: &Keypair, extra_signers: &[&Keypair]) -> TransactionResult {
    let mut signers = vec![payer];
    signers.extend_from_slice(extra_signers);

    let tx = Transaction::new_signed_with_payer(&[ix], Some(&payer.pubkey()), &signers, svm.latest_blockhash());
    svm.send_transaction(tx)
}

/// Whether a transaction failed with `error` from this program.
pub fn failed_with(result: &TransactionResult, error: SuperPoolError) -> bool {
    let Err(failed) = result else {
        return false;
    };
    let expected = format!("custom program error: {:#x}", error as u32);
    failed.meta.logs.iter().any(|line| line.contains(&expected))
}
