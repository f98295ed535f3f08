//! Admin instruction tests against the built program.

mod program;

use litesvm::LiteSVM;
use program::*;
use solana_keypair::Keypair;
use solana_signer::Signer;
use superpool::{SuperPoolError, state::INDEX_ONE};

/// Test successful pool initialization.
#[test]
fn test_init_pool_success() {
    let mut svm = LiteSVM::new();
    let pool = setup_pool(&mut svm);

    // The pool config is owned by the program
    let account = svm.get_account(&pool.pool_config).expect("pool_config should exist");
    assert_eq!(account.owner, SUPERPOOL_PROGRAM_ID);

    // The vault is a token account owned by the token program
    let vault_account = svm.get_account(&pool.vault).expect("vault should exist");
    assert_eq!(vault_account.owner, SPL_TOKEN_PROGRAM_ID);
    assert_eq!(get_token_balance(&svm, &pool.vault), 0);

    let config = read_pool_config(&svm, &pool.pool_config);
    assert_eq!(config.authority, pool.authority.pubkey().to_bytes());
    assert_eq!(config.mint, pool.mint.to_bytes());
    assert_eq!(config.vault, pool.vault.to_bytes());
    assert_eq!(config.venue_position, pool.venue_position.to_bytes());
    assert_eq!(config.is_active, 1);
    assert_eq!(config.period.total_deposit, 0);
    assert_eq!(config.period.yield_token_index, INDEX_ONE);
}

/// Test that a pool cannot be initialized twice for the same mint.
#[test]
fn test_init_pool_twice_fails() {
    let mut svm = LiteSVM::new();
    let pool = setup_pool(&mut svm);

    svm.expire_blockhash();
    let result = send(
        &mut svm,
        build_init_pool_ix(&pool.mint, &pool.venue_position, &pool.authority.pubkey()),
        &pool.authority,
        &[],
    );
    assert!(
        failed_with(&result, SuperPoolError::AlreadyInitialized),
        "second init_pool should fail"
    );
}

/// Test that the venue position must belong to the yield venue.
#[test]
fn test_init_pool_rejects_foreign_venue_position() {
    let mut svm = LiteSVM::new();
    deploy_superpool_program(&mut svm);

    let authority = Keypair::new();
    svm.airdrop(&authority.pubkey(), 10_000_000_000).unwrap();
    let mint = create_real_mint(&mut svm, &authority, DECIMALS);

    // A system account stands in for the position
    let position = Keypair::new();
    svm.airdrop(&position.pubkey(), 1_000_000_000).unwrap();

    let result = send(
        &mut svm,
        build_init_pool_ix(&mint, &position.pubkey(), &authority.pubkey()),
        &authority,
        &[],
    );
    assert!(failed_with(&result, SuperPoolError::InvalidVenuePosition));

    let (pool_config, _) = find_pool_config_pda(&mint);
    assert!(svm.get_account(&pool_config).is_none_or(|a| a.data.is_empty()));
}

/// Test pausing and resuming a pool, and that a paused pool refuses deposits.
#[test]
fn test_set_pool_active_gates_deposits() {
    let mut svm = LiteSVM::new();
    let pool = setup_pool(&mut svm);
    let (alice, alice_token) = fund_supplier(&mut svm, &pool, 1_000_000);

    let result = send(
        &mut svm,
        build_set_pool_active_ix(&pool.pool_config, &pool.authority.pubkey(), false),
        &pool.authority,
        &[],
    );
    assert!(result.is_ok(), "set_pool_active(false) failed: {:?}", result.err());
    assert_eq!(read_pool_config(&svm, &pool.pool_config).is_active, 0);

    let result = send(
        &mut svm,
        build_deposit_ix(&pool, &alice.pubkey(), &alice_token, 1_000),
        &alice,
        &[],
    );
    assert!(failed_with(&result, SuperPoolError::PoolPaused));
    assert_eq!(get_token_balance(&svm, &alice_token), 1_000_000);

    let result = send(
        &mut svm,
        build_set_pool_active_ix(&pool.pool_config, &pool.authority.pubkey(), true),
        &pool.authority,
        &[],
    );
    assert!(result.is_ok(), "set_pool_active(true) failed: {:?}", result.err());

    let result = send(
        &mut svm,
        build_deposit_ix(&pool, &alice.pubkey(), &alice_token, 1_001),
        &alice,
        &[],
    );
    assert!(result.is_ok(), "deposit after resume failed: {:?}", result.err());
}

/// Test that unauthorized users cannot pause the pool.
#[test]
fn test_unauthorized_set_pool_active_fails() {
    let mut svm = LiteSVM::new();
    let pool = setup_pool(&mut svm);

    let other_user = Keypair::new();
    svm.airdrop(&other_user.pubkey(), 10_000_000_000).unwrap();

    let result = send(
        &mut svm,
        build_set_pool_active_ix(&pool.pool_config, &other_user.pubkey(), false),
        &other_user,
        &[],
    );
    assert!(failed_with(&result, SuperPoolError::Unauthorized));
    assert_eq!(read_pool_config(&svm, &pool.pool_config).is_active, 1);
}

/// Test the two-step authority handover.
#[test]
fn test_transfer_and_accept_authority() {
    let mut svm = LiteSVM::new();
    let pool = setup_pool(&mut svm);

    let new_authority = Keypair::new();
    let impostor = Keypair::new();
    svm.airdrop(&new_authority.pubkey(), 10_000_000_000).unwrap();
    svm.airdrop(&impostor.pubkey(), 10_000_000_000).unwrap();

    let result = send(
        &mut svm,
        build_transfer_authority_ix(&pool.pool_config, &pool.authority.pubkey(), &new_authority.pubkey()),
        &pool.authority,
        &[],
    );
    assert!(result.is_ok(), "transfer_authority failed: {:?}", result.err());
    let config = read_pool_config(&svm, &pool.pool_config);
    assert_eq!(config.pending_authority, new_authority.pubkey().to_bytes());
    assert_eq!(config.authority, pool.authority.pubkey().to_bytes());

    // Only the nominee may accept
    let result = send(
        &mut svm,
        build_accept_authority_ix(&pool.pool_config, &impostor.pubkey()),
        &impostor,
        &[],
    );
    assert!(result.is_err(), "accept_authority should fail for a non-nominee");

    let result = send(
        &mut svm,
        build_accept_authority_ix(&pool.pool_config, &new_authority.pubkey()),
        &new_authority,
        &[],
    );
    assert!(result.is_ok(), "accept_authority failed: {:?}", result.err());
    let config = read_pool_config(&svm, &pool.pool_config);
    assert_eq!(config.authority, new_authority.pubkey().to_bytes());
    assert_eq!(config.pending_authority, [0; 32]);

    // The previous authority has lost its rights
    let result = send(
        &mut svm,
        build_set_pool_active_ix(&pool.pool_config, &pool.authority.pubkey(), false),
        &pool.authority,
        &[],
    );
    assert!(failed_with(&result, SuperPoolError::Unauthorized));
}
