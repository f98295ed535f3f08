//! Pool configuration account.

use bytemuck::{Pod, Zeroable};
use pinocchio::{program_error::ProgramError, pubkey::Pubkey};
use superpool_interface::authority::HasAuthority;

use crate::{
    SuperPoolError, find_pool_config_pda,
    state::{Period, ProgramAccount, SuperPoolAccount},
};

/// Pool configuration. PDA: ["superpool", mint].
///
/// One pool per asset. Carries the live [`Period`]; the period's history is
/// the stream of `PeriodAdvanced` events.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PoolConfig {
    // =========================================================================
    // References (160 bytes)
    // =========================================================================
    /// Admin authority.
    pub authority: Pubkey,

    /// Nominated successor, zeroes when none.
    pub pending_authority: Pubkey,

    /// The pooled asset's mint.
    pub mint: Pubkey,

    /// Vault token account. PDA: ["vault", pool_config].
    pub vault: Pubkey,

    /// Pool's position at the yield venue.
    pub venue_position: Pubkey,

    // =========================================================================
    // Ledger (224 bytes)
    // =========================================================================
    /// Live period.
    pub period: Period,

    // =========================================================================
    // Statistics (56 bytes)
    // =========================================================================
    /// Lump-sum deposits since inception (token units).
    pub total_deposited: u128,

    /// Lump-sum redemptions since inception (token units).
    pub total_redeemed: u128,

    /// Supplier records created.
    pub supplier_count: u64,

    /// Lump-sum deposits processed.
    pub deposit_count: u64,

    /// Lump-sum redemptions processed.
    pub redeem_count: u64,

    // =========================================================================
    // Flags (8 bytes)
    // =========================================================================
    /// 1 when accepting operations.
    pub is_active: u8,

    /// PDA bump.
    pub bump: u8,

    /// Vault PDA bump.
    pub vault_bump: u8,

    /// Padding for 16-byte alignment
    pub _padding: [u8; 5],
}

impl ProgramAccount for PoolConfig {
    const DISCRIMINATOR: SuperPoolAccount = SuperPoolAccount::PoolConfig;
}

impl PoolConfig {
    /// Fail with `PoolPaused` unless the pool is active.
    ///
    /// # Errors
    /// `PoolPaused` when inactive.
    pub fn require_active(&self) -> Result<(), SuperPoolError> {
        if self.is_active == 0 {
            return Err(SuperPoolError::PoolPaused);
        }
        Ok(())
    }

    /// Fail with `Unauthorized` unless `signer` is the authority.
    ///
    /// # Errors
    /// `Unauthorized` on mismatch.
    pub fn require_authority(&self, signer: &Pubkey) -> Result<(), SuperPoolError> {
        if self.authority != *signer {
            return Err(SuperPoolError::Unauthorized);
        }
        Ok(())
    }

    /// Check that `key` is the canonical PDA for this config's mint.
    ///
    /// # Errors
    /// `InvalidPda` on mismatch.
    pub fn validate_pda(&self, key: &Pubkey) -> Result<(), ProgramError> {
        let (expected, _) = find_pool_config_pda(&self.mint);
        if *key != expected {
            return Err(SuperPoolError::InvalidPda.into());
        }
        Ok(())
    }

    /// Allocate the next supplier id.
    ///
    /// # Errors
    /// `ArithmeticOverflow` on overflow.
    pub fn next_supplier_id(&mut self) -> Result<u64, SuperPoolError> {
        self.supplier_count = self
            .supplier_count
            .checked_add(1)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        Ok(self.supplier_count)
    }

    /// Record a lump-sum deposit in the statistics.
    ///
    /// # Errors
    /// `ArithmeticOverflow` on overflow.
    pub fn record_deposit(&mut self, amount: u64) -> Result<(), SuperPoolError> {
        self.total_deposited = self
            .total_deposited
            .checked_add(amount as u128)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        self.deposit_count = self
            .deposit_count
            .checked_add(1)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Record a lump-sum redemption in the statistics.
    ///
    /// # Errors
    /// `ArithmeticOverflow` on overflow.
    pub fn record_redeem(&mut self, amount: u64) -> Result<(), SuperPoolError> {
        self.total_redeemed = self
            .total_redeemed
            .checked_add(amount as u128)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        self.redeem_count = self
            .redeem_count
            .checked_add(1)
            .ok_or(SuperPoolError::ArithmeticOverflow)?;
        Ok(())
    }
}

impl HasAuthority for PoolConfig {
    fn authority(&self) -> &Pubkey {
        &self.authority
    }
    fn pending_authority(&self) -> &Pubkey {
        &self.pending_authority
    }
    fn set_authorities(&mut self, authority: Pubkey, pending: Pubkey) {
        self.authority = authority;
        self.pending_authority = pending;
    }
}
