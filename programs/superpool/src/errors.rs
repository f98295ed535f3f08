//! Superpool errors.

use pinocchio::program_error::ProgramError;

/// Superpool error codes.
///
/// `StaleAutomationTask` and the zero-pool guard never surface as failures:
/// stale tasks resolve to a no-op outcome and an empty pool yields zero index
/// movement.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuperPoolError {
    /// Pool is paused
    PoolPaused = 0,
    /// Withdrawal, transfer, or outflow exceeds the supplier's available balance
    InsufficientBalance = 1,
    /// Transfer exceeds the sender's share balance
    InsufficientShares = 2,
    /// Collaborator-only entry point invoked by someone else
    UnauthorizedCaller = 3,
    /// Zero or negative flow rate where a positive rate is required
    InvalidRate = 4,
    /// Arithmetic overflow
    ArithmeticOverflow = 5,
    /// Zero amount
    InvalidAmount = 6,
    /// Invalid instruction data
    InvalidInstructionData = 7,
    /// Account is not the expected PDA
    InvalidPda = 8,
    /// Account data has the wrong owner, size, or discriminator
    InvalidAccountData = 9,
    /// Account already initialized
    AlreadyInitialized = 10,
    /// Supplier already has an inflow
    InflowAlreadyActive = 11,
    /// Supplier has no inflow
    NoActiveInflow = 12,
    /// Supplier has no outgoing stream
    NoActiveOutflow = 13,
    /// Task fired before its due time
    TaskNotReady = 14,
    /// Recognized internally, never returned from an instruction
    StaleAutomationTask = 15,
    /// Account cannot be closed while an inflow is active
    InflowStillActive = 16,
    /// Transfer to self
    SelfTransfer = 17,
    /// Invalid token program
    InvalidTokenProgram = 18,
    /// Invalid system program
    InvalidSystemProgram = 19,
    /// Invalid mint
    InvalidMint = 20,
    /// Invalid vault account
    InvalidVault = 21,
    /// Venue position does not belong to this pool
    InvalidVenuePosition = 22,
    /// Collaborator program account does not match
    InvalidCollaboratorProgram = 23,
    /// Unauthorized admin operation
    Unauthorized = 24,
    /// Clock went backwards relative to the ledger
    InvalidTimestamp = 25,
}

impl From<SuperPoolError> for ProgramError {
    fn from(e: SuperPoolError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
