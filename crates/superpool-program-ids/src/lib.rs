//! Single source of truth for the Superpool program ID and the programs it
//! collaborates with.
//!
//! IDs are `&'static str` constants so they can be decoded at compile time
//! with `five8_const::decode_32_const`.
//!
//! # Feature Flags
//!
//! - `devnet` - Use devnet program IDs
//! - `mainnet` - Use mainnet program IDs (default)
//! - `localnet` - Use localnet program IDs (same as mainnet)

#![no_std]

// =============================================================================
// Superpool Program ID
// =============================================================================

/// Superpool program ID (devnet).
#[cfg(feature = "devnet")]
pub const SUPERPOOL_ID: &str = "BMBzcj94AUZJX6eCgLD18Vr1f23rtwqde5rUaRoGL8We";

/// Superpool program ID (mainnet/localnet).
#[cfg(not(feature = "devnet"))]
pub const SUPERPOOL_ID: &str = "9L36pQJFNqpcmDSAxYUd8GLmTybhNdviPo2HmDH3pe8e";

// =============================================================================
// Streaming Protocol Program ID
// =============================================================================

/// Continuous payment stream protocol (devnet).
///
/// Owns the per-second flows into and out of the pool vault and calls the
/// pool's flow hooks when a flow targeting the pool changes.
#[cfg(feature = "devnet")]
pub const STREAM_PROGRAM_ID: &str = "B8uShb9sN15mkwx1N1bVcK1AESP5JpP6DarhwmRf7GCG";

/// Continuous payment stream protocol (mainnet/localnet).
#[cfg(not(feature = "devnet"))]
pub const STREAM_PROGRAM_ID: &str = "38Ns2SLLw63cgAgnZvRDg4WhEVPsQau8Vx3BfqHiDgaE";

// =============================================================================
// Automation Network Program ID
// =============================================================================

/// Conditional task automation network (devnet).
///
/// Polls `CheckTask` and calls `ExecuteTask` when a task reports ready.
#[cfg(feature = "devnet")]
pub const AUTOMATION_PROGRAM_ID: &str = "BntvdHnUBY1pC6jsBnhCCdoUJ98F7B47UpVb9ZcuEsKT";

/// Conditional task automation network (mainnet/localnet).
#[cfg(not(feature = "devnet"))]
pub const AUTOMATION_PROGRAM_ID: &str = "GLS9sQCQLFsrreXviWW3xeki7YMGLxik8rMeMx6SZxHT";

// =============================================================================
// Yield Venue Program ID
// =============================================================================

/// External yield venue where idle pool liquidity is invested (devnet).
#[cfg(feature = "devnet")]
pub const YIELD_VENUE_ID: &str = "7NxASAsCrHiZriBjSEe5qQyy9FR9AH9R7tjiRPuYPoio";

/// External yield venue where idle pool liquidity is invested (mainnet/localnet).
#[cfg(not(feature = "devnet"))]
pub const YIELD_VENUE_ID: &str = "3jts454tqNZGAMQ15D7ydPK4Nox3Nd2LWqsRgXcuBkA2";
