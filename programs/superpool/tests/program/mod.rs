//! Shared helpers for the litesvm tests that run the built program.

pub mod instructions;
pub mod mock_accounts;
pub mod pda;
pub mod setup;

pub use instructions::*;
pub use mock_accounts::*;
pub use pda::*;
pub use setup::*;
