//! Admin instructions for pool management.
//!
//! Everything here is gated on the pool authority, except `InitPool`, whose
//! signer becomes the authority.

mod accept_authority;
mod init_pool;
mod set_pool_active;
mod transfer_authority;

pub use accept_authority::process_accept_authority;
pub use init_pool::process_init_pool;
pub use set_pool_active::process_set_pool_active;
pub use transfer_authority::process_transfer_authority;
