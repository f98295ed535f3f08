//! Superpool Interface
//!
//! Shared types between the Superpool program and the programs it
//! collaborates with.
//!
//! # Architecture
//!
//! ```text
//!   streaming protocol ──OnFlow* hooks──▶ ┌──────────────┐ ──Deposit/Withdraw──▶ yield venue
//!   (inflows, outflows) ◀──Create/Delete── │  superpool   │
//!                                         └──────────────┘
//!   automation network ──CheckTask/ExecuteTask──▲    │──CreateTask/CancelTask──▶
//! ```
//!
//! # Fixed Point
//!
//! Every internal balance and index is a `u128` scaled by [`SCALE`]:
//! ```text
//! scaled = units × SCALE
//! ```
//! Token amounts and flow rates cross the program boundary unscaled.
//!
//! # Modules
//!
//! - [`fixed_point`]: Scaling constant and overflow-free `mul_div`
//! - [`outflow`]: Buffer and step sizing for outgoing streams
//! - [`task`]: Automation task payloads and deterministic task ids
//! - [`cpi`]: Instruction builders for collaborator programs
//! - [`authority`]: Two-step authority transfer helpers
//! - [`program_ids`]: Program ID constants and collaborator authority PDAs

#![no_std]

pub mod authority;
mod cpi;
pub mod fixed_point;
pub mod outflow;
mod program_ids;
pub mod task;

pub use cpi::*;
pub use fixed_point::{SCALE, from_scaled, mul_div, to_scaled};
pub use outflow::{OutflowPlan, plan_outflow};
pub use program_ids::*;
pub use task::{CheckTaskReturnData, TaskKind, TaskPayload, task_id};
