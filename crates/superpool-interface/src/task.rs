//! Automation task payloads and deterministic task ids.
//!
//! The pool never stores closures for the automation network. A task carries
//! only the supplier and the schedule it was registered for; `ExecuteTask`
//! rebuilds everything else from the supplier account and recomputes the id.
//! A task whose id no longer matches the supplier's stored id is stale.

use bytemuck::{Pod, Zeroable};
use pinocchio::pubkey::Pubkey;
use sha2_const_stable::Sha256;

/// Domain separator hashed into every task id.
pub const TASK_ID_DOMAIN: &[u8] = b"superpool:task";

/// What a registered task does when it fires.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Replenish or terminate an outgoing stream's buffer
    OutflowStep = 0,
    /// Close a time-bounded inflow at its end time
    InflowStop = 1,
}

impl TaskKind {
    /// Parse a task kind from its byte tag.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::OutflowStep),
            1 => Some(Self::InflowStop),
            _ => None,
        }
    }
}

/// Payload registered with the automation network and echoed back on execute.
///
/// For [`TaskKind::OutflowStep`], `init_time`/`step_time` are the outgoing
/// stream's schedule. For [`TaskKind::InflowStop`], `init_time` is the inflow's
/// end time and `step_time` is zero.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TaskPayload {
    /// Supplier owner address the task targets
    pub supplier: Pubkey,
    /// [`TaskKind`] tag
    pub kind: u8,
    /// Padding for 8-byte alignment
    pub _padding: [u8; 7],
    /// Schedule start (unix seconds)
    pub init_time: u64,
    /// Schedule period (seconds)
    pub step_time: u64,
}

impl TaskPayload {
    /// Size of the payload in bytes.
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Payload for the next step of an outgoing stream.
    pub const fn outflow_step(supplier: Pubkey, init_time: u64, step_time: u64) -> Self {
        Self {
            supplier,
            kind: TaskKind::OutflowStep as u8,
            _padding: [0; 7],
            init_time,
            step_time,
        }
    }

    /// Payload for stopping an inflow at `end_time`.
    pub const fn inflow_stop(supplier: Pubkey, end_time: u64) -> Self {
        Self {
            supplier,
            kind: TaskKind::InflowStop as u8,
            _padding: [0; 7],
            init_time: end_time,
            step_time: 0,
        }
    }

    /// Parsed task kind, `None` for an unknown tag.
    pub const fn task_kind(&self) -> Option<TaskKind> {
        TaskKind::from_u8(self.kind)
    }

    /// Earliest unix timestamp at which the task may run.
    pub const fn due_time(&self) -> Option<u64> {
        self.init_time.checked_add(self.step_time)
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(bytemuck::bytes_of(self));
        out
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        bytemuck::try_pod_read_unaligned(data.get(..Self::LEN)?).ok()
    }
}

/// Deterministic id of a task registered by `pool` for `payload`.
///
/// ```text
/// id = sha256("superpool:task" ‖ pool ‖ supplier ‖ kind ‖ init_time_le ‖ step_time_le)
/// ```
pub fn task_id(pool: &Pubkey, payload: &TaskPayload) -> [u8; 32] {
    Sha256::new()
        .update(TASK_ID_DOMAIN)
        .update(pool)
        .update(&payload.supplier)
        .update(&[payload.kind])
        .update(&payload.init_time.to_le_bytes())
        .update(&payload.step_time.to_le_bytes())
        .finalize()
}

/// Return data of the `CheckTask` hook.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct CheckTaskReturnData {
    /// 1 when `ExecuteTask` would act on the payload, 0 otherwise
    pub can_execute: u8,
    /// Padding for 8-byte alignment
    pub _padding: [u8; 7],
    /// The payload to pass to `ExecuteTask`
    pub payload: TaskPayload,
}

impl CheckTaskReturnData {
    /// Whether the automation network should call `ExecuteTask`.
    pub const fn can_execute(&self) -> bool {
        self.can_execute != 0
    }
}
