//! Ledger harness shared by the integration tests.
//!
//! Drives the accounting core directly: one live period, supplier records
//! keyed by owner, a clock, and the venue balance the strategy adapter
//! reports. No runtime is involved, so every call is deterministic.

#![allow(dead_code)]

use std::collections::BTreeMap;

use pinocchio::pubkey::Pubkey;
use superpool::{
    Period, SuperPoolError, Supplier,
    ledger::{
        self, DepositOutcome, Observation, RedeemOutcome, TaskOutcome, TransferOutcome,
        inflow::{self, InflowOutcome},
        outflow::{self, OutflowOutcome},
    },
};
use superpool_interface::{SCALE, TaskPayload};

/// Pool config address the harness records belong to.
pub const POOL: Pubkey = [42; 32];

pub const ALICE: Pubkey = [1; 32];
pub const BOB: Pubkey = [2; 32];
pub const CAROL: Pubkey = [3; 32];

/// In-memory pool.
pub struct Harness {
    pub period: Period,
    pub suppliers: BTreeMap<Pubkey, Supplier>,
    /// Current unix time
    pub now: u64,
    /// Position balance the venue reports
    pub venue_balance: u64,
    /// Every task the ledger asked the automation network to register
    pub tasks: Vec<TaskPayload>,
    next_id: u64,
}

impl Harness {
    pub fn new(now: u64) -> Self {
        Self {
            period: Period::new(now),
            suppliers: BTreeMap::new(),
            now,
            venue_balance: 0,
            tasks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn obs(&self) -> Observation {
        Observation::new(self.now, self.venue_balance)
    }

    pub fn warp(&mut self, seconds: u64) {
        self.now += seconds;
    }

    /// The venue position gains `units` of yield.
    pub fn accrue(&mut self, units: u64) {
        self.venue_balance += units;
    }

    pub fn supplier(&self, owner: Pubkey) -> Supplier {
        self.suppliers[&owner]
    }

    /// Realtime balance of `owner` in token units, as of `now`.
    pub fn balance(&self, owner: Pubkey) -> u64 {
        let mut period = self.period;
        ledger::catch_up(&mut period, self.obs()).unwrap();
        self.suppliers[&owner].resolve(&period).unwrap().units()
    }

    /// Catch the period up and checkpoint every supplier.
    pub fn settle(&mut self) {
        let obs = self.obs();
        ledger::catch_up(&mut self.period, obs).unwrap();
        for supplier in self.suppliers.values_mut() {
            supplier.checkpoint(&mut self.period).unwrap();
        }
    }

    fn parts(&mut self, owner: Pubkey) -> (&mut Period, &mut Supplier) {
        if !self.suppliers.contains_key(&owner) {
            self.next_id += 1;
            let fresh = Supplier::new(POOL, owner, self.next_id, 255, &self.period);
            self.suppliers.insert(owner, fresh);
        }
        let supplier = self.suppliers.get_mut(&owner).unwrap();
        (&mut self.period, supplier)
    }

    pub fn deposit(&mut self, owner: Pubkey, amount: u64) -> Result<DepositOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        ledger::deposit(period, supplier, amount, obs)
    }

    pub fn redeem(&mut self, owner: Pubkey, amount: u64) -> Result<RedeemOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        ledger::redeem_deposit(period, supplier, amount, obs)
    }

    pub fn transfer(&mut self, from: Pubkey, to: Pubkey, amount: u64) -> Result<TransferOutcome, SuperPoolError> {
        let obs = self.obs();
        self.parts(to);
        self.parts(from);
        if from == to {
            let (mut sender, mut recipient) = (self.suppliers[&from], self.suppliers[&to]);
            return ledger::transfer(&mut self.period, &mut sender, &mut recipient, amount, obs);
        }
        let mut sender = self.suppliers.remove(&from).unwrap();
        let mut recipient = self.suppliers[&to];
        let result = ledger::transfer(&mut self.period, &mut sender, &mut recipient, amount, obs);
        self.suppliers.insert(from, sender);
        self.suppliers.insert(to, recipient);
        result
    }

    pub fn close(&mut self, owner: Pubkey) -> Result<RedeemOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        ledger::close_account(period, supplier, obs)
    }

    pub fn open_outflow(&mut self, owner: Pubkey, rate: i64) -> Result<OutflowOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        let outcome = outflow::redeem_flow(period, supplier, rate, obs)?;
        self.tasks.extend(outcome.tasks.register);
        Ok(outcome)
    }

    pub fn stop_outflow(&mut self, owner: Pubkey) -> Result<OutflowOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        outflow::redeem_flow_stop(period, supplier, obs)
    }

    pub fn flow_created(&mut self, owner: Pubkey, rate: i64, end_time: u64) -> Result<InflowOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        let outcome = inflow::on_flow_created(period, supplier, rate, end_time, obs)?;
        self.tasks.extend(outcome.tasks.register);
        Ok(outcome)
    }

    pub fn flow_updated(&mut self, owner: Pubkey, rate: i64, end_time: u64) -> Result<InflowOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        let outcome = inflow::on_flow_updated(period, supplier, rate, end_time, obs)?;
        self.tasks.extend(outcome.tasks.register);
        Ok(outcome)
    }

    pub fn flow_deleted(&mut self, owner: Pubkey) -> Result<InflowOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(owner);
        inflow::on_flow_deleted(period, supplier, obs)
    }

    pub fn check(&self, payload: &TaskPayload) -> bool {
        ledger::check_task(&self.suppliers[&payload.supplier], payload, self.now)
    }

    pub fn execute(&mut self, payload: &TaskPayload) -> Result<TaskOutcome, SuperPoolError> {
        let obs = self.obs();
        let (period, supplier) = self.parts(payload.supplier);
        let outcome = ledger::execute_task(period, supplier, payload, obs)?;
        if let TaskOutcome::Stepped { tasks, .. } = outcome {
            self.tasks.extend(tasks.register);
        }
        Ok(outcome)
    }

    /// Sum of every supplier's shares.
    pub fn shares_sum(&self) -> u128 {
        self.suppliers.values().map(|s| s.shares).sum()
    }

    /// Sum of every supplier's checkpointed deposit (scaled).
    pub fn deposit_sum(&self) -> u128 {
        self.suppliers.values().map(|s| s.deposit).sum()
    }

    /// Sum of every supplier's reserved outflow buffer (scaled).
    pub fn buffer_sum(&self) -> u128 {
        self.suppliers.values().map(|s| scaled(s.out_stream.min_balance)).sum()
    }

    /// Sums of every supplier's inflow and outflow rates.
    pub fn rate_sums(&self) -> (u64, u64) {
        self.suppliers.values().fold((0, 0), |(inflow, outflow), s| {
            (inflow + s.in_stream.flow_rate, outflow + s.out_stream.flow_rate)
        })
    }
}

/// `units` token units in fixed point.
pub const fn scaled(units: u64) -> u128 {
    units as u128 * SCALE
}
