//! Common test utilities for refresh controller tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use xai_balance_client::{BillingApi, FetchError};
use xai_balance_core::{BillingCycle, BillingSnapshot, Credentials};
use xai_balance_menu::{DisplayState, RefreshHandle};

/// What a scripted fetch resolves to.
#[derive(Debug, Clone)]
pub enum Outcome {
    Snapshot(BillingSnapshot),
    Status(u16),
    NoBody,
}

impl Outcome {
    fn into_result(self) -> Result<BillingSnapshot, FetchError> {
        match self {
            Self::Snapshot(snapshot) => Ok(snapshot),
            Self::Status(status) => Err(FetchError::HttpStatus(status)),
            Self::NoBody => Err(FetchError::NoBody),
        }
    }
}

/// Billing API that replays scripted outcomes.
///
/// Outcomes are consumed in order; the last one repeats forever.
pub struct ScriptedApi {
    script: Mutex<VecDeque<(Duration, Outcome)>>,
    calls: watch::Sender<usize>,
    teams: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new(script: Vec<(Duration, Outcome)>) -> Arc<Self> {
        assert!(!script.is_empty(), "script needs at least one outcome");
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: watch::channel(0).0,
            teams: Mutex::new(Vec::new()),
        })
    }

    /// Every fetch returns `outcome` immediately.
    pub fn always(outcome: Outcome) -> Arc<Self> {
        Self::new(vec![(Duration::ZERO, outcome)])
    }

    /// Outcomes returned immediately, in order.
    pub fn sequence(outcomes: Vec<Outcome>) -> Arc<Self> {
        Self::new(outcomes.into_iter().map(|o| (Duration::ZERO, o)).collect())
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }

    pub fn teams(&self) -> Vec<String> {
        self.teams.lock().unwrap().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        let mut rx = self.calls.subscribe();
        tokio::time::timeout(Duration::from_secs(86_400), rx.wait_for(|calls| *calls >= count))
            .await
            .expect("timed out waiting for fetches")
            .expect("call counter closed");
    }

    fn next(&self) -> (Duration, Outcome) {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl BillingApi for ScriptedApi {
    async fn fetch(&self, credentials: &Credentials) -> Result<BillingSnapshot, FetchError> {
        self.calls.send_modify(|calls| *calls += 1);
        self.teams.lock().unwrap().push(credentials.team_id.clone());

        let (delay, outcome) = self.next();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome.into_result()
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("xai-test-key", "team-123")
}

pub fn snapshot(amount: &str, prepaid: &str, prepaid_used: &str, limit: &str) -> BillingSnapshot {
    BillingSnapshot {
        amount_after_vat: amount.into(),
        prepaid_credits: prepaid.into(),
        prepaid_credits_used: prepaid_used.into(),
        effective_spending_limit: limit.into(),
        billing_cycle: BillingCycle::new(2025, 12).unwrap(),
    }
}

/// Summary "$105.00 $175.00".
pub fn sample_snapshot() -> BillingSnapshot {
    snapshot("7500", "15000", "4500", "25000")
}

/// Summary "$8.81".
pub fn real_snapshot() -> BillingSnapshot {
    snapshot("619", "-740", "-740", "1500")
}

/// Wait until the published state satisfies `predicate`.
pub async fn wait_for_state(
    handle: &RefreshHandle,
    predicate: impl FnMut(&DisplayState) -> bool,
) -> DisplayState {
    let mut rx = handle.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(86_400), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for display state")
        .expect("controller stopped")
        .clone();
    state
}
