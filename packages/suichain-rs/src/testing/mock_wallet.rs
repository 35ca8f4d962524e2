//! Mock Wallet
//!
//! A [`Wallet`] that records every transaction handed to it and answers with
//! scripted outcomes. Optionally holds each submission until the test
//! releases it, to simulate a wallet waiting on user approval.

use async_trait::async_trait;
use eyre::{eyre, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;

use crate::address::SuiAddress;
use crate::responses::TransactionBlockResponse;
use crate::transaction::ProgrammableTransaction;
use crate::types::Digest;
use crate::wallet::Wallet;

/// What the mock answers for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Executed successfully
    Success,
    /// Rejected with this reason
    Failure(String),
}

/// Recording wallet with scripted outcomes
pub struct MockWallet {
    address: SuiAddress,
    /// Outcomes consumed in order; `Success` once exhausted
    outcomes: Mutex<VecDeque<MockOutcome>>,
    /// Every transaction received, in order
    submitted: Mutex<Vec<ProgrammableTransaction>>,
    /// When set, each submission waits for one permit
    gate: Option<Arc<Semaphore>>,
    /// Seed for distinct response digests
    counter: AtomicU8,
}

impl MockWallet {
    /// A wallet that succeeds every time
    pub fn new(address: SuiAddress) -> Self {
        Self {
            address,
            outcomes: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            gate: None,
            counter: AtomicU8::new(1),
        }
    }

    /// A wallet whose next submission fails with `reason`
    pub fn failing(address: SuiAddress, reason: &str) -> Self {
        let wallet = Self::new(address);
        wallet.push_outcome(MockOutcome::Failure(reason.to_string()));
        wallet
    }

    /// A wallet that holds submissions until permits are added to `gate`
    pub fn gated(address: SuiAddress, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(address)
        }
    }

    /// Queue an outcome for a later submission
    pub fn push_outcome(&self, outcome: MockOutcome) {
        lock(&self.outcomes).push_back(outcome);
    }

    /// All transactions received so far
    pub fn submitted(&self) -> Vec<ProgrammableTransaction> {
        lock(&self.submitted).clone()
    }

    /// Number of submissions received
    pub fn submission_count(&self) -> usize {
        lock(&self.submitted).len()
    }
}

#[async_trait]
impl Wallet for MockWallet {
    fn address(&self) -> SuiAddress {
        self.address
    }

    async fn sign_and_execute(
        &self,
        transaction: ProgrammableTransaction,
    ) -> Result<TransactionBlockResponse> {
        lock(&self.submitted).push(transaction);

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| eyre!("Wallet gate closed"))?;
            permit.forget();
        }

        let outcome = lock(&self.outcomes)
            .pop_front()
            .unwrap_or(MockOutcome::Success);

        match outcome {
            MockOutcome::Success => {
                let seed = self.counter.fetch_add(1, Ordering::Relaxed);
                Ok(TransactionBlockResponse::success(Digest::new([seed; 32])))
            }
            MockOutcome::Failure(reason) => Err(eyre!("{}", reason)),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
