// Copyright 2025 Cowboy AI, LLC.

//! In-memory chain and account fakes for unit tests

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::chain::{
    Account, Address, BlockId, ChainInteraction, TransactionOutcome, TransactionRequest,
};
use crate::errors::BoxError;

#[derive(Debug)]
pub(crate) struct TestAccount {
    address: Address,
    sequence_number: AtomicU64,
}

impl TestAccount {
    pub(crate) fn new(address: Address) -> Self {
        Self {
            address,
            sequence_number: AtomicU64::new(0),
        }
    }

    pub(crate) fn sequence_number(&self) -> u64 {
        self.sequence_number.load(Ordering::SeqCst)
    }
}

impl Account for TestAccount {
    fn address(&self) -> Address {
        self.address
    }

    fn increment_sequence_number(&self) {
        self.sequence_number.fetch_add(1, Ordering::SeqCst);
    }
}

/// Chain that records every request and answers with a fixed outcome
pub(crate) struct RecordingChain {
    borrowable: Address,
    distinct_borrows: bool,
    borrows: AtomicU64,
    failure: Option<String>,
    sent: Mutex<Vec<TransactionRequest>>,
}

impl RecordingChain {
    pub(crate) fn new(borrowable: Address) -> Self {
        Self {
            borrowable,
            distinct_borrows: false,
            borrows: AtomicU64::new(0),
            failure: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Lend `borrowable`, then the addresses after it, one per borrow
    pub(crate) fn with_distinct_borrows(mut self) -> Self {
        self.distinct_borrows = true;
        self
    }

    pub(crate) fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub(crate) fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainInteraction for RecordingChain {
    async fn borrow(&self) -> Result<Arc<dyn Account>, BoxError> {
        let offset = if self.distinct_borrows {
            self.borrows.fetch_add(1, Ordering::SeqCst)
        } else {
            0
        };
        let base = u64::from_be_bytes(*self.borrowable.as_bytes());
        Ok(Arc::new(TestAccount::new(Address::from_u64(base + offset))))
    }

    async fn reference_block(&self) -> Result<BlockId, BoxError> {
        Ok(BlockId("block-1".to_string()))
    }

    async fn send(
        &self,
        request: TransactionRequest,
    ) -> Result<oneshot::Receiver<TransactionOutcome>, BoxError> {
        self.sent.lock().unwrap().push(request);

        let (tx, rx) = oneshot::channel();
        let outcome = match &self.failure {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        };
        let _ = tx.send(outcome);
        Ok(rx)
    }
}
