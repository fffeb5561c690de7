//! Append-only transaction ledger
//!
//! Owns the arena of submitted transactions. Identifiers are dense, assigned
//! sequentially from 0 and never reused; records are never deleted, so the
//! full proposal history stays auditable.

use crate::multisig::transaction::Transaction;
use crate::multisig::wallet::MultisigError;
use serde::{Deserialize, Serialize};

/// Growable arena of transactions addressed by integer id
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransactionLedger {
    transactions: Vec<Transaction>,
}

impl TransactionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
        }
    }

    /// Append a new transaction and return its assigned id
    pub(crate) fn submit(&mut self, destination: String, value: u64, data: Vec<u8>) -> u64 {
        let id = self.transactions.len() as u64;
        self.transactions
            .push(Transaction::new(id, destination, value, data));
        id
    }

    /// Whether a transaction with this id exists; never fails
    pub fn exists(&self, id: u64) -> bool {
        (id as usize) < self.transactions.len()
    }

    /// Look up a transaction
    pub fn get(&self, id: u64) -> Result<&Transaction, MultisigError> {
        self.transactions
            .get(id as usize)
            .ok_or(MultisigError::TransactionNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Result<&mut Transaction, MultisigError> {
        self.transactions
            .get_mut(id as usize)
            .ok_or(MultisigError::TransactionNotFound(id))
    }

    /// Number of distinct owner approvals for a transaction
    pub fn approval_count(&self, id: u64) -> Result<usize, MultisigError> {
        Ok(self.get(id)?.approval_count())
    }

    /// Total number of submitted transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether any transactions have been submitted
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Iterate over all transactions in submission order
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }
}
