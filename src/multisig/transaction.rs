//! Wallet transaction records
//!
//! A transaction is a proposed external transfer awaiting quorum approval.
//! Records are append-only: they accumulate approvals until executed and are
//! never deleted.

use crate::multisig::wallet::MultisigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single owner's approval of a transaction
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Approval {
    /// Index of the owner in the wallet's owner set
    pub owner_index: usize,
    /// When the approval was given
    pub approved_at: DateTime<Utc>,
}

/// A proposed transfer awaiting quorum approval
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Sequential identifier assigned by the ledger, starting at 0
    pub id: u64,
    /// Recipient of the transfer
    pub destination: String,
    /// Amount to transfer
    pub value: u64,
    /// Opaque payload forwarded to the settlement layer on execution
    pub data: Vec<u8>,
    /// Approvals collected so far, ordered by owner index
    pub approvals: Vec<Approval>,
    /// Whether the transfer has been performed; terminal once set
    pub executed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// When the record last changed
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new pending transaction with no approvals
    pub(crate) fn new(id: u64, destination: String, value: u64, data: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            id,
            destination,
            value,
            data,
            approvals: Vec::new(),
            executed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the owner at `owner_index` has approved
    pub fn is_approved_by(&self, owner_index: usize) -> bool {
        self.approvals.iter().any(|a| a.owner_index == owner_index)
    }

    /// Number of distinct owner approvals collected
    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    /// Owner indices that have approved, in ascending order
    pub fn approvers(&self) -> Vec<usize> {
        self.approvals.iter().map(|a| a.owner_index).collect()
    }

    /// Whether the transfer has been performed
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Record an approval from the owner at `owner_index`
    ///
    /// Each owner approves at most once, and finalized transactions accept
    /// no further approvals.
    pub(crate) fn add_approval(&mut self, owner_index: usize) -> Result<(), MultisigError> {
        if self.executed {
            return Err(MultisigError::AlreadyExecuted(self.id));
        }
        if self.is_approved_by(owner_index) {
            return Err(MultisigError::AlreadyApproved(self.id));
        }

        // Keep the set ordered by owner index
        let pos = self
            .approvals
            .iter()
            .position(|a| a.owner_index > owner_index)
            .unwrap_or(self.approvals.len());
        self.approvals.insert(
            pos,
            Approval {
                owner_index,
                approved_at: Utc::now(),
            },
        );
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Withdraw a previously given approval
    ///
    /// Rejected once executed, so the recorded approval count can never be
    /// manipulated after finalization.
    pub(crate) fn remove_approval(&mut self, owner_index: usize) -> Result<(), MultisigError> {
        if self.executed {
            return Err(MultisigError::AlreadyExecuted(self.id));
        }

        let pos = self
            .approvals
            .iter()
            .position(|a| a.owner_index == owner_index)
            .ok_or(MultisigError::NotApproved(self.id))?;
        self.approvals.remove(pos);
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Mark the transfer as performed
    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
        self.updated_at = Utc::now();
    }

    /// Undo [`Transaction::mark_executed`] when the transfer itself failed
    pub(crate) fn rollback_execution(&mut self) {
        self.executed = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_is_pending() {
        let tx = Transaction::new(0, "recipient".to_string(), 100, vec![]);

        assert_eq!(tx.id, 0);
        assert_eq!(tx.approval_count(), 0);
        assert!(!tx.is_executed());
    }

    #[test]
    fn test_approvals_ordered_by_owner_index() {
        let mut tx = Transaction::new(0, "recipient".to_string(), 100, vec![]);

        tx.add_approval(2).unwrap();
        tx.add_approval(0).unwrap();
        tx.add_approval(1).unwrap();

        assert_eq!(tx.approvers(), vec![0, 1, 2]);
        assert_eq!(tx.approval_count(), 3);
    }

    #[test]
    fn test_duplicate_approval_rejected() {
        let mut tx = Transaction::new(3, "recipient".to_string(), 100, vec![]);

        tx.add_approval(1).unwrap();
        let result = tx.add_approval(1);
        assert!(matches!(result, Err(MultisigError::AlreadyApproved(3))));
        assert_eq!(tx.approval_count(), 1);
    }

    #[test]
    fn test_approval_after_execution_rejected() {
        let mut tx = Transaction::new(7, "recipient".to_string(), 100, vec![]);
        tx.add_approval(0).unwrap();
        tx.mark_executed();

        let result = tx.add_approval(1);
        assert!(matches!(result, Err(MultisigError::AlreadyExecuted(7))));
    }

    #[test]
    fn test_revoke_approval() {
        let mut tx = Transaction::new(0, "recipient".to_string(), 100, vec![]);
        tx.add_approval(0).unwrap();
        tx.add_approval(1).unwrap();

        tx.remove_approval(0).unwrap();
        assert_eq!(tx.approvers(), vec![1]);

        // Nothing left to withdraw for owner 0
        let result = tx.remove_approval(0);
        assert!(matches!(result, Err(MultisigError::NotApproved(0))));
    }

    #[test]
    fn test_revoke_after_execution_rejected() {
        let mut tx = Transaction::new(0, "recipient".to_string(), 100, vec![]);
        tx.add_approval(0).unwrap();
        tx.mark_executed();

        let result = tx.remove_approval(0);
        assert!(matches!(result, Err(MultisigError::AlreadyExecuted(0))));
        assert_eq!(tx.approval_count(), 1);
    }
}
