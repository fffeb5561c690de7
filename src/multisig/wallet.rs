//! Multi-signature wallet
//!
//! An M-of-N wallet: owners submit proposed transfers, a quorum of owners
//! approves them, and any owner triggers execution once the threshold is
//! met. The owner set and threshold are fixed at construction.

use crate::crypto::{double_sha256, sha256};
use crate::multisig::engine;
use crate::multisig::ledger::TransactionLedger;
use crate::multisig::transaction::Transaction;
use crate::settlement::{Settlement, TransferError};
use chrono::{DateTime, Utc};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use thiserror::Error;

/// Errors related to multisig operations
#[derive(Error, Debug)]
pub enum MultisigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Not an owner: {0}")]
    Unauthorized(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(u64),
    #[error("Transaction {0} already approved by this owner")]
    AlreadyApproved(u64),
    #[error("Transaction {0} already executed")]
    AlreadyExecuted(u64),
    #[error("Insufficient approvals: have {have}, need {need}")]
    InsufficientApprovals { have: usize, need: u8 },
    #[error("Transaction {0} has no approval from this owner")]
    NotApproved(u64),
    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}

/// Configuration for a multisig wallet: the owner set and the threshold
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MultisigConfig {
    /// Minimum approvals required (M in M-of-N)
    threshold: u8,
    /// Identities of all authorized owners
    owners: Vec<String>,
    /// Optional human-readable label
    label: Option<String>,
}

impl MultisigConfig {
    /// Create a new multisig configuration
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the owner set is empty or contains
    /// duplicates, or if the threshold is outside `1..=owners.len()`.
    pub fn new(
        threshold: u8,
        owners: Vec<String>,
        label: Option<String>,
    ) -> Result<Self, MultisigError> {
        if owners.is_empty() {
            return Err(MultisigError::InvalidConfiguration(
                "owner set is empty".to_string(),
            ));
        }

        if owners.iter().any(|o| o.is_empty()) {
            return Err(MultisigError::InvalidConfiguration(
                "owner identity is empty".to_string(),
            ));
        }

        let mut sorted_owners = owners.clone();
        sorted_owners.sort();
        for i in 1..sorted_owners.len() {
            if sorted_owners[i] == sorted_owners[i - 1] {
                return Err(MultisigError::InvalidConfiguration(format!(
                    "duplicate owner: {}",
                    sorted_owners[i]
                )));
            }
        }

        if threshold == 0 {
            return Err(MultisigError::InvalidConfiguration(
                "threshold must be at least 1".to_string(),
            ));
        }

        if threshold as usize > owners.len() {
            return Err(MultisigError::InvalidConfiguration(format!(
                "threshold {} exceeds owner count {}",
                threshold,
                owners.len()
            )));
        }

        Ok(Self {
            threshold,
            owners,
            label,
        })
    }

    /// Get the threshold (M)
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Get the total owner count (N)
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// All owner identities, in construction order
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// Optional label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Check if an identity is an authorized owner
    pub fn is_owner(&self, identity: &str) -> bool {
        self.owners.iter().any(|o| o == identity)
    }

    /// Position of an identity in the owner set
    pub fn owner_index(&self, identity: &str) -> Option<usize> {
        self.owners.iter().position(|o| o == identity)
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.owners.len())
    }
}

/// A multi-signature wallet
///
/// All mutating operations take `&mut self`, so the borrow checker already
/// serializes them per instance. Hosts sharing a wallet across threads wrap
/// it in a `Mutex`; no operation blocks or suspends.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigWallet {
    /// Deterministic joint address (P2SH-style, starts with '3')
    address: String,
    config: MultisigConfig,
    ledger: TransactionLedger,
    created_at: DateTime<Utc>,
}

impl MultisigWallet {
    /// Create a new wallet from a validated configuration
    pub fn new(config: MultisigConfig) -> Self {
        let address = Self::generate_address(&config);

        Self {
            address,
            config,
            ledger: TransactionLedger::new(),
            created_at: Utc::now(),
        }
    }

    /// Derive the wallet's joint address from its configuration
    ///
    /// Address = Base58Check(version || RIPEMD160(SHA256(threshold || sorted owners)))
    fn generate_address(config: &MultisigConfig) -> String {
        // Sort owners for a deterministic address
        let mut sorted_owners = config.owners.clone();
        sorted_owners.sort();

        let mut preimage = vec![config.threshold];
        for owner in &sorted_owners {
            preimage.extend_from_slice(owner.as_bytes());
            preimage.push(0);
        }

        let sha256_hash = sha256(&preimage);
        let mut ripemd = Ripemd160::new();
        ripemd.update(&sha256_hash);
        let ripemd_hash = ripemd.finalize();

        // P2SH version byte (0x05 -> addresses starting with '3')
        let mut address_bytes = vec![0x05];
        address_bytes.extend_from_slice(&ripemd_hash);

        let checksum = double_sha256(&address_bytes);
        address_bytes.extend_from_slice(&checksum[..4]);

        bs58::encode(address_bytes).into_string()
    }

    /// Get the wallet address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get the configuration
    pub fn config(&self) -> &MultisigConfig {
        &self.config
    }

    /// When the wallet was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check if an identity is an authorized owner
    pub fn is_owner(&self, identity: &str) -> bool {
        self.config.is_owner(identity)
    }

    /// Get the required threshold
    pub fn threshold(&self) -> u8 {
        self.config.threshold
    }

    /// Get the total number of owners
    pub fn owner_count(&self) -> usize {
        self.config.owner_count()
    }

    /// Get human-readable description
    pub fn description(&self) -> String {
        self.config.description()
    }

    fn require_owner(&self, caller: &str) -> Result<usize, MultisigError> {
        self.config
            .owner_index(caller)
            .ok_or_else(|| MultisigError::Unauthorized(caller.to_string()))
    }

    /// Submit a new transaction proposal and return its id
    ///
    /// Only owners may submit. The new transaction starts with no approvals;
    /// the submitter approves separately like everyone else.
    pub fn submit(
        &mut self,
        caller: &str,
        destination: &str,
        value: u64,
        data: Vec<u8>,
    ) -> Result<u64, MultisigError> {
        self.require_owner(caller)?;

        let id = self.ledger.submit(destination.to_string(), value, data);
        log::info!(
            "Transaction {} submitted by {}: {} -> {}",
            id,
            caller,
            value,
            destination
        );

        Ok(id)
    }

    /// Approve a pending transaction
    pub fn approve(&mut self, caller: &str, id: u64) -> Result<(), MultisigError> {
        let owner_index = self.require_owner(caller)?;

        let tx = self.ledger.get_mut(id)?;
        tx.add_approval(owner_index)?;
        log::info!(
            "Transaction {} approved by {} ({}/{})",
            id,
            caller,
            tx.approval_count(),
            self.config.threshold
        );

        Ok(())
    }

    /// Withdraw an approval previously given by the caller
    pub fn revoke_approval(&mut self, caller: &str, id: u64) -> Result<(), MultisigError> {
        let owner_index = self.require_owner(caller)?;

        let tx = self.ledger.get_mut(id)?;
        tx.remove_approval(owner_index)?;
        log::info!("Transaction {} approval revoked by {}", id, caller);

        Ok(())
    }

    /// Execute a transaction once the approval threshold is met
    ///
    /// Any owner may trigger execution. The transfer is handed to the
    /// settlement layer; if it fails, the wallet is left exactly as before
    /// the attempt.
    pub fn execute(
        &mut self,
        caller: &str,
        id: u64,
        settlement: &mut dyn Settlement,
    ) -> Result<(), MultisigError> {
        self.require_owner(caller)?;

        let threshold = self.config.threshold;
        let tx = self.ledger.get_mut(id)?;
        engine::execute(tx, threshold, settlement)
    }

    /// Whether a transaction with this id exists; never fails
    pub fn transaction_exists(&self, id: u64) -> bool {
        self.ledger.exists(id)
    }

    /// Number of distinct owner approvals for a transaction
    pub fn approval_count(&self, id: u64) -> Result<usize, MultisigError> {
        self.ledger.approval_count(id)
    }

    /// Read-only view of a transaction
    pub fn transaction(&self, id: u64) -> Result<&Transaction, MultisigError> {
        self.ledger.get(id)
    }

    /// Total number of submitted transactions
    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }

    /// Iterate over all transactions in submission order
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.ledger.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::AccountBook;

    fn sample_owners() -> Vec<String> {
        vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ]
    }

    fn funded_wallet() -> (MultisigWallet, AccountBook) {
        let config = MultisigConfig::new(2, sample_owners(), None).unwrap();
        let wallet = MultisigWallet::new(config);
        let mut book = AccountBook::new(wallet.address());
        book.deposit(wallet.address(), 1_000_000);
        (wallet, book)
    }

    #[test]
    fn test_config_creation() {
        let config = MultisigConfig::new(2, sample_owners(), Some("Treasury".to_string())).unwrap();

        assert_eq!(config.threshold(), 2);
        assert_eq!(config.owner_count(), 3);
        assert_eq!(config.description(), "2-of-3");
        assert_eq!(config.label(), Some("Treasury"));
    }

    #[test]
    fn test_config_validation() {
        // Empty owner set
        assert!(MultisigConfig::new(1, vec![], None).is_err());

        // Zero threshold
        assert!(MultisigConfig::new(0, sample_owners(), None).is_err());

        // Threshold > owners
        assert!(MultisigConfig::new(4, sample_owners(), None).is_err());

        // Duplicate owners
        assert!(
            MultisigConfig::new(2, vec!["same".to_string(), "same".to_string()], None).is_err()
        );

        // 1-of-1 is valid
        let config = MultisigConfig::new(1, vec!["solo".to_string()], None).unwrap();
        assert_eq!(config.description(), "1-of-1");
    }

    #[test]
    fn test_address_determinism() {
        let config1 = MultisigConfig::new(2, sample_owners(), None).unwrap();
        let config2 = MultisigConfig::new(2, sample_owners(), None).unwrap();

        let wallet1 = MultisigWallet::new(config1);
        let wallet2 = MultisigWallet::new(config2);

        assert!(wallet1.address().starts_with('3'));
        assert_eq!(wallet1.address(), wallet2.address());

        // Different threshold, different address
        let config3 = MultisigConfig::new(3, sample_owners(), None).unwrap();
        let wallet3 = MultisigWallet::new(config3);
        assert_ne!(wallet1.address(), wallet3.address());
    }

    #[test]
    fn test_is_owner() {
        let config = MultisigConfig::new(2, sample_owners(), None).unwrap();
        let wallet = MultisigWallet::new(config);

        assert!(wallet.is_owner("alice"));
        assert!(wallet.is_owner("carol"));
        assert!(!wallet.is_owner("mallory"));
    }

    #[test]
    fn test_submit_assigns_sequential_ids() {
        let (mut wallet, _) = funded_wallet();

        let id0 = wallet.submit("bob", "dave", 100, vec![]).unwrap();
        let id1 = wallet.submit("alice", "erin", 200, vec![]).unwrap();

        assert_eq!(id0, 0);
        assert_eq!(id1, 1);
        assert!(wallet.transaction_exists(0));
        assert!(wallet.transaction_exists(1));
        assert!(!wallet.transaction_exists(2));
        assert_eq!(wallet.approval_count(0).unwrap(), 0);
    }

    #[test]
    fn test_non_owner_rejected_everywhere() {
        let (mut wallet, mut book) = funded_wallet();
        let id = wallet.submit("bob", "dave", 100, vec![]).unwrap();

        assert!(matches!(
            wallet.submit("mallory", "dave", 100, vec![]),
            Err(MultisigError::Unauthorized(_))
        ));
        assert!(matches!(
            wallet.approve("mallory", id),
            Err(MultisigError::Unauthorized(_))
        ));
        assert!(matches!(
            wallet.revoke_approval("mallory", id),
            Err(MultisigError::Unauthorized(_))
        ));
        assert!(matches!(
            wallet.execute("mallory", id, &mut book),
            Err(MultisigError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_double_approval_rejected() {
        let (mut wallet, _) = funded_wallet();
        let id = wallet.submit("bob", "dave", 100, vec![]).unwrap();

        wallet.approve("alice", id).unwrap();
        let result = wallet.approve("alice", id);

        assert!(matches!(result, Err(MultisigError::AlreadyApproved(0))));
        assert_eq!(wallet.approval_count(id).unwrap(), 1);
    }

    #[test]
    fn test_approve_unknown_id() {
        let (mut wallet, _) = funded_wallet();

        assert!(matches!(
            wallet.approve("alice", 9),
            Err(MultisigError::TransactionNotFound(9))
        ));
    }

    #[test]
    fn test_execute_below_threshold() {
        let (mut wallet, mut book) = funded_wallet();

        let id = wallet.submit("bob", "dave", 100, vec![]).unwrap();
        wallet.approve("alice", id).unwrap();
        assert_eq!(wallet.approval_count(id).unwrap(), 1);

        let result = wallet.execute("bob", id, &mut book);
        assert!(matches!(
            result,
            Err(MultisigError::InsufficientApprovals { have: 1, need: 2 })
        ));
        assert_eq!(book.balance("dave"), 0);
    }

    #[test]
    fn test_quorum_and_execution() {
        let (mut wallet, mut book) = funded_wallet();

        // bob proposes a transfer to dave
        let id = wallet.submit("bob", "dave", 1_000, vec![]).unwrap();
        assert!(wallet.transaction_exists(id));

        // alice and carol approve
        wallet.approve("alice", id).unwrap();
        wallet.approve("carol", id).unwrap();
        assert_eq!(wallet.approval_count(id).unwrap(), 2);

        // bob executes
        wallet.execute("bob", id, &mut book).unwrap();
        assert!(wallet.transaction(id).unwrap().is_executed());
        assert_eq!(book.balance("dave"), 1_000);
        assert_eq!(book.balance(wallet.address()), 999_000);

        // Second execution is refused and no funds move again
        let result = wallet.execute("bob", id, &mut book);
        assert!(matches!(result, Err(MultisigError::AlreadyExecuted(0))));
        assert_eq!(book.balance("dave"), 1_000);
    }

    #[test]
    fn test_approve_after_execution_rejected() {
        let (mut wallet, mut book) = funded_wallet();

        let id = wallet.submit("bob", "dave", 100, vec![]).unwrap();
        wallet.approve("alice", id).unwrap();
        wallet.approve("carol", id).unwrap();
        wallet.execute("bob", id, &mut book).unwrap();

        let result = wallet.approve("bob", id);
        assert!(matches!(result, Err(MultisigError::AlreadyExecuted(0))));
        assert_eq!(wallet.approval_count(id).unwrap(), 2);
    }

    #[test]
    fn test_revoke_then_execute_fails() {
        let (mut wallet, mut book) = funded_wallet();

        let id = wallet.submit("bob", "dave", 100, vec![]).unwrap();
        wallet.approve("alice", id).unwrap();
        wallet.approve("carol", id).unwrap();

        wallet.revoke_approval("carol", id).unwrap();
        assert_eq!(wallet.approval_count(id).unwrap(), 1);

        let result = wallet.execute("bob", id, &mut book);
        assert!(matches!(
            result,
            Err(MultisigError::InsufficientApprovals { have: 1, need: 2 })
        ));
    }

    #[test]
    fn test_failed_transfer_leaves_state_unchanged() {
        let config = MultisigConfig::new(2, sample_owners(), None).unwrap();
        let mut wallet = MultisigWallet::new(config);
        // Book with no funds
        let mut book = AccountBook::new(wallet.address());

        let id = wallet.submit("bob", "dave", 500, vec![]).unwrap();
        wallet.approve("alice", id).unwrap();
        wallet.approve("carol", id).unwrap();

        let result = wallet.execute("bob", id, &mut book);
        assert!(matches!(result, Err(MultisigError::TransferFailed(_))));
        assert!(!wallet.transaction(id).unwrap().is_executed());
        assert_eq!(book.balance("dave"), 0);

        // Fund and retry
        book.deposit(wallet.address(), 500);
        wallet.execute("alice", id, &mut book).unwrap();
        assert!(wallet.transaction(id).unwrap().is_executed());
        assert_eq!(book.balance("dave"), 500);
    }

    #[test]
    fn test_payload_forwarded_to_settlement() {
        let (mut wallet, mut book) = funded_wallet();

        let id = wallet
            .submit("bob", "dave", 10, b"invoice-42".to_vec())
            .unwrap();
        wallet.approve("alice", id).unwrap();
        wallet.approve("carol", id).unwrap();
        wallet.execute("carol", id, &mut book).unwrap();

        assert_eq!(wallet.transaction(id).unwrap().data, b"invoice-42");
        assert_eq!(book.balance("dave"), 10);
    }
}
