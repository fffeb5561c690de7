//! Multisig Wallet: an M-of-N multi-signature wallet state machine in Rust
//!
//! This crate provides a threshold wallet featuring:
//! - Fixed owner set and approval threshold, validated at construction
//! - Append-only transaction ledger with dense sequential ids
//! - One-time execution gated behind the approval threshold
//! - Effects-before-transfer ordering with atomic rollback on failure
//! - Pluggable settlement layer for the actual fund movement
//! - JSON persistence and a CLI for driving the wallet
//!
//! # Example
//!
//! ```rust
//! use multisig_wallet::{AccountBook, MultisigConfig, MultisigWallet};
//!
//! // Create a 2-of-3 wallet
//! let owners = vec!["alice".to_string(), "bob".to_string(), "carol".to_string()];
//! let config = MultisigConfig::new(2, owners, None).unwrap();
//! let mut wallet = MultisigWallet::new(config);
//!
//! // Fund the wallet's settlement account
//! let mut book = AccountBook::new(wallet.address());
//! book.deposit(wallet.address(), 1_000);
//!
//! // bob proposes a transfer, alice and carol approve, bob executes
//! let id = wallet.submit("bob", "dave", 250, Vec::new()).unwrap();
//! wallet.approve("alice", id).unwrap();
//! wallet.approve("carol", id).unwrap();
//! wallet.execute("bob", id, &mut book).unwrap();
//!
//! assert_eq!(book.balance("dave"), 250);
//! ```

pub mod cli;
pub mod crypto;
pub mod multisig;
pub mod settlement;
pub mod storage;

// Re-export commonly used types
pub use multisig::{
    Approval, MultisigConfig, MultisigError, MultisigWallet, Transaction, TransactionLedger,
};
pub use settlement::{AccountBook, Settlement, TransferError};
pub use storage::{Storage, StorageConfig, StorageError, WalletState};
