//! Multi-signature wallet state machine
//!
//! Provides M-of-N threshold wallets where M approvals from N authorized
//! owners are required before a proposed transfer executes.
//!
//! # Example
//!
//! ```ignore
//! use multisig_wallet::multisig::{MultisigConfig, MultisigWallet};
//!
//! // Create a 2-of-3 wallet
//! let config = MultisigConfig::new(2, vec![alice, bob, carol], None)?;
//! let mut wallet = MultisigWallet::new(config);
//!
//! // Propose a transfer
//! let id = wallet.submit("bob", "dave", 1_000, vec![])?;
//!
//! // Collect approvals
//! wallet.approve("alice", id)?;
//! wallet.approve("carol", id)?;
//!
//! // Quorum reached: any owner can execute
//! wallet.execute("bob", id, &mut settlement)?;
//! ```

mod engine;
pub mod ledger;
pub mod transaction;
pub mod wallet;

pub use ledger::TransactionLedger;
pub use transaction::{Approval, Transaction};
pub use wallet::{MultisigConfig, MultisigError, MultisigWallet};
