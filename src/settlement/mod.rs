//! External settlement layer
//!
//! The wallet never moves funds itself: during execution it hands the
//! transfer to a [`Settlement`] collaborator and only observes whether the
//! transfer succeeded. [`AccountBook`] is an in-memory implementation used
//! by the CLI and tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors reported by the settlement layer
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// The single capability the wallet requires from its settlement layer.
///
/// Implementations receive the destination, the value and the opaque payload
/// of an executed transaction and either complete the transfer or report a
/// failure. The wallet depends on nothing else (no balance queries, no fee
/// accounting).
pub trait Settlement {
    /// Transfer `value` to `destination`, forwarding `data`
    fn transfer(&mut self, destination: &str, value: u64, data: &[u8]) -> Result<(), TransferError>;
}

/// In-memory account balances, debited from a single source address
///
/// The source is the wallet's own address; executed transactions spend from
/// it. Fund the book with [`AccountBook::deposit`] before executing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountBook {
    /// Address debited by transfers
    source: String,
    /// Balances by address
    balances: HashMap<String, u64>,
}

impl AccountBook {
    /// Create an empty book that debits `source` on transfer
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            balances: HashMap::new(),
        }
    }

    /// Credit an address
    pub fn deposit(&mut self, address: &str, amount: u64) {
        *self.balances.entry(address.to_string()).or_insert(0) += amount;
    }

    /// Balance of an address (zero if never credited)
    pub fn balance(&self, address: &str) -> u64 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// The address debited by transfers
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Settlement for AccountBook {
    fn transfer(&mut self, destination: &str, value: u64, data: &[u8]) -> Result<(), TransferError> {
        let have = self.balance(&self.source);
        if have < value {
            return Err(TransferError::InsufficientFunds { have, need: value });
        }

        let source = self.source.clone();
        *self.balances.entry(source.clone()).or_insert(0) -= value;
        *self.balances.entry(destination.to_string()).or_insert(0) += value;

        if !data.is_empty() {
            log::debug!("transfer payload: {}", hex::encode(data));
        }
        log::info!("Transferred {} from {} to {}", value, source, destination);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_balance() {
        let mut book = AccountBook::new("wallet");
        assert_eq!(book.balance("wallet"), 0);

        book.deposit("wallet", 500);
        book.deposit("wallet", 250);
        assert_eq!(book.balance("wallet"), 750);
        assert_eq!(book.balance("unknown"), 0);
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut book = AccountBook::new("wallet");
        book.deposit("wallet", 1_000);

        book.transfer("recipient", 400, &[]).unwrap();
        assert_eq!(book.balance("wallet"), 600);
        assert_eq!(book.balance("recipient"), 400);
    }

    #[test]
    fn test_transfer_insufficient_funds() {
        let mut book = AccountBook::new("wallet");
        book.deposit("wallet", 100);

        let result = book.transfer("recipient", 500, &[]);
        assert!(matches!(
            result,
            Err(TransferError::InsufficientFunds { have: 100, need: 500 })
        ));

        // Nothing moved
        assert_eq!(book.balance("wallet"), 100);
        assert_eq!(book.balance("recipient"), 0);
    }

    #[test]
    fn test_zero_value_transfer() {
        let mut book = AccountBook::new("wallet");
        book.transfer("recipient", 0, b"payload").unwrap();
        assert_eq!(book.balance("recipient"), 0);
    }
}
