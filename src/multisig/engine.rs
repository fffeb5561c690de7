//! Execution of approved transactions
//!
//! Gates the one-time transfer behind the approval threshold. The executed
//! flag is set before the settlement layer is called and rolled back if the
//! transfer fails, so a re-entering destination can never trigger a second
//! transfer and a failed transfer leaves no trace.

use crate::multisig::transaction::Transaction;
use crate::multisig::wallet::MultisigError;
use crate::settlement::Settlement;

/// Perform the one-time transfer for a transaction
///
/// Fails with `AlreadyExecuted` on finalized transactions and with
/// `InsufficientApprovals` below the threshold. On transfer failure the
/// transaction is left exactly as before the attempt and can be retried.
pub(crate) fn execute(
    tx: &mut Transaction,
    threshold: u8,
    settlement: &mut dyn Settlement,
) -> Result<(), MultisigError> {
    if tx.is_executed() {
        return Err(MultisigError::AlreadyExecuted(tx.id));
    }

    let have = tx.approval_count();
    if have < threshold as usize {
        return Err(MultisigError::InsufficientApprovals {
            have,
            need: threshold,
        });
    }

    // Effects before the external call: a destination that re-enters sees
    // the transaction as executed and cannot trigger a second transfer.
    tx.mark_executed();

    match settlement.transfer(&tx.destination, tx.value, &tx.data) {
        Ok(()) => {
            log::info!(
                "Transaction {} executed: {} -> {}",
                tx.id,
                tx.value,
                tx.destination
            );
            Ok(())
        }
        Err(err) => {
            tx.rollback_execution();
            log::warn!("Transaction {} transfer failed, rolled back: {}", tx.id, err);
            Err(MultisigError::TransferFailed(err))
        }
    }
}
