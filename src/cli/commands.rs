//! CLI commands for the multisig wallet
//!
//! Implements all command handlers for the CLI interface. Every mutating
//! command persists the wallet state before returning.

use crate::multisig::{MultisigConfig, MultisigWallet};
use crate::settlement::AccountBook;
use crate::storage::{Storage, StorageConfig, WalletState};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub state: WalletState,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load the persisted wallet state
    pub fn load(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };
        let storage = Storage::new(storage_config)?;

        if !storage.exists() {
            return Err(format!(
                "No wallet found in {:?}. Run 'msig init' first.",
                data_dir
            )
            .into());
        }

        let state = storage.load()?;

        Ok(Self {
            state,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.state)?;
        Ok(())
    }
}

/// Initialize a new multisig wallet
pub fn cmd_init(
    data_dir: &Path,
    owners: Vec<String>,
    threshold: u8,
    label: Option<String>,
) -> CliResult<()> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    let storage = Storage::new(storage_config)?;

    if storage.exists() {
        println!("⚠️  A wallet already exists at {:?}", data_dir);
        println!("   Delete the data directory to start over.");
        return Ok(());
    }

    let config = MultisigConfig::new(threshold, owners, label)?;
    let wallet = MultisigWallet::new(config);
    let accounts = AccountBook::new(wallet.address());

    println!("✅ Multisig wallet created!");
    println!("   🔑 Address: {}", wallet.address());
    println!("   👥 Owners ({}):", wallet.owner_count());
    for owner in wallet.config().owners() {
        println!("      {}", owner);
    }
    println!("   🔒 Threshold: {}", wallet.description());
    println!("   📁 Data directory: {:?}", data_dir);

    storage.save(&WalletState { wallet, accounts })?;

    Ok(())
}

/// Show wallet status
pub fn cmd_status(state: &AppState) -> CliResult<()> {
    let wallet = &state.state.wallet;
    let accounts = &state.state.accounts;

    println!("🏦 Multisig wallet {}", wallet.address());
    if let Some(label) = wallet.config().label() {
        println!("   🏷️  Label: {}", label);
    }
    println!("   🔒 Threshold: {}", wallet.description());
    println!("   💰 Balance: {}", accounts.balance(wallet.address()));
    println!("   📜 Transactions: {}", wallet.transaction_count());

    let pending = wallet.transactions().filter(|t| !t.is_executed()).count();
    if pending > 0 {
        println!("   ⏳ Pending: {}", pending);
    }

    Ok(())
}

/// Credit an address in the settlement book (defaults to the wallet itself)
pub fn cmd_fund(state: &mut AppState, address: Option<&str>, amount: u64) -> CliResult<()> {
    let target = address
        .unwrap_or(state.state.wallet.address())
        .to_string();
    state.state.accounts.deposit(&target, amount);
    state.save()?;

    println!("💰 Deposited {} to {}", amount, target);
    println!("   New balance: {}", state.state.accounts.balance(&target));

    Ok(())
}

/// Show the balance of an address (defaults to the wallet itself)
pub fn cmd_balance(state: &AppState, address: Option<&str>) -> CliResult<()> {
    let target = address.unwrap_or(state.state.wallet.address());
    println!("💰 Balance of {}: {}", target, state.state.accounts.balance(target));
    Ok(())
}

/// Submit a new transaction proposal
pub fn cmd_submit(
    state: &mut AppState,
    from: &str,
    to: &str,
    value: u64,
    data_hex: Option<&str>,
) -> CliResult<()> {
    let data = match data_hex {
        Some(h) => hex::decode(h)?,
        None => Vec::new(),
    };

    let id = state.state.wallet.submit(from, to, value, data)?;
    state.save()?;

    println!("📝 Transaction {} submitted by {}", id, from);
    println!("   To: {}", to);
    println!("   Value: {}", value);
    println!(
        "   Approvals needed: {}",
        state.state.wallet.threshold()
    );

    Ok(())
}

/// Approve a pending transaction
pub fn cmd_approve(state: &mut AppState, from: &str, id: u64) -> CliResult<()> {
    state.state.wallet.approve(from, id)?;
    state.save()?;

    let count = state.state.wallet.approval_count(id)?;
    println!("👍 Transaction {} approved by {}", id, from);
    println!(
        "   Approvals: {}/{}",
        count,
        state.state.wallet.threshold()
    );

    Ok(())
}

/// Withdraw an approval
pub fn cmd_revoke(state: &mut AppState, from: &str, id: u64) -> CliResult<()> {
    state.state.wallet.revoke_approval(from, id)?;
    state.save()?;

    let count = state.state.wallet.approval_count(id)?;
    println!("↩️  Approval on transaction {} revoked by {}", id, from);
    println!(
        "   Approvals: {}/{}",
        count,
        state.state.wallet.threshold()
    );

    Ok(())
}

/// Execute a transaction once the threshold is met
pub fn cmd_execute(state: &mut AppState, from: &str, id: u64) -> CliResult<()> {
    let WalletState { wallet, accounts } = &mut state.state;
    wallet.execute(from, id, accounts)?;
    state.save()?;

    let tx = state.state.wallet.transaction(id)?;
    println!("✅ Transaction {} executed by {}", id, from);
    println!("   {} -> {}", tx.value, tx.destination);
    println!(
        "   Wallet balance: {}",
        state
            .state
            .accounts
            .balance(state.state.wallet.address())
    );

    Ok(())
}

/// List all transactions
pub fn cmd_tx_list(state: &AppState) -> CliResult<()> {
    let wallet = &state.state.wallet;

    if wallet.transaction_count() == 0 {
        println!("📜 No transactions submitted yet.");
        return Ok(());
    }

    println!("📜 Transactions ({}):", wallet.transaction_count());
    for tx in wallet.transactions() {
        let status = if tx.is_executed() { "executed" } else { "pending" };
        println!(
            "   #{} {} -> {} [{} | {}/{} approvals]",
            tx.id,
            tx.value,
            tx.destination,
            status,
            tx.approval_count(),
            wallet.threshold()
        );
    }

    Ok(())
}

/// Show details of one transaction
pub fn cmd_tx_info(state: &AppState, id: u64) -> CliResult<()> {
    let wallet = &state.state.wallet;
    let tx = wallet.transaction(id)?;

    println!("📄 Transaction {}", tx.id);
    println!("   To: {}", tx.destination);
    println!("   Value: {}", tx.value);
    if !tx.data.is_empty() {
        println!("   Data: {}", hex::encode(&tx.data));
    }
    println!(
        "   Status: {}",
        if tx.is_executed() { "executed" } else { "pending" }
    );
    println!(
        "   Approvals: {}/{}",
        tx.approval_count(),
        wallet.threshold()
    );
    let owners = wallet.config().owners();
    for approval in &tx.approvals {
        println!(
            "      {} at {}",
            owners[approval.owner_index], approval.approved_at
        );
    }
    println!("   Submitted: {}", tx.created_at);

    Ok(())
}
