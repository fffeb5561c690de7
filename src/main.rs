//! Multisig Wallet CLI Application
//!
//! A command-line interface for driving an M-of-N multi-signature wallet.

use clap::{Parser, Subcommand};
use multisig_wallet::cli::{self, AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "msig")]
#[command(version = "0.1.0")]
#[command(about = "An M-of-N multi-signature wallet", long_about = None)]
struct Cli {
    /// Data directory for wallet state
    #[arg(short, long, default_value = ".msig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new multisig wallet
    Init {
        /// Owner identities (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        owners: Vec<String>,

        /// Number of approvals required to execute
        #[arg(short, long)]
        threshold: u8,

        /// Optional label for the wallet
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Show wallet status
    Status,

    /// Credit an address in the settlement book
    Fund {
        /// Amount to deposit
        #[arg(short, long)]
        amount: u64,

        /// Address to credit (defaults to the wallet itself)
        #[arg(long)]
        address: Option<String>,
    },

    /// Show the balance of an address
    Balance {
        /// Address to query (defaults to the wallet itself)
        #[arg(long)]
        address: Option<String>,
    },

    /// Submit a transaction proposal
    Submit {
        /// Owner submitting the proposal
        #[arg(short, long)]
        from: String,

        /// Recipient of the transfer
        #[arg(short, long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        value: u64,

        /// Optional payload (hex-encoded)
        #[arg(long)]
        data: Option<String>,
    },

    /// Approve a pending transaction
    Approve {
        /// Owner giving the approval
        #[arg(short, long)]
        from: String,

        /// Transaction id
        #[arg(short, long)]
        id: u64,
    },

    /// Withdraw a previously given approval
    Revoke {
        /// Owner withdrawing the approval
        #[arg(short, long)]
        from: String,

        /// Transaction id
        #[arg(short, long)]
        id: u64,
    },

    /// Execute a transaction once the threshold is met
    Execute {
        /// Owner triggering the execution
        #[arg(short, long)]
        from: String,

        /// Transaction id
        #[arg(short, long)]
        id: u64,
    },

    /// Transaction queries
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    /// List all transactions
    List,

    /// Show details of one transaction
    Info {
        /// Transaction id
        #[arg(short, long)]
        id: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (doesn't need existing state)
    if let Commands::Init {
        owners,
        threshold,
        label,
    } = &cli.command
    {
        return cli::cmd_init(&cli.data_dir, owners.clone(), *threshold, label.clone());
    }

    let mut state = AppState::load(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Status => {
            cli::cmd_status(&state)?;
        }

        Commands::Fund { amount, address } => {
            cli::cmd_fund(&mut state, address.as_deref(), amount)?;
        }

        Commands::Balance { address } => {
            cli::cmd_balance(&state, address.as_deref())?;
        }

        Commands::Submit {
            from,
            to,
            value,
            data,
        } => {
            cli::cmd_submit(&mut state, &from, &to, value, data.as_deref())?;
        }

        Commands::Approve { from, id } => {
            cli::cmd_approve(&mut state, &from, id)?;
        }

        Commands::Revoke { from, id } => {
            cli::cmd_revoke(&mut state, &from, id)?;
        }

        Commands::Execute { from, id } => {
            cli::cmd_execute(&mut state, &from, id)?;
        }

        Commands::Tx { action } => match action {
            TxCommands::List => {
                cli::cmd_tx_list(&state)?;
            }
            TxCommands::Info { id } => {
                cli::cmd_tx_info(&state, id)?;
            }
        },
    }

    Ok(())
}
