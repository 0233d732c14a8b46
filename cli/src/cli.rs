use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "safe-clone")]
#[command(about = "Recover a Safe and redeploy it at the same address on other chains", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the chain and transaction that created a Safe
    Locate(LocateArgs),

    /// Show per-chain deployment status for a Safe
    Status(StatusArgs),

    /// Redeploy a Safe at the same address on another chain
    Deploy(DeployArgs),

    /// Compute the address of a Safe from its parameters
    Predict(PredictArgs),

    /// List live ERC-20 allowances reconstructed from Approval history
    Allowances(AllowancesArgs),
}

#[derive(Parser, Clone)]
pub struct ChainsArgs {
    /// JSON file listing chains in scan order: [{"chain_id", "rpc_url", "indexer_url"}]
    #[arg(long = "chains", env = "SAFE_CLONE_CHAINS", value_name = "FILE")]
    pub path: PathBuf,

    /// Blocks per window in the fallback log scan
    #[arg(long, default_value_t = safe_clone::ScanConfig::DEFAULT_LOG_WINDOW)]
    pub log_window: u64,
}

#[derive(Parser, Clone)]
pub struct LocateArgs {
    /// Safe address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    #[command(flatten)]
    pub chains: ChainsArgs,
}

#[derive(Parser, Clone)]
pub struct StatusArgs {
    /// Safe address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    #[command(flatten)]
    pub chains: ChainsArgs,
}

#[derive(Parser, Clone)]
pub struct DeployArgs {
    /// Safe address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Destination chain ID
    #[arg(long)]
    pub chain: u64,

    #[command(flatten)]
    pub chains: ChainsArgs,

    /// Receiver of the deployment fee (factory deployments only)
    #[arg(long, env = "SAFE_CLONE_FEE_RECEIVER")]
    pub fee_receiver: Option<String>,

    /// Deployment fee in wei
    #[arg(long, env = "SAFE_CLONE_FEE_WEI", default_value = "0")]
    pub fee_wei: String,

    /// Chains where no fee is charged (repeatable)
    #[arg(long = "fee-exempt", value_name = "CHAIN_ID")]
    pub fee_exempt: Vec<u64>,

    /// Confirmations to wait for
    #[arg(long, default_value_t = 1)]
    pub confirmations: u64,

    /// Skip confirmation prompt
    #[arg(long)]
    pub no_confirm: bool,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Parser, Clone)]
pub struct PredictArgs {
    /// RPC endpoint used to read the factory's proxy creation code
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,

    /// Owner address in order (repeatable)
    #[arg(long = "owner", value_name = "ADDR", required = true)]
    pub owners: Vec<String>,

    /// Signature threshold
    #[arg(long, default_value_t = 1)]
    pub threshold: u64,

    /// Salt nonce for CREATE2
    #[arg(long, default_value = "0")]
    pub salt_nonce: String,

    /// Implementation variant: 1.3.0, 1.3.0+L2 or 1.4.1+L2
    #[arg(long, default_value = "1.4.1+L2")]
    pub variant: String,

    /// Payment receiver written into the initializer
    #[arg(long)]
    pub payment_receiver: Option<String>,
}

#[derive(Parser, Clone)]
pub struct AllowancesArgs {
    /// Owner whose approvals are listed
    #[arg(long)]
    pub owner: String,

    /// Token address (repeatable)
    #[arg(long = "token", value_name = "ADDR", required = true)]
    pub tokens: Vec<String>,

    /// Chain ID to read from
    #[arg(long)]
    pub chain: u64,

    #[command(flatten)]
    pub chains: ChainsArgs,

    /// First block to scan
    #[arg(long, default_value_t = 0)]
    pub from_block: u64,

    /// Blocks per log page
    #[arg(long, default_value_t = 100_000)]
    pub page_size: u64,

    /// Include allowances that are now zero
    #[arg(long)]
    pub all: bool,

    /// Keep following new blocks until interrupted
    #[arg(long)]
    pub follow: bool,

    /// Poll interval in seconds when following
    #[arg(long, default_value_t = 12)]
    pub interval: u64,
}

#[derive(Parser, Clone)]
pub struct WalletArgs {
    /// Raw private key
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Path to keystore file
    #[arg(long)]
    pub keystore: Option<PathBuf>,

    /// Keystore password (prompted if omitted)
    #[arg(long, env = "KEYSTORE_PASSWORD")]
    pub password: Option<String>,

    /// Prompt for private key interactively
    #[arg(short, long)]
    pub interactive: bool,
}
