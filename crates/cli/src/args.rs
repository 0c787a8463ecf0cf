use std::path::PathBuf;

use alloy::primitives::{Address, TxHash};
use clap::{Parser, Subcommand, ValueEnum};

pub(crate) const DEFAULT_RPC_PROVIDER: &str = "http://localhost:8545";

#[derive(Parser, Debug)]
#[command(name = "stablecoin-cli", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// RPC endpoint to connect to
    #[arg(long, global = true, default_value_t = DEFAULT_RPC_PROVIDER.to_string())]
    pub rpc: String,

    /// RPC throttling (req/sec) [default: none]
    #[arg(long, global = true)]
    pub rpc_throttle: Option<u32>,

    /// SDK configuration file with contract deployments
    #[arg(long, global = true, env = "STABLECOIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Key to sign transactions with [default: node-managed `--from` account]
    #[arg(long, global = true, env = "STABLECOIN_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Account to act as [default: address of `--private-key`]
    #[arg(long, global = true)]
    pub from: Option<Address>,

    /// Confirm transactions through contract events as well, for wallets
    /// that never report submission
    #[arg(long, global = true, default_value_t = false)]
    pub legacy_wallet: bool,

    /// Token decimals used to parse amounts
    #[arg(long, global = true, default_value_t = 18)]
    pub decimals: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show contract deployments known for the connected chain
    Contracts,
    /// Show proxy wallet of an account
    Proxy {
        /// Account to look up [default: `--from`]
        account: Option<Address>,
    },
    /// Show receipt and logs of a transaction
    Tx { hash: TxHash },
    /// Approve the account's proxy wallet to spend a token, building the
    /// proxy wallet first if needed
    Approve { token: Address },
    /// Build a proxy wallet for the account
    CreateProxy,
    /// Deposit into an ERC-4626 vault
    Deposit {
        vault: Address,
        /// Amount of underlying asset, e.g. `12.5`
        amount: String,
    },
    /// Lock staking tokens
    CreateLock {
        /// Amount of staking token, e.g. `100`
        amount: String,
        /// Lock period in days
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Swap through the stable swap module
    Swap {
        #[arg(value_enum)]
        direction: SwapDirection,
        amount: String,
        /// Label of the swapped token shown with transaction events
        #[arg(long, default_value = "USDT")]
        token_name: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    /// Token to stablecoin
    ToStablecoin,
    /// Stablecoin to token
    ToToken,
}
