use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Solana cluster the RPC endpoint belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Cluster {
    Mainnet,
    Devnet,
    Testnet,
}

impl Cluster {
    /// CAIP-2 blockchain id advertised in the `X-Blockchain-Ids` header.
    pub fn blockchain_id(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
            Cluster::Devnet => "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1",
            Cluster::Testnet => "solana:4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = "Solana Actions server returning unsigned transactions"
)]
pub struct Config {
    /// RPC endpoint
    #[arg(
        short,
        long,
        env = "RPC_URL",
        default_value = "https://api.devnet.solana.com"
    )]
    pub rpc_endpoint: String,

    /// Cluster served by the RPC endpoint
    #[arg(short, long, value_enum, default_value_t = Cluster::Devnet)]
    pub cluster: Cluster,

    /// Number of retries for a failed RPC call
    #[arg(short, long, default_value_t = 3)]
    pub num_retries: usize,

    /// Timeout in seconds for a single RPC call
    #[arg(short = 't', long, default_value_t = 30)]
    pub rpc_timeout_secs: u64,

    /// Listen port REST API
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub listen_port: u16,
}

impl Config {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}
