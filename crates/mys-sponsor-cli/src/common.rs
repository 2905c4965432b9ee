//! Shared types and helpers for the CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use mys_sponsor::api::{FaucetClient, FullnodeClient};
use mys_sponsor::crypto::Ed25519Keypair;
use mys_sponsor::transaction::TransactionKind;
use mys_sponsor::{MysAddress, SponsorConfig};
use std::sync::Arc;

/// Global options available on every command.
#[derive(clap::Args, Debug)]
pub struct GlobalOpts {
    /// Network to connect to
    #[arg(long, global = true, default_value = "testnet")]
    pub network: NetworkArg,

    /// Custom fullnode URL (overrides the network's fullnode)
    #[arg(long, global = true)]
    pub node_url: Option<String>,

    /// Custom faucet URL (overrides the network's faucet)
    #[arg(long, global = true)]
    pub faucet_url: Option<String>,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

/// Supported network names.
#[derive(Debug, Clone, ValueEnum)]
pub enum NetworkArg {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

/// The clients a sponsorship run needs.
pub struct Clients {
    pub config: SponsorConfig,
    pub fullnode: Arc<FullnodeClient>,
    pub faucet: Arc<FaucetClient>,
}

impl GlobalOpts {
    /// Build a `SponsorConfig` from the global options.
    pub fn build_config(&self) -> Result<SponsorConfig> {
        let mut config = match self.network {
            NetworkArg::Mainnet => SponsorConfig::mainnet(),
            NetworkArg::Testnet => SponsorConfig::testnet(),
            NetworkArg::Devnet => SponsorConfig::devnet(),
            NetworkArg::Local => SponsorConfig::local(),
        };

        if let Some(url) = &self.node_url {
            config = config
                .with_fullnode_url(url)
                .context("invalid custom node URL")?;
        }
        if let Some(url) = &self.faucet_url {
            config = config
                .with_faucet_url(url)
                .context("invalid custom faucet URL")?;
        }

        Ok(config)
    }

    /// Build the fullnode and faucet clients from the global options.
    pub fn build_clients(&self) -> Result<Clients> {
        let config = self.build_config()?;
        let fullnode =
            FullnodeClient::new(&config).context("failed to create fullnode client")?;
        let faucet = FaucetClient::new(&config).with_context(|| {
            format!(
                "no faucet available for {}; pass --faucet-url",
                config.network()
            )
        })?;
        Ok(Clients {
            config,
            fullnode: Arc::new(fullnode),
            faucet: Arc::new(faucet),
        })
    }
}

/// Parse an address from a hex string.
pub fn parse_address(s: &str) -> Result<MysAddress> {
    MysAddress::from_hex(s).context("invalid address")
}

/// Parse a base64 transaction kind.
pub fn parse_kind(s: &str) -> Result<TransactionKind> {
    let kind = TransactionKind::from_base64(s).context("transaction kind is not valid base64")?;
    if kind.is_empty() {
        anyhow::bail!("transaction kind is empty");
    }
    Ok(kind)
}

/// Load an Ed25519 keypair from a private key hex string.
///
/// Error messages never include the key material.
pub fn load_keypair(private_key_hex: &str) -> Result<Ed25519Keypair> {
    Ed25519Keypair::from_hex(private_key_hex.trim())
        .map_err(|_| anyhow::anyhow!("invalid Ed25519 private key"))
}
