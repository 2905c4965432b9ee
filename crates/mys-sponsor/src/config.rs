//! Network configuration.
//!
//! [`SponsorConfig`] bundles the endpoints of one Mys network with the knobs
//! the sponsorship pipeline needs: request timeout, gas coin poll budget,
//! default gas budget and the coin type used for gas.

use crate::retry::PollConfig;
use crate::transaction::DEFAULT_GAS_BUDGET;
use crate::types::MYS_COIN_TYPE;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Known Mys networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Mys mainnet
    Mainnet,
    /// Mys testnet
    Testnet,
    /// Mys devnet
    Devnet,
    /// Local development network
    Local,
    /// Custom network
    Custom,
}

impl Network {
    /// Returns the network name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
            Network::Custom => "custom",
        }
    }

    /// Returns true if the network runs a public faucet.
    pub fn has_faucet(&self) -> bool {
        matches!(self, Network::Testnet | Network::Devnet | Network::Local)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" | "localnet" => Ok(Network::Local),
            "custom" => Ok(Network::Custom),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

/// Configuration for the sponsorship pipeline.
///
/// Start from a preset and adjust with the `with_*` methods.
///
/// # Example
///
/// ```rust
/// use mys_sponsor::SponsorConfig;
/// use mys_sponsor::retry::PollConfig;
/// use std::time::Duration;
///
/// let config = SponsorConfig::testnet()
///     .with_timeout(Duration::from_secs(10))
///     .with_poll_config(PollConfig::builder().max_attempts(20).build())
///     .with_gas_budget(10_000_000);
/// assert_eq!(config.gas_budget(), 10_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct SponsorConfig {
    pub(crate) network: Network,
    pub(crate) fullnode_url: Url,
    pub(crate) faucet_url: Option<Url>,
    pub(crate) timeout: Duration,
    pub(crate) poll_config: PollConfig,
    pub(crate) gas_budget: u64,
    pub(crate) coin_type: String,
}

impl Default for SponsorConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

fn preset_url(url: &'static str) -> Url {
    Url::parse(url).expect("preset URLs are valid")
}

impl SponsorConfig {
    fn preset(network: Network, fullnode: &'static str, faucet: Option<&'static str>) -> Self {
        Self {
            network,
            fullnode_url: preset_url(fullnode),
            faucet_url: faucet.map(preset_url),
            timeout: Duration::from_secs(30),
            poll_config: PollConfig::sponsor_default(),
            gas_budget: DEFAULT_GAS_BUDGET,
            coin_type: MYS_COIN_TYPE.to_string(),
        }
    }

    /// Creates a configuration for Mys mainnet. Mainnet has no faucet.
    pub fn mainnet() -> Self {
        Self::preset(Network::Mainnet, "https://fullnode.mainnet.mys.io:443", None)
    }

    /// Creates a configuration for Mys testnet.
    pub fn testnet() -> Self {
        Self::preset(
            Network::Testnet,
            "https://fullnode.testnet.mys.io:443",
            Some("https://faucet.testnet.mys.io"),
        )
    }

    /// Creates a configuration for Mys devnet.
    pub fn devnet() -> Self {
        Self::preset(
            Network::Devnet,
            "https://fullnode.devnet.mys.io:443",
            Some("https://faucet.devnet.mys.io"),
        )
    }

    /// Creates a configuration for a local network (fullnode on 9000,
    /// faucet on 5003).
    pub fn local() -> Self {
        Self::preset(
            Network::Local,
            "http://127.0.0.1:9000",
            Some("http://127.0.0.1:5003"),
        )
        .with_timeout(Duration::from_secs(10))
    }

    /// Creates a custom configuration with the specified fullnode URL and no
    /// faucet.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mys_sponsor::SponsorConfig;
    ///
    /// let config = SponsorConfig::custom("https://rpc.example.com").unwrap();
    /// assert!(config.faucet_url().is_none());
    /// ```
    pub fn custom(fullnode_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            network: Network::Custom,
            fullnode_url: Url::parse(fullnode_url)?,
            faucet_url: None,
            timeout: Duration::from_secs(30),
            poll_config: PollConfig::sponsor_default(),
            gas_budget: DEFAULT_GAS_BUDGET,
            coin_type: MYS_COIN_TYPE.to_string(),
        })
    }

    /// Returns the preset for a known network, or `None` for
    /// [`Network::Custom`].
    pub fn for_network(network: Network) -> Option<Self> {
        match network {
            Network::Mainnet => Some(Self::mainnet()),
            Network::Testnet => Some(Self::testnet()),
            Network::Devnet => Some(Self::devnet()),
            Network::Local => Some(Self::local()),
            Network::Custom => None,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom fullnode URL, keeping the rest of the preset.
    pub fn with_fullnode_url(mut self, url: &str) -> Result<Self, url::ParseError> {
        self.fullnode_url = Url::parse(url)?;
        Ok(self)
    }

    /// Sets a custom faucet URL.
    pub fn with_faucet_url(mut self, url: &str) -> Result<Self, url::ParseError> {
        self.faucet_url = Some(Url::parse(url)?);
        Ok(self)
    }

    /// Sets the budget for waiting on gas coins.
    pub fn with_poll_config(mut self, poll_config: PollConfig) -> Self {
        self.poll_config = poll_config;
        self
    }

    /// Sets the gas budget used when a transaction does not set one.
    pub fn with_gas_budget(mut self, gas_budget: u64) -> Self {
        self.gas_budget = gas_budget;
        self
    }

    /// Sets the coin type used for gas payment.
    pub fn with_coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.coin_type = coin_type.into();
        self
    }

    /// Returns the network this config is for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the fullnode URL.
    pub fn fullnode_url(&self) -> &Url {
        &self.fullnode_url
    }

    /// Returns the faucet URL, if configured.
    pub fn faucet_url(&self) -> Option<&Url> {
        self.faucet_url.as_ref()
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the gas coin poll budget.
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll_config
    }

    /// Returns the default gas budget.
    pub fn gas_budget(&self) -> u64 {
        self.gas_budget
    }

    /// Returns the gas coin type.
    pub fn coin_type(&self) -> &str {
        &self.coin_type
    }
}
