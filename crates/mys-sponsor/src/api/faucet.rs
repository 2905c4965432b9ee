//! Faucet client for funding addresses on test networks.

use crate::api::ledger::FundingService;
use crate::config::SponsorConfig;
use crate::error::{SponsorError, SponsorResult};
use crate::types::MysAddress;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

#[derive(Debug, Serialize)]
enum FaucetRequest {
    FixedAmountRequest { recipient: String },
}

/// Response from the faucet's `/v1/gas` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FaucetResponse {
    #[serde(default)]
    pub(crate) task: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// Client for the Mys faucet service.
///
/// The faucet only exists on devnet, testnet and local networks. Each request
/// hands out real coins, so [`request_funds`](FundingService::request_funds)
/// issues exactly one HTTP call and never retries.
///
/// # Example
///
/// ```rust,no_run
/// use mys_sponsor::api::{FaucetClient, FundingService};
/// use mys_sponsor::{MysAddress, SponsorConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let faucet = FaucetClient::new(&SponsorConfig::testnet())?;
///     faucet.request_funds(MysAddress::from_hex("0x123")?).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FaucetClient {
    faucet_url: Url,
    client: Client,
}

impl FaucetClient {
    /// Creates a new faucet client.
    ///
    /// # Errors
    ///
    /// Returns an error if the faucet URL is not configured, or if the HTTP
    /// client fails to build.
    pub fn new(config: &SponsorConfig) -> SponsorResult<Self> {
        let faucet_url = config
            .faucet_url()
            .cloned()
            .ok_or_else(|| SponsorError::Config("faucet URL not configured".into()))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(SponsorError::Http)?;

        Ok(Self { faucet_url, client })
    }

    /// Creates a faucet client with a custom URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn with_url(url: &str) -> SponsorResult<Self> {
        Ok(Self {
            faucet_url: Url::parse(url)?,
            client: Client::new(),
        })
    }

    fn build_url(&self, path: &str) -> SponsorResult<Url> {
        let base = self.faucet_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(SponsorError::Url)
    }
}

#[async_trait]
impl FundingService for FaucetClient {
    async fn request_funds(&self, recipient: MysAddress) -> SponsorResult<()> {
        let url = self.build_url("v1/gas")?;
        let request = FaucetRequest::FixedAmountRequest {
            recipient: recipient.to_hex(),
        };

        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SponsorError::api(status.as_u16(), body));
        }

        let body: FaucetResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(SponsorError::api(status.as_u16(), error));
        }

        debug!(recipient = %recipient, task = ?body.task, "Faucet request accepted");
        Ok(())
    }
}
