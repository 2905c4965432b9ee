//! Fullnode JSON-RPC client.

use crate::api::ledger::LedgerClient;
use crate::api::response::{deserialize_u64, CoinSummary, Page, TransactionBlockResponse};
use crate::config::SponsorConfig;
use crate::error::{SponsorError, SponsorResult};
use crate::transaction::ExecuteOptions;
use crate::types::MysAddress;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use url::Url;

const JSON_CONTENT_TYPE: &str = "application/json";

const METHOD_GET_COINS: &str = "mysx_getCoins";
const METHOD_GET_REFERENCE_GAS_PRICE: &str = "mysx_getReferenceGasPrice";
const METHOD_EXECUTE_TRANSACTION_BLOCK: &str = "mys_executeTransactionBlock";

/// Request type asking the node to wait until effects are applied locally,
/// so reads issued right after execution observe the transaction.
const WAIT_FOR_LOCAL_EXECUTION: &str = "WaitForLocalExecution";

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct GasPrice(#[serde(deserialize_with = "deserialize_u64")] u64);

/// Client for a fullnode's JSON-RPC endpoint.
///
/// The client is cheap to clone and holds no per-call state; share one
/// instance (usually as `Arc<dyn LedgerClient>`) across all components.
///
/// # Example
///
/// ```rust,no_run
/// use mys_sponsor::api::{FullnodeClient, LedgerClient};
/// use mys_sponsor::{MysAddress, SponsorConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = FullnodeClient::new(&SponsorConfig::testnet())?;
///     let price = client.reference_gas_price().await?;
///     println!("Reference gas price: {price}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FullnodeClient {
    url: Url,
    client: Client,
    request_id: Arc<AtomicU64>,
}

impl FullnodeClient {
    /// Creates a new fullnode client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &SponsorConfig) -> SponsorResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(SponsorError::Http)?;
        Ok(Self {
            url: config.fullnode_url().clone(),
            client,
            request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Creates a fullnode client for a custom URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn with_url(url: &str) -> SponsorResult<Self> {
        Ok(Self {
            url: Url::parse(url)?,
            client: Client::new(),
            request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Issues one JSON-RPC call and decodes its result.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> SponsorResult<T> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "Sending JSON-RPC request");

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SponsorError::api(status.as_u16(), body));
        }

        let envelope: JsonRpcResponse<T> = response.json().await?;
        match (envelope.result, envelope.error) {
            (_, Some(error)) => Err(SponsorError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(SponsorError::Rpc {
                code: -32603,
                message: format!("{method}: response carried neither result nor error"),
            }),
        }
    }
}

#[async_trait]
impl LedgerClient for FullnodeClient {
    async fn query_owned_coins(
        &self,
        owner: MysAddress,
        coin_type: Option<&str>,
        limit: usize,
    ) -> SponsorResult<Page<CoinSummary>> {
        self.call(
            METHOD_GET_COINS,
            json!([owner.to_hex(), coin_type, Value::Null, limit]),
        )
        .await
    }

    async fn reference_gas_price(&self) -> SponsorResult<u64> {
        let price: GasPrice = self.call(METHOD_GET_REFERENCE_GAS_PRICE, json!([])).await?;
        Ok(price.0)
    }

    async fn execute_transaction(
        &self,
        tx_bytes: &[u8],
        signatures: &[String],
        options: ExecuteOptions,
    ) -> SponsorResult<TransactionBlockResponse> {
        self.call(
            METHOD_EXECUTE_TRANSACTION_BLOCK,
            json!([
                BASE64.encode(tx_bytes),
                signatures,
                {
                    "showEffects": options.show_effects,
                    "showObjectChanges": options.show_object_changes,
                },
                WAIT_FOR_LOCAL_EXECUTION,
            ]),
        )
        .await
    }
}
