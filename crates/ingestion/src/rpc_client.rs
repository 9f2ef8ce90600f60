//! Ethereum JSON-RPC client for contract discovery.

use crate::chain::{ChainReader, RpcBlock, RpcError, RpcReceipt, RpcResult};
use alloy::primitives::{Address, Bytes, B256, U256, U64};
use async_trait::async_trait;
use contract_scanner_telemetry::Metrics;
use reqwest::{Client, Proxy};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::time::Instant;
use tracing::{debug, info};

/// Ethereum RPC client wrapper.
pub struct RpcClient {
    client: Client,
    rpc_url: String,
    metrics: Metrics,
}

impl RpcClient {
    /// Create a new RPC client.
    ///
    /// # Arguments
    /// * `rpc_url` - HTTP/HTTPS JSON-RPC endpoint URL
    /// * `proxy` - Optional HTTP proxy URL all requests are routed through
    /// * `metrics` - Metrics collector
    pub fn new(rpc_url: &str, proxy: Option<&str>, metrics: Metrics) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(proxy_url) = proxy {
            builder = builder.proxy(Proxy::all(proxy_url)?);
            info!("Routing RPC traffic through proxy {}", proxy_url);
        }

        info!("Initialized RPC client for {}", rpc_url);

        Ok(Self {
            client: builder.build()?,
            rpc_url: rpc_url.to_string(),
            metrics,
        })
    }

    async fn call_rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        let start = Instant::now();
        let result = self.send(method, params).await;
        self.metrics
            .observe_rpc_latency(method, start.elapsed().as_secs_f64());

        match result {
            Ok(value) => serde_json::from_value(value).map_err(|e| {
                self.metrics.inc_rpc_errors();
                RpcError::from(e)
            }),
            Err(e) => {
                self.metrics.inc_rpc_errors();
                Err(e)
            }
        }
    }

    async fn send(&self, method: &str, params: Value) -> RpcResult<Value> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });
        debug!("RPC request {}", payload);

        let response = self.client.post(&self.rpc_url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(RpcError::Status(response.status()));
        }

        let mut body: Value = response.json().await?;

        if let Some(error) = body.get("error") {
            return Err(RpcError::Node(error.to_string()));
        }

        Ok(body.get_mut("result").map(Value::take).unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn latest_block_number(&self) -> RpcResult<u64> {
        let number: U64 = self.call_rpc("eth_blockNumber", json!([])).await?;
        debug!("Latest block number: {}", number);
        Ok(number.to::<u64>())
    }

    async fn block_with_transactions(&self, number: u64) -> RpcResult<Option<RpcBlock>> {
        let hex_block = format!("0x{:x}", number);
        let block: Option<RpcBlock> = self
            .call_rpc("eth_getBlockByNumber", json!([hex_block, true]))
            .await?;
        debug!("Fetched block {}", number);
        Ok(block)
    }

    async fn transaction_receipt(&self, hash: B256) -> RpcResult<Option<RpcReceipt>> {
        self.call_rpc("eth_getTransactionReceipt", json!([hash])).await
    }

    async fn code_at(&self, address: Address) -> RpcResult<Bytes> {
        self.call_rpc("eth_getCode", json!([address, "latest"])).await
    }

    async fn balance_of(&self, address: Address) -> RpcResult<U256> {
        self.call_rpc("eth_getBalance", json!([address, "latest"])).await
    }
}
