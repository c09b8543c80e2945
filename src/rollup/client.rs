//! JSON-RPC 2.0 client for the rollup node.
//!
//! Intentionally thin: one POST per call, no retries, no pooling logic
//! beyond what reqwest provides. Errors come back as `UpstreamError`;
//! retry policy belongs to the caller.

use async_trait::async_trait;
use ethereum_types::U256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::RollupRpcSection;
use crate::error::GatewayError;
use crate::rollup::RollupClient;
use crate::types::{h256_from_hex, hex_bytes, hex_u64, u256_from_hex, Address20, H256};

pub struct HttpRollupClient {
    base_url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
struct RpcResponse<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl HttpRollupClient {
    pub fn new(cfg: &RollupRpcSection) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Upstream(format!("client build: {e}")))?;
        Ok(Self {
            base_url: cfg.url.trim_end_matches('/').to_string(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, GatewayError> {
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        tracing::debug!(method, "rollup rpc call");
        let resp = self
            .client
            .post(&self.base_url)
            .json(&req)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("{method}: {e}")))?;
        let body: RpcResponse<T> = resp
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("{method}: bad response: {e}")))?;
        if let Some(err) = body.error {
            return Err(GatewayError::Upstream(format!(
                "{method}: rpc error {}: {}",
                err.code, err.message
            )));
        }
        Ok(body.result)
    }
}

#[async_trait]
impl RollupClient for HttpRollupClient {
    async fn get_account_id_by_script_hash(
        &self,
        script_hash: H256,
    ) -> Result<Option<u32>, GatewayError> {
        let result: Option<String> = self
            .call(
                "gw_get_account_id_by_script_hash",
                serde_json::json!([hex_bytes(&script_hash)]),
            )
            .await?;
        match result {
            None => Ok(None),
            Some(h) => {
                let id = u256_from_hex(&h).map_err(|e| e.pad_context("account id"))?;
                if id > U256::from(u32::MAX) {
                    return Err(GatewayError::Upstream(format!("account id out of range: {h}")));
                }
                Ok(Some(id.as_u32()))
            }
        }
    }

    async fn get_script_hash(&self, account_id: u32) -> Result<H256, GatewayError> {
        let result: Option<String> = self
            .call("gw_get_script_hash", serde_json::json!([hex_u64(account_id as u64)]))
            .await?;
        let h = result.ok_or_else(|| {
            GatewayError::Upstream(format!("gw_get_script_hash: empty result for {account_id}"))
        })?;
        h256_from_hex(&h).map_err(|_| GatewayError::Upstream(format!("bad script hash: {h}")))
    }

    async fn get_balance(&self, address: Address20, sudt_id: u32) -> Result<U256, GatewayError> {
        let result: Option<String> = self
            .call(
                "gw_get_balance",
                serde_json::json!([hex_bytes(&address), hex_u64(sudt_id as u64)]),
            )
            .await?;
        match result {
            None => Ok(U256::zero()),
            Some(h) => u256_from_hex(&h).map_err(|e| e.pad_context("gw_get_balance")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_and_response_shapes() {
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: 3,
            method: "gw_get_balance",
            params: serde_json::json!(["0xabcd", "0x1"]),
        };
        let s = serde_json::to_string(&req).unwrap();
        assert!(s.contains(r#""jsonrpc":"2.0""#));
        assert!(s.contains(r#""method":"gw_get_balance""#));

        let ok: RpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":3,"result":"0x64"}"#).unwrap();
        assert_eq!(ok.result.as_deref(), Some("0x64"));
        assert!(ok.error.is_none());

        let null: RpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":3,"result":null}"#).unwrap();
        assert!(null.result.is_none());

        let err: RpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32601,"message":"nope"}}"#)
                .unwrap();
        let body = err.error.unwrap();
        assert_eq!(body.code, -32601);
        assert_eq!(body.message, "nope");
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = HttpRollupClient::new(&RollupRpcSection::default()).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8119");
    }
}
