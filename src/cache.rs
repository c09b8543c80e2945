//! Key/value contract for the auto-create-account handoff.
//!
//! The transcoder only *returns* these records; writing them to the cache
//! (and expiring them) belongs to the cache owner. One key per Ethereum
//! transaction hash.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::types::{address_from_hex, hex_bytes, Address20, H256};

pub const AUTO_CREATE_ACCOUNT_KEY_PREFIX: &str = "auto_create_account:";

/// Pending submission from a sender whose rollup account does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCreateEntry {
    /// Original raw RLP bytes as submitted.
    pub tx: Vec<u8>,
    /// Recovered sender address.
    pub from_address: Address20,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    tx: String,
    from_address: String,
}

impl AutoCreateEntry {
    pub fn cache_key(eth_tx_hash: &H256) -> String {
        format!("{AUTO_CREATE_ACCOUNT_KEY_PREFIX}{}", hex_bytes(eth_tx_hash))
    }

    pub fn cache_value(&self) -> String {
        let wire = WireEntry {
            tx: hex_bytes(&self.tx),
            from_address: hex_bytes(&self.from_address),
        };
        // only string fields, cannot fail
        serde_json::to_string(&wire).unwrap_or_default()
    }

    pub fn from_cache_value(s: &str) -> Result<Self, GatewayError> {
        let wire: WireEntry = serde_json::from_str(s)
            .map_err(|e| GatewayError::Decode(format!("auto-create entry: {e}")))?;
        let tx = hex::decode(wire.tx.trim_start_matches("0x"))
            .map_err(|e| GatewayError::Decode(format!("auto-create tx hex: {e}")))?;
        let from_address = address_from_hex(&wire.from_address)
            .map_err(|e| e.pad_context("auto-create fromAddress"))?;
        Ok(Self { tx, from_address })
    }
}
