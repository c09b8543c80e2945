use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

pub mod l2_tx;

/// 20-byte Ethereum address.
pub type Address20 = [u8; 20];

/// 32-byte hash.
pub type H256 = [u8; 32];

/// A signed Ethereum transaction decoded from its nine-field RLP form.
///
/// `r` and `s` are left-padded to 32 bytes at decode time; an integer field
/// decoded from empty RLP bytes is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumTx {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Option<Address20>, // None = contract creation
    pub value: u128,
    pub data: Vec<u8>,
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl EthereumTx {
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }

    /// Pre-EIP-155 transactions carry a bare recovery v of 27 or 28.
    pub fn is_pre_eip155(&self) -> bool {
        self.v == 27 || self.v == 28
    }

    /// Chain id folded into v per EIP-155, if any.
    pub fn eip155_chain_id(&self) -> Option<u64> {
        if self.is_pre_eip155() || self.v < 35 {
            return None;
        }
        if self.v % 2 == 1 {
            Some((self.v - 35) / 2)
        } else {
            Some((self.v - 36) / 2)
        }
    }
}

/// Minimal `0x`-prefixed hex quantity. Zero renders as "0x0".
pub fn hex_u64(x: u64) -> String {
    format!("0x{x:x}")
}

pub fn hex_u128(x: u128) -> String {
    format!("0x{x:x}")
}

/// `0x`-prefixed lowercase hex of a byte string. Empty input renders as "0x".
pub fn hex_bytes(b: &[u8]) -> String {
    format!("0x{}", hex::encode(b))
}

/// Parse a `0x`-prefixed hex quantity (as JSON-RPC renders balances) into
/// a U256. Odd-length digits are accepted.
pub fn u256_from_hex(s: &str) -> Result<ethereum_types::U256, GatewayError> {
    let digits = s.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(ethereum_types::U256::zero());
    }
    let padded = if digits.len() % 2 == 1 { format!("0{digits}") } else { digits.to_string() };
    let raw = hex::decode(&padded).map_err(|e| GatewayError::Decode(format!("bad hex quantity: {e}")))?;
    if raw.len() > 32 {
        return Err(GatewayError::Decode(format!("quantity wider than 256 bits: {s}")));
    }
    Ok(ethereum_types::U256::from_big_endian(&raw))
}

pub fn h256_from_hex(s: &str) -> Result<H256, GatewayError> {
    let raw = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| GatewayError::Config(format!("bad hex: {e}")))?;
    if raw.len() != 32 {
        return Err(GatewayError::Config(format!("expected 32 bytes, got {}", raw.len())));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&raw);
    Ok(out)
}

pub fn address_from_hex(s: &str) -> Result<Address20, GatewayError> {
    let raw = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| GatewayError::Config(format!("bad hex: {e}")))?;
    if raw.len() != 20 {
        return Err(GatewayError::Config(format!("expected 20 bytes, got {}", raw.len())));
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&raw);
    Ok(out)
}
