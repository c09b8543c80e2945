//! TOML configuration for the web3 gateway core.
//!
//! Config file is loaded from --config path (default: ./gateway.toml).
//! Values here form the immutable snapshot borrowed by the transcoder;
//! the core never reads configuration from process-wide state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GatewayError;
use crate::types::{h256_from_hex, H256};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub chain: ChainSection,
    #[serde(default)]
    pub rollup_rpc: RollupRpcSection,
    #[serde(default)]
    pub limits: LimitsSection,
    #[serde(default)]
    pub gateway: GatewaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSection {
    /// Chain id presented on the Ethereum-facing side (EIP-155).
    pub chain_id: u64,
    /// Rollup type hash, 0x-prefixed 32-byte hex.
    pub rollup_type_hash: String,
    /// Code hash of the ETH account lock, 0x-prefixed 32-byte hex.
    pub eth_account_lock_code_hash: String,
    /// Account id of the Polyjuice creator; receives creates and native transfers.
    pub polyjuice_creator_account_id: u32,
    /// Simple UDT id used for balances (CKB is 1).
    pub l2_sudt_id: u32,
}

impl Default for ChainSection {
    fn default() -> Self {
        Self {
            chain_id: 71402,
            rollup_type_hash: format!("0x{}", "00".repeat(32)),
            eth_account_lock_code_hash: format!("0x{}", "00".repeat(32)),
            polyjuice_creator_account_id: 4,
            l2_sudt_id: 1,
        }
    }
}

impl ChainSection {
    pub fn rollup_type_hash(&self) -> Result<H256, GatewayError> {
        h256_from_hex(&self.rollup_type_hash)
            .map_err(|e| e.pad_context("chain.rollup_type_hash"))
    }

    pub fn eth_account_lock_code_hash(&self) -> Result<H256, GatewayError> {
        h256_from_hex(&self.eth_account_lock_code_hash)
            .map_err(|e| e.pad_context("chain.eth_account_lock_code_hash"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupRpcSection {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for RollupRpcSection {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8119".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    /// Upper bound on the RLP-encoded transaction, bytes.
    pub max_transaction_size: usize,
    pub min_gas_price: u128,
    pub max_gas_price: u128,
    pub min_gas_limit: u64,
    pub max_gas_limit: u64,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_transaction_size: 50_000,
            min_gas_price: 0,
            max_gas_price: 1_000_000_000_000,
            min_gas_limit: 21_000,
            max_gas_limit: 50_000_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Sentinel from_id stamped on submissions whose sender account does not
    /// exist yet. Downstream keys on this value; keep it stable.
    pub auto_create_account_from_id: u32,
    /// transactionIndex marker emitted for pending transactions.
    pub pending_transaction_index: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            auto_create_account_from_id: 0,
            pending_transaction_index: "0xffffffff".into(),
        }
    }
}

impl GatewayConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let s = std::fs::read_to_string(path)?;
        let cfg: GatewayConfig = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// Parse the required hex fields once at startup so request paths never
    /// see a malformed snapshot.
    pub fn validate(&self) -> Result<(), GatewayError> {
        self.chain.rollup_type_hash()?;
        self.chain.eth_account_lock_code_hash()?;
        if self.limits.min_gas_limit > self.limits.max_gas_limit {
            return Err(GatewayError::Config("limits: min_gas_limit > max_gas_limit".into()));
        }
        if self.limits.min_gas_price > self.limits.max_gas_price {
            return Err(GatewayError::Config("limits: min_gas_price > max_gas_price".into()));
        }
        Ok(())
    }

    pub fn example_toml() -> &'static str {
        r#"# Godwoken web3 gateway configuration
# All values shown are defaults.

[chain]
chain_id = 71402
rollup_type_hash = "0x0000000000000000000000000000000000000000000000000000000000000000"
eth_account_lock_code_hash = "0x0000000000000000000000000000000000000000000000000000000000000000"
polyjuice_creator_account_id = 4
l2_sudt_id = 1   # CKB

[rollup_rpc]
url = "http://127.0.0.1:8119"
timeout_secs = 10

[limits]
max_transaction_size = 50000
min_gas_price = 0
max_gas_price = 1000000000000
min_gas_limit = 21000
max_gas_limit = 50000000

[gateway]
auto_create_account_from_id = 0
pending_transaction_index = "0xffffffff"
"#
    }

    pub fn write_example(path: &str) -> std::io::Result<()> {
        std::fs::write(path, Self::example_toml())
    }
}
