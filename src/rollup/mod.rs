use async_trait::async_trait;
use ethereum_types::U256;

use crate::error::GatewayError;
use crate::types::{Address20, H256};

pub mod account;
pub mod client;

pub use account::AccountResolver;
pub use client::HttpRollupClient;

/// Method shapes consumed from the rollup node. Transport failures surface
/// as `UpstreamError` and are never retried at this layer; timeouts are the
/// caller's responsibility.
#[async_trait]
pub trait RollupClient: Send + Sync {
    /// Registered account id for a layer-2 script hash, if any.
    async fn get_account_id_by_script_hash(
        &self,
        script_hash: H256,
    ) -> Result<Option<u32>, GatewayError>;

    /// On-chain script hash of an existing account.
    async fn get_script_hash(&self, account_id: u32) -> Result<H256, GatewayError>;

    /// sUDT balance held under an Ethereum address.
    async fn get_balance(&self, address: Address20, sudt_id: u32) -> Result<U256, GatewayError>;
}
