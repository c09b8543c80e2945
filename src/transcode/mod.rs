//! The eth_sendRawTransaction pipeline: decode, validate, resolve accounts,
//! and assemble the layer-2 submission.
//!
//! Pure computation punctuated by rollup RPC lookups. Cheap local checks run
//! before any RPC traffic; an error return means no side effect happened
//! anywhere (the auto-create record is only ever a return value).

use ethereum_types::U256;

use crate::cache::AutoCreateEntry;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::rollup::{AccountResolver, RollupClient};
use crate::types::l2_tx::{L2Transaction, RawL2Transaction};
use crate::types::{hex_bytes, Address20, H256};

pub mod pending_view;
pub mod polyjuice;
pub mod rlp_codec;
pub mod sig;
pub mod validate;

/// Everything the gateway needs after accepting a raw transaction: the
/// submission itself, identifiers for caching and the pending view, and the
/// auto-create record when the sender has no account yet.
#[derive(Debug, Clone)]
pub struct TranscodeOutcome {
    pub l2_transaction: L2Transaction,
    pub eth_tx_hash: H256,
    pub from_address: Address20,
    pub auto_create: Option<AutoCreateEntry>,
}

pub async fn transcode_raw_tx(
    raw: &[u8],
    cfg: &GatewayConfig,
    rollup: &dyn RollupClient,
) -> Result<TranscodeOutcome, GatewayError> {
    let tx = rlp_codec::decode_signed_tx(raw)?;

    let encoded = rlp_codec::encode_signed_tx(&tx);
    validate::check_size(encoded.len(), cfg.limits.max_transaction_size)?;
    validate::check_gas_limit(tx.gas_limit, &cfg.limits)?;
    validate::check_gas_price(tx.gas_price, &cfg.limits)?;

    let from_address = sig::recover_sender(&tx)?;
    let eth_tx_hash = rlp_codec::eth_tx_hash(&encoded);

    let resolver = AccountResolver::new(rollup, &cfg.chain)?;
    let sudt_id = cfg.chain.l2_sudt_id;

    // Sender resolution. A missing account is fine as long as the balance
    // already covers the transaction: the rollup materializes the account on
    // first inclusion, and we hand the raw bytes back for the cache.
    let mut balance: Option<U256> = None;
    let (from_id, auto_create) = match resolver.account_id_of(&from_address).await? {
        Some(id) => (id, None),
        None => {
            let got = rollup.get_balance(from_address, sudt_id).await?;
            validate::check_enough_balance(got, &tx, from_address)?;
            balance = Some(got);
            tracing::debug!(
                from = %hex_bytes(&from_address),
                tx_hash = %hex_bytes(&eth_tx_hash),
                "sender account missing, tagging auto-create"
            );
            (
                cfg.gateway.auto_create_account_from_id,
                Some(AutoCreateEntry { tx: raw.to_vec(), from_address }),
            )
        }
    };

    validate::check_intrinsic_gas(&tx)?;
    let got = match balance {
        Some(b) => b,
        None => rollup.get_balance(from_address, sudt_id).await?,
    };
    validate::check_enough_balance(got, &tx, from_address)?;

    // Recipient classification: creates and native transfers are executed by
    // the Polyjuice creator account; only calls into an existing contract
    // address the contract's own account id.
    let (to_id, native_transfer_to) = match &tx.to {
        None => (cfg.chain.polyjuice_creator_account_id, None),
        Some(to) => {
            let resolved = resolver.account_id_of(to).await?;
            let native = match resolved {
                None => true,
                Some(id) => resolver.is_eoa(to, id).await?,
            };
            if native {
                (cfg.chain.polyjuice_creator_account_id, Some(*to))
            } else {
                let id = resolved.ok_or(GatewayError::RecipientNotFound { address: *to })?;
                (id, None)
            }
        }
    };

    let args = polyjuice::encode_args(
        tx.is_create(),
        tx.gas_limit,
        tx.gas_price,
        tx.value,
        &tx.data,
        native_transfer_to.as_ref(),
    );

    // Pre-EIP-155 signatures carry no chain id; the rollup expects 0 there.
    let chain_id = if tx.is_pre_eip155() { 0 } else { cfg.chain.chain_id };

    let nonce = u32::try_from(tx.nonce)
        .map_err(|_| GatewayError::Decode(format!("nonce {} exceeds u32", tx.nonce)))?;

    let l2_transaction = L2Transaction {
        raw: RawL2Transaction { chain_id, from_id, to_id, nonce, args },
        signature: sig::packed_signature(&tx),
    };

    Ok(TranscodeOutcome { l2_transaction, eth_tx_hash, from_address, auto_create })
}
