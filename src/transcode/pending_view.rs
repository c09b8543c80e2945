use serde::{Deserialize, Serialize};

use crate::types::{hex_bytes, hex_u128, hex_u64, Address20, EthereumTx, H256};

/// Ethereum-shaped JSON record returned while a transaction is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthTransactionView {
    pub hash: String,
    pub block_hash: String,
    pub block_number: String,
    pub transaction_index: String,
    pub from: String,
    pub to: Option<String>,
    pub gas: String,
    pub gas_price: String,
    pub input: String,
    pub nonce: String,
    pub value: String,
    pub v: String,
    pub r: String,
    pub s: String,
}

/// Derive the synthetic pending block hash from the current tip.
///
/// Flips the low bit of the hash's last byte. Deterministic and obviously
/// not a real block hash; external consumers key on this exact bit pattern.
pub fn bump_pending_block_hash(tip: &H256) -> H256 {
    let mut out = *tip;
    out[31] ^= 0x01;
    out
}

pub fn pending_view(
    tx: &EthereumTx,
    eth_tx_hash: &H256,
    tip_block_hash: &H256,
    tip_block_number: u64,
    from: &Address20,
    pending_transaction_index: &str,
) -> EthTransactionView {
    EthTransactionView {
        hash: hex_bytes(eth_tx_hash),
        block_hash: hex_bytes(&bump_pending_block_hash(tip_block_hash)),
        block_number: hex_u64(tip_block_number + 1),
        transaction_index: pending_transaction_index.to_string(),
        from: hex_bytes(from),
        to: tx.to.as_ref().map(|a| hex_bytes(a)),
        gas: hex_u64(tx.gas_limit),
        gas_price: hex_u128(tx.gas_price),
        input: hex_bytes(&tx.data),
        nonce: hex_u64(tx.nonce),
        value: hex_u128(tx.value),
        // matches the packed signature's recovery byte
        v: if tx.v % 2 == 0 { "0x1".into() } else { "0x0".into() },
        r: hex_bytes(&tx.r),
        s: hex_bytes(&tx.s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> EthereumTx {
        EthereumTx {
            nonce: 0,
            gas_price: 1_000_000_000,
            gas_limit: 21_000,
            to: Some([0x42; 20]),
            value: 0,
            data: vec![],
            v: 0x25, // odd
            r: [0x01; 32],
            s: [0x02; 32],
        }
    }

    #[test]
    fn bump_flips_only_the_low_bit_of_the_last_byte() {
        let tip = [0xaa; 32];
        let bumped = bump_pending_block_hash(&tip);
        assert_eq!(&bumped[..31], &tip[..31]);
        assert_eq!(bumped[31], 0xab);
        // involutive: bumping twice restores the tip
        assert_eq!(bump_pending_block_hash(&bumped), tip);
    }

    #[test]
    fn pending_fields() {
        let tx = sample_tx();
        let view = pending_view(&tx, &[0x11; 32], &[0xaa; 32], 41, &[0x33; 20], "0xffffffff");
        assert_eq!(view.block_number, "0x2a");
        assert_eq!(view.transaction_index, "0xffffffff");
        assert_eq!(view.hash, format!("0x{}", "11".repeat(32)));
        assert_eq!(view.block_hash, format!("0x{}ab", "aa".repeat(31)));
        assert_eq!(view.from, format!("0x{}", "33".repeat(20)));
        assert_eq!(view.gas, "0x5208");
        assert_eq!(view.gas_price, "0x3b9aca00");
        assert_eq!(view.value, "0x0");
        assert_eq!(view.nonce, "0x0");
        assert_eq!(view.input, "0x");
        assert_eq!(view.v, "0x0"); // odd source v
        assert_eq!(view.r, format!("0x{}", "01".repeat(32)));
    }

    #[test]
    fn v_parity_rendering() {
        let mut tx = sample_tx();
        tx.v = 0x26; // even
        let view = pending_view(&tx, &[0; 32], &[0; 32], 0, &[0; 20], "0xffffffff");
        assert_eq!(view.v, "0x1");
    }

    #[test]
    fn create_has_null_to_and_camel_case_keys() {
        let mut tx = sample_tx();
        tx.to = None;
        let view = pending_view(&tx, &[0; 32], &[0; 32], 0, &[0; 20], "0xffffffff");
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("blockHash").is_some());
        assert!(json.get("transactionIndex").is_some());
        assert!(json["to"].is_null());
    }
}
