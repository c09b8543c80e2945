use rlp::{Rlp, RlpStream};

use crate::error::GatewayError;
use crate::transcode::sig::keccak256;
use crate::types::{EthereumTx, H256};

/// Transaction hash as Ethereum clients compute it: keccak over the
/// canonical RLP encoding.
pub fn eth_tx_hash(rlp_encoded: &[u8]) -> H256 {
    keccak256(rlp_encoded)
}

/// Decode the nine-field signed transaction list.
///
/// The outer value must be a list of exactly nine byte-strings. `r` and `s`
/// are left-padded to 32 bytes; empty integer fields decode to zero.
pub fn decode_signed_tx(raw: &[u8]) -> Result<EthereumTx, GatewayError> {
    let rlp = Rlp::new(raw);
    if !rlp.is_list() {
        return Err(GatewayError::Decode("not an rlp list".into()));
    }
    let items = rlp
        .item_count()
        .map_err(|e| GatewayError::Decode(format!("item count: {e}")))?;
    if items != 9 {
        return Err(GatewayError::Decode(format!("expected 9 fields, got {items}")));
    }

    let nonce: u64 = rlp.val_at(0).map_err(|e| GatewayError::Decode(format!("nonce: {e}")))?;
    let gas_price: u128 = rlp.val_at(1).map_err(|e| GatewayError::Decode(format!("gas_price: {e}")))?;
    let gas_limit: u64 = rlp.val_at(2).map_err(|e| GatewayError::Decode(format!("gas_limit: {e}")))?;
    let to_bytes: Vec<u8> = rlp.val_at(3).map_err(|e| GatewayError::Decode(format!("to: {e}")))?;
    let to = match to_bytes.len() {
        0 => None,
        20 => {
            let mut a = [0u8; 20];
            a.copy_from_slice(&to_bytes);
            Some(a)
        }
        n => return Err(GatewayError::Decode(format!("to: expected 0 or 20 bytes, got {n}"))),
    };
    let value: u128 = rlp.val_at(4).map_err(|e| GatewayError::Decode(format!("value: {e}")))?;
    let data: Vec<u8> = rlp.val_at(5).map_err(|e| GatewayError::Decode(format!("data: {e}")))?;
    let v: u64 = rlp.val_at(6).map_err(|e| GatewayError::Decode(format!("v: {e}")))?;
    let r_vec: Vec<u8> = rlp.val_at(7).map_err(|e| GatewayError::Decode(format!("r: {e}")))?;
    let s_vec: Vec<u8> = rlp.val_at(8).map_err(|e| GatewayError::Decode(format!("s: {e}")))?;

    if r_vec.len() > 32 || s_vec.len() > 32 {
        return Err(GatewayError::Decode("r/s longer than 32 bytes".into()));
    }
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r[32 - r_vec.len()..].copy_from_slice(&r_vec);
    s[32 - s_vec.len()..].copy_from_slice(&s_vec);

    Ok(EthereumTx { nonce, gas_price, gas_limit, to, value, data, v, r, s })
}

/// Canonical re-encode of the nine-field tuple. Integer fields use
/// minimal-length encoding, so decoding then re-encoding a canonical
/// input reproduces it byte-exactly.
pub fn encode_signed_tx(tx: &EthereumTx) -> Vec<u8> {
    let mut stream = RlpStream::new_list(9);
    stream.append(&tx.nonce);
    stream.append(&tx.gas_price);
    stream.append(&tx.gas_limit);
    match &tx.to {
        Some(a) => stream.append(&a.as_slice()),
        None => stream.append(&""),
    };
    stream.append(&tx.value);
    stream.append(&tx.data);
    stream.append(&tx.v);
    stream.append(&trim_leading_zeros(&tx.r));
    stream.append(&trim_leading_zeros(&tx.s));
    stream.out().to_vec()
}

fn trim_leading_zeros(b: &[u8]) -> &[u8] {
    let first = b.iter().position(|&x| x != 0).unwrap_or(b.len());
    &b[first..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> EthereumTx {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r[31] = 0x7b;
        s[30] = 0x01;
        s[31] = 0xc8;
        EthereumTx {
            nonce: 3,
            gas_price: 1_000_000_000,
            gas_limit: 21_000,
            to: Some([0x42; 20]),
            value: 1_000_000_000_000_000_000,
            data: vec![],
            v: 0x25,
            r,
            s,
        }
    }

    #[test]
    fn decode_encode_round_trip() {
        let tx = sample_tx();
        let bytes = encode_signed_tx(&tx);
        let back = decode_signed_tx(&bytes).unwrap();
        assert_eq!(back, tx);
        assert_eq!(encode_signed_tx(&back), bytes);
    }

    #[test]
    fn r_and_s_are_left_padded() {
        let tx = sample_tx();
        let bytes = encode_signed_tx(&tx);
        let back = decode_signed_tx(&bytes).unwrap();
        assert_eq!(&back.r[..31], &[0u8; 31]);
        assert_eq!(back.r[31], 0x7b);
        assert_eq!(u16::from_be_bytes([back.s[30], back.s[31]]), 0x01c8);
    }

    #[test]
    fn empty_to_means_create() {
        let mut tx = sample_tx();
        tx.to = None;
        tx.data = vec![0x60, 0x00];
        let back = decode_signed_tx(&encode_signed_tx(&tx)).unwrap();
        assert!(back.is_create());
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        let mut stream = RlpStream::new_list(6);
        for _ in 0..6 {
            stream.append(&1u8);
        }
        let err = decode_signed_tx(&stream.out()).unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn non_list_is_rejected() {
        let mut stream = RlpStream::new();
        stream.append(&"hello");
        assert!(decode_signed_tx(&stream.out()).is_err());
    }

    #[test]
    fn zero_fields_decode_from_empty_strings() {
        let mut stream = RlpStream::new_list(9);
        stream.append(&""); // nonce
        stream.append(&""); // gas_price
        stream.append(&""); // gas_limit
        stream.append(&""); // to
        stream.append(&""); // value
        stream.append(&""); // data
        stream.append(&27u8); // v
        stream.append(&[1u8].as_slice()); // r
        stream.append(&[1u8].as_slice()); // s
        let tx = decode_signed_tx(&stream.out()).unwrap();
        assert_eq!(tx.nonce, 0);
        assert_eq!(tx.gas_price, 0);
        assert_eq!(tx.value, 0);
        assert!(tx.is_create());
    }
}
