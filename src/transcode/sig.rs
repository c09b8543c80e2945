use k256::ecdsa::{recoverable, Signature};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rlp::RlpStream;
use sha3::{Digest, Keccak256};

use crate::error::GatewayError;
use crate::types::{Address20, EthereumTx, H256};

pub fn keccak256(data: &[u8]) -> H256 {
    let mut h = Keccak256::new();
    h.update(data);
    let r = h.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&r);
    out
}

/// RLP preimage of the message the sender actually signed.
///
/// Pre-EIP-155 (v of 27/28) signs the bare six-field tuple; EIP-155 folds
/// `[chain_id, 0, 0]` onto the end to prevent cross-chain replay.
pub(crate) fn signing_preimage(tx: &EthereumTx) -> Result<Vec<u8>, GatewayError> {
    let chain_id = if tx.is_pre_eip155() {
        None
    } else {
        Some(
            tx.eip155_chain_id()
                .ok_or_else(|| GatewayError::Signature(format!("invalid v: {}", tx.v)))?,
        )
    };

    let mut stream = RlpStream::new_list(if chain_id.is_some() { 9 } else { 6 });
    stream.append(&tx.nonce);
    stream.append(&tx.gas_price);
    stream.append(&tx.gas_limit);
    match &tx.to {
        Some(a) => stream.append(&a.as_slice()),
        None => stream.append(&""),
    };
    stream.append(&tx.value);
    stream.append(&tx.data);
    if let Some(cid) = chain_id {
        stream.append(&cid);
        stream.append(&0u8);
        stream.append(&0u8);
    }

    Ok(stream.out().to_vec())
}

pub fn signing_message(tx: &EthereumTx) -> Result<H256, GatewayError> {
    Ok(keccak256(&signing_preimage(tx)?))
}

/// Odd v maps to recovery id 0, even v to 1. Holds for both the 27/28
/// legacy encoding and the EIP-155 `35 + 2 * chain_id` form.
pub fn recovery_id(v: u64) -> u8 {
    if v % 2 == 0 {
        1
    } else {
        0
    }
}

/// 65-byte signature handed to the rollup: `r || s || recovery_byte`.
pub fn packed_signature(tx: &EthereumTx) -> [u8; 65] {
    let mut sig = [0u8; 65];
    sig[..32].copy_from_slice(&tx.r);
    sig[32..64].copy_from_slice(&tx.s);
    sig[64] = recovery_id(tx.v);
    sig
}

/// Recover the sender address from the signature over the EIP-155 message.
pub fn recover_sender(tx: &EthereumTx) -> Result<Address20, GatewayError> {
    let msg_hash = signing_message(tx)?;

    let sig = Signature::from_scalars(tx.r, tx.s)
        .map_err(|e| GatewayError::Signature(format!("bad scalars: {e}")))?;
    let rec_id = recoverable::Id::new(recovery_id(tx.v))
        .map_err(|e| GatewayError::Signature(format!("bad recovery id: {e}")))?;
    let rec_sig = recoverable::Signature::new(&sig, rec_id)
        .map_err(|e| GatewayError::Signature(format!("bad signature: {e}")))?;

    let digest_bytes: k256::FieldBytes = msg_hash.into();
    let vk = rec_sig
        .recover_verifying_key_from_digest_bytes(&digest_bytes)
        .map_err(|e| GatewayError::Signature(format!("recovery failed: {e}")))?;

    let pubkey = vk.to_encoded_point(false);
    let pub_bytes = pubkey.as_bytes();
    // pub_bytes[0] == 0x04, then 64 bytes X||Y
    let hash = keccak256(&pub_bytes[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    Ok(out)
}
