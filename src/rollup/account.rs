use blake2b_simd::Params;

use crate::config::ChainSection;
use crate::error::GatewayError;
use crate::rollup::RollupClient;
use crate::types::{Address20, H256};

/// CKB-flavored Blake2b-256 personalization used for all layer-2 script hashes.
const CKB_HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// The ETH account lock is referenced by type, not data.
const SCRIPT_HASH_TYPE_TYPE: u8 = 0x01;

/// Maps Ethereum addresses onto rollup accounts and classifies them as
/// EOA or contract. Borrows the RPC client and the parsed chain snapshot.
pub struct AccountResolver<'a> {
    client: &'a dyn RollupClient,
    rollup_type_hash: H256,
    eth_account_lock_code_hash: H256,
}

impl<'a> AccountResolver<'a> {
    pub fn new(client: &'a dyn RollupClient, chain: &ChainSection) -> Result<Self, GatewayError> {
        Ok(Self {
            client,
            rollup_type_hash: chain.rollup_type_hash()?,
            eth_account_lock_code_hash: chain.eth_account_lock_code_hash()?,
        })
    }

    /// Script hash the rollup would assign this address as an externally
    /// owned account: hash of the ETH-account-lock script whose args are
    /// `rollup_type_hash || address`.
    pub fn eoa_script_hash(&self, address: &Address20) -> H256 {
        let mut args = Vec::with_capacity(32 + 20);
        args.extend_from_slice(&self.rollup_type_hash);
        args.extend_from_slice(address);
        ckb_blake2b(&molecule_script(
            &self.eth_account_lock_code_hash,
            SCRIPT_HASH_TYPE_TYPE,
            &args,
        ))
    }

    pub async fn account_id_of(&self, address: &Address20) -> Result<Option<u32>, GatewayError> {
        self.client
            .get_account_id_by_script_hash(self.eoa_script_hash(address))
            .await
    }

    /// An account is an EOA iff its on-chain script hash equals the
    /// EOA derivation of the address. Anything else is a contract.
    pub async fn is_eoa(&self, address: &Address20, account_id: u32) -> Result<bool, GatewayError> {
        let on_chain = self.client.get_script_hash(account_id).await?;
        Ok(on_chain == self.eoa_script_hash(address))
    }
}

/// Molecule table(code_hash: Byte32, hash_type: byte, args: Bytes).
fn molecule_script(code_hash: &H256, hash_type: u8, args: &[u8]) -> Vec<u8> {
    let header = 4 + 4 * 3;
    let full_size = header + 32 + 1 + 4 + args.len();
    let mut out = Vec::with_capacity(full_size);
    out.extend_from_slice(&(full_size as u32).to_le_bytes());
    for off in [header as u32, header as u32 + 32, header as u32 + 33] {
        out.extend_from_slice(&off.to_le_bytes());
    }
    out.extend_from_slice(code_hash);
    out.push(hash_type);
    out.extend_from_slice(&(args.len() as u32).to_le_bytes());
    out.extend_from_slice(args);
    out
}

fn ckb_blake2b(data: &[u8]) -> H256 {
    let hash = Params::new()
        .hash_length(32)
        .personal(CKB_HASH_PERSONALIZATION)
        .to_state()
        .update(data)
        .finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    out
}
