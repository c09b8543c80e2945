use serde::{Deserialize, Serialize};

/// Raw layer-2 transaction as the rollup node consumes it.
///
/// All integer fields are little-endian on the wire; `args` carries the
/// Polyjuice payload (see `transcode::polyjuice`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawL2Transaction {
    pub chain_id: u64,
    pub from_id: u32,
    pub to_id: u32,
    pub nonce: u32,
    pub args: Vec<u8>,
}

/// Raw transaction plus the packed 65-byte secp256k1 signature
/// (`r || s || recovery_byte`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Transaction {
    pub raw: RawL2Transaction,
    #[serde(with = "serde_sig")]
    pub signature: [u8; 65],
}

mod serde_sig {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sig: &[u8; 65], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(sig)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 65], D::Error> {
        let h = String::deserialize(d)?;
        let raw = hex::decode(h.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
        raw.try_into()
            .map_err(|_| serde::de::Error::custom("signature must be 65 bytes"))
    }
}

// Molecule table layout: full_size, one u32 offset per field, then the
// field payloads in order. Dynamic byte strings carry their own u32 length.

fn put_offsets(out: &mut Vec<u8>, full_size: u32, offsets: &[u32]) {
    out.extend_from_slice(&full_size.to_le_bytes());
    for off in offsets {
        out.extend_from_slice(&off.to_le_bytes());
    }
}

fn put_bytes(out: &mut Vec<u8>, b: &[u8]) {
    out.extend_from_slice(&(b.len() as u32).to_le_bytes());
    out.extend_from_slice(b);
}

impl RawL2Transaction {
    /// Wire form: table(chain_id, from_id, to_id, nonce, args).
    pub fn to_molecule_bytes(&self) -> Vec<u8> {
        let header = 4 + 4 * 5;
        let full_size = header + 8 + 4 + 4 + 4 + 4 + self.args.len();
        let mut out = Vec::with_capacity(full_size);
        put_offsets(
            &mut out,
            full_size as u32,
            &[
                header as u32,      // chain_id
                header as u32 + 8,  // from_id
                header as u32 + 12, // to_id
                header as u32 + 16, // nonce
                header as u32 + 20, // args
            ],
        );
        out.extend_from_slice(&self.chain_id.to_le_bytes());
        out.extend_from_slice(&self.from_id.to_le_bytes());
        out.extend_from_slice(&self.to_id.to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
        put_bytes(&mut out, &self.args);
        out
    }
}

impl L2Transaction {
    /// Wire form: table(raw, signature).
    pub fn to_molecule_bytes(&self) -> Vec<u8> {
        let raw = self.raw.to_molecule_bytes();
        let header = 4 + 4 * 2;
        let full_size = header + raw.len() + 4 + self.signature.len();
        let mut out = Vec::with_capacity(full_size);
        put_offsets(
            &mut out,
            full_size as u32,
            &[header as u32, (header + raw.len()) as u32],
        );
        out.extend_from_slice(&raw);
        put_bytes(&mut out, &self.signature);
        out
    }
}
