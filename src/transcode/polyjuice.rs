use crate::error::GatewayError;
use crate::types::Address20;

/// `FF FF FF` + ASCII "POLY".
pub const POLYJUICE_MAGIC: [u8; 7] = [0xff, 0xff, 0xff, b'P', b'O', b'L', b'Y'];

pub const CALL_KIND_CALL: u8 = 0x00;
pub const CALL_KIND_CREATE: u8 = 0x03;

/// Fixed header: magic(7) kind(1) gas_limit(8) gas_price(16) value(16) input_size(4).
pub const ARGS_HEADER_LEN: usize = 52;

/// Typed view of decoded Polyjuice args. The optional trailing recipient of
/// a native transfer is not part of this view; recognizing it is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyjuiceArgs {
    pub is_create: bool,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub value: u128,
    pub input: Vec<u8>,
}

pub fn u128_to_le_bytes(x: u128) -> [u8; 16] {
    x.to_le_bytes()
}

pub fn u128_from_le_bytes(b: &[u8]) -> Result<u128, GatewayError> {
    let arr: [u8; 16] = b
        .try_into()
        .map_err(|_| GatewayError::Decode(format!("expected 16 bytes, got {}", b.len())))?;
    Ok(u128::from_le_bytes(arr))
}

/// Serialize the argument blob the Polyjuice backend executes.
///
/// `native_transfer_to` appends the recipient address after the input; it is
/// set only for value transfers to an EOA or to a not-yet-created account.
pub fn encode_args(
    is_create: bool,
    gas_limit: u64,
    gas_price: u128,
    value: u128,
    input: &[u8],
    native_transfer_to: Option<&Address20>,
) -> Vec<u8> {
    let tail = if native_transfer_to.is_some() { 20 } else { 0 };
    let mut args = Vec::with_capacity(ARGS_HEADER_LEN + input.len() + tail);
    args.extend_from_slice(&POLYJUICE_MAGIC);
    args.push(if is_create { CALL_KIND_CREATE } else { CALL_KIND_CALL });
    args.extend_from_slice(&gas_limit.to_le_bytes());
    args.extend_from_slice(&u128_to_le_bytes(gas_price));
    args.extend_from_slice(&u128_to_le_bytes(value));
    args.extend_from_slice(&(input.len() as u32).to_le_bytes());
    args.extend_from_slice(input);
    if let Some(to) = native_transfer_to {
        args.extend_from_slice(to);
    }
    args
}

/// True when the blob starts with the Polyjuice magic.
pub fn has_polyjuice_magic(args: &[u8]) -> bool {
    args.len() >= POLYJUICE_MAGIC.len() && args[..POLYJUICE_MAGIC.len()] == POLYJUICE_MAGIC
}

/// Reverse `encode_args`. A trailing 20-byte recipient is tolerated and
/// ignored; any other length mismatch against `input_size` is an error.
pub fn decode_args(args: &[u8]) -> Result<PolyjuiceArgs, GatewayError> {
    if args.len() < ARGS_HEADER_LEN {
        return Err(GatewayError::Decode(format!(
            "polyjuice args too short: {} < {ARGS_HEADER_LEN}",
            args.len()
        )));
    }
    if !has_polyjuice_magic(args) {
        return Err(GatewayError::Decode("bad polyjuice magic".into()));
    }

    let is_create = args[7] == CALL_KIND_CREATE;
    let mut gl = [0u8; 8];
    gl.copy_from_slice(&args[8..16]);
    let gas_limit = u64::from_le_bytes(gl);
    let gas_price = u128_from_le_bytes(&args[16..32])?;
    let value = u128_from_le_bytes(&args[32..48])?;
    let mut isz = [0u8; 4];
    isz.copy_from_slice(&args[48..52]);
    let input_size = u32::from_le_bytes(isz) as usize;

    let plain = ARGS_HEADER_LEN + input_size;
    if args.len() != plain && args.len() != plain + 20 {
        return Err(GatewayError::Decode(format!(
            "input size mismatch: args {} vs declared {input_size}",
            args.len()
        )));
    }

    Ok(PolyjuiceArgs {
        is_create,
        gas_limit,
        gas_price,
        value,
        input: args[ARGS_HEADER_LEN..plain].to_vec(),
    })
}
