use proptest::prelude::*;

use ethereum_types::U256;
use godwoken_gateway::transcode::pending_view::bump_pending_block_hash;
use godwoken_gateway::transcode::polyjuice::{
    decode_args, encode_args, u128_from_le_bytes, u128_to_le_bytes,
};
use godwoken_gateway::transcode::rlp_codec::{decode_signed_tx, encode_signed_tx};
use godwoken_gateway::transcode::sig::{packed_signature, recovery_id};
use godwoken_gateway::types::EthereumTx;

fn arb_address() -> impl Strategy<Value = Option<[u8; 20]>> {
    proptest::option::of(any::<[u8; 20]>())
}

/// Any nine-field transaction whose v belongs to a real signature class.
fn arb_tx() -> impl Strategy<Value = EthereumTx> {
    (
        any::<u64>(),
        any::<u128>(),
        any::<u64>(),
        arb_address(),
        any::<u128>(),
        proptest::collection::vec(any::<u8>(), 0..256),
        prop_oneof![Just(27u64), Just(28u64), (0u64..100_000).prop_map(|c| 35 + 2 * c), (0u64..100_000).prop_map(|c| 36 + 2 * c)],
        any::<[u8; 32]>(),
        any::<[u8; 32]>(),
    )
        .prop_map(|(nonce, gas_price, gas_limit, to, value, data, v, r, s)| EthereumTx {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data,
            v,
            r,
            s,
        })
}

proptest! {
    #[test]
    fn rlp_round_trip_is_stable(tx in arb_tx()) {
        // encode -> decode -> encode fixes the canonical form
        let encoded = encode_signed_tx(&tx);
        let decoded = decode_signed_tx(&encoded).unwrap();
        prop_assert_eq!(encode_signed_tx(&decoded), encoded);
        // every field except r/s padding survives exactly
        prop_assert_eq!(decoded.nonce, tx.nonce);
        prop_assert_eq!(decoded.gas_price, tx.gas_price);
        prop_assert_eq!(decoded.gas_limit, tx.gas_limit);
        prop_assert_eq!(decoded.to, tx.to);
        prop_assert_eq!(decoded.value, tx.value);
        prop_assert_eq!(decoded.data, tx.data);
        prop_assert_eq!(decoded.v, tx.v);
    }

    #[test]
    fn rs_padding_preserves_integer_value(tx in arb_tx()) {
        let decoded = decode_signed_tx(&encode_signed_tx(&tx)).unwrap();
        prop_assert_eq!(U256::from_big_endian(&decoded.r), U256::from_big_endian(&tx.r));
        prop_assert_eq!(U256::from_big_endian(&decoded.s), U256::from_big_endian(&tx.s));
    }

    #[test]
    fn recovery_byte_follows_v_parity(tx in arb_tx()) {
        let sig = packed_signature(&tx);
        prop_assert_eq!(sig[64], if tx.v % 2 == 0 { 1 } else { 0 });
        prop_assert_eq!(sig[64], recovery_id(tx.v));
        prop_assert_eq!(&sig[..32], &tx.r);
        prop_assert_eq!(&sig[32..64], &tx.s);
    }

    #[test]
    fn polyjuice_args_round_trip(
        is_create in any::<bool>(),
        gas_limit in any::<u64>(),
        gas_price in any::<u128>(),
        value in any::<u128>(),
        input in proptest::collection::vec(any::<u8>(), 0..512),
        native_to in arb_address(),
    ) {
        // a create never carries the native-transfer tail
        let tail = if is_create { None } else { native_to };
        let args = encode_args(is_create, gas_limit, gas_price, value, &input, tail.as_ref());
        let expected = 52 + input.len() + if tail.is_some() { 20 } else { 0 };
        prop_assert_eq!(args.len(), expected);

        let back = decode_args(&args).unwrap();
        prop_assert_eq!(back.is_create, is_create);
        prop_assert_eq!(back.gas_limit, gas_limit);
        prop_assert_eq!(back.gas_price, gas_price);
        prop_assert_eq!(back.value, value);
        prop_assert_eq!(back.input, input);
    }

    #[test]
    fn u128_le_round_trip(x in any::<u128>()) {
        let bytes = u128_to_le_bytes(x);
        prop_assert_eq!(bytes.len(), 16);
        prop_assert_eq!(u128_from_le_bytes(&bytes).unwrap(), x);
    }

    #[test]
    fn u128_from_le_rejects_wrong_width(len in 0usize..40) {
        prop_assume!(len != 16);
        prop_assert!(u128_from_le_bytes(&vec![0u8; len]).is_err());
    }

    #[test]
    fn bump_hash_touches_only_the_low_bit(tip in any::<[u8; 32]>()) {
        let bumped = bump_pending_block_hash(&tip);
        prop_assert_ne!(bumped, tip);
        prop_assert_eq!(&bumped[..31], &tip[..31]);
        prop_assert_eq!(bumped[31] ^ tip[31], 0x01);
        prop_assert_eq!(bump_pending_block_hash(&bumped), tip);
    }
}
