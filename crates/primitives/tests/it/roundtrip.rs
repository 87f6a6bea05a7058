use crate::{access_list, authorization_list};
use proptest::prelude::*;
use voltaire_primitives::{
    AccessList, AccessListItem, Address, Bytes, Signature, Transaction, TransactionSigned,
    TxEip1559, TxEip2930, TxEip4844, TxEip7702, TxKind, TxLegacy, B256, U256,
};
use voltaire_rlp::{Decodable, Encodable};

fn signature() -> Signature {
    Signature { r: U256::from(0xdead_u64), s: U256::from(0xbeef_u64), odd_y_parity: false }
}

fn assert_round_trip(tx: Transaction) {
    let signed = tx.into_signed(signature());
    let envelope = signed.envelope_encoded();
    assert_eq!(envelope.len(), signed.length_without_header());

    let decoded = TransactionSigned::decode_enveloped(&envelope).unwrap();
    assert_eq!(decoded, signed);
    assert_eq!(decoded.envelope_encoded(), envelope);

    let mut network = Vec::new();
    signed.encode(&mut network);
    assert_eq!(network.len(), signed.length());
    assert_eq!(TransactionSigned::decode(&mut &network[..]).unwrap(), signed);
}

#[test]
fn access_lists_of_every_size() {
    for len in [0, 1, 5] {
        let list = access_list(len);
        assert_eq!(list.0.len(), len);
        let to = TxKind::Call(Address::repeat_byte(0x77));

        assert_round_trip(
            TxEip2930 { chain_id: 1, nonce: 1, to, access_list: list.clone(), ..Default::default() }
                .into(),
        );
        assert_round_trip(
            TxEip1559 {
                chain_id: 1,
                max_fee_per_gas: 1_000,
                max_priority_fee_per_gas: 10,
                to,
                access_list: list.clone(),
                ..Default::default()
            }
            .into(),
        );
        assert_round_trip(
            TxEip4844 {
                chain_id: 1,
                to: Address::repeat_byte(0x77),
                access_list: list.clone(),
                blob_versioned_hashes: vec![B256::repeat_byte(0x01); len + 1],
                max_fee_per_blob_gas: 7,
                ..Default::default()
            }
            .into(),
        );
        assert_round_trip(
            TxEip7702 { chain_id: 1, to, access_list: list, ..Default::default() }.into(),
        );
    }
}

#[test]
fn authorization_lists_of_every_size() {
    for len in [0, 1, 4] {
        let tx = TxEip7702 {
            chain_id: 1,
            to: TxKind::Call(Address::repeat_byte(0x77)),
            authorization_list: authorization_list(len),
            ..Default::default()
        };
        assert_eq!(Transaction::from(tx.clone()).authorization_list().map(<[_]>::len), Some(len));
        assert_round_trip(tx.into());
    }
}

#[test]
fn contract_creation() {
    let code = Bytes::from(vec![0x60; 100]);
    assert_round_trip(TxLegacy { input: code.clone(), ..Default::default() }.into());
    assert_round_trip(TxEip2930 { chain_id: 1, input: code.clone(), ..Default::default() }.into());
    assert_round_trip(TxEip1559 { chain_id: 1, input: code.clone(), ..Default::default() }.into());
    assert_round_trip(TxEip7702 { chain_id: 1, input: code, ..Default::default() }.into());
}

#[test]
fn access_list_queries() {
    let list = access_list(4);
    assert_eq!(list.total_storage_keys(), 1 + 2 + 3);
    assert!(list.contains_address(&Address::repeat_byte(0x04)));
    assert!(!list.contains_address(&Address::repeat_byte(0x05)));
    assert!(AccessList::default().is_empty());
}

fn arb_u256() -> impl Strategy<Value = U256> {
    any::<[u8; 32]>().prop_map(U256::from_be_bytes)
}

fn arb_kind() -> impl Strategy<Value = TxKind> {
    prop_oneof![Just(TxKind::Create), any::<[u8; 20]>().prop_map(|a| TxKind::Call(a.into()))]
}

fn arb_access_list() -> impl Strategy<Value = AccessList> {
    prop::collection::vec(
        (any::<[u8; 20]>(), prop::collection::vec(any::<[u8; 32]>(), 0..3)),
        0..3,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(address, keys)| AccessListItem {
                address: address.into(),
                storage_keys: keys.into_iter().map(B256::from).collect(),
            })
            .collect::<Vec<_>>()
            .into()
    })
}

fn arb_signature() -> impl Strategy<Value = Signature> {
    (arb_u256(), arb_u256(), any::<bool>()).prop_map(|(r, s, odd_y_parity)| Signature {
        r,
        s,
        odd_y_parity,
    })
}

proptest! {
    #[test]
    fn legacy_round_trip(
        chain_id in any::<Option<u64>>(),
        nonce in any::<u64>(),
        gas_price in any::<u128>(),
        gas_limit in any::<u64>(),
        to in arb_kind(),
        value in arb_u256(),
        input in prop::collection::vec(any::<u8>(), 0..80),
        signature in arb_signature(),
    ) {
        let tx = Transaction::Legacy(TxLegacy {
            chain_id, nonce, gas_price, gas_limit, to, value, input: input.into(),
        });
        let signed = tx.into_signed(signature);
        let decoded = TransactionSigned::decode_enveloped(&signed.envelope_encoded()).unwrap();
        prop_assert_eq!(decoded, signed);
    }

    #[test]
    fn eip1559_round_trip(
        chain_id in any::<u64>(),
        nonce in any::<u64>(),
        max_fee_per_gas in any::<u128>(),
        max_priority_fee_per_gas in any::<u128>(),
        gas_limit in any::<u64>(),
        to in arb_kind(),
        value in arb_u256(),
        access_list in arb_access_list(),
        input in prop::collection::vec(any::<u8>(), 0..80),
        signature in arb_signature(),
    ) {
        let tx = Transaction::Eip1559(TxEip1559 {
            chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            to,
            value,
            access_list,
            input: input.into(),
        });
        let signed = tx.into_signed(signature);
        let envelope = signed.envelope_encoded();
        prop_assert_eq!(envelope[0], 0x02);
        let decoded = TransactionSigned::decode_enveloped(&envelope).unwrap();
        prop_assert_eq!(decoded.hash(), signed.hash());
        prop_assert_eq!(decoded, signed);
    }

    #[test]
    fn eip4844_round_trip(
        chain_id in any::<u64>(),
        to in any::<[u8; 20]>(),
        max_fee_per_blob_gas in any::<u128>(),
        hashes in prop::collection::vec(any::<[u8; 32]>(), 0..6),
        access_list in arb_access_list(),
        signature in arb_signature(),
    ) {
        let tx = Transaction::Eip4844(TxEip4844 {
            chain_id,
            to: to.into(),
            max_fee_per_blob_gas,
            blob_versioned_hashes: hashes.into_iter().map(B256::from).collect(),
            access_list,
            ..Default::default()
        });
        let signed = tx.into_signed(signature);
        let decoded = TransactionSigned::decode_enveloped(&signed.envelope_encoded()).unwrap();
        prop_assert_eq!(decoded, signed);
    }
}
