use assert_matches::assert_matches;
use voltaire_primitives::{
    Address, Bytes, DecodeErrorKind, FieldRangeError, SemanticError, Signature, Transaction,
    TransactionDecodeError, TransactionSigned, TxEip1559, TxEip2930, TxEip4844, TxEip7702,
    TxKind, TxLegacy, TxType, B256, U256,
};
use voltaire_rlp::DecodeError;

fn signature() -> Signature {
    Signature { r: U256::from(1), s: U256::from(1), odd_y_parity: true }
}

fn one_of_each() -> Vec<Transaction> {
    let to = TxKind::Call(Address::repeat_byte(0x42));
    vec![
        TxLegacy { chain_id: Some(1), to, ..Default::default() }.into(),
        TxEip2930 { chain_id: 1, to, access_list: crate::access_list(1), ..Default::default() }
            .into(),
        TxEip1559 { chain_id: 1, to, ..Default::default() }.into(),
        TxEip4844 {
            chain_id: 1,
            to: Address::repeat_byte(0x42),
            blob_versioned_hashes: vec![B256::repeat_byte(0x01)],
            ..Default::default()
        }
        .into(),
        TxEip7702 {
            chain_id: 1,
            to,
            authorization_list: crate::authorization_list(1),
            ..Default::default()
        }
        .into(),
    ]
}

#[test]
fn type_prefix_selects_envelope() {
    let expected = [
        (TxType::Legacy, 0xc0),
        (TxType::Eip2930, 0x01),
        (TxType::Eip1559, 0x02),
        (TxType::Eip4844, 0x03),
        (TxType::Eip7702, 0x04),
    ];
    for (tx, (tx_type, first)) in one_of_each().into_iter().zip(expected) {
        let signed = tx.into_signed(signature());
        let encoded = signed.envelope_encoded();
        if tx_type == TxType::Legacy {
            assert!(encoded[0] >= 0xc0);
        } else {
            assert_eq!(encoded[0], first);
        }
        let decoded = TransactionSigned::decode_enveloped(&encoded).unwrap();
        assert_eq!(decoded.tx_type(), tx_type);
        assert_eq!(decoded, signed);
    }
}

#[test]
fn empty_input() {
    assert_eq!(TransactionSigned::decode_enveloped(&[]), Err(TransactionDecodeError::EmptyInput));
    assert_eq!(
        TransactionSigned::decode_network(&mut &[][..]),
        Err(TransactionDecodeError::EmptyInput)
    );
}

#[test]
fn unknown_type_byte() {
    let err = TransactionSigned::decode_enveloped(&[0x05, 0xc0]).unwrap_err();
    assert_eq!(err, TransactionDecodeError::UnsupportedType(0x05));
    assert_eq!(err.kind(), DecodeErrorKind::Structural);
}

#[test]
fn y_parity_two_is_a_range_error() {
    for tx in one_of_each().into_iter().filter(|tx| tx.tx_type() != TxType::Legacy) {
        let mut encoded = tx.into_signed(signature()).envelope_encoded().to_vec();
        // [.., y_parity = 0x01, r = 0x01, s = 0x01]
        let y_parity = encoded.len() - 3;
        encoded[y_parity] = 0x02;

        let err = TransactionSigned::decode_enveloped(&encoded).unwrap_err();
        assert_eq!(
            err,
            TransactionDecodeError::from(FieldRangeError::InvalidYParity {
                field: "y_parity",
                value: 2
            })
        );
        assert_eq!(err.kind(), DecodeErrorKind::FieldRange);
    }
}

#[test]
fn truncated_input() {
    for tx in one_of_each() {
        let encoded = tx.into_signed(signature()).envelope_encoded();
        let err = TransactionSigned::decode_enveloped(&encoded[..encoded.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::Structural, "{err}");
    }
}

#[test]
fn trailing_bytes() {
    for tx in one_of_each() {
        let mut encoded = tx.into_signed(signature()).envelope_encoded().to_vec();
        encoded.extend_from_slice(&[0xc0, 0xc0]);
        assert_eq!(
            TransactionSigned::decode_enveloped(&encoded),
            Err(TransactionDecodeError::TrailingBytes { remaining: 2 })
        );
    }
}

#[test]
fn non_canonical_nonce() {
    let signed = Transaction::from(TxEip1559 { chain_id: 1, ..Default::default() })
        .into_signed(signature());
    let mut encoded = signed.envelope_encoded().to_vec();
    // 02 c? [chain_id = 01, nonce = 80, ..]
    assert_eq!(encoded[3], 0x80);
    encoded[3] = 0x00;

    assert_eq!(
        TransactionSigned::decode_enveloped(&encoded),
        Err(TransactionDecodeError::Rlp { field: "nonce", source: DecodeError::LeadingZero })
    );
}

#[test]
fn blob_transaction_cannot_create() {
    let blob = TxEip4844 { chain_id: 1, ..Default::default() };
    let mut encoded = Transaction::from(blob).into_signed(signature()).envelope_encoded().to_vec();
    // the zero address is 0x94 followed by 20 zero bytes, swap it for an empty string
    let to = encoded
        .windows(21)
        .position(|w| w[0] == 0x94 && w[1..].iter().all(|b| *b == 0))
        .unwrap();
    encoded.splice(to..to + 21, [0x80]);
    encoded[1] -= 20;

    let err = TransactionSigned::decode_enveloped(&encoded).unwrap_err();
    assert_eq!(err, SemanticError::BlobContractCreation.into());
    assert_eq!(err.kind(), DecodeErrorKind::SemanticInvalid);
}

#[test]
fn chain_id_mismatch() {
    let signed = Transaction::from(TxEip1559 { chain_id: 10, ..Default::default() })
        .into_signed(signature());
    let encoded = signed.envelope_encoded();

    assert_matches!(TransactionSigned::decode_enveloped_for_chain(&encoded, 10), Ok(_));
    assert_eq!(
        TransactionSigned::decode_enveloped_for_chain(&encoded, 1),
        Err(SemanticError::ChainIdMismatch { expected: 1, got: 10 }.into())
    );

    // pre EIP-155 transactions carry no chain id
    let legacy = Transaction::from(TxLegacy::default()).into_signed(Signature {
        odd_y_parity: false,
        ..signature()
    });
    assert_matches!(
        TransactionSigned::decode_enveloped_for_chain(&legacy.envelope_encoded(), 1),
        Ok(tx) if tx.chain_id().is_none()
    );
}

#[test]
fn invalid_authorization_entry_reports_index() {
    let mut list = crate::authorization_list(2);
    list[1] = list[1].authorization().into_signed(Signature::default());
    let tx = TxEip7702 { chain_id: 1, authorization_list: list, ..Default::default() };
    let mut encoded = Transaction::from(tx).into_signed(signature()).envelope_encoded().to_vec();

    // the second tuple ends in [.., nonce = 01, y_parity = 80, r = 80, s = 80]
    let tuple_end = encoded.windows(4).rposition(|w| w == [0x01, 0x80, 0x80, 0x80]).unwrap();
    encoded[tuple_end + 1] = 0x03;

    let err = TransactionSigned::decode_enveloped(&encoded).unwrap_err();
    assert_matches!(err, TransactionDecodeError::AuthorizationEntry { index: 1, .. });
    assert_eq!(err.kind(), DecodeErrorKind::Structural);
    assert_eq!(
        *err.root_cause(),
        TransactionDecodeError::from(FieldRangeError::InvalidYParity {
            field: "authorization y_parity",
            value: 3
        })
    );
}

#[test]
fn network_form_requires_full_envelope() {
    let tx = TxEip1559 { chain_id: 1, input: Bytes::from(vec![0; 4]), ..Default::default() };
    let signed = Transaction::from(tx).into_signed(signature());
    let mut network = Vec::new();
    voltaire_rlp::Encodable::encode(&signed, &mut network);
    assert_eq!(network.len(), voltaire_rlp::Encodable::length(&signed));

    let mut buf = &network[..];
    assert_eq!(TransactionSigned::decode_network(&mut buf).unwrap(), signed);
    assert!(buf.is_empty());

    // the envelope alone is not the network form
    let envelope = signed.envelope_encoded();
    assert!(TransactionSigned::decode_network(&mut &envelope[..]).is_err());
}
