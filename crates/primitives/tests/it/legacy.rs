use voltaire_primitives::{
    address, Bytes, Signature, Transaction, TransactionSigned, TxKind, TxLegacy, TxType, U256,
};

fn transfer() -> (Transaction, Signature) {
    let tx = Transaction::Legacy(TxLegacy {
        chain_id: None,
        nonce: 0,
        gas_price: 20_000_000_000,
        gas_limit: 21_000,
        to: TxKind::Call(address!("742d35Cc6634C0532925a3b844Bc9e7595f0bEb0")),
        value: U256::from(10).pow(U256::from(18)),
        input: Bytes::new(),
    });
    let signature = Signature {
        r: U256::from_be_bytes([0x01; 32]),
        s: U256::from_be_bytes([0x02; 32]),
        odd_y_parity: false,
    };
    (tx, signature)
}

#[test]
fn transfer_encoding_length() {
    let (tx, signature) = transfer();
    let signed = TransactionSigned::from_transaction_and_signature(tx, signature);
    let encoded = signed.envelope_encoded();

    // nonce 0x80, gas price 5 bytes, gas limit 2 bytes, address 20 bytes, value 8 bytes,
    // empty input, v = 27, r and s 32 bytes each
    let payload = 1 + 6 + 3 + 21 + 9 + 1 + 1 + 33 + 33;
    assert_eq!(payload, 108);
    assert_eq!(encoded[0], 0xf8);
    assert_eq!(encoded[1], payload as u8);
    assert_eq!(encoded.len(), 2 + payload);
    assert_eq!(signed.length_without_header(), encoded.len());

    // v
    assert_eq!(encoded[2 + payload - 67], 27);
}

#[test]
fn transfer_round_trip() {
    let (tx, signature) = transfer();
    let signed = TransactionSigned::from_transaction_and_signature(tx.clone(), signature);

    let decoded = TransactionSigned::decode_enveloped(&signed.envelope_encoded()).unwrap();
    assert_eq!(decoded.transaction, tx);
    assert_eq!(decoded.signature, signature);
    assert_eq!(decoded.hash(), signed.hash());
    assert_eq!(decoded.tx_type(), TxType::Legacy);
    assert_eq!(decoded.chain_id(), None);
}

#[test]
fn eip155_chain_id_survives_round_trip() {
    let (tx, signature) = transfer();
    let Transaction::Legacy(mut legacy) = tx else { unreachable!() };
    legacy.chain_id = Some(137);
    let signed = TransactionSigned::from_transaction_and_signature(legacy.into(), signature);
    let encoded = signed.envelope_encoded();

    // v = 137 * 2 + 35 = 309
    assert!(encoded.windows(3).any(|w| w == [0x82, 0x01, 0x35]));

    let decoded = TransactionSigned::decode_enveloped(&encoded).unwrap();
    assert_eq!(decoded.chain_id(), Some(137));
    assert_eq!(decoded, signed);
}
