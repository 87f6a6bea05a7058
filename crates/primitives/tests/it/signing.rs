use voltaire_primitives::{
    address, keccak256, secret_key_to_address, sign_message, Address, Authorization, Bytes,
    KeccakHasher, Signature, Transaction, TransactionSigned, TxEip1559, TxEip2930, TxEip4844,
    TxEip7702, TxKind, TxLegacy, B256, U256,
};
use voltaire_rlp::Encodable;

fn secret() -> B256 {
    B256::repeat_byte(0x33)
}

fn transactions() -> Vec<Transaction> {
    let to = TxKind::Call(address!("3535353535353535353535353535353535353535"));
    vec![
        TxLegacy {
            chain_id: Some(1),
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to,
            ..Default::default()
        }
        .into(),
        TxLegacy { chain_id: None, nonce: 1, gas_limit: 21_000, to, ..Default::default() }.into(),
        TxEip2930 { chain_id: 1, to, access_list: crate::access_list(2), ..Default::default() }
            .into(),
        TxEip1559 { chain_id: 1, to, value: U256::from(1), ..Default::default() }.into(),
        TxEip4844 {
            chain_id: 1,
            to: Address::repeat_byte(0x35),
            blob_versioned_hashes: vec![B256::repeat_byte(0x01)],
            ..Default::default()
        }
        .into(),
        TxEip7702 {
            chain_id: 1,
            to,
            authorization_list: crate::authorization_list(2),
            ..Default::default()
        }
        .into(),
    ]
}

#[test]
fn signing_hash_is_deterministic() {
    for tx in transactions() {
        assert_eq!(tx.signature_hash(), tx.clone().signature_hash());

        let mut preimage = Vec::new();
        tx.encode_for_signing(&mut preimage);
        assert_eq!(preimage.len(), tx.payload_len_for_signature());
        assert_eq!(tx.signature_hash(), keccak256(&preimage));

        // the signature is not part of the preimage
        let a = tx.clone().into_signed(Signature { r: U256::from(1), ..Default::default() });
        let b = tx.clone().into_signed(Signature { r: U256::from(2), ..Default::default() });
        assert_eq!(a.signature_hash(), b.signature_hash());
        assert_ne!(a.hash(), b.hash());
    }
}

#[test]
fn signing_hash_uses_supplied_hasher() {
    #[derive(Debug)]
    struct LengthHasher;

    impl KeccakHasher for LengthHasher {
        fn hash(&self, data: &[u8]) -> B256 {
            B256::left_padding_from(&(data.len() as u64).to_be_bytes())
        }
    }

    for tx in transactions() {
        let len = tx.payload_len_for_signature() as u64;
        let expected = B256::left_padding_from(&len.to_be_bytes());
        assert_eq!(tx.signature_hash_with(&LengthHasher), expected);
    }
}

#[test]
fn sign_then_verify() {
    let sender = secret_key_to_address(&secret()).unwrap();
    for tx in transactions() {
        let signed = tx.sign(&secret()).unwrap();
        assert!(signed.signature.is_valid());
        assert_eq!(signed.recover_signer(), Some(sender));
        assert!(signed.verify_signature(sender));
        assert!(!signed.verify_signature(Address::repeat_byte(0x01)));

        let decoded = TransactionSigned::decode_enveloped(&signed.envelope_encoded()).unwrap();
        assert!(decoded.verify_signature(sender));

        let recovered = decoded.into_ecrecovered().unwrap();
        assert_eq!(recovered.signer(), sender);
        assert!(recovered.verify());
    }
}

#[test]
fn tampered_fields_fail_verification() {
    let sender = secret_key_to_address(&secret()).unwrap();
    for tx in transactions() {
        let signed = tx.clone().sign(&secret()).unwrap();
        let tampered = match tx {
            Transaction::Legacy(tx) => Transaction::Legacy(TxLegacy { nonce: tx.nonce + 1, ..tx }),
            Transaction::Eip2930(tx) => Transaction::Eip2930(TxEip2930 { gas_limit: 1, ..tx }),
            Transaction::Eip1559(tx) => {
                Transaction::Eip1559(TxEip1559 { value: U256::from(2), ..tx })
            }
            Transaction::Eip4844(tx) => {
                Transaction::Eip4844(TxEip4844 { max_fee_per_blob_gas: 1, ..tx })
            }
            Transaction::Eip7702(tx) => {
                Transaction::Eip7702(TxEip7702 { input: Bytes::from_static(&[1]), ..tx })
            }
        };
        let tampered = tampered.into_signed(signed.signature);
        assert_ne!(tampered.recover_signer(), Some(sender));
        assert!(!tampered.verify_signature(sender));
    }
}

#[test]
fn rewritten_legacy_chain_id_fails_verification() {
    let sender = secret_key_to_address(&secret()).unwrap();
    let tx = TxLegacy {
        chain_id: Some(1),
        nonce: 2,
        gas_price: 1_000_000_000,
        gas_limit: 21_000,
        to: TxKind::Call(Address::repeat_byte(0x42)),
        ..Default::default()
    };
    let signed = Transaction::Legacy(tx.clone()).sign(&secret()).unwrap();
    assert!(signed.verify_signature(sender));

    // same signature, other EIP-155 chain and no chain at all
    for chain_id in [Some(5), None] {
        let rewrapped = Transaction::Legacy(TxLegacy { chain_id, ..tx.clone() })
            .into_signed(signed.signature);
        assert!(!rewrapped.verify_signature(sender));
    }

    // rewrite v on the wire: [.., v, r, s], 37/38 for chain 1 becomes 45/46 for chain 5
    let mut encoded = signed.envelope_encoded().to_vec();
    let v = encoded.len() - signed.signature.r.length() - signed.signature.s.length() - 1;
    assert_eq!(encoded[v], 37 + signed.signature.odd_y_parity as u8);
    encoded[v] += 8;

    let decoded = TransactionSigned::decode_enveloped(&encoded).unwrap();
    assert_eq!(decoded.chain_id(), Some(5));
    assert_eq!(decoded.signature, signed.signature);
    assert!(!decoded.verify_signature(sender));
}

#[test]
fn malformed_signatures_do_not_verify() {
    let sender = secret_key_to_address(&secret()).unwrap();
    let tx = transactions().remove(3);
    let signed = tx.clone().sign(&secret()).unwrap();

    let zero = tx.clone().into_signed(Signature::default());
    assert_eq!(zero.recover_signer(), None);
    assert!(!zero.verify_signature(sender));

    // high-s form of the same signature
    let high_s = Signature {
        s: voltaire_primitives::SECP256K1N - signed.signature.s,
        odd_y_parity: !signed.signature.odd_y_parity,
        ..signed.signature
    };
    let high_s = tx.into_signed(high_s);
    assert!(!high_s.signature.is_valid());
    assert_eq!(high_s.recover_signer_unchecked(), Some(sender));
    assert!(!high_s.verify_signature(sender));
}

#[test]
fn sign_message_matches_transaction_signing() {
    let tx = transactions().remove(3);
    let signed = tx.clone().sign(&secret()).unwrap();
    assert_eq!(sign_message(secret(), tx.signature_hash()).unwrap(), signed.signature);
}

#[test]
fn authorities_recover_from_signed_tuples() {
    let authority = secret_key_to_address(&crate::authority_key()).unwrap();
    for auth in crate::authorization_list(3) {
        assert_eq!(auth.recover_authority(), Some(authority));
        let tampered = Authorization { nonce: auth.nonce + 10, ..*auth.authorization() }
            .into_signed(*auth.signature());
        assert_ne!(tampered.recover_authority(), Some(authority));
    }
}
