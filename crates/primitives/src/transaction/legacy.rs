use crate::{
    transaction::{
        error::TransactionDecodeError,
        signature::Signature,
        util::{decode_field, decode_kind, decode_tx_fields},
    },
    Bytes, ChainId, TxKind, TxType, U256,
};
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::mem;
use voltaire_rlp::{length_of_length, Encodable, Header, EMPTY_STRING_CODE};

/// Legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxLegacy {
    /// Added as EIP-155: Simple replay attack protection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainId>,
    /// A scalar value equal to the number of transactions sent by the sender; formally Tn.
    pub nonce: u64,
    /// A scalar value equal to the number of
    /// Wei to be paid per unit of gas for all computation
    /// costs incurred as a result of the execution of this transaction; formally Tp.
    ///
    /// As ethereum circulation is around 120mil eth as of 2022 that is around
    /// 120000000000000000000000000 wei we are safe to use u128 as its max number is:
    /// 340282366920938463463374607431768211455
    pub gas_price: u128,
    /// A scalar value equal to the maximum
    /// amount of gas that should be used in executing
    /// this transaction. This is paid up-front, before any
    /// computation is done and may not be increased
    /// later; formally Tg.
    pub gas_limit: u64,
    /// The 160-bit address of the message call’s recipient or, for a contract creation
    /// transaction, ∅, used here to denote the only member of B0 ; formally Tt.
    pub to: TxKind,
    /// A scalar value equal to the number of Wei to
    /// be transferred to the message call’s recipient or,
    /// in the case of contract creation, as an endowment
    /// to the newly created account; formally Tv.
    pub value: U256,
    /// Input has two uses depending if transaction is Create or Call (if `to` field is None or
    /// Some). pub init: An unlimited size byte array specifying the
    /// EVM-code for the account initialisation procedure CREATE,
    /// data: An unlimited size byte array specifying the
    /// input data of the message call, formally Td.
    pub input: Bytes,
}

impl TxLegacy {
    /// Number of RLP fields in a signed legacy transaction.
    pub(crate) const FIELD_COUNT: usize = 9;

    /// Calculates a heuristic for the in-memory size of the [TxLegacy] transaction.
    #[inline]
    pub fn size(&self) -> usize {
        mem::size_of::<Option<ChainId>>() + // chain_id
        mem::size_of::<u64>() + // nonce
        mem::size_of::<u128>() + // gas_price
        mem::size_of::<u64>() + // gas_limit
        mem::size_of::<TxKind>() + // to
        mem::size_of::<U256>() + // value
        self.input.len() // input
    }

    /// Outputs the length of the transaction's fields, without a RLP header or length of the
    /// eip155 fields.
    pub(crate) fn fields_len(&self) -> usize {
        self.nonce.length() +
            self.gas_price.length() +
            self.gas_limit.length() +
            self.to.length() +
            self.value.length() +
            self.input.length()
    }

    /// Encodes only the transaction's fields into the desired buffer, without a RLP header or
    /// eip155 fields.
    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
    }

    /// Decodes the fields in the following order, without the signature:
    ///
    /// - `nonce`
    /// - `gas_price`
    /// - `gas_limit`
    /// - `to`
    /// - `value`
    /// - `input`
    fn decode_fields(buf: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        Ok(Self {
            chain_id: None,
            nonce: decode_field(buf, "nonce")?,
            gas_price: decode_field(buf, "gas_price")?,
            gas_limit: decode_field(buf, "gas_limit")?,
            to: decode_kind(buf)?,
            value: decode_field(buf, "value")?,
            input: decode_field(buf, "input")?,
        })
    }

    /// Outputs the length of EIP-155 fields. Only outputs a non-zero value for EIP-155 legacy
    /// transactions.
    pub(crate) fn eip155_fields_len(&self) -> usize {
        if let Some(id) = self.chain_id {
            // EIP-155 encodes the chain ID and two zeroes, so we add 2 to the length of the chain
            // ID to get the length of all 3 fields
            // len(chain_id) + (0x00) + (0x00)
            id.length() + 2
        } else {
            // this is either a pre-EIP-155 legacy transaction or a typed transaction
            0
        }
    }

    /// Encodes EIP-155 arguments into the desired buffer. Only encodes values for legacy
    /// transactions.
    pub(crate) fn encode_eip155_signing_fields(&self, out: &mut dyn BufMut) {
        // if this is a legacy transaction without a chain ID, it must be pre-EIP-155
        // and does not need to encode the chain ID for the signature hash encoding
        if let Some(id) = self.chain_id {
            // EIP-155 encodes the chain ID and two zeroes
            id.encode(out);
            out.put_u8(EMPTY_STRING_CODE);
            out.put_u8(EMPTY_STRING_CODE);
        }
    }

    /// Inner encoding function that is used for both rlp [`Encodable`] trait and for calculating
    /// hash.
    pub(crate) fn encode_with_signature(&self, signature: &Signature, out: &mut dyn BufMut) {
        let payload_length =
            self.fields_len() + signature.payload_len_with_eip155_chain_id(self.chain_id);
        let header = Header { list: true, payload_length };
        header.encode(out);
        self.encode_fields(out);
        signature.encode_with_eip155_chain_id(out, self.chain_id);
    }

    /// Output the length of the RLP signed transaction encoding.
    pub(crate) fn payload_len_with_signature(&self, signature: &Signature) -> usize {
        let payload_length =
            self.fields_len() + signature.payload_len_with_eip155_chain_id(self.chain_id);
        // 'header length' + 'payload length'
        length_of_length(payload_length) + payload_length
    }

    /// Encodes the legacy transaction in RLP for signing, including the EIP-155 fields if possible.
    ///
    /// Legacy transactions have no type byte: the preimage is the bare list
    /// `[nonce, gas_price, gas_limit, to, value, input]` with `chain_id, 0, 0` appended under
    /// EIP-155.
    pub(crate) fn encode_for_signing(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.fields_len() + self.eip155_fields_len() }
            .encode(out);
        self.encode_fields(out);
        self.encode_eip155_signing_fields(out);
    }

    /// Outputs the length of the signature RLP encoding for the transaction, including the length
    /// of the EIP-155 fields if possible.
    pub(crate) fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len() + self.eip155_fields_len();
        // 'header length' + 'payload length'
        length_of_length(payload_length) + payload_length
    }

    /// Decodes a signed legacy transaction, recovering the chain id from `v`.
    pub(crate) fn decode_signed(
        buf: &mut &[u8],
    ) -> Result<(Self, Signature), TransactionDecodeError> {
        let mut fields = decode_tx_fields(buf, TxType::Legacy, Self::FIELD_COUNT)?;
        let mut transaction = Self::decode_fields(&mut fields)?;
        let (signature, chain_id) = Signature::decode_with_eip155_chain_id(&mut fields)?;
        transaction.chain_id = chain_id;
        Ok((transaction, signature))
    }

    /// Get transaction type
    pub(crate) const fn tx_type(&self) -> TxType {
        TxType::Legacy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{address, FieldRangeError, Transaction, TransactionSigned, B256};
    use assert_matches::assert_matches;
    use bytes::BytesMut;
    use hex_literal::hex;

    fn transfer() -> TxLegacy {
        TxLegacy {
            chain_id: None,
            nonce: 0,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(address!("742d35Cc6634C0532925a3b844Bc9e7595f0bEb0")),
            value: U256::from(1_000_000_000_000_000_000u64),
            input: Bytes::new(),
        }
    }

    #[test]
    fn signing_preimage_with_and_without_chain_id() {
        let mut tx = transfer();
        let mut unprotected = BytesMut::new();
        tx.encode_for_signing(&mut unprotected);
        assert_eq!(unprotected.len(), tx.payload_len_for_signature());

        tx.chain_id = Some(1);
        let mut protected = BytesMut::new();
        tx.encode_for_signing(&mut protected);
        assert_eq!(protected.len(), tx.payload_len_for_signature());
        // chain id and two empty strings
        assert_eq!(protected.len(), unprotected.len() + 3);
        assert_eq!(&protected[protected.len() - 3..], &[0x01, 0x80, 0x80]);
        assert!(protected[0] >= 0xc0);
    }

    #[test]
    fn encode_decode_fields() {
        let tx = transfer();
        let signature = Signature { r: U256::from(1), s: U256::from(2), odd_y_parity: true };

        let mut out = BytesMut::new();
        tx.encode_with_signature(&signature, &mut out);
        assert_eq!(out.len(), tx.payload_len_with_signature(&signature));

        let mut buf = &out[..];
        let (decoded, decoded_signature) = TxLegacy::decode_signed(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert_eq!(decoded, tx);
        assert_eq!(decoded_signature, signature);
    }

    #[test]
    fn v_between_legacy_and_eip155_is_rejected() {
        let tx = transfer();
        let mut fields = BytesMut::new();
        tx.encode_fields(&mut fields);
        30u8.encode(&mut fields);
        1u8.encode(&mut fields);
        1u8.encode(&mut fields);
        let mut out = BytesMut::new();
        Header { list: true, payload_length: fields.len() }.encode(&mut out);
        out.extend_from_slice(&fields);

        assert_eq!(
            TxLegacy::decode_signed(&mut &out[..]).unwrap_err(),
            TransactionDecodeError::from(FieldRangeError::InvalidV(30))
        );
    }

    #[test]
    fn wrong_field_count() {
        // six fields without a signature
        let tx = transfer();
        let mut out = BytesMut::new();
        tx.encode_for_signing(&mut out);
        assert_matches!(
            TxLegacy::decode_signed(&mut &out[..]),
            Err(TransactionDecodeError::FieldCount { tx_type: TxType::Legacy, expected: 9, got: 6 })
        );
    }

    #[test]
    fn decode_raw_tx_and_recover_signer() {
        // transaction is from ropsten
        let hash: B256 =
            hex!("559fb34c4a7f115db26cbf8505389475caaab3df45f5c7a0faa4abfa3835306c").into();
        let signer = address!("641c5d790f862a58ec7abcfd644c0442e9c201b3");
        let raw = hex!("f88b8212b085028fa6ae00830f424094aad593da0c8116ef7d2d594dd6a63241bccfc26c80a48318b64b000000000000000000000000641c5d790f862a58ec7abcfd644c0442e9c201b32aa0a6ef9e170bca5ffb7ac05433b13b7043de667fbb0b4a5e45d3b54fb2d6efcc63a0037ec2c05c3d60c5f5f78244ce0a3859e3a18a36c61efb061b383507d3ce19d2");

        let tx = TransactionSigned::decode_enveloped(&raw).unwrap();
        assert_eq!(tx.hash(), hash, "Expected same hash");
        assert_eq!(tx.chain_id(), Some(3));
        assert_eq!(tx.recover_signer(), Some(signer), "Recovering signer should pass.");
    }

    // <https://etherscan.io/tx/0x280cde7cdefe4b188750e76c888f13bd05ce9a4d7767730feefe8a0e50ca6fc4>
    #[test]
    fn recover_legacy_signer() {
        let data = hex!("f9015482078b8505d21dba0083022ef1947a250d5630b4cf539739df2c5dacb4c659f2488d880c46549a521b13d8b8e47ff36ab50000000000000000000000000000000000000000000066ab5a608bd00a23f2fe000000000000000000000000000000000000000000000000000000000000008000000000000000000000000048c04ed5691981c42154c6167398f95e8f38a7ff00000000000000000000000000000000000000000000000000000000632ceac70000000000000000000000000000000000000000000000000000000000000002000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc20000000000000000000000006c6ee5e31d828de241282b9606c8e98ea48526e225a0c9077369501641a92ef7399ff81c21639ed4fd8fc69cb793cfa1dbfab342e10aa0615facb2f1bcf3274a354cfe384a38d0cc008a11c2dd23a69111bc6930ba27a8");
        let tx = TransactionSigned::decode_enveloped(&data).unwrap();
        assert_matches!(tx.transaction, Transaction::Legacy(TxLegacy { chain_id: Some(1), .. }));
        let sender = tx.recover_signer().unwrap();
        assert_eq!(sender, address!("a12e1462d0ceD572f396F58B6E2D03894cD7C8a4"));
    }

    // <https://github.com/paradigmxyz/reth/issues/7750>
    // <https://etherscan.io/tx/0x2084b8144eea4031c2fa7dfe343498c5e665ca85ed17825f2925f0b5b01c36ac>
    #[test]
    fn recover_pre_eip2() {
        let data = hex!("f8ea0c850ba43b7400832dc6c0942935aa0a2d2fbb791622c29eb1c117b65b7a908580b884590528a9000000000000000000000001878ace42092b7f1ae1f28d16c1272b1aa80ca4670000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000d02ab486cedc0000000000000000000000000000000000000000000000000000557fe293cabc08cf1ca05bfaf3fda0a56b49cc78b22125feb5ae6a99d2b4781f00507d8b02c173771c85a0b5da0dbe6c5bc53740d0071fc83eb17ba0f709e49e9ae7df60dee625ef51afc5");
        let tx = TransactionSigned::decode_enveloped(&data).unwrap();
        assert_eq!(tx.chain_id(), None);
        assert!(tx.recover_signer().is_none());
        let sender = tx.recover_signer_unchecked().unwrap();
        assert_eq!(sender, address!("7e9e359edf0dbacf96a9952fa63092d919b0842b"));
    }
}
