use crate::{
    constants::eip4844::DATA_GAS_PER_BLOB,
    transaction::{
        access_list::AccessList,
        error::{SemanticError, TransactionDecodeError},
        signature::Signature,
        util::{
            decode_address, decode_b256, decode_field, decode_list_payload, decode_tx_fields,
            take_empty_string,
        },
    },
    Address, Bytes, ChainId, TxType, B256, U256,
};
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::mem;
use voltaire_rlp::{length_of_length, Encodable, Header};

/// [EIP-4844 Blob Transaction](https://eips.ethereum.org/EIPS/eip-4844#blob-transaction)
///
/// A transaction with blob hashes and max blob fee. Blob transactions always call an account:
/// the recipient is a plain [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEip4844 {
    /// Added as EIP-155: Simple replay attack protection
    pub chain_id: ChainId,
    /// A scalar value equal to the number of transactions sent by the sender; formally Tn.
    pub nonce: u64,
    /// A scalar value equal to the maximum
    /// amount of gas that should be used in executing
    /// this transaction. This is paid up-front, before any
    /// computation is done and may not be increased
    /// later; formally Tg.
    pub gas_limit: u64,
    /// A scalar value equal to the maximum total fee per unit of gas
    /// the sender is willing to pay.
    pub max_fee_per_gas: u128,
    /// Max Priority fee that transaction is paying
    pub max_priority_fee_per_gas: u128,
    /// The 160-bit address of the message call’s recipient.
    pub to: Address,
    /// A scalar value equal to the number of Wei to
    /// be transferred to the message call’s recipient.
    pub value: U256,
    /// The accessList specifies a list of addresses and storage keys;
    /// these addresses and storage keys are added into the `accessed_addresses`
    /// and `accessed_storage_keys` global sets (introduced in EIP-2929).
    /// A gas cost is charged, though at a discount relative to the cost of
    /// accessing outside the list.
    pub access_list: AccessList,
    /// It contains a vector of fixed size hash(32 bytes)
    pub blob_versioned_hashes: Vec<B256>,
    /// Max fee per data gas
    ///
    /// aka BlobFeeCap or blobGasFeeCap
    pub max_fee_per_blob_gas: u128,
    /// Unlike other transaction types, where the `input` field has two uses depending on whether
    /// or not the `to` field is [`Create`](crate::TxKind::Create) or
    /// [`Call`](crate::TxKind::Call), EIP-4844 transactions cannot be
    /// [`Create`](crate::TxKind::Create) transactions.
    ///
    /// This means the `input` field has a single use, as data: An unlimited size byte array
    /// specifying the input data of the message call, formally Td.
    pub input: Bytes,
}

impl TxEip4844 {
    /// Number of RLP fields in a signed EIP-4844 transaction.
    pub(crate) const FIELD_COUNT: usize = 14;

    /// Returns the effective gas price for the given `base_fee`.
    pub fn effective_gas_price(&self, base_fee: Option<u64>) -> u128 {
        match base_fee {
            None => self.max_fee_per_gas,
            Some(base_fee) => (base_fee as u128)
                .saturating_add(self.max_priority_fee_per_gas)
                .min(self.max_fee_per_gas),
        }
    }

    /// Returns the total gas for all blobs in this transaction.
    #[inline]
    pub fn blob_gas(&self) -> u64 {
        // NOTE: we don't expect u64::MAX / DATA_GAS_PER_BLOB hashes in a single transaction
        self.blob_versioned_hashes.len() as u64 * DATA_GAS_PER_BLOB
    }

    /// Calculates a heuristic for the in-memory size of the [TxEip4844] transaction.
    #[inline]
    pub fn size(&self) -> usize {
        mem::size_of::<ChainId>() + // chain_id
        mem::size_of::<u64>() + // nonce
        mem::size_of::<u64>() + // gas_limit
        mem::size_of::<u128>() + // max_fee_per_gas
        mem::size_of::<u128>() + // max_priority_fee_per_gas
        mem::size_of::<Address>() + // to
        mem::size_of::<U256>() + // value
        self.access_list.size() + // access_list
        self.input.len() +  // input
        self.blob_versioned_hashes.capacity() * mem::size_of::<B256>() + // blob hashes size
        mem::size_of::<u128>() // max_fee_per_data_gas
    }

    /// Decodes the inner [TxEip4844] fields from RLP bytes.
    ///
    /// NOTE: This assumes a RLP header has already been decoded, and _just_ decodes the following
    /// RLP fields in the following order:
    ///
    /// - `chain_id`
    /// - `nonce`
    /// - `max_priority_fee_per_gas`
    /// - `max_fee_per_gas`
    /// - `gas_limit`
    /// - `to`
    /// - `value`
    /// - `data` (`input`)
    /// - `access_list`
    /// - `max_fee_per_blob_gas`
    /// - `blob_versioned_hashes`
    ///
    /// An empty `to` is rejected with [`SemanticError::BlobContractCreation`].
    pub(crate) fn decode_fields(buf: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        let chain_id = decode_field(buf, "chain_id")?;
        let nonce = decode_field(buf, "nonce")?;
        let max_priority_fee_per_gas = decode_field(buf, "max_priority_fee_per_gas")?;
        let max_fee_per_gas = decode_field(buf, "max_fee_per_gas")?;
        let gas_limit = decode_field(buf, "gas_limit")?;
        if take_empty_string(buf) {
            return Err(SemanticError::BlobContractCreation.into())
        }
        let to = decode_address(buf, "to")?;
        let value = decode_field(buf, "value")?;
        let input = decode_field(buf, "input")?;
        let access_list = AccessList::decode_field(buf)?;
        let max_fee_per_blob_gas = decode_field(buf, "max_fee_per_blob_gas")?;

        let mut hashes = decode_list_payload(buf, "blob_versioned_hashes")?;
        let mut blob_versioned_hashes = Vec::new();
        while !hashes.is_empty() {
            blob_versioned_hashes.push(decode_b256(&mut hashes, "blob_versioned_hashes")?);
        }

        Ok(Self {
            chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            to,
            value,
            access_list,
            blob_versioned_hashes,
            max_fee_per_blob_gas,
            input,
        })
    }

    /// Outputs the length of the transaction's fields, without a RLP header.
    pub(crate) fn fields_len(&self) -> usize {
        self.chain_id.length() +
            self.nonce.length() +
            self.gas_limit.length() +
            self.max_fee_per_gas.length() +
            self.max_priority_fee_per_gas.length() +
            self.to.length() +
            self.value.length() +
            self.access_list.length() +
            self.blob_versioned_hashes.length() +
            self.max_fee_per_blob_gas.length() +
            self.input.length()
    }

    /// Encodes only the transaction's fields into the desired buffer, without a RLP header.
    pub(crate) fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        self.access_list.encode(out);
        self.max_fee_per_blob_gas.encode(out);
        self.blob_versioned_hashes.encode(out);
    }

    /// Inner encoding function that is used for both rlp [`Encodable`] trait and for calculating
    /// hash that for eip2718 does not require rlp header
    pub(crate) fn encode_with_signature(
        &self,
        signature: &Signature,
        out: &mut dyn BufMut,
        with_header: bool,
    ) {
        let payload_length = self.fields_len() + signature.payload_len();
        if with_header {
            Header {
                list: false,
                payload_length: 1 + length_of_length(payload_length) + payload_length,
            }
            .encode(out);
        }
        out.put_u8(self.tx_type() as u8);
        let header = Header { list: true, payload_length };
        header.encode(out);
        self.encode_fields(out);
        signature.encode(out);
    }

    /// Output the length of the RLP signed transaction encoding, without a RLP string header.
    pub(crate) fn payload_len_with_signature_without_header(&self, signature: &Signature) -> usize {
        let payload_length = self.fields_len() + signature.payload_len();
        // 'transaction type byte length' + 'header length' + 'payload length'
        1 + length_of_length(payload_length) + payload_length
    }

    /// Output the length of the RLP signed transaction encoding. This encodes with a RLP header.
    pub(crate) fn payload_len_with_signature(&self, signature: &Signature) -> usize {
        let len = self.payload_len_with_signature_without_header(signature);
        length_of_length(len) + len
    }

    /// Encodes the EIP-4844 transaction in RLP for signing.
    ///
    /// This encodes the transaction as:
    /// `tx_type || rlp(chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas_limit, to,
    /// value, input, access_list, max_fee_per_blob_gas, blob_versioned_hashes)`
    ///
    /// Note that there is no rlp header before the transaction type byte.
    pub(crate) fn encode_for_signing(&self, out: &mut dyn BufMut) {
        out.put_u8(self.tx_type() as u8);
        Header { list: true, payload_length: self.fields_len() }.encode(out);
        self.encode_fields(out);
    }

    /// Outputs the length of the signature RLP encoding for the transaction.
    pub(crate) fn payload_len_for_signature(&self) -> usize {
        let payload_length = self.fields_len();
        // 'transaction type byte length' + 'header length' + 'payload length'
        1 + length_of_length(payload_length) + payload_length
    }

    /// Decodes the RLP list following the type byte.
    pub(crate) fn decode_signed(
        buf: &mut &[u8],
    ) -> Result<(Self, Signature), TransactionDecodeError> {
        let mut fields = decode_tx_fields(buf, TxType::Eip4844, Self::FIELD_COUNT)?;
        let transaction = Self::decode_fields(&mut fields)?;
        let signature = Signature::decode(&mut fields)?;
        Ok((transaction, signature))
    }

    /// Get transaction type
    pub(crate) const fn tx_type(&self) -> TxType {
        TxType::Eip4844
    }
}
