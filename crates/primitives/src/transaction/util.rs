//! Field level decoding helpers shared by all envelopes.

use crate::{
    transaction::error::{FieldRangeError, TransactionDecodeError},
    Address, TxKind, TxType, B256,
};
use bytes::Buf;
use voltaire_rlp::{list_item_count, Decodable, DecodeError, Header, EMPTY_STRING_CODE};

/// Decodes one field, naming it in the error.
pub(crate) fn decode_field<T: Decodable>(
    buf: &mut &[u8],
    field: &'static str,
) -> Result<T, TransactionDecodeError> {
    T::decode(buf).map_err(TransactionDecodeError::rlp(field))
}

/// Decodes a byte string that must be exactly `N` bytes long.
pub(crate) fn decode_fixed<const N: usize>(
    buf: &mut &[u8],
    field: &'static str,
) -> Result<[u8; N], TransactionDecodeError> {
    let mut peek = *buf;
    let header = Header::decode(&mut peek).map_err(TransactionDecodeError::rlp(field))?;
    if header.list {
        return Err(TransactionDecodeError::Rlp { field, source: DecodeError::UnexpectedList })
    }
    if header.payload_length != N {
        return Err(
            FieldRangeError::InvalidLength { field, expected: N, got: header.payload_length }.into()
        )
    }
    decode_field(buf, field)
}

pub(crate) fn decode_address(
    buf: &mut &[u8],
    field: &'static str,
) -> Result<Address, TransactionDecodeError> {
    decode_fixed::<20>(buf, field).map(Address::from)
}

pub(crate) fn decode_b256(
    buf: &mut &[u8],
    field: &'static str,
) -> Result<B256, TransactionDecodeError> {
    decode_fixed::<32>(buf, field).map(B256::from)
}

/// Returns true and consumes the byte if the next item is the empty string.
pub(crate) fn take_empty_string(buf: &mut &[u8]) -> bool {
    if buf.first() == Some(&EMPTY_STRING_CODE) {
        buf.advance(1);
        return true
    }
    false
}

/// Decodes the `to` field: the empty string is contract creation.
pub(crate) fn decode_kind(buf: &mut &[u8]) -> Result<TxKind, TransactionDecodeError> {
    if take_empty_string(buf) {
        return Ok(TxKind::Create)
    }
    decode_address(buf, "to").map(TxKind::Call)
}

/// Decodes the header of a list field and returns its payload, advancing `buf` past it.
pub(crate) fn decode_list_payload<'a>(
    buf: &mut &'a [u8],
    field: &'static str,
) -> Result<&'a [u8], TransactionDecodeError> {
    let header = Header::decode(buf).map_err(TransactionDecodeError::rlp(field))?;
    if !header.list {
        return Err(TransactionDecodeError::Rlp { field, source: DecodeError::UnexpectedString })
    }
    let all: &'a [u8] = *buf;
    let payload = &all[..header.payload_length];
    *buf = &all[header.payload_length..];
    Ok(payload)
}

/// Decodes the outer field list of a transaction and checks it holds exactly `expected` items.
pub(crate) fn decode_tx_fields<'a>(
    buf: &mut &'a [u8],
    tx_type: TxType,
    expected: usize,
) -> Result<&'a [u8], TransactionDecodeError> {
    let payload = decode_list_payload(buf, "transaction")?;
    let got = list_item_count(payload).map_err(TransactionDecodeError::rlp("transaction"))?;
    if got != expected {
        return Err(TransactionDecodeError::FieldCount { tx_type, expected, got })
    }
    Ok(payload)
}

/// Like [`decode_tx_fields`] for nested lists such as access list entries.
pub(crate) fn decode_items<'a>(
    buf: &mut &'a [u8],
    field: &'static str,
    expected: usize,
) -> Result<&'a [u8], TransactionDecodeError> {
    let payload = decode_list_payload(buf, field)?;
    let got = list_item_count(payload).map_err(TransactionDecodeError::rlp(field))?;
    if got != expected {
        return Err(TransactionDecodeError::ItemCount { field, expected, got })
    }
    Ok(payload)
}
