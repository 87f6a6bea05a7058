use crate::{encode_list, list_length, DecodeError, Decodable, Encodable, Header};
use alloc::vec::Vec;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Lists nested deeper than this are rejected by [`RlpItem::decode_at`].
pub const MAX_DEPTH: usize = 256;

/// A decoded RLP value: either a byte string or a list of further items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RlpItem {
    /// A byte string.
    Bytes(Bytes),
    /// A list of items.
    List(Vec<RlpItem>),
}

/// Failure to decode an [`RlpItem`], located within the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemError {
    /// Absolute offset of the item that failed to decode.
    pub offset: usize,
    /// Payload length declared by that item's header, or 0 if the header itself was unreadable.
    pub expected_len: usize,
    /// The underlying codec error.
    pub error: DecodeError,
}

impl core::fmt::Display for ItemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "invalid rlp item at offset {} (expected length {}): {}",
            self.offset, self.expected_len, self.error
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ItemError {}

impl RlpItem {
    /// Returns the canonical encoding of this item.
    pub fn encoded(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.length());
        self.encode(&mut out);
        out.freeze()
    }

    /// Decodes the item starting at `offset` and returns it with the number of bytes it spans.
    ///
    /// Nested items are bounded by their parent's payload. Error offsets are absolute
    /// positions in `buf`.
    pub fn decode_at(buf: &[u8], offset: usize) -> Result<(Self, usize), ItemError> {
        decode_nested(buf, offset, 0)
    }

    /// Decodes a single item that must span all of `buf`.
    pub fn decode_exact(buf: &[u8]) -> Result<Self, ItemError> {
        let (item, consumed) = Self::decode_at(buf, 0)?;
        if consumed != buf.len() {
            return Err(ItemError {
                offset: consumed,
                expected_len: consumed,
                error: DecodeError::TrailingBytes { remaining: buf.len() - consumed },
            })
        }
        Ok(item)
    }

    /// Returns the byte string, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpItem::Bytes(bytes) => Some(bytes),
            RlpItem::List(_) => None,
        }
    }

    /// Returns the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            RlpItem::Bytes(_) => None,
            RlpItem::List(items) => Some(items),
        }
    }

    /// Returns true if this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, RlpItem::List(_))
    }
}

fn decode_nested(buf: &[u8], offset: usize, depth: usize) -> Result<(RlpItem, usize), ItemError> {
    let fail = |expected_len, error| ItemError { offset, expected_len, error };

    if depth > MAX_DEPTH {
        return Err(fail(0, DecodeError::Custom("maximum nesting depth exceeded")))
    }

    let input = buf.get(offset..).ok_or_else(|| fail(0, DecodeError::InputTooShort))?;
    let mut cursor = input;
    let header = Header::decode_raw(&mut cursor).map_err(|error| fail(0, error))?;
    if cursor.len() < header.payload_length {
        return Err(fail(header.payload_length, DecodeError::InputTooShort))
    }

    let header_len = input.len() - cursor.len();
    let payload = &cursor[..header.payload_length];
    let consumed = header_len + header.payload_length;

    if !header.list {
        return Ok((RlpItem::Bytes(Bytes::copy_from_slice(payload)), consumed))
    }

    let payload_start = offset + header_len;
    let mut children = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let (child, used) = decode_nested(payload, pos, depth + 1)
            .map_err(|err| ItemError { offset: payload_start + err.offset, ..err })?;
        children.push(child);
        pos += used;
    }

    Ok((RlpItem::List(children), consumed))
}

impl Encodable for RlpItem {
    fn length(&self) -> usize {
        match self {
            RlpItem::Bytes(bytes) => bytes[..].length(),
            RlpItem::List(items) => list_length(items),
        }
    }

    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            RlpItem::Bytes(bytes) => bytes[..].encode(out),
            RlpItem::List(items) => encode_list(items, out),
        }
    }
}

impl Decodable for RlpItem {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let (item, consumed) = Self::decode_at(buf, 0).map_err(|err| err.error)?;
        buf.advance(consumed);
        Ok(item)
    }
}

impl From<&[u8]> for RlpItem {
    fn from(bytes: &[u8]) -> Self {
        RlpItem::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}
