use crate::types::*;
use alloc::vec::Vec;
use bytes::{Buf, Bytes, BytesMut};

/// A type that can be decoded from RLP.
pub trait Decodable: Sized {
    /// Decodes `Self` from the front of `buf`, advancing it past the consumed bytes.
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError>;
}

impl<T> Decodable for alloc::boxed::Box<T>
where
    T: Decodable + Sized,
{
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        T::decode(buf).map(alloc::boxed::Box::new)
    }
}

/// Errors that can occur while decoding RLP.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// The value does not fit the target type.
    Overflow,
    /// An integer or length was encoded with leading zero bytes.
    LeadingZero,
    /// The input ended before the declared payload.
    InputTooShort,
    /// A single byte below `0x80` was wrapped in a string header.
    NonCanonicalSingleByte,
    /// A payload shorter than 56 bytes used the long-form header.
    NonCanonicalSize,
    /// A fixed-size value had the wrong length.
    UnexpectedLength,
    /// Expected a list, found a string.
    UnexpectedString,
    /// Expected a string, found a list.
    UnexpectedList,
    /// A list had a different number of items than expected.
    ListLengthMismatch {
        /// Items required.
        expected: usize,
        /// Items present.
        got: usize,
    },
    /// Bytes were left over after a complete item.
    TrailingBytes {
        /// Number of unconsumed bytes.
        remaining: usize,
    },
    /// Any other error.
    Custom(&'static str),
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Overflow => write!(f, "overflow"),
            DecodeError::LeadingZero => write!(f, "leading zero"),
            DecodeError::InputTooShort => write!(f, "input too short"),
            DecodeError::NonCanonicalSingleByte => write!(f, "non-canonical single byte"),
            DecodeError::NonCanonicalSize => write!(f, "non-canonical size"),
            DecodeError::UnexpectedLength => write!(f, "unexpected length"),
            DecodeError::UnexpectedString => write!(f, "unexpected string"),
            DecodeError::UnexpectedList => write!(f, "unexpected list"),
            DecodeError::ListLengthMismatch { expected, got } => {
                write!(f, "list length mismatch: expected {expected}, got {got}")
            }
            DecodeError::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after item")
            }
            DecodeError::Custom(err) => write!(f, "{err}"),
        }
    }
}

impl Header {
    /// Returns the decoded header.
    ///
    /// Returns an error if the given `buf`'s len is less than the expected payload.
    pub fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let h = Self::decode_raw(buf)?;
        if buf.remaining() < h.payload_length {
            return Err(DecodeError::InputTooShort)
        }
        Ok(h)
    }

    /// Decodes only the header, without checking that the declared payload is present.
    ///
    /// For a single byte below `0x80` the byte is its own payload and `buf` is not advanced.
    pub fn decode_raw(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        if !buf.has_remaining() {
            return Err(DecodeError::InputTooShort)
        }

        let b = buf[0];
        let h: Self = {
            if b < EMPTY_STRING_CODE {
                Self { list: false, payload_length: 1 }
            } else if b < 0xB8 {
                buf.advance(1);
                let h = Self { list: false, payload_length: b as usize - 0x80 };

                if h.payload_length == 1 {
                    if !buf.has_remaining() {
                        return Err(DecodeError::InputTooShort)
                    }
                    if buf[0] < EMPTY_STRING_CODE {
                        return Err(DecodeError::NonCanonicalSingleByte)
                    }
                }

                h
            } else if b < EMPTY_LIST_CODE {
                buf.advance(1);
                let payload_length = decode_long_length(buf, b - LONG_STRING_OFFSET)?;
                Self { list: false, payload_length }
            } else if b < 0xF8 {
                buf.advance(1);
                Self { list: true, payload_length: b as usize - 0xC0 }
            } else {
                buf.advance(1);
                let payload_length = decode_long_length(buf, b - LONG_LIST_OFFSET)?;
                Self { list: true, payload_length }
            }
        };

        Ok(h)
    }
}

fn decode_long_length(buf: &mut &[u8], len_of_len: u8) -> Result<usize, DecodeError> {
    let len_of_len = len_of_len as usize;
    if buf.len() < len_of_len {
        return Err(DecodeError::InputTooShort)
    }
    let payload_length = usize::try_from(u64::from_be_bytes(
        static_left_pad(&buf[..len_of_len]).ok_or(DecodeError::LeadingZero)?,
    ))
    .map_err(|_| DecodeError::Custom("Input too big"))?;
    buf.advance(len_of_len);
    if payload_length < 56 {
        return Err(DecodeError::NonCanonicalSize)
    }
    Ok(payload_length)
}

fn static_left_pad<const LEN: usize>(data: &[u8]) -> Option<[u8; LEN]> {
    if data.len() > LEN {
        return None
    }

    let mut v = [0; LEN];

    if data.is_empty() {
        return Some(v)
    }

    if data[0] == 0 {
        return None
    }

    v[LEN - data.len()..].copy_from_slice(data);
    Some(v)
}

/// Counts the top-level items of an RLP list payload (the bytes after the list header).
///
/// Fails if any item is malformed or the last item runs past the end of `payload`.
pub fn list_item_count(mut payload: &[u8]) -> Result<usize, DecodeError> {
    let mut count = 0;
    while !payload.is_empty() {
        let h = Header::decode(&mut payload)?;
        payload.advance(h.payload_length);
        count += 1;
    }
    Ok(count)
}

macro_rules! decode_integer {
    ($t:ty) => {
        impl Decodable for $t {
            fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
                let h = Header::decode(buf)?;
                if h.list {
                    return Err(DecodeError::UnexpectedList)
                }
                if h.payload_length > (<$t>::BITS as usize / 8) {
                    return Err(DecodeError::Overflow)
                }
                if buf.remaining() < h.payload_length {
                    return Err(DecodeError::InputTooShort)
                }
                // In the case of 0x80, the Header will be decoded, leaving h.payload_length to be
                // zero.
                // 0x80 is the canonical encoding of 0, so we return 0 here.
                if h.payload_length == 0 {
                    return Ok(<$t>::from(0u8))
                }
                let v = <$t>::from_be_bytes(
                    static_left_pad(&buf[..h.payload_length]).ok_or(DecodeError::LeadingZero)?,
                );
                buf.advance(h.payload_length);
                Ok(v)
            }
        }
    };
}

decode_integer!(usize);
decode_integer!(u8);
decode_integer!(u16);
decode_integer!(u32);
decode_integer!(u64);
decode_integer!(u128);

impl Decodable for bool {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(match u8::decode(buf)? {
            0 => false,
            1 => true,
            _ => return Err(DecodeError::Custom("invalid bool value, must be 0 or 1")),
        })
    }
}

impl<const N: usize> Decodable for [u8; N] {
    fn decode(from: &mut &[u8]) -> Result<Self, DecodeError> {
        let h = Header::decode(from)?;
        if h.list {
            return Err(DecodeError::UnexpectedList)
        }
        if h.payload_length != N {
            return Err(DecodeError::UnexpectedLength)
        }

        let mut to = [0_u8; N];
        to.copy_from_slice(&from[..N]);
        from.advance(N);

        Ok(to)
    }
}

impl Decodable for BytesMut {
    fn decode(from: &mut &[u8]) -> Result<Self, DecodeError> {
        let h = Header::decode(from)?;
        if h.list {
            return Err(DecodeError::UnexpectedList)
        }
        let mut to = BytesMut::with_capacity(h.payload_length);
        to.extend_from_slice(&from[..h.payload_length]);
        from.advance(h.payload_length);

        Ok(to)
    }
}

impl Decodable for Bytes {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        BytesMut::decode(buf).map(BytesMut::freeze)
    }
}

#[cfg(feature = "alloy")]
mod alloy_support {
    use super::*;
    use alloy_primitives::{Address, FixedBytes, TxKind, U256};

    impl<const N: usize> Decodable for FixedBytes<N> {
        fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
            <[u8; N]>::decode(buf).map(Self)
        }
    }

    impl Decodable for Address {
        fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
            FixedBytes::<20>::decode(buf).map(Self)
        }
    }

    impl Decodable for U256 {
        fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
            let h = Header::decode(buf)?;
            if h.list {
                return Err(DecodeError::UnexpectedList)
            }
            if h.payload_length > 32 {
                return Err(DecodeError::Overflow)
            }
            if h.payload_length == 0 {
                return Ok(U256::ZERO)
            }
            let be = static_left_pad::<32>(&buf[..h.payload_length])
                .ok_or(DecodeError::LeadingZero)?;
            buf.advance(h.payload_length);
            Ok(U256::from_be_bytes(be))
        }
    }

    impl Decodable for alloy_primitives::Bytes {
        fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
            Bytes::decode(buf).map(Self)
        }
    }

    impl Decodable for TxKind {
        fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
            if let Some(&first) = buf.first() {
                if first == EMPTY_STRING_CODE {
                    buf.advance(1);
                    Ok(TxKind::Create)
                } else {
                    Ok(TxKind::Call(Address::decode(buf)?))
                }
            } else {
                Err(DecodeError::InputTooShort)
            }
        }
    }
}

impl<E> Decodable for Vec<E>
where
    E: Decodable,
{
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let h = Header::decode(buf)?;
        if !h.list {
            return Err(DecodeError::UnexpectedString)
        }

        let payload_view = &mut &buf[..h.payload_length];

        let mut to = Vec::new();
        while !payload_view.is_empty() {
            to.push(E::decode(payload_view)?);
        }

        buf.advance(h.payload_length);

        Ok(to)
    }
}
