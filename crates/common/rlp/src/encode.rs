use crate::types::*;
use alloc::vec::Vec;
use auto_impl::auto_impl;
use bytes::{BufMut, Bytes, BytesMut};
use core::borrow::Borrow;

fn zeroless_view(v: &impl AsRef<[u8]>) -> &[u8] {
    let v = v.as_ref();
    &v[v.iter().take_while(|&&b| b == 0).count()..]
}

/// Returns the minimal big-endian representation of `value`.
///
/// Zero is represented by the empty byte string, never by `[0x00]`.
pub fn to_minimal_be_bytes(value: u128) -> Vec<u8> {
    zeroless_view(&value.to_be_bytes()).to_vec()
}

impl Header {
    /// Encodes the header into the `out` buffer.
    pub fn encode(&self, out: &mut dyn BufMut) {
        if self.payload_length < 56 {
            let code = if self.list { EMPTY_LIST_CODE } else { EMPTY_STRING_CODE };
            out.put_u8(code + self.payload_length as u8);
        } else {
            let len_be = self.payload_length.to_be_bytes();
            let len_be = zeroless_view(&len_be);
            let code = if self.list { LONG_LIST_OFFSET } else { LONG_STRING_OFFSET };
            out.put_u8(code + len_be.len() as u8);
            out.put_slice(len_be);
        }
    }

    /// Returns the length of the encoded header
    pub const fn length(&self) -> usize {
        length_of_length(self.payload_length)
    }
}

/// Returns the length of the header that prefixes a payload of `payload_length` bytes.
pub const fn length_of_length(payload_length: usize) -> usize {
    if payload_length < 56 {
        1
    } else {
        1 + (usize::BITS as usize / 8) - payload_length.leading_zeros() as usize / 8
    }
}

/// A type that can be RLP encoded.
#[auto_impl(&, Box)]
pub trait Encodable {
    /// Appends the RLP encoding of `self` to `out`.
    fn encode(&self, out: &mut dyn BufMut);

    /// Returns the length of the encoding in bytes.
    fn length(&self) -> usize {
        let mut out = BytesMut::new();
        self.encode(&mut out);
        out.len()
    }
}

impl Encodable for [u8] {
    fn length(&self) -> usize {
        let mut len = self.len();
        if self.len() != 1 || self[0] >= EMPTY_STRING_CODE {
            len += length_of_length(self.len());
        }
        len
    }

    fn encode(&self, out: &mut dyn BufMut) {
        if self.len() != 1 || self[0] >= EMPTY_STRING_CODE {
            Header { list: false, payload_length: self.len() }.encode(out);
        }
        out.put_slice(self);
    }
}

impl<const LEN: usize> Encodable for [u8; LEN] {
    fn length(&self) -> usize {
        self[..].length()
    }

    fn encode(&self, out: &mut dyn BufMut) {
        self[..].encode(out)
    }
}

macro_rules! encodable_uint {
    ($t:ty) => {
        #[allow(clippy::cmp_owned)]
        impl Encodable for $t {
            fn length(&self) -> usize {
                if *self < <$t>::from(EMPTY_STRING_CODE) {
                    1
                } else {
                    1 + (<$t>::BITS as usize / 8) - (self.leading_zeros() as usize / 8)
                }
            }

            fn encode(&self, out: &mut dyn BufMut) {
                if *self == 0 {
                    out.put_u8(EMPTY_STRING_CODE);
                } else if *self < <$t>::from(EMPTY_STRING_CODE) {
                    out.put_u8(*self as u8);
                } else {
                    let be = self.to_be_bytes();
                    let be = zeroless_view(&be);
                    out.put_u8(EMPTY_STRING_CODE + be.len() as u8);
                    out.put_slice(be);
                }
            }
        }
    };
}

encodable_uint!(usize);
encodable_uint!(u8);
encodable_uint!(u16);
encodable_uint!(u32);
encodable_uint!(u64);
encodable_uint!(u128);

impl Encodable for bool {
    fn length(&self) -> usize {
        (*self as u8).length()
    }

    fn encode(&self, out: &mut dyn BufMut) {
        (*self as u8).encode(out)
    }
}

impl Encodable for str {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_bytes().encode(out);
    }

    fn length(&self) -> usize {
        self.as_bytes().length()
    }
}

macro_rules! slice_impl {
    ($t:ty) => {
        impl $crate::Encodable for $t {
            fn length(&self) -> usize {
                self[..].length()
            }

            fn encode(&self, out: &mut dyn bytes::BufMut) {
                self[..].encode(out)
            }
        }
    };
}

slice_impl!(Bytes);
slice_impl!(BytesMut);

impl<T> Encodable for Vec<T>
where
    T: Encodable,
{
    fn length(&self) -> usize {
        list_length(self)
    }

    fn encode(&self, out: &mut dyn BufMut) {
        encode_list(self, out)
    }
}

#[cfg(feature = "alloy")]
mod alloy_support {
    use super::*;
    use alloy_primitives::{Address, FixedBytes, TxKind, U256};

    impl<const N: usize> Encodable for FixedBytes<N> {
        fn length(&self) -> usize {
            self.0.length()
        }

        fn encode(&self, out: &mut dyn BufMut) {
            self.0.encode(out)
        }
    }

    impl Encodable for Address {
        fn length(&self) -> usize {
            self.0.length()
        }

        fn encode(&self, out: &mut dyn BufMut) {
            self.0.encode(out)
        }
    }

    impl Encodable for U256 {
        fn length(&self) -> usize {
            if *self < U256::from(EMPTY_STRING_CODE) {
                1
            } else {
                1 + self.byte_len()
            }
        }

        fn encode(&self, out: &mut dyn BufMut) {
            let be = self.to_be_bytes::<32>();
            zeroless_view(&be).encode(out)
        }
    }

    impl Encodable for alloy_primitives::Bytes {
        fn length(&self) -> usize {
            self.0.length()
        }

        fn encode(&self, out: &mut dyn BufMut) {
            self.0.encode(out)
        }
    }

    /// `Create` is the empty string, `Call` is the 20-byte address.
    impl Encodable for TxKind {
        fn length(&self) -> usize {
            match self {
                TxKind::Create => 1,
                TxKind::Call(to) => to.length(),
            }
        }

        fn encode(&self, out: &mut dyn BufMut) {
            match self {
                TxKind::Create => out.put_u8(EMPTY_STRING_CODE),
                TxKind::Call(to) => to.encode(out),
            }
        }
    }
}

fn rlp_list_header<E, K>(v: &[K]) -> Header
where
    E: Encodable + ?Sized,
    K: Borrow<E>,
{
    let mut h = Header { list: true, payload_length: 0 };
    for x in v {
        h.payload_length += x.borrow().length();
    }
    h
}

/// Returns the encoded length of `v` as an RLP list, header included.
pub fn list_length<E, K>(v: &[K]) -> usize
where
    E: Encodable,
    K: Borrow<E>,
{
    let payload_length = rlp_list_header(v).payload_length;
    length_of_length(payload_length) + payload_length
}

/// Encodes `v` as an RLP list.
pub fn encode_list<E, K>(v: &[K], out: &mut dyn BufMut)
where
    E: Encodable + ?Sized,
    K: Borrow<E>,
{
    let h = rlp_list_header(v);
    h.encode(out);
    for x in v {
        x.borrow().encode(out);
    }
}

/// Encodes the items of a cloneable iterator as an RLP list.
pub fn encode_iter<'a, K>(i: impl Iterator<Item = &'a K> + Clone, out: &mut dyn BufMut)
where
    K: Encodable + 'a,
{
    let mut h = Header { list: true, payload_length: 0 };
    for x in i.clone() {
        h.payload_length += x.length();
    }

    h.encode(out);
    for x in i {
        x.encode(out);
    }
}
