//! Canonical RLP encoding and decoding, with a streaming trait-based codec and an
//! [`RlpItem`] tree for inspecting arbitrary payloads.
#![warn(missing_debug_implementations, missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod decode;
mod encode;
mod item;
mod types;

pub use bytes::BufMut;

pub use decode::{list_item_count, DecodeError, Decodable};
pub use encode::{
    encode_iter, encode_list, length_of_length, list_length, to_minimal_be_bytes, Encodable,
};
pub use item::{ItemError, RlpItem, MAX_DEPTH};
pub use types::{Header, EMPTY_LIST_CODE, EMPTY_STRING_CODE};
