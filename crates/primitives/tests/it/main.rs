//! Root module for test modules, so that the tests are built into a single binary.

mod decode;
mod legacy;
mod roundtrip;
mod signing;

const fn main() {}

use voltaire_primitives::{
    AccessList, AccessListItem, Address, Authorization, SignedAuthorization, B256,
};

/// An access list with `len` entries, entry `i` holding `i` storage keys.
pub(crate) fn access_list(len: usize) -> AccessList {
    (0..len)
        .map(|i| AccessListItem {
            address: Address::repeat_byte(i as u8 + 1),
            storage_keys: (0..i).map(|k| B256::repeat_byte(k as u8 + 0x10)).collect(),
        })
        .collect::<Vec<_>>()
        .into()
}

/// `len` authorizations signed by a fixed authority key.
pub(crate) fn authorization_list(len: usize) -> Vec<SignedAuthorization> {
    (0..len as u64)
        .map(|nonce| {
            Authorization { chain_id: 1, address: Address::repeat_byte(0xaa), nonce }
                .sign(&authority_key())
                .unwrap()
        })
        .collect()
}

pub(crate) fn authority_key() -> B256 {
    B256::repeat_byte(0x5a)
}
