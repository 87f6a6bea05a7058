#![warn(missing_debug_implementations, missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Typed Ethereum transactions.
//!
//! This crate contains the five transaction envelopes (legacy, EIP-2930, EIP-1559, EIP-4844 and
//! EIP-7702), their canonical wire encoding, signing hashes and signer recovery.

pub mod constants;
pub mod crypto;
mod transaction;

pub use constants::{KECCAK_EMPTY, MIN_TRANSACTION_GAS, SECP256K1N, SECP256K1N_HALF};
pub use crypto::{
    public_key_to_address, recover_signer_unchecked, secret_key_to_address, sign_message,
    CryptoError, EcdsaBackend, KeccakHasher, Secp256k1Backend, TinyKeccak,
};
pub use transaction::{
    legacy_v, parse_legacy_v, AccessList, AccessListItem, Authorization, DecodeErrorKind,
    FieldRangeError, SemanticError, SignedAuthorization, Signature, Transaction,
    TransactionDecodeError, TransactionSigned, TransactionSignedEcRecovered, TxEip1559,
    TxEip2930, TxEip4844, TxEip7702, TxLegacy, TxType, EIP1559_TX_TYPE_ID, EIP2930_TX_TYPE_ID,
    EIP4844_TX_TYPE_ID, EIP7702_TX_TYPE_ID, LEGACY_TX_TYPE_ID,
};

pub use alloy_primitives::{
    self, address, b256, hex, Address, Bytes, ChainId, TxKind, B256, U256,
};

/// A transaction hash is a kecack hash of an RLP encoded signed transaction.
pub type TxHash = B256;
/// An account storage key.
pub type StorageKey = B256;

#[doc(hidden)]
mod __reexport {
    pub use bytes;
    pub use tiny_keccak;
}

// Useful reexports
pub use __reexport::*;

/// Returns the keccak256 hash for the given data.
#[inline]
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    use tiny_keccak::{Hasher, Keccak};

    let mut buf = [0u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(data.as_ref());
    hasher.finalize(&mut buf);
    buf.into()
}
