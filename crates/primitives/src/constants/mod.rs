//! Ethereum protocol-related constants

use alloy_primitives::{b256, B256, U256};

pub mod eip4844;

/// The order of the secp256k1 curve.
pub const SECP256K1N: U256 = U256::from_limbs([
    0xbfd25e8cd0364141,
    0xbaaedce6af48a03b,
    0xfffffffffffffffe,
    0xffffffffffffffff,
]);

/// Half of [`SECP256K1N`], the largest `s` value accepted after EIP-2.
pub const SECP256K1N_HALF: U256 = U256::from_limbs([
    0xdfe92f46681b20a0,
    0x5d576e7357a4501d,
    0xffffffffffffffff,
    0x7fffffffffffffff,
]);

/// Keccak256 over empty array.
pub const KECCAK_EMPTY: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Minimum gas a transaction costs.
pub const MIN_TRANSACTION_GAS: u64 = 21_000u64;

/// Legacy `v` offset for signatures without a chain id.
pub const LEGACY_V_OFFSET: u64 = 27;

/// EIP-155 `v` offset: `v = chain_id * 2 + 35 + y_parity`.
pub const EIP155_V_OFFSET: u64 = 35;

/// Prefix byte of the EIP-7702 authorization signing preimage.
pub const EIP7702_AUTH_MAGIC: u8 = 0x05;
