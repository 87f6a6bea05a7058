//! Subcommands of the `voltaire` binary.

pub(crate) mod config;
pub(crate) mod rlp;
pub(crate) mod tx;

use eyre::WrapErr;
use voltaire_primitives::hex;

/// Parses a hex argument, with or without a `0x` prefix.
pub(crate) fn parse_hex(input: &str) -> eyre::Result<Vec<u8>> {
    hex::decode(input.trim()).wrap_err("Argument is not valid hex")
}
