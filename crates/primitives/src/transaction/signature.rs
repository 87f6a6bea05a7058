use crate::{
    constants::{EIP155_V_OFFSET, LEGACY_V_OFFSET, SECP256K1N, SECP256K1N_HALF},
    crypto::{public_key_to_address, EcdsaBackend, KeccakHasher},
    transaction::{error::FieldRangeError, util::decode_field},
    Address, ChainId, TransactionDecodeError, B256, U256,
};
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use voltaire_rlp::Encodable;

/// Returns the legacy `v` value for a signature.
///
/// `27 + y_parity` without a chain id, `chain_id * 2 + 35 + y_parity` with one (EIP-155).
pub const fn legacy_v(odd_y_parity: bool, chain_id: Option<ChainId>) -> u128 {
    match chain_id {
        Some(chain_id) => chain_id as u128 * 2 + EIP155_V_OFFSET as u128 + odd_y_parity as u128,
        None => LEGACY_V_OFFSET as u128 + odd_y_parity as u128,
    }
}

/// Splits a legacy `v` value into the y parity and the EIP-155 chain id, if any.
///
/// This is the inverse of [`legacy_v`]. Values below 27, 29 to 34, and values whose chain id
/// does not fit a [`ChainId`] are rejected.
pub fn parse_legacy_v(v: u128) -> Result<(bool, Option<ChainId>), FieldRangeError> {
    const LEGACY: u128 = LEGACY_V_OFFSET as u128;
    const EIP155: u128 = EIP155_V_OFFSET as u128;

    match v {
        LEGACY | 28 => Ok((v == 28, None)),
        v if v >= EIP155 => {
            let chain_id =
                ChainId::try_from((v - EIP155) / 2).map_err(|_| FieldRangeError::InvalidV(v))?;
            Ok(((v - EIP155) % 2 == 1, Some(chain_id)))
        }
        _ => Err(FieldRangeError::InvalidV(v)),
    }
}

/// r, s: Values corresponding to the signature of the
/// transaction and used to determine the sender of
/// the transaction; formally Tr and Ts. This is expanded in Appendix F of yellow paper.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// The R field of the signature; the point on the curve.
    pub r: U256,
    /// The S field of the signature; the point on the curve.
    pub s: U256,
    /// yParity: Signature Y parity; formally Ty
    pub odd_y_parity: bool,
}

impl Signature {
    /// Output the length of the signature without the length of the RLP header, using the legacy
    /// scheme with EIP-155 support depends on chain_id.
    pub(crate) fn payload_len_with_eip155_chain_id(&self, chain_id: Option<ChainId>) -> usize {
        self.v(chain_id).length() + self.r.length() + self.s.length()
    }

    /// Encode the `v`, `r`, `s` values without a RLP header.
    /// Encodes the `v` value using the legacy scheme with EIP-155 support depends on chain_id.
    pub(crate) fn encode_with_eip155_chain_id(
        &self,
        out: &mut dyn BufMut,
        chain_id: Option<ChainId>,
    ) {
        self.v(chain_id).encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    /// Output the `v` of the signature depends on chain_id
    #[inline]
    pub const fn v(&self, chain_id: Option<ChainId>) -> u128 {
        legacy_v(self.odd_y_parity, chain_id)
    }

    /// Decodes the `v`, `r`, `s` values without a RLP header.
    /// This will return a chain ID if the `v` value is [EIP-155](https://github.com/ethereum/EIPs/blob/master/EIPS/eip-155.md) compatible.
    pub(crate) fn decode_with_eip155_chain_id(
        buf: &mut &[u8],
    ) -> Result<(Self, Option<ChainId>), TransactionDecodeError> {
        let v: u128 = decode_field(buf, "v")?;
        let r = decode_field(buf, "r")?;
        let s = decode_field(buf, "s")?;
        let (odd_y_parity, chain_id) = parse_legacy_v(v)?;
        Ok((Self { r, s, odd_y_parity }, chain_id))
    }

    /// Output the length of the signature without the length of the RLP header
    pub(crate) fn payload_len(&self) -> usize {
        self.odd_y_parity.length() + self.r.length() + self.s.length()
    }

    /// Encode the `odd_y_parity`, `r`, `s` values without a RLP header.
    pub(crate) fn encode(&self, out: &mut dyn BufMut) {
        self.odd_y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    /// Decodes the `odd_y_parity`, `r`, `s` values without a RLP header.
    pub(crate) fn decode(buf: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        Self::decode_named(buf, "y_parity")
    }

    /// Like [`Signature::decode`], naming the parity field `field` in errors.
    pub(crate) fn decode_named(
        buf: &mut &[u8],
        field: &'static str,
    ) -> Result<Self, TransactionDecodeError> {
        let odd_y_parity = match decode_field::<u64>(buf, field)? {
            0 => false,
            1 => true,
            value => return Err(FieldRangeError::InvalidYParity { field, value }.into()),
        };
        Ok(Self { odd_y_parity, r: decode_field(buf, "r")?, s: decode_field(buf, "s")? })
    }

    /// Returns true if `r` and `s` lie in `[1, n)` and `s` is at most `n / 2` (EIP-2).
    pub fn is_valid(&self) -> bool {
        !self.r.is_zero() &&
            self.r < SECP256K1N &&
            !self.s.is_zero() &&
            self.s <= SECP256K1N_HALF
    }

    /// Recover signer from message hash, _without ensuring that the signature has a low `s`
    /// value_.
    ///
    /// Using this for signature validation will succeed, even if the signature is malleable or not
    /// compliant with EIP-2. This is provided for compatibility with old signatures which have
    /// large `s` values.
    pub fn recover_signer_unchecked_with(
        &self,
        hash: B256,
        hasher: &impl KeccakHasher,
        backend: &impl EcdsaBackend,
    ) -> Option<Address> {
        let public = backend.recover_public_key(self, &hash).ok()?;
        Some(public_key_to_address(hasher, &public))
    }

    /// Recover signer address from message hash. This ensures that the signature S value is
    /// greater than `secp256k1n / 2`, as specified in
    /// [EIP-2](https://eips.ethereum.org/EIPS/eip-2).
    ///
    /// If the S value is too large, then this will return `None`
    pub fn recover_signer_with(
        &self,
        hash: B256,
        hasher: &impl KeccakHasher,
        backend: &impl EcdsaBackend,
    ) -> Option<Address> {
        if !self.is_valid() {
            return None
        }
        self.recover_signer_unchecked_with(hash, hasher, backend)
    }

    /// Turn this signature into its byte
    /// (hex) representation.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut sig = [0u8; 65];
        sig[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        sig[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        let v = u8::from(self.odd_y_parity) + 27;
        sig[64] = v;
        sig
    }

    /// Calculates a heuristic for the in-memory size of the [Signature].
    #[inline]
    pub const fn size(&self) -> usize {
        core::mem::size_of::<Self>()
    }
}
