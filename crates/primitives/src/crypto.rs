//! Hashing and ECDSA capabilities used for signing hashes and signer recovery.
//!
//! Signing and recovery go through a [`KeccakHasher`] and an [`EcdsaBackend`]; the `*_with`
//! methods accept any implementation. [`TinyKeccak`] and [`Secp256k1Backend`] are the defaults.

use crate::{Address, Signature, B256, U256};
use auto_impl::auto_impl;

/// An uncompressed secp256k1 public key without the `0x04` tag: `x || y`.
pub type PublicKey = [u8; 64];

/// Errors returned by an [`EcdsaBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// The secret key is zero or not below the curve order.
    #[error("invalid secret key")]
    InvalidSecretKey,
    /// `r` or `s` is not a valid scalar for the curve.
    #[error("invalid signature encoding")]
    InvalidSignature,
    /// No public key could be recovered for the signature and hash.
    #[error("public key recovery failed")]
    RecoveryFailed,
    /// Any other backend failure.
    #[error("ecdsa backend error: {0}")]
    Backend(&'static str),
}

/// Keccak256 as a capability.
#[auto_impl(&, Box, Arc)]
pub trait KeccakHasher {
    /// Returns the Keccak256 digest of `data`.
    fn hash(&self, data: &[u8]) -> B256;
}

/// Recoverable secp256k1 ECDSA as a capability.
#[auto_impl(&, Box, Arc)]
pub trait EcdsaBackend {
    /// Signs the 32-byte `hash` with `secret`.
    fn sign_hash(&self, secret: &B256, hash: &B256) -> Result<Signature, CryptoError>;

    /// Recovers the public key that produced `signature` over `hash`.
    fn recover_public_key(&self, signature: &Signature, hash: &B256)
        -> Result<PublicKey, CryptoError>;
}

/// [`KeccakHasher`] backed by `tiny-keccak`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TinyKeccak;

impl KeccakHasher for TinyKeccak {
    fn hash(&self, data: &[u8]) -> B256 {
        crate::keccak256(data)
    }
}

/// [`EcdsaBackend`] backed by libsecp256k1 with the global context.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Backend;

impl EcdsaBackend for Secp256k1Backend {
    fn sign_hash(&self, secret: &B256, hash: &B256) -> Result<Signature, CryptoError> {
        use secp256k1::{Message, SecretKey, SECP256K1};

        let sec =
            SecretKey::from_slice(secret.as_ref()).map_err(|_| CryptoError::InvalidSecretKey)?;
        let message =
            Message::from_digest_slice(hash.as_ref()).map_err(|_| CryptoError::Backend("message"))?;
        let (rec_id, data) = SECP256K1.sign_ecdsa_recoverable(&message, &sec).serialize_compact();

        Ok(Signature {
            r: U256::from_be_slice(&data[..32]),
            s: U256::from_be_slice(&data[32..64]),
            odd_y_parity: rec_id.to_i32() != 0,
        })
    }

    fn recover_public_key(
        &self,
        signature: &Signature,
        hash: &B256,
    ) -> Result<PublicKey, CryptoError> {
        use secp256k1::{
            ecdsa::{RecoverableSignature, RecoveryId},
            Message, SECP256K1,
        };

        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&signature.r.to_be_bytes::<32>());
        compact[32..].copy_from_slice(&signature.s.to_be_bytes::<32>());

        let rec_id = RecoveryId::from_i32(signature.odd_y_parity as i32)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let sig = RecoverableSignature::from_compact(&compact, rec_id)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let message =
            Message::from_digest_slice(hash.as_ref()).map_err(|_| CryptoError::Backend("message"))?;
        let public =
            SECP256K1.recover_ecdsa(&message, &sig).map_err(|_| CryptoError::RecoveryFailed)?;

        let mut key = [0u8; 64];
        // strip out the first byte because that should be the SECP256K1_TAG_PUBKEY_UNCOMPRESSED
        // tag returned by libsecp's uncompressed pubkey serialization
        key.copy_from_slice(&public.serialize_uncompressed()[1..]);
        Ok(key)
    }
}

/// Converts a public key into an ethereum address by hashing the encoded public key with
/// keccak256.
pub fn public_key_to_address(hasher: &impl KeccakHasher, public: &PublicKey) -> Address {
    let hash = hasher.hash(public);
    Address::from_slice(&hash[12..])
}

/// Recovers the address of the signer of `hash` with the default backends.
///
/// Does not enforce low `s`, see [`Signature::is_valid`].
pub fn recover_signer_unchecked(
    signature: &Signature,
    hash: &B256,
) -> Result<Address, CryptoError> {
    let public = Secp256k1Backend.recover_public_key(signature, hash)?;
    Ok(public_key_to_address(&TinyKeccak, &public))
}

/// Signs message with the given secret key.
/// Returns the corresponding signature.
pub fn sign_message(secret: B256, message: B256) -> Result<Signature, CryptoError> {
    Secp256k1Backend.sign_hash(&secret, &message)
}

/// Returns the address controlled by `secret`.
pub fn secret_key_to_address(secret: &B256) -> Result<Address, CryptoError> {
    use secp256k1::{PublicKey as SecpPublicKey, SecretKey, SECP256K1};

    let sec = SecretKey::from_slice(secret.as_ref()).map_err(|_| CryptoError::InvalidSecretKey)?;
    let public = SecpPublicKey::from_secret_key(SECP256K1, &sec);
    let mut key = [0u8; 64];
    key.copy_from_slice(&public.serialize_uncompressed()[1..]);
    Ok(public_key_to_address(&TinyKeccak, &key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use hex_literal::hex;

    #[test]
    fn sanity_ecrecover_call() {
        let sig = hex!("650acf9d3f5f0a2c799776a1254355d5f4061762a237396a99a0e0e3fc2bcd6729514a0dacb2e623ac4abd157cb18163ff942280db4d5caad66ddf941ba12e0300");
        let hash = b256!("47173285a8d7341e5e972fc677286384f802f8ef42a5ec5f03bbfa254cb01fad");
        let signature = Signature {
            r: U256::from_be_slice(&sig[..32]),
            s: U256::from_be_slice(&sig[32..64]),
            odd_y_parity: sig[64] != 0,
        };

        assert_eq!(
            recover_signer_unchecked(&signature, &hash),
            Ok(address!("c08b5542d177ac6686946920409741463a15dddb"))
        );
    }

    #[test]
    fn sign_then_recover() {
        let secret = b256!("4646464646464646464646464646464646464646464646464646464646464646");
        let hash = crate::keccak256(b"voltaire");
        let signature = sign_message(secret, hash).unwrap();
        assert!(signature.is_valid());

        assert_eq!(recover_signer_unchecked(&signature, &hash), secret_key_to_address(&secret));
    }

    #[test]
    fn known_secret_key_address() {
        // EIP-155 example key
        let secret = b256!("4646464646464646464646464646464646464646464646464646464646464646");
        assert_eq!(
            secret_key_to_address(&secret),
            Ok(address!("9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"))
        );
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(sign_message(B256::ZERO, B256::ZERO), Err(CryptoError::InvalidSecretKey));

        let zero = Signature { r: U256::ZERO, s: U256::ZERO, odd_y_parity: false };
        assert!(Secp256k1Backend.recover_public_key(&zero, &B256::repeat_byte(1)).is_err());

        let overflowing = Signature { r: U256::MAX, s: U256::from(1), odd_y_parity: false };
        assert_eq!(
            Secp256k1Backend.recover_public_key(&overflowing, &B256::repeat_byte(1)),
            Err(CryptoError::InvalidSignature)
        );
    }

    /// Hasher that returns its input's length, for checking call plumbing.
    struct LengthHasher;

    impl KeccakHasher for LengthHasher {
        fn hash(&self, data: &[u8]) -> B256 {
            B256::with_last_byte(data.len() as u8)
        }
    }

    #[test]
    fn address_uses_injected_hasher() {
        let address = public_key_to_address(&LengthHasher, &[7u8; 64]);
        assert_eq!(address, Address::with_last_byte(64));
    }
}
