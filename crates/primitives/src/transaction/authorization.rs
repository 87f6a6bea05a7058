use crate::{
    constants::EIP7702_AUTH_MAGIC,
    crypto::{EcdsaBackend, KeccakHasher, Secp256k1Backend, TinyKeccak},
    transaction::{
        error::TransactionDecodeError,
        signature::Signature,
        util::{decode_address, decode_field, decode_items, decode_list_payload},
    },
    Address, ChainId, B256,
};
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use voltaire_rlp::{length_of_length, Encodable, Header};

/// An EIP-7702 authorization: lets `address`'s code run in the context of the signing account.
///
/// A `chain_id` of 0 is valid on every chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    /// The chain the authorization is valid on.
    pub chain_id: ChainId,
    /// The account whose code is delegated to.
    pub address: Address,
    /// Nonce of the authority account.
    pub nonce: u64,
}

impl Authorization {
    fn fields_len(&self) -> usize {
        self.chain_id.length() + self.address.length() + self.nonce.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.address.encode(out);
        self.nonce.encode(out);
    }

    /// Hash signed by the authority: `keccak256(0x05 || rlp([chain_id, address, nonce]))`.
    pub fn signature_hash(&self) -> B256 {
        self.signature_hash_with(&TinyKeccak)
    }

    /// Like [`Authorization::signature_hash`] with a caller supplied hasher.
    pub fn signature_hash_with(&self, hasher: &impl KeccakHasher) -> B256 {
        let mut buf = Vec::with_capacity(1 + self.length());
        buf.put_u8(EIP7702_AUTH_MAGIC);
        self.encode(&mut buf);
        hasher.hash(&buf)
    }

    /// Attaches a signature.
    pub const fn into_signed(self, signature: Signature) -> SignedAuthorization {
        SignedAuthorization { inner: self, signature }
    }

    /// Signs the authorization with `secret`.
    pub fn sign(self, secret: &B256) -> Result<SignedAuthorization, crate::CryptoError> {
        let signature = Secp256k1Backend.sign_hash(secret, &self.signature_hash())?;
        Ok(self.into_signed(signature))
    }
}

impl Encodable for Authorization {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.fields_len() }.encode(out);
        self.encode_fields(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        payload_length + length_of_length(payload_length)
    }
}

/// An [`Authorization`] with the authority's signature, as carried in
/// [`TxEip7702`](crate::TxEip7702).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SignedAuthorization {
    #[serde(flatten)]
    inner: Authorization,
    #[serde(flatten)]
    signature: Signature,
}

impl SignedAuthorization {
    /// Creates a signed authorization from its parts.
    pub const fn new(inner: Authorization, signature: Signature) -> Self {
        Self { inner, signature }
    }

    /// The authorization that was signed.
    pub const fn authorization(&self) -> &Authorization {
        &self.inner
    }

    /// The authority's signature.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Recovers the authority address, rejecting high-s signatures.
    pub fn recover_authority(&self) -> Option<Address> {
        self.recover_authority_with(&TinyKeccak, &Secp256k1Backend)
    }

    /// Like [`SignedAuthorization::recover_authority`] with caller supplied crypto.
    pub fn recover_authority_with(
        &self,
        hasher: &impl KeccakHasher,
        backend: &impl EcdsaBackend,
    ) -> Option<Address> {
        self.signature.recover_signer_with(self.inner.signature_hash_with(hasher), hasher, backend)
    }

    fn fields_len(&self) -> usize {
        self.inner.fields_len() + self.signature.payload_len()
    }

    /// Decodes `[chain_id, address, nonce, y_parity, r, s]`.
    fn decode_entry(buf: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        let mut fields = decode_items(buf, "authorization", 6)?;
        let inner = Authorization {
            chain_id: decode_field(&mut fields, "authorization chain_id")?,
            address: decode_address(&mut fields, "authorization address")?,
            nonce: decode_field(&mut fields, "authorization nonce")?,
        };
        let signature = Signature::decode_named(&mut fields, "authorization y_parity")?;
        Ok(Self { inner, signature })
    }

    /// Decodes an authorization list field, reporting the index of the first invalid entry.
    pub(crate) fn decode_list(buf: &mut &[u8]) -> Result<Vec<Self>, TransactionDecodeError> {
        let mut entries = decode_list_payload(buf, "authorization_list")?;
        let mut list = Vec::new();
        while !entries.is_empty() {
            let index = list.len();
            let entry = Self::decode_entry(&mut entries).map_err(|err| {
                TransactionDecodeError::AuthorizationEntry { index, source: Box::new(err) }
            })?;
            list.push(entry);
        }
        Ok(list)
    }
}

impl Deref for SignedAuthorization {
    type Target = Authorization;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Encodable for SignedAuthorization {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.fields_len() }.encode(out);
        self.inner.encode_fields(out);
        self.signature.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        payload_length + length_of_length(payload_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keccak256, FieldRangeError, U256};
    use assert_matches::assert_matches;
    use bytes::BytesMut;
    use hex_literal::hex;

    fn authorization() -> Authorization {
        Authorization { chain_id: 1, address: Address::repeat_byte(0xaa), nonce: 7 }
    }

    #[test]
    fn signature_hash_preimage() {
        let auth = authorization();
        let mut expected = vec![0x05];
        // [0x01, 0xaa.., 0x07]
        expected.extend_from_slice(&hex!("d70194" "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" "07"));
        assert_eq!(auth.signature_hash(), keccak256(&expected));
    }

    #[test]
    fn sign_and_recover_authority() {
        let secret = B256::repeat_byte(0x11);
        let signed = authorization().sign(&secret).unwrap();
        let authority = crate::secret_key_to_address(&secret).unwrap();
        assert_eq!(signed.recover_authority(), Some(authority));

        let mut out = BytesMut::new();
        vec![signed].encode(&mut out);
        let decoded = SignedAuthorization::decode_list(&mut &out[..]).unwrap();
        assert_eq!(decoded, vec![signed]);
        assert_eq!(decoded[0].address, Address::repeat_byte(0xaa));

        // a different nonce changes the hash so the authority changes too
        let tampered =
            Authorization { nonce: 8, ..authorization() }.into_signed(*signed.signature());
        assert_ne!(tampered.recover_authority(), signed.recover_authority());
    }

    #[test]
    fn zero_signature_has_no_authority() {
        let signed = authorization().into_signed(Signature::default());
        assert_eq!(signed.recover_authority(), None);
    }

    #[test]
    fn invalid_y_parity_names_entry() {
        let signed = authorization().into_signed(Signature {
            r: U256::from(1),
            s: U256::from(1),
            odd_y_parity: false,
        });
        let mut out = BytesMut::new();
        vec![signed, signed].encode(&mut out);
        // the second entry ends with [.., y_parity, r = 0x01, s = 0x01]
        let y_parity = out.len() - 3;
        assert_eq!(out[y_parity], 0x80);
        out[y_parity] = 0x02;

        let err = SignedAuthorization::decode_list(&mut &out[..]).unwrap_err();
        assert_matches!(err, TransactionDecodeError::AuthorizationEntry { index: 1, .. });
        assert_eq!(
            *err.root_cause(),
            TransactionDecodeError::from(FieldRangeError::InvalidYParity {
                field: "authorization y_parity",
                value: 2
            })
        );
    }

    #[test]
    fn wrong_tuple_size() {
        // [[0x01, 0x02]]
        let input = hex!("c3c20102");
        assert_matches!(
            SignedAuthorization::decode_list(&mut &input[..]),
            Err(TransactionDecodeError::AuthorizationEntry { index: 0, source })
                if matches!(*source, TransactionDecodeError::ItemCount { expected: 6, got: 2, .. })
        );
    }
}
