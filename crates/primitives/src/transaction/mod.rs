//! Transaction types.

use crate::{
    constants::{eip4844::MAX_BLOBS_PER_BLOCK, MIN_TRANSACTION_GAS},
    crypto::{CryptoError, EcdsaBackend, KeccakHasher, Secp256k1Backend, TinyKeccak},
    keccak256, Address, Bytes, ChainId, TxHash, TxKind, B256, U256,
};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::{mem, ops::Deref};
use tracing::{debug, trace};
use voltaire_rlp::{Decodable, DecodeError, Encodable, Header, EMPTY_LIST_CODE};

pub use access_list::{AccessList, AccessListItem};
pub use authorization::{Authorization, SignedAuthorization};
pub use eip1559::TxEip1559;
pub use eip2930::TxEip2930;
pub use eip4844::TxEip4844;
pub use eip7702::TxEip7702;
pub use error::{DecodeErrorKind, FieldRangeError, SemanticError, TransactionDecodeError};
pub use legacy::TxLegacy;
pub use signature::{legacy_v, parse_legacy_v, Signature};
pub use tx_type::{
    TxType, EIP1559_TX_TYPE_ID, EIP2930_TX_TYPE_ID, EIP4844_TX_TYPE_ID, EIP7702_TX_TYPE_ID,
    LEGACY_TX_TYPE_ID,
};

mod access_list;
mod authorization;
mod eip1559;
mod eip2930;
mod eip4844;
mod eip7702;
mod error;
mod legacy;
mod signature;
mod tx_type;
mod util;

/// A raw transaction.
///
/// Transaction types were introduced in [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transaction {
    /// Legacy transaction (type `0x0`).
    ///
    /// Traditional Ethereum transactions, containing parameters `nonce`, `gasPrice`, `gasLimit`,
    /// `to`, `value`, `data`, `v`, `r`, and `s`.
    ///
    /// These transactions do not utilize access lists nor do they incorporate EIP-1559 fee market
    /// changes.
    Legacy(TxLegacy),
    /// Transaction with an [`AccessList`] ([EIP-2930](https://eips.ethereum.org/EIPS/eip-2930)), type `0x1`.
    ///
    /// The `accessList` specifies an array of addresses and storage keys that the transaction
    /// plans to access, enabling gas savings on cross-contract calls by pre-declaring the accessed
    /// contract and storage slots.
    Eip2930(TxEip2930),
    /// A transaction with a priority fee ([EIP-1559](https://eips.ethereum.org/EIPS/eip-1559)), type `0x2`.
    ///
    /// Unlike traditional transactions, EIP-1559 transactions use an in-protocol, dynamically
    /// changing base fee per gas, adjusted at each block to manage network congestion.
    ///
    /// - `maxPriorityFeePerGas`, specifying the maximum fee above the base fee the sender is
    ///   willing to pay
    /// - `maxFeePerGas`, setting the maximum total fee the sender is willing to pay.
    ///
    /// The base fee is burned, while the priority fee is paid to the miner who includes the
    /// transaction, incentivizing miners to include transactions with higher priority fees per
    /// gas.
    Eip1559(TxEip1559),
    /// Shard Blob Transactions ([EIP-4844](https://eips.ethereum.org/EIPS/eip-4844)), type `0x3`.
    ///
    /// Shard Blob Transactions introduce a new transaction type called a blob-carrying transaction
    /// to reduce gas costs. These transactions are similar to regular Ethereum transactions but
    /// include additional data called a blob.
    ///
    /// Blobs are larger (~125 kB) and cheaper than the current calldata, providing an immutable
    /// and read-only memory for storing transaction data.
    Eip4844(TxEip4844),
    /// Set code transactions ([EIP-7702](https://eips.ethereum.org/EIPS/eip-7702)), type `0x4`.
    ///
    /// Carries signed authorizations that delegate an account's code to another address.
    Eip7702(TxEip7702),
}

impl Transaction {
    /// Heavy operation that return signature hash over rlp encoded transaction.
    /// It is only for signature signing or signer recovery.
    pub fn signature_hash(&self) -> B256 {
        self.signature_hash_with(&TinyKeccak)
    }

    /// Like [`Transaction::signature_hash`] with a caller supplied hasher.
    ///
    /// The preimage is handed to `hasher` unchanged.
    pub fn signature_hash_with(&self, hasher: &impl KeccakHasher) -> B256 {
        let mut buf = Vec::with_capacity(self.payload_len_for_signature());
        self.encode_for_signing(&mut buf);
        hasher.hash(&buf)
    }

    /// Get chain_id.
    pub const fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Legacy(TxLegacy { chain_id, .. }) => *chain_id,
            Self::Eip2930(TxEip2930 { chain_id, .. }) |
            Self::Eip1559(TxEip1559 { chain_id, .. }) |
            Self::Eip4844(TxEip4844 { chain_id, .. }) |
            Self::Eip7702(TxEip7702 { chain_id, .. }) => Some(*chain_id),
        }
    }

    /// Gets the transaction's [`TxKind`], which is the address of the recipient or
    /// [`TxKind::Create`] if the transaction is a contract creation.
    pub const fn kind(&self) -> TxKind {
        match self {
            Self::Legacy(TxLegacy { to, .. }) |
            Self::Eip2930(TxEip2930 { to, .. }) |
            Self::Eip1559(TxEip1559 { to, .. }) |
            Self::Eip7702(TxEip7702 { to, .. }) => *to,
            Self::Eip4844(TxEip4844 { to, .. }) => TxKind::Call(*to),
        }
    }

    /// Get the transaction's address of the contract that will be called, or the address that will
    /// receive the transfer.
    ///
    /// Returns `None` if this is a `CREATE` transaction.
    pub const fn to(&self) -> Option<Address> {
        match self.kind() {
            TxKind::Call(to) => Some(to),
            TxKind::Create => None,
        }
    }

    /// Returns true if the transaction is a contract creation.
    pub const fn is_create(&self) -> bool {
        matches!(self.kind(), TxKind::Create)
    }

    /// Get the transaction's type
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(legacy_tx) => legacy_tx.tx_type(),
            Self::Eip2930(access_list_tx) => access_list_tx.tx_type(),
            Self::Eip1559(dynamic_fee_tx) => dynamic_fee_tx.tx_type(),
            Self::Eip4844(blob_tx) => blob_tx.tx_type(),
            Self::Eip7702(set_code_tx) => set_code_tx.tx_type(),
        }
    }

    /// Gets the transaction's value field.
    pub const fn value(&self) -> U256 {
        *match self {
            Self::Legacy(TxLegacy { value, .. }) |
            Self::Eip2930(TxEip2930 { value, .. }) |
            Self::Eip1559(TxEip1559 { value, .. }) |
            Self::Eip4844(TxEip4844 { value, .. }) |
            Self::Eip7702(TxEip7702 { value, .. }) => value,
        }
    }

    /// Get the transaction's nonce.
    pub const fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(TxLegacy { nonce, .. }) |
            Self::Eip2930(TxEip2930 { nonce, .. }) |
            Self::Eip1559(TxEip1559 { nonce, .. }) |
            Self::Eip4844(TxEip4844 { nonce, .. }) |
            Self::Eip7702(TxEip7702 { nonce, .. }) => *nonce,
        }
    }

    /// Returns the [`AccessList`] of the transaction.
    ///
    /// Returns `None` for legacy transactions.
    pub const fn access_list(&self) -> Option<&AccessList> {
        match self {
            Self::Legacy(_) => None,
            Self::Eip2930(tx) => Some(&tx.access_list),
            Self::Eip1559(tx) => Some(&tx.access_list),
            Self::Eip4844(tx) => Some(&tx.access_list),
            Self::Eip7702(tx) => Some(&tx.access_list),
        }
    }

    /// Returns the [`SignedAuthorization`] list of the transaction.
    ///
    /// Returns `None` if this transaction is not EIP-7702.
    pub fn authorization_list(&self) -> Option<&[SignedAuthorization]> {
        match self {
            Self::Eip7702(tx) => Some(&tx.authorization_list),
            _ => None,
        }
    }

    /// Get the gas limit of the transaction.
    pub const fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(TxLegacy { gas_limit, .. }) |
            Self::Eip2930(TxEip2930 { gas_limit, .. }) |
            Self::Eip1559(TxEip1559 { gas_limit, .. }) |
            Self::Eip4844(TxEip4844 { gas_limit, .. }) |
            Self::Eip7702(TxEip7702 { gas_limit, .. }) => *gas_limit,
        }
    }

    /// Returns true if the tx supports dynamic fees
    pub const fn is_dynamic_fee(&self) -> bool {
        matches!(self, Self::Eip1559(_) | Self::Eip4844(_) | Self::Eip7702(_))
    }

    /// Max fee per gas for eip1559 transaction, for legacy transactions this is gas_price.
    ///
    /// This is also commonly referred to as the "Gas Fee Cap" (`GasFeeCap`).
    pub const fn max_fee_per_gas(&self) -> u128 {
        match self {
            Self::Legacy(TxLegacy { gas_price, .. }) |
            Self::Eip2930(TxEip2930 { gas_price, .. }) => *gas_price,
            Self::Eip1559(TxEip1559 { max_fee_per_gas, .. }) |
            Self::Eip4844(TxEip4844 { max_fee_per_gas, .. }) |
            Self::Eip7702(TxEip7702 { max_fee_per_gas, .. }) => *max_fee_per_gas,
        }
    }

    /// Max priority fee per gas for eip1559 transaction, for legacy and eip2930 transactions this
    /// is `None`
    ///
    /// This is also commonly referred to as the "Gas Tip Cap" (`GasTipCap`).
    pub const fn max_priority_fee_per_gas(&self) -> Option<u128> {
        match self {
            Self::Legacy(_) | Self::Eip2930(_) => None,
            Self::Eip1559(TxEip1559 { max_priority_fee_per_gas, .. }) |
            Self::Eip4844(TxEip4844 { max_priority_fee_per_gas, .. }) |
            Self::Eip7702(TxEip7702 { max_priority_fee_per_gas, .. }) => {
                Some(*max_priority_fee_per_gas)
            }
        }
    }

    /// Blob versioned hashes for eip4844 transaction, for legacy, eip1559, eip2930 and eip7702
    /// transactions this is `None`
    ///
    /// This is also commonly referred to as the "blob versioned hashes" (`BlobVersionedHashes`).
    pub fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        match self {
            Self::Eip4844(TxEip4844 { blob_versioned_hashes, .. }) => Some(blob_versioned_hashes),
            _ => None,
        }
    }

    /// Max fee per blob gas for eip4844 transaction [TxEip4844].
    ///
    /// Returns `None` for non-eip4844 transactions.
    ///
    /// This is also commonly referred to as the "Blob Gas Fee Cap" (`BlobGasFeeCap`).
    pub const fn max_fee_per_blob_gas(&self) -> Option<u128> {
        match self {
            Self::Eip4844(TxEip4844 { max_fee_per_blob_gas, .. }) => Some(*max_fee_per_blob_gas),
            _ => None,
        }
    }

    /// Returns the blob gas used for all blobs of the EIP-4844 transaction if it is an EIP-4844
    /// transaction.
    ///
    /// This is the number of blobs times the
    /// [DATA_GAS_PER_BLOB](crate::constants::eip4844::DATA_GAS_PER_BLOB) a single blob consumes.
    pub fn blob_gas_used(&self) -> Option<u64> {
        match self {
            Self::Eip4844(tx) => Some(tx.blob_gas()),
            _ => None,
        }
    }

    /// Returns the price paid per unit of gas given the block's `base_fee`.
    ///
    /// Legacy and EIP-2930 transactions always pay their gas price.
    pub fn effective_gas_price(&self, base_fee: Option<u64>) -> u128 {
        match self {
            Self::Legacy(tx) => tx.gas_price,
            Self::Eip2930(tx) => tx.gas_price,
            Self::Eip1559(tx) => tx.effective_gas_price(base_fee),
            Self::Eip4844(tx) => tx.effective_gas_price(base_fee),
            Self::Eip7702(tx) => tx.effective_gas_price(base_fee),
        }
    }

    /// Checks the stateless rules a transaction must satisfy regardless of chain state.
    ///
    /// - the gas limit covers [`MIN_TRANSACTION_GAS`]
    /// - the priority fee does not exceed the max fee (dynamic fee transactions)
    /// - EIP-4844 transactions carry between 1 and [`MAX_BLOBS_PER_BLOCK`] blobs
    pub fn validate(&self) -> Result<(), SemanticError> {
        let gas_limit = self.gas_limit();
        if gas_limit < MIN_TRANSACTION_GAS {
            return Err(SemanticError::IntrinsicGasTooLow {
                gas_limit,
                minimum: MIN_TRANSACTION_GAS,
            })
        }

        // Ensure max_priority_fee_per_gas (if EIP1559) is less than max_fee_per_gas.
        let max_fee_per_gas = self.max_fee_per_gas();
        if let Some(max_priority_fee_per_gas) = self.max_priority_fee_per_gas() {
            if max_priority_fee_per_gas > max_fee_per_gas {
                return Err(SemanticError::TipAboveFeeCap {
                    max_priority_fee_per_gas,
                    max_fee_per_gas,
                })
            }
        }

        if let Some(hashes) = self.blob_versioned_hashes() {
            if hashes.is_empty() || hashes.len() > MAX_BLOBS_PER_BLOCK {
                return Err(SemanticError::BlobCount {
                    have: hashes.len(),
                    permitted: MAX_BLOBS_PER_BLOCK,
                })
            }
        }

        Ok(())
    }

    /// Get the transaction's input field.
    pub const fn input(&self) -> &Bytes {
        match self {
            Self::Legacy(TxLegacy { input, .. }) |
            Self::Eip2930(TxEip2930 { input, .. }) |
            Self::Eip1559(TxEip1559 { input, .. }) |
            Self::Eip4844(TxEip4844 { input, .. }) |
            Self::Eip7702(TxEip7702 { input, .. }) => input,
        }
    }

    /// Encodes the transaction for signing: the bare RLP list for legacy transactions and
    /// `type || rlp(fields)` for typed ones.
    pub fn encode_for_signing(&self, out: &mut dyn BufMut) {
        match self {
            Self::Legacy(tx) => tx.encode_for_signing(out),
            Self::Eip2930(tx) => tx.encode_for_signing(out),
            Self::Eip1559(tx) => tx.encode_for_signing(out),
            Self::Eip4844(tx) => tx.encode_for_signing(out),
            Self::Eip7702(tx) => tx.encode_for_signing(out),
        }
    }

    /// Length of [`Transaction::encode_for_signing`] output.
    pub fn payload_len_for_signature(&self) -> usize {
        match self {
            Self::Legacy(tx) => tx.payload_len_for_signature(),
            Self::Eip2930(tx) => tx.payload_len_for_signature(),
            Self::Eip1559(tx) => tx.payload_len_for_signature(),
            Self::Eip4844(tx) => tx.payload_len_for_signature(),
            Self::Eip7702(tx) => tx.payload_len_for_signature(),
        }
    }

    /// Output the length of the encode_inner(out, with_header). Note to assume that `with_header`
    /// is only `true`.
    pub(crate) fn payload_len_with_signature(&self, signature: &Signature) -> usize {
        match self {
            Self::Legacy(legacy_tx) => legacy_tx.payload_len_with_signature(signature),
            Self::Eip2930(access_list_tx) => access_list_tx.payload_len_with_signature(signature),
            Self::Eip1559(dynamic_fee_tx) => dynamic_fee_tx.payload_len_with_signature(signature),
            Self::Eip4844(blob_tx) => blob_tx.payload_len_with_signature(signature),
            Self::Eip7702(set_code_tx) => set_code_tx.payload_len_with_signature(signature),
        }
    }

    /// Length of the envelope: no string header for typed transactions.
    pub(crate) fn payload_len_with_signature_without_header(&self, signature: &Signature) -> usize {
        match self {
            Self::Legacy(legacy_tx) => legacy_tx.payload_len_with_signature(signature),
            Self::Eip2930(access_list_tx) => {
                access_list_tx.payload_len_with_signature_without_header(signature)
            }
            Self::Eip1559(dynamic_fee_tx) => {
                dynamic_fee_tx.payload_len_with_signature_without_header(signature)
            }
            Self::Eip4844(blob_tx) => blob_tx.payload_len_with_signature_without_header(signature),
            Self::Eip7702(set_code_tx) => {
                set_code_tx.payload_len_with_signature_without_header(signature)
            }
        }
    }

    /// Encodes the transaction with its signature.
    ///
    /// With `with_header`, typed transactions are wrapped in an RLP string header (the form used
    /// inside block bodies and p2p lists). Legacy transactions are always a bare RLP list.
    pub fn encode_with_signature(
        &self,
        signature: &Signature,
        out: &mut dyn BufMut,
        with_header: bool,
    ) {
        match self {
            Self::Legacy(legacy_tx) => {
                // do nothing w/ with_header
                legacy_tx.encode_with_signature(signature, out)
            }
            Self::Eip2930(access_list_tx) => {
                access_list_tx.encode_with_signature(signature, out, with_header)
            }
            Self::Eip1559(dynamic_fee_tx) => {
                dynamic_fee_tx.encode_with_signature(signature, out, with_header)
            }
            Self::Eip4844(blob_tx) => blob_tx.encode_with_signature(signature, out, with_header),
            Self::Eip7702(set_code_tx) => {
                set_code_tx.encode_with_signature(signature, out, with_header)
            }
        }
    }

    /// Attaches a signature computed elsewhere.
    pub fn into_signed(self, signature: Signature) -> TransactionSigned {
        TransactionSigned::from_transaction_and_signature(self, signature)
    }

    /// Signs the transaction with `secret` using the default backends.
    pub fn sign(self, secret: &B256) -> Result<TransactionSigned, CryptoError> {
        self.sign_with(secret, &TinyKeccak, &Secp256k1Backend)
    }

    /// Signs the transaction with caller supplied crypto.
    pub fn sign_with(
        self,
        secret: &B256,
        hasher: &impl KeccakHasher,
        backend: &impl EcdsaBackend,
    ) -> Result<TransactionSigned, CryptoError> {
        let signature = backend.sign_hash(secret, &self.signature_hash_with(hasher))?;
        Ok(self.into_signed(signature))
    }

    /// Calculates a heuristic for the in-memory size of the [Transaction].
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            Self::Legacy(tx) => tx.size(),
            Self::Eip2930(tx) => tx.size(),
            Self::Eip1559(tx) => tx.size(),
            Self::Eip4844(tx) => tx.size(),
            Self::Eip7702(tx) => tx.size(),
        }
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::Legacy(TxLegacy::default())
    }
}

impl From<TxLegacy> for Transaction {
    fn from(tx: TxLegacy) -> Self {
        Self::Legacy(tx)
    }
}

impl From<TxEip2930> for Transaction {
    fn from(tx: TxEip2930) -> Self {
        Self::Eip2930(tx)
    }
}

impl From<TxEip1559> for Transaction {
    fn from(tx: TxEip1559) -> Self {
        Self::Eip1559(tx)
    }
}

impl From<TxEip4844> for Transaction {
    fn from(tx: TxEip4844) -> Self {
        Self::Eip4844(tx)
    }
}

impl From<TxEip7702> for Transaction {
    fn from(tx: TxEip7702) -> Self {
        Self::Eip7702(tx)
    }
}

/// Signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransactionSigned {
    /// Transaction hash
    pub hash: TxHash,
    /// The transaction signature values
    pub signature: Signature,
    /// Raw transaction info
    pub transaction: Transaction,
}

impl AsRef<Self> for TransactionSigned {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl Deref for TransactionSigned {
    type Target = Transaction;

    fn deref(&self) -> &Self::Target {
        &self.transaction
    }
}

impl TransactionSigned {
    /// Transaction signature.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Transaction hash. Used to identify transaction.
    pub const fn hash(&self) -> TxHash {
        self.hash
    }

    /// Reference to transaction hash. Used to identify transaction.
    pub const fn hash_ref(&self) -> &TxHash {
        &self.hash
    }

    /// Recover signer from signature and hash.
    ///
    /// Returns `None` if the transaction's signature is invalid following [EIP-2](https://eips.ethereum.org/EIPS/eip-2), see also [`Signature::recover_signer_with`].
    ///
    /// Note:
    ///
    /// This can fail for some early ethereum mainnet transactions pre EIP-2, use
    /// [`Self::recover_signer_unchecked`] if you want to recover the signer without ensuring that
    /// the signature has a low `s` value.
    pub fn recover_signer(&self) -> Option<Address> {
        self.recover_signer_with(&TinyKeccak, &Secp256k1Backend)
    }

    /// Like [`TransactionSigned::recover_signer`] with caller supplied crypto.
    pub fn recover_signer_with(
        &self,
        hasher: &impl KeccakHasher,
        backend: &impl EcdsaBackend,
    ) -> Option<Address> {
        let signature_hash = self.signature_hash_with(hasher);
        self.signature.recover_signer_with(signature_hash, hasher, backend)
    }

    /// Recover signer from signature and hash _without ensuring that the signature has a low `s`
    /// value_.
    ///
    /// Returns `None` if the transaction's signature is invalid, see also
    /// [`Signature::recover_signer_unchecked_with`].
    pub fn recover_signer_unchecked(&self) -> Option<Address> {
        self.recover_signer_unchecked_with(&TinyKeccak, &Secp256k1Backend)
    }

    /// Like [`TransactionSigned::recover_signer_unchecked`] with caller supplied crypto.
    pub fn recover_signer_unchecked_with(
        &self,
        hasher: &impl KeccakHasher,
        backend: &impl EcdsaBackend,
    ) -> Option<Address> {
        let signature_hash = self.signature_hash_with(hasher);
        self.signature.recover_signer_unchecked_with(signature_hash, hasher, backend)
    }

    /// Returns true if the signature is a valid low-s signature over this transaction by
    /// `claimed_sender`.
    ///
    /// Malformed or zero signatures, a `v` derived from another chain and any modified field all
    /// yield `false`.
    pub fn verify_signature(&self, claimed_sender: Address) -> bool {
        self.verify_signature_with(claimed_sender, &TinyKeccak, &Secp256k1Backend)
    }

    /// Like [`TransactionSigned::verify_signature`] with caller supplied crypto.
    pub fn verify_signature_with(
        &self,
        claimed_sender: Address,
        hasher: &impl KeccakHasher,
        backend: &impl EcdsaBackend,
    ) -> bool {
        let recovered = self.recover_signer_with(hasher, backend);
        let valid = recovered == Some(claimed_sender);
        debug!(
            target: "primitives::tx",
            hash = %self.hash,
            ?recovered,
            %claimed_sender,
            valid,
            "Verified transaction signature"
        );
        valid
    }

    /// Consumes the type, recover signer and return [`TransactionSignedEcRecovered`]
    ///
    /// Returns `None` if the transaction's signature is invalid, see also [Self::recover_signer].
    pub fn into_ecrecovered(self) -> Option<TransactionSignedEcRecovered> {
        let signer = self.recover_signer()?;
        Some(TransactionSignedEcRecovered { signed_transaction: self, signer })
    }

    /// Tries to recover signer and return [`TransactionSignedEcRecovered`] by cloning the type.
    pub fn try_ecrecovered(&self) -> Option<TransactionSignedEcRecovered> {
        let signer = self.recover_signer()?;
        Some(TransactionSignedEcRecovered { signed_transaction: self.clone(), signer })
    }

    /// Returns the enveloped encoded transactions.
    ///
    /// See also [TransactionSigned::encode_enveloped]
    pub fn envelope_encoded(&self) -> Bytes {
        let mut buf = Vec::with_capacity(self.length_without_header());
        self.encode_enveloped(&mut buf);
        buf.into()
    }

    /// Encodes the transaction into the "raw" format (e.g. `eth_sendRawTransaction`).
    /// This format is also referred to as "binary" encoding.
    ///
    /// For legacy transactions, it encodes the RLP of the transaction into the buffer:
    /// `rlp(tx-data)`
    /// For EIP-2718 typed it encodes the type of the transaction followed by the rlp of the
    /// transaction: `tx-type || rlp(tx-data)`
    pub fn encode_enveloped(&self, out: &mut dyn BufMut) {
        self.transaction.encode_with_signature(&self.signature, out, false)
    }

    /// Output the length of the encode_inner(out, with_header). Note to assume that `with_header`
    /// is only `true`.
    pub(crate) fn payload_len_inner(&self) -> usize {
        self.transaction.payload_len_with_signature(&self.signature)
    }

    /// Returns the length of the enveloped encoding.
    pub fn length_without_header(&self) -> usize {
        self.transaction.payload_len_with_signature_without_header(&self.signature)
    }

    /// Calculate transaction hash, eip2728 transaction does not contain rlp header and start with
    /// tx type.
    pub fn recalculate_hash(&self) -> B256 {
        keccak256(self.envelope_encoded())
    }

    /// Create a new signed transaction from a transaction and its signature.
    /// This will also calculate the transaction hash using its encoding.
    pub fn from_transaction_and_signature(transaction: Transaction, signature: Signature) -> Self {
        let mut initial_tx = Self { transaction, hash: Default::default(), signature };
        initial_tx.hash = initial_tx.recalculate_hash();
        initial_tx
    }

    /// Calculates a heuristic for the in-memory size of the [TransactionSigned].
    #[inline]
    pub fn size(&self) -> usize {
        mem::size_of::<TxHash>() + self.transaction.size() + self.signature.size()
    }

    /// Decodes legacy transaction from the data buffer into a tuple.
    ///
    /// This expects `rlp(legacy_tx)`
    ///
    /// Refer to the docs for [Self::decode_rlp_legacy_transaction] for details on the exact
    /// format expected.
    fn decode_rlp_legacy_transaction(data: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        // keep this around, so we can use it to calculate the hash
        let original_encoding = *data;

        let (transaction, signature) = TxLegacy::decode_signed(data)?;
        let tx_length = original_encoding.len() - data.len();
        let hash = keccak256(&original_encoding[..tx_length]);

        Ok(Self { transaction: Transaction::Legacy(transaction), hash, signature })
    }

    /// Decodes an enveloped EIP-2718 typed transaction.
    ///
    /// This should _only_ be used internally in general transaction decoding methods,
    /// which have already ensured that the input is a typed transaction with the following format:
    /// `tx-type || rlp(tx-data)`
    ///
    /// Note that this format does not start with any RLP header, and instead starts with a single
    /// byte indicating the transaction type.
    ///
    /// CAUTION: this expects that `data` is `tx-type || rlp(tx-data)`
    fn decode_enveloped_typed_transaction(
        data: &mut &[u8],
    ) -> Result<Self, TransactionDecodeError> {
        // keep this around so we can use it to calculate the hash
        let original_encoding = *data;

        let tx_type = *data.first().ok_or(TransactionDecodeError::EmptyInput)?;
        data.advance(1);

        let (transaction, signature) = match TxType::try_from(tx_type) {
            Ok(TxType::Eip2930) => {
                let (tx, signature) = TxEip2930::decode_signed(data)?;
                (Transaction::Eip2930(tx), signature)
            }
            Ok(TxType::Eip1559) => {
                let (tx, signature) = TxEip1559::decode_signed(data)?;
                (Transaction::Eip1559(tx), signature)
            }
            Ok(TxType::Eip4844) => {
                let (tx, signature) = TxEip4844::decode_signed(data)?;
                (Transaction::Eip4844(tx), signature)
            }
            Ok(TxType::Eip7702) => {
                let (tx, signature) = TxEip7702::decode_signed(data)?;
                (Transaction::Eip7702(tx), signature)
            }
            Ok(TxType::Legacy) | Err(_) => {
                return Err(TransactionDecodeError::UnsupportedType(tx_type))
            }
        };

        let tx_length = original_encoding.len() - data.len();
        let hash = keccak256(&original_encoding[..tx_length]);
        Ok(Self { transaction, hash, signature })
    }

    /// Decodes the "raw" format of transaction (e.g. `eth_sendRawTransaction`).
    ///
    /// The raw transaction is either a legacy transaction or EIP-2718 typed transaction
    /// For legacy transactions, the format is encoded as: `rlp(tx)`
    /// For EIP-2718 typed transaction, the format is encoded as the type of the transaction
    /// followed by the rlp of the transaction: `type` + `rlp(tx)`
    ///
    /// The whole input must be consumed, and the hash is computed over exactly these bytes.
    pub fn decode_enveloped(data: &[u8]) -> Result<Self, TransactionDecodeError> {
        let mut buf = data;
        let result = match buf.first() {
            None => Err(TransactionDecodeError::EmptyInput),
            // Check if the tx is a list
            Some(&first) if first >= EMPTY_LIST_CODE => {
                // decode as legacy transaction
                Self::decode_rlp_legacy_transaction(&mut buf)
            }
            Some(_) => Self::decode_enveloped_typed_transaction(&mut buf),
        }
        .and_then(|tx| {
            if buf.is_empty() {
                Ok(tx)
            } else {
                Err(TransactionDecodeError::TrailingBytes { remaining: buf.len() })
            }
        });

        match &result {
            Ok(tx) => trace!(target: "primitives::tx", hash = %tx.hash, tx_type = %tx.tx_type(), "Decoded transaction"),
            Err(err) => trace!(target: "primitives::tx", %err, kind = ?err.kind(), len = data.len(), "Failed to decode transaction"),
        }
        result
    }

    /// Decodes a raw transaction like [`Self::decode_enveloped`] and rejects transactions that
    /// carry a chain id other than `expected_chain_id`.
    ///
    /// Pre EIP-155 legacy transactions have no chain id and are accepted.
    pub fn decode_enveloped_for_chain(
        data: &[u8],
        expected_chain_id: ChainId,
    ) -> Result<Self, TransactionDecodeError> {
        let tx = Self::decode_enveloped(data)?;
        match tx.chain_id() {
            Some(got) if got != expected_chain_id => {
                debug!(target: "primitives::tx", hash = %tx.hash, expected_chain_id, got, "Rejected transaction for another chain");
                Err(SemanticError::ChainIdMismatch { expected: expected_chain_id, got }.into())
            }
            _ => Ok(tx),
        }
    }

    /// Decodes the network form of a transaction and advances `buf` past it.
    ///
    /// This accepts both legacy transactions, which are a bare RLP list, and typed transactions
    /// wrapped in an RLP string header:
    /// `rlp(tx-type || rlp(tx-data))`
    ///
    /// This is the form used in block bodies and p2p transaction lists.
    pub fn decode_network(buf: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        let first = *buf.first().ok_or(TransactionDecodeError::EmptyInput)?;
        // a legacy transaction is a list, typed transactions are strings
        if first >= EMPTY_LIST_CODE {
            return Self::decode_rlp_legacy_transaction(buf)
        }

        let header = Header::decode(buf).map_err(TransactionDecodeError::rlp("transaction"))?;
        let mut envelope = &buf[..header.payload_length];
        let tx = Self::decode_enveloped_typed_transaction(&mut envelope)?;
        if !envelope.is_empty() {
            return Err(TransactionDecodeError::TrailingBytes { remaining: envelope.len() })
        }
        buf.advance(header.payload_length);
        Ok(tx)
    }
}

/// This encodes the transaction _with_ the signature, and an rlp header.
///
/// For legacy transactions, it encodes the transaction data:
/// `rlp(tx-data)`
///
/// For EIP-2718 typed transactions, it encodes the transaction type followed by the rlp of the
/// transaction:
/// `rlp(tx-type || rlp(tx-data))`
impl Encodable for TransactionSigned {
    fn encode(&self, out: &mut dyn BufMut) {
        self.transaction.encode_with_signature(&self.signature, out, true);
    }

    fn length(&self) -> usize {
        self.payload_len_inner()
    }
}

/// This `Decodable` implementation only supports decoding rlp encoded transactions as it's used by
/// p2p.
///
/// See [`TransactionSigned::decode_network`].
impl Decodable for TransactionSigned {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Self::decode_network(buf).map_err(Into::into)
    }
}

/// Signed transaction with recovered signer.
#[derive(Debug, Clone, PartialEq, Hash, Eq, Default, Serialize, Deserialize)]
pub struct TransactionSignedEcRecovered {
    /// Signer of the transaction
    signer: Address,
    /// Signed transaction
    signed_transaction: TransactionSigned,
}

impl TransactionSignedEcRecovered {
    /// Signer of transaction recovered from signature
    pub const fn signer(&self) -> Address {
        self.signer
    }

    /// Returns a reference to [`TransactionSigned`]
    pub const fn as_signed(&self) -> &TransactionSigned {
        &self.signed_transaction
    }

    /// Transform back to [`TransactionSigned`]
    pub fn into_signed(self) -> TransactionSigned {
        self.signed_transaction
    }

    /// Dissolve Self to its component
    pub fn to_components(self) -> (TransactionSigned, Address) {
        (self.signed_transaction, self.signer)
    }

    /// Create [`TransactionSignedEcRecovered`] from [`TransactionSigned`] and [`Address`] of the
    /// signer.
    #[inline]
    pub const fn from_signed_transaction(
        signed_transaction: TransactionSigned,
        signer: Address,
    ) -> Self {
        Self { signed_transaction, signer }
    }

    /// Re-checks that the stored signer produced the signature.
    pub fn verify(&self) -> bool {
        self.signed_transaction.verify_signature(self.signer)
    }
}

impl Deref for TransactionSignedEcRecovered {
    type Target = TransactionSigned;

    fn deref(&self) -> &Self::Target {
        &self.signed_transaction
    }
}

impl Encodable for TransactionSignedEcRecovered {
    /// This encodes the transaction _with_ the signature, and an rlp header.
    ///
    /// Refer to docs for [TransactionSigned::encode] for details on the exact format.
    fn encode(&self, out: &mut dyn BufMut) {
        self.signed_transaction.encode(out)
    }

    fn length(&self) -> usize {
        self.signed_transaction.length()
    }
}
