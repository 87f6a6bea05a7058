use crate::TxType;
use voltaire_rlp::DecodeError;

/// Broad class of a [`TransactionDecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Malformed RLP, unknown envelope or wrong field count.
    Structural,
    /// A field decoded but holds a value outside its allowed range.
    FieldRange,
    /// The transaction is well formed but not acceptable.
    SemanticInvalid,
}

/// Errors that can happen while decoding a transaction from its wire encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionDecodeError {
    /// The input was empty.
    #[error("empty transaction input")]
    EmptyInput,
    /// The envelope starts with a type byte that is not supported.
    #[error("unsupported transaction type 0x{0:02x}")]
    UnsupportedType(u8),
    /// A field is not valid RLP for its type.
    #[error("invalid rlp in field `{field}`: {source}")]
    Rlp {
        /// Name of the field being decoded.
        field: &'static str,
        /// The codec error.
        #[source]
        source: DecodeError,
    },
    /// The transaction list has the wrong number of fields.
    #[error("{tx_type} transaction has {got} fields, expected {expected}")]
    FieldCount {
        /// The envelope being decoded.
        tx_type: TxType,
        /// Fields required by the envelope.
        expected: usize,
        /// Fields present.
        got: usize,
    },
    /// A nested list has the wrong number of items.
    #[error("`{field}` has {got} items, expected {expected}")]
    ItemCount {
        /// Name of the nested list.
        field: &'static str,
        /// Items required.
        expected: usize,
        /// Items present.
        got: usize,
    },
    /// Bytes were left after a complete transaction.
    #[error("{remaining} trailing bytes after transaction")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        remaining: usize,
    },
    /// An access list entry is invalid.
    #[error("invalid access list entry {index}: {source}")]
    AccessListEntry {
        /// Position of the entry in the list.
        index: usize,
        /// Why the entry is invalid.
        #[source]
        source: Box<TransactionDecodeError>,
    },
    /// An authorization list entry is invalid.
    #[error("invalid authorization list entry {index}: {source}")]
    AuthorizationEntry {
        /// Position of the entry in the list.
        index: usize,
        /// Why the entry is invalid.
        #[source]
        source: Box<TransactionDecodeError>,
    },
    /// A field value is out of range.
    #[error(transparent)]
    Range(#[from] FieldRangeError),
    /// The transaction is semantically invalid.
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl TransactionDecodeError {
    /// Returns the class of this error.
    ///
    /// Errors inside access list or authorization entries are structural.
    pub const fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::Range(_) => DecodeErrorKind::FieldRange,
            Self::Semantic(_) => DecodeErrorKind::SemanticInvalid,
            _ => DecodeErrorKind::Structural,
        }
    }

    pub(crate) fn rlp(field: &'static str) -> impl FnOnce(DecodeError) -> Self {
        move |source| Self::Rlp { field, source }
    }

    /// Returns the innermost error, looking through access list and authorization entries.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::AccessListEntry { source, .. } | Self::AuthorizationEntry { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<TransactionDecodeError> for DecodeError {
    fn from(err: TransactionDecodeError) -> Self {
        match err.root_cause() {
            TransactionDecodeError::EmptyInput => DecodeError::InputTooShort,
            TransactionDecodeError::Rlp { source, .. } => *source,
            TransactionDecodeError::TrailingBytes { remaining } => {
                DecodeError::TrailingBytes { remaining: *remaining }
            }
            TransactionDecodeError::FieldCount { expected, got, .. } |
            TransactionDecodeError::ItemCount { expected, got, .. } => {
                DecodeError::ListLengthMismatch { expected: *expected, got: *got }
            }
            TransactionDecodeError::UnsupportedType(_) => {
                DecodeError::Custom("unsupported transaction type")
            }
            TransactionDecodeError::Range(FieldRangeError::InvalidLength { .. }) => {
                DecodeError::UnexpectedLength
            }
            TransactionDecodeError::Range(_) => DecodeError::Custom("field value out of range"),
            TransactionDecodeError::Semantic(SemanticError::BlobContractCreation) => {
                DecodeError::Custom("blob transactions cannot create contracts")
            }
            TransactionDecodeError::Semantic(SemanticError::ChainIdMismatch { .. }) => {
                DecodeError::Custom("chain id mismatch")
            }
            TransactionDecodeError::Semantic(_) => DecodeError::Custom("invalid transaction"),
            TransactionDecodeError::AccessListEntry { .. } |
            TransactionDecodeError::AuthorizationEntry { .. } => {
                DecodeError::Custom("invalid list entry")
            }
        }
    }
}

/// A field holds a value outside of its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldRangeError {
    /// A `y_parity` field is neither 0 nor 1.
    #[error("`{field}` must be 0 or 1, got {value}")]
    InvalidYParity {
        /// Name of the field.
        field: &'static str,
        /// The decoded value.
        value: u64,
    },
    /// A fixed-size field has the wrong length.
    #[error("`{field}` must be {expected} bytes, got {got}")]
    InvalidLength {
        /// Name of the field.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// A legacy `v` is neither 27/28 nor a valid EIP-155 value.
    #[error("invalid legacy signature v {0}")]
    InvalidV(u128),
}

/// A well formed transaction that cannot be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    /// An EIP-4844 transaction without a recipient.
    #[error("blob transactions cannot create contracts")]
    BlobContractCreation,
    /// The transaction is for another chain.
    #[error("transaction chain id {got} does not match expected chain id {expected}")]
    ChainIdMismatch {
        /// Chain id the caller expects.
        expected: u64,
        /// Chain id of the transaction.
        got: u64,
    },
    /// The gas limit does not cover the base cost of a transaction.
    #[error("gas limit {gas_limit} is below the intrinsic gas of {minimum}")]
    IntrinsicGasTooLow {
        /// Gas limit of the transaction.
        gas_limit: u64,
        /// Minimum gas any transaction costs.
        minimum: u64,
    },
    /// The priority fee is higher than the max fee per gas.
    #[error("max priority fee {max_priority_fee_per_gas} exceeds max fee {max_fee_per_gas}")]
    TipAboveFeeCap {
        /// Max priority fee per gas of the transaction.
        max_priority_fee_per_gas: u128,
        /// Max fee per gas of the transaction.
        max_fee_per_gas: u128,
    },
    /// An EIP-4844 transaction carries no blobs or more blobs than fit in a block.
    #[error("blob transaction carries {have} blobs, expected 1 to {permitted}")]
    BlobCount {
        /// Number of blob versioned hashes.
        have: usize,
        /// Maximum number of blobs.
        permitted: usize,
    },
}
