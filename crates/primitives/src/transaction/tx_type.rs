use serde::{Deserialize, Serialize};

/// Identifier for legacy transaction, however [`TxLegacy`](crate::TxLegacy) this is technically not
/// typed.
pub const LEGACY_TX_TYPE_ID: u8 = 0;

/// Identifier for [`TxEip2930`](crate::TxEip2930) transaction.
pub const EIP2930_TX_TYPE_ID: u8 = 1;

/// Identifier for [`TxEip1559`](crate::TxEip1559) transaction.
pub const EIP1559_TX_TYPE_ID: u8 = 2;

/// Identifier for [`TxEip4844`](crate::TxEip4844) transaction.
pub const EIP4844_TX_TYPE_ID: u8 = 3;

/// Identifier for [`TxEip7702`](crate::TxEip7702) transaction.
pub const EIP7702_TX_TYPE_ID: u8 = 4;

/// Transaction Type
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize,
)]
pub enum TxType {
    /// Legacy transaction pre EIP-2929
    #[default]
    Legacy = 0_isize,
    /// AccessList transaction
    Eip2930 = 1_isize,
    /// Transaction with Priority fee
    Eip1559 = 2_isize,
    /// Shard Blob Transactions - EIP-4844
    Eip4844 = 3_isize,
    /// EOA code delegation - EIP-7702
    Eip7702 = 4_isize,
}

impl TxType {
    /// Returns true for every type that is sent as an EIP-2718 envelope.
    pub const fn is_typed(&self) -> bool {
        !matches!(self, TxType::Legacy)
    }
}

impl From<TxType> for u8 {
    fn from(value: TxType) -> Self {
        match value {
            TxType::Legacy => LEGACY_TX_TYPE_ID,
            TxType::Eip2930 => EIP2930_TX_TYPE_ID,
            TxType::Eip1559 => EIP1559_TX_TYPE_ID,
            TxType::Eip4844 => EIP4844_TX_TYPE_ID,
            TxType::Eip7702 => EIP7702_TX_TYPE_ID,
        }
    }
}

impl TryFrom<u8> for TxType {
    type Error = u8;

    /// Returns the unknown byte on failure.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            LEGACY_TX_TYPE_ID => TxType::Legacy,
            EIP2930_TX_TYPE_ID => TxType::Eip2930,
            EIP1559_TX_TYPE_ID => TxType::Eip1559,
            EIP4844_TX_TYPE_ID => TxType::Eip4844,
            EIP7702_TX_TYPE_ID => TxType::Eip7702,
            other => return Err(other),
        })
    }
}

impl core::fmt::Display for TxType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TxType::Legacy => write!(f, "legacy"),
            TxType::Eip2930 => write!(f, "eip2930"),
            TxType::Eip1559 => write!(f, "eip1559"),
            TxType::Eip4844 => write!(f, "eip4844"),
            TxType::Eip7702 => write!(f, "eip7702"),
        }
    }
}
