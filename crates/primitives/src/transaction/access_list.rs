use crate::{
    transaction::{
        error::TransactionDecodeError,
        util::{decode_address, decode_b256, decode_items, decode_list_payload},
    },
    Address, B256, U256,
};
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::mem;
use voltaire_rlp::{length_of_length, Decodable, DecodeError, Encodable, Header};

/// A list of addresses and storage keys that the transaction plans to access.
/// Accesses outside the list are possible, but become more expensive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Account addresses that would be loaded at the start of execution
    pub address: Address,
    /// Keys of storage that would be loaded at the start of execution
    pub storage_keys: Vec<B256>,
}

impl AccessListItem {
    /// Calculates a heuristic for the in-memory size of the [AccessListItem].
    #[inline]
    pub fn size(&self) -> usize {
        mem::size_of::<Address>() + self.storage_keys.capacity() * mem::size_of::<B256>()
    }

    fn payload_length(&self) -> usize {
        self.address.length() + self.storage_keys.length()
    }

    /// Decodes `[address, [storage_key, ...]]`.
    fn decode_entry(buf: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        let mut fields = decode_items(buf, "access_list_item", 2)?;
        let address = decode_address(&mut fields, "address")?;
        let mut keys = decode_list_payload(&mut fields, "storage_keys")?;
        let mut storage_keys = Vec::new();
        while !keys.is_empty() {
            storage_keys.push(decode_b256(&mut keys, "storage_key")?);
        }
        Ok(Self { address, storage_keys })
    }
}

impl Encodable for AccessListItem {
    fn encode(&self, out: &mut dyn BufMut) {
        Header { list: true, payload_length: self.payload_length() }.encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + length_of_length(payload_length)
    }
}

/// AccessList as defined in EIP-2930
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// Returns true if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of storage keys across all entries.
    pub fn total_storage_keys(&self) -> usize {
        self.0.iter().map(|item| item.storage_keys.len()).sum()
    }

    /// Returns true if `address` has an entry.
    pub fn contains_address(&self, address: &Address) -> bool {
        self.0.iter().any(|item| item.address == *address)
    }

    /// Returns an iterator over the list's addresses and storage keys.
    pub fn flatten(&self) -> impl Iterator<Item = (Address, Vec<U256>)> + '_ {
        self.0.iter().map(|item| {
            (
                item.address,
                item.storage_keys.iter().map(|slot| U256::from_be_bytes(slot.0)).collect(),
            )
        })
    }

    /// Converts the list into a vec of addresses and storage keys.
    pub fn flattened(&self) -> Vec<(Address, Vec<U256>)> {
        self.flatten().collect()
    }

    /// Calculates a heuristic for the in-memory size of the [AccessList].
    #[inline]
    pub fn size(&self) -> usize {
        // take into account capacity
        self.0.iter().map(AccessListItem::size).sum::<usize>() +
            self.0.capacity() * mem::size_of::<AccessListItem>()
    }

    /// Decodes an access list field, reporting the index of the first invalid entry.
    ///
    /// Every entry must be a two item list of a 20 byte address and a list of 32 byte keys.
    pub fn decode_field(buf: &mut &[u8]) -> Result<Self, TransactionDecodeError> {
        let mut entries = decode_list_payload(buf, "access_list")?;
        let mut items = Vec::new();
        while !entries.is_empty() {
            let index = items.len();
            let item = AccessListItem::decode_entry(&mut entries).map_err(|err| {
                TransactionDecodeError::AccessListEntry { index, source: Box::new(err) }
            })?;
            items.push(item);
        }
        Ok(Self(items))
    }
}

impl From<Vec<AccessListItem>> for AccessList {
    fn from(items: Vec<AccessListItem>) -> Self {
        Self(items)
    }
}

impl Encodable for AccessList {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out)
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for AccessList {
    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        Self::decode_field(buf).map_err(Into::into)
    }
}
