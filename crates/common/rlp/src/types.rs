/// The header of an RLP item: whether it is a list and how many payload bytes follow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// True if the item is a list.
    pub list: bool,
    /// Length of the payload in bytes, excluding the header itself.
    pub payload_length: usize,
}

/// Prefix of the empty byte string, and base of the short-string prefix range.
pub const EMPTY_STRING_CODE: u8 = 0x80;
/// Prefix of the empty list, and base of the short-list prefix range.
pub const EMPTY_LIST_CODE: u8 = 0xC0;

/// Base of the long-string prefix range (`0xb8..=0xbf`), offset by the length of the length.
pub(crate) const LONG_STRING_OFFSET: u8 = 0xB7;
/// Base of the long-list prefix range (`0xf8..=0xff`), offset by the length of the length.
pub(crate) const LONG_LIST_OFFSET: u8 = 0xF7;
