/// Width of the ASCII decimal length prefix that starts every record.
pub const LENGTH_PREFIX: usize = 5;

/// Largest length a five digit prefix can declare.
pub const MAX_RECORD_LEN: u32 = 99_999;

/// Location of one record inside a byte source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexEntry {
    /// Byte offset of the first prefix digit
    pub offset: u64,
    /// Total record length, prefix included (1..=99999)
    pub length: u32,
}
impl IndexEntry {
    pub fn new(offset: u64, length: u32) -> Self {
        Self { offset, length }
    }
    /// Offset one past the last byte of the record.
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.length)
    }
    /// Length as a buffer size.
    pub fn len(&self) -> usize {
        self.length as usize
    }
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Decodes a record length prefix.
///
/// Returns `None` when any byte is not an ASCII digit or the value is zero;
/// both conditions end a scan.
#[inline]
pub fn parse_length(prefix: &[u8; LENGTH_PREFIX]) -> Option<u32> {
    let mut value = 0u32;
    for &byte in prefix {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(byte - b'0');
    }
    (value > 0).then_some(value)
}
