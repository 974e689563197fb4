use std::convert::Infallible;

use super::entry::{parse_length, LENGTH_PREFIX};

/// Size of the MARC leader, the fixed header that opens every record.
pub const LEADER_LEN: usize = 24;

/// Conversion from the raw bytes of one record into a structured record.
///
/// This is the seam to a record model: the reader locates records and
/// slices their bytes, the implementor of this trait decides what the bytes
/// mean. Failures surface from the reader as
/// [`MarcError::Record`](crate::MarcError::Record).
///
/// # Examples
///
/// ```rust
/// use fastmarc::{FromRecordBytes, Reader};
/// use std::io::Cursor;
///
/// /// Keeps only the record body, dropping the length prefix.
/// struct Body(Vec<u8>);
///
/// impl FromRecordBytes for Body {
///     type Error = std::convert::Infallible;
///
///     fn from_record_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
///         Ok(Body(bytes[5..].to_vec()))
///     }
/// }
///
/// # fn main() -> fastmarc::Result<()> {
/// let data = b"00010ABCDE".to_vec();
/// let reader = Reader::<_, Body>::open_with_options(Cursor::new(data), Default::default())?;
/// assert_eq!(reader.get(0)?.0, b"ABCDE");
/// # Ok(())
/// # }
/// ```
pub trait FromRecordBytes: Sized {
    /// Error raised when the bytes are not a valid record for this model.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Materializes a record from its complete bytes, prefix included.
    fn from_record_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

/// An unparsed record: the exact bytes between two boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawRecord {
    bytes: Vec<u8>,
}
impl RawRecord {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
    /// Length declared by the record's own prefix, if it has one.
    pub fn declared_len(&self) -> Option<u32> {
        let prefix = self.bytes.get(..LENGTH_PREFIX)?.try_into().ok()?;
        parse_length(prefix)
    }
    /// The 24 byte leader, when the record is long enough to carry one.
    pub fn leader(&self) -> Option<&[u8]> {
        self.bytes.get(..LEADER_LEN)
    }
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for RawRecord {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<RawRecord> for Vec<u8> {
    fn from(record: RawRecord) -> Self {
        record.bytes
    }
}

impl FromRecordBytes for RawRecord {
    type Error = Infallible;

    fn from_record_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self::new(bytes.to_vec()))
    }
}

impl FromRecordBytes for Vec<u8> {
    type Error = Infallible;

    fn from_record_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_accessors() {
        let mut bytes = b"00030nam a2200000 a 4500".to_vec();
        bytes.extend_from_slice(b"XYZ\x1e\x1d!");
        let record = RawRecord::from_record_bytes(&bytes).unwrap();

        assert_eq!(record.len(), 30);
        assert_eq!(record.declared_len(), Some(30));
        assert_eq!(record.leader(), Some(&b"00030nam a2200000 a 4500"[..]));
        assert_eq!(record.as_bytes(), &bytes[..]);
        assert_eq!(record.into_bytes(), bytes);
    }

    #[test]
    fn test_raw_record_short() {
        let record = RawRecord::new(b"00010ABCDE".to_vec());
        assert_eq!(record.declared_len(), Some(10));
        assert_eq!(record.leader(), None);

        let record = RawRecord::new(b"001".to_vec());
        assert_eq!(record.declared_len(), None);
        assert!(!record.is_empty());
    }

    #[test]
    fn test_vec_model() {
        let bytes = Vec::<u8>::from_record_bytes(b"00007AB").unwrap();
        assert_eq!(bytes, b"00007AB");
    }
}
