//! Indexed reader for length-prefixed record files.
//!
//! The [`Reader`] scans its handle once on construction and afterwards serves
//! random access and sequential iteration straight from the resulting index.

use std::{borrow::Cow, fmt, iter::FusedIterator, marker::PhantomData};

use super::{
    scan::{scan_bytes, scan_stream},
    source::{ByteSource, Handle},
};
use crate::{
    FromRecordBytes, Index, IndexEntry, MarcError, RawRecord, BYTES_PER_ENTRY, MIN_INDEX_CAPACITY,
};

/// Construction settings for a [`Reader`].
///
/// # Examples
///
/// ```rust
/// use fastmarc::{Reader, ReaderOptions};
/// use std::io::Cursor;
///
/// # fn main() -> fastmarc::Result<()> {
/// let options = ReaderOptions::streaming();
/// let reader = Reader::<_>::open_with_options(Cursor::new(b"00010ABCDE".to_vec()), options)?;
/// assert_eq!(reader.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Attempt to memory-map the handle before falling back to streaming
    pub mmap: bool,
    /// Minimum number of index slots reserved up front
    pub min_capacity: usize,
    /// Expected bytes per record, used to pre-size the index
    pub bytes_per_entry: u64,
}
impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            mmap: true,
            min_capacity: MIN_INDEX_CAPACITY,
            bytes_per_entry: BYTES_PER_ENTRY,
        }
    }
}
impl ReaderOptions {
    /// Options that never attempt a memory map.
    pub fn streaming() -> Self {
        Self {
            mmap: false,
            ..Self::default()
        }
    }
}

/// Random-access reader over a file of length-prefixed records.
///
/// Opening a reader scans the whole handle once and records the offset and
/// length of every record. Records are then materialized on demand through
/// the record model `M` (raw bytes by default).
///
/// The reader memory-maps the handle when it can and falls back to seeking
/// and reading otherwise; both behave identically from the outside.
///
/// # Type Parameters
///
/// - `R: Handle` - The seekable data source (`File`, `&File`, `Cursor`, ...)
/// - `M: FromRecordBytes` - The record model records are materialized into
///
/// # Examples
///
/// ```rust
/// use fastmarc::Reader;
/// use std::io::Cursor;
///
/// # fn main() -> fastmarc::Result<()> {
/// let mut data = Vec::new();
/// for body in ["first", "second", "third"] {
///     data.extend_from_slice(format!("{:05}{}", body.len() + 5, body).as_bytes());
/// }
/// data.extend_from_slice(b"\n"); // trailing padding is ignored
///
/// let mut reader = Reader::open(Cursor::new(data))?;
/// assert_eq!(reader.len(), 3);
/// assert_eq!(reader.seek_map(), vec![0, 10, 21]);
/// assert_eq!(reader.get(1)?.as_bytes(), b"00011second");
///
/// for record in reader.iter()? {
///     println!("{} bytes", record?.len());
/// }
///
/// reader.close();
/// assert!(reader.get(0).is_err());
/// # Ok(())
/// # }
/// ```
pub struct Reader<R, M = RawRecord> {
    /// Byte access, `None` once closed
    source: Option<ByteSource<R>>,

    /// Record boundaries, fixed after construction
    index: Index,

    /// Size of the source in bytes
    size: u64,

    model: PhantomData<fn() -> M>,
}

impl<R: Handle> Reader<R> {
    /// Opens a reader producing [`RawRecord`]s with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The index storage cannot be allocated
    /// - The handle can neither be mapped nor seeked
    pub fn open(handle: R) -> crate::Result<Self> {
        Self::open_with_options(handle, ReaderOptions::default())
    }
}

impl<R: Handle, M: FromRecordBytes> Reader<R, M> {
    /// Opens a reader with explicit options and record model.
    ///
    /// Malformed data never fails construction: the scan stops at the first
    /// invalid length prefix and keeps every record found before it.
    pub fn open_with_options(handle: R, options: ReaderOptions) -> crate::Result<Self> {
        let source = ByteSource::acquire(handle, options.mmap)?;
        let size = source.size();

        let mut index =
            Index::with_size_hint(size, options.min_capacity, options.bytes_per_entry)?;
        match &source {
            ByteSource::Mapped(map) => scan_bytes(map, &mut index)?,
            ByteSource::Streaming(stream) => {
                scan_stream(&mut *stream.lock(), size, &mut index)?;
            }
        }

        log::debug!(
            "indexed {} records in {} bytes ({:?}), {} trailing bytes ignored",
            index.len(),
            size,
            source.backend(),
            size - index.end()
        );

        Ok(Self {
            source: Some(source),
            index,
            size,
            model: PhantomData,
        })
    }

    /// Materializes record `idx`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reader is closed
    /// - `idx` is not below [`len`](Self::len)
    /// - The streaming backend cannot read the record
    /// - The record model rejects the bytes
    pub fn get(&self, idx: usize) -> crate::Result<M> {
        let bytes = self.raw(idx)?;
        M::from_record_bytes(&bytes).map_err(MarcError::record)
    }

    /// Returns an independent pass over every record in file order.
    ///
    /// Each call starts a fresh traversal at the first record; passes never
    /// share a position, so several can be advanced side by side.
    pub fn iter(&self) -> crate::Result<Records<'_, R, M>> {
        self.source()?;
        Ok(Records::new(self))
    }
}

impl<R: Handle, M> Reader<R, M> {
    /// Raw bytes of record `idx`, prefix included.
    ///
    /// Borrowed from the map when the handle is memory-mapped.
    pub fn raw(&self, idx: usize) -> crate::Result<Cow<'_, [u8]>> {
        let source = self.source()?;
        let entry = self.entry(idx).ok_or(MarcError::IndexOutOfRange {
            idx,
            max: self.len(),
        })?;
        source.slice(entry.offset, entry.len())
    }

    /// Releases the byte source. Calling it again does nothing.
    ///
    /// Index queries keep working; record access fails with
    /// [`MarcError::Closed`].
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            log::debug!("closed reader over {} records", self.index.len());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    fn source(&self) -> crate::Result<&ByteSource<R>> {
        self.source.as_ref().ok_or(MarcError::Closed)
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> Option<super::source::Backend> {
        self.source.as_ref().map(ByteSource::backend)
    }
}

impl<R, M> Reader<R, M> {
    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.index.len()
    }
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
    pub fn entry(&self, idx: usize) -> Option<IndexEntry> {
        self.index.get(idx)
    }
    pub fn entries(&self) -> &[IndexEntry] {
        self.index.entries()
    }
    pub fn index(&self) -> &Index {
        &self.index
    }
    /// Start offset of every record, copied out of the index.
    pub fn seek_map(&self) -> Vec<u64> {
        self.index.seek_map()
    }
    /// Bytes after the last record that the scan discarded.
    pub fn trailing_bytes(&self) -> u64 {
        self.size - self.index.end()
    }
}

impl<R, M> fmt::Debug for Reader<R, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("records", &self.index.len())
            .field("size", &self.size)
            .field("closed", &self.source.is_none())
            .finish()
    }
}

impl<'r, R: Handle, M: FromRecordBytes> IntoIterator for &'r Reader<R, M> {
    type Item = crate::Result<M>;
    type IntoIter = Records<'r, R, M>;

    /// Iterating a closed reader yields a single [`MarcError::Closed`].
    fn into_iter(self) -> Self::IntoIter {
        Records::new(self)
    }
}

/// One pass over the records of a [`Reader`].
///
/// The position lives here, not in the reader.
pub struct Records<'r, R, M> {
    reader: &'r Reader<R, M>,
    pos: usize,
    end: usize,
}
impl<'r, R, M> Records<'r, R, M> {
    fn new(reader: &'r Reader<R, M>) -> Self {
        Self {
            reader,
            pos: 0,
            end: reader.len(),
        }
    }
}

impl<R: Handle, M: FromRecordBytes> Iterator for Records<'_, R, M> {
    type Item = crate::Result<M>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.is_closed() && self.pos < self.end {
            self.pos = self.end;
            return Some(Err(MarcError::Closed));
        }
        if self.pos >= self.end {
            return None;
        }
        let record = self.reader.get(self.pos);
        self.pos += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.reader.is_closed() {
            usize::from(self.pos < self.end)
        } else {
            self.end - self.pos
        };
        (remaining, Some(remaining))
    }
}

impl<R: Handle, M: FromRecordBytes> ExactSizeIterator for Records<'_, R, M> {}

impl<R: Handle, M: FromRecordBytes> FusedIterator for Records<'_, R, M> {}
