use std::slice;

use crate::{IndexEntry, MarcError};

/// Floor for the initial index reservation.
pub const MIN_INDEX_CAPACITY: usize = 4096;

/// Bytes of input assumed per record when pre-sizing the index.
pub const BYTES_PER_ENTRY: u64 = 1024;

/// Upper bound on the size-based pre-reservation.
pub const MAX_PRESIZED_ENTRIES: usize = 1 << 22;

/// Ordered record boundaries of one byte source.
///
/// Entries are appended in file order by the scanner and never change
/// afterwards. Consecutive entries are contiguous: each one starts where the
/// previous one ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<IndexEntry>,
}
impl Index {
    /// Creates an index pre-sized for a source of `total_bytes` bytes.
    pub(crate) fn with_size_hint(
        total_bytes: u64,
        min_capacity: usize,
        bytes_per_entry: u64,
    ) -> crate::Result<Self> {
        let estimate = total_bytes / bytes_per_entry.max(1);
        let capacity = usize::try_from(estimate)
            .unwrap_or(usize::MAX)
            .min(MAX_PRESIZED_ENTRIES)
            .max(min_capacity);

        let mut entries = Vec::new();
        reserve(&mut entries, capacity)?;
        Ok(Self { entries })
    }

    /// Appends the next boundary, doubling the storage when full.
    pub(crate) fn push(&mut self, entry: IndexEntry) -> crate::Result<()> {
        debug_assert!(self
            .entries
            .last()
            .map_or(true, |last| last.end() == entry.offset));
        if self.entries.len() == self.entries.capacity() {
            let additional = self.entries.capacity().max(MIN_INDEX_CAPACITY);
            reserve(&mut self.entries, additional)?;
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn get(&self, idx: usize) -> Option<IndexEntry> {
        self.entries.get(idx).copied()
    }
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
    pub fn iter(&self) -> slice::Iter<'_, IndexEntry> {
        self.entries.iter()
    }
    /// Start offsets of every record, in file order.
    pub fn seek_map(&self) -> Vec<u64> {
        self.entries.iter().map(|entry| entry.offset).collect()
    }
    /// Number of bytes covered by indexed records.
    pub fn end(&self) -> u64 {
        self.entries.last().map_or(0, IndexEntry::end)
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a IndexEntry;
    type IntoIter = slice::Iter<'a, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn reserve(entries: &mut Vec<IndexEntry>, additional: usize) -> crate::Result<()> {
    entries
        .try_reserve_exact(additional)
        .map_err(|source| MarcError::AllocationFailure {
            requested: entries.len().saturating_add(additional),
            source,
        })
}
