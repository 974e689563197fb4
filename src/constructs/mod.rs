mod entry;
mod index;
mod record;

pub use entry::{parse_length, IndexEntry, LENGTH_PREFIX, MAX_RECORD_LEN};
pub use index::{Index, BYTES_PER_ENTRY, MAX_PRESIZED_ENTRIES, MIN_INDEX_CAPACITY};
pub use record::{FromRecordBytes, RawRecord, LEADER_LEN};
