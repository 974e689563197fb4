//! # fastmarc - Indexed Random Access for MARC Record Files
//!
//! `fastmarc` indexes files of back-to-back, self-delimiting records framed
//! the way MARC (ISO 2709) transmission files are: every record starts with a
//! five digit ASCII length that counts the whole record, prefix included.
//!
//! A single pass over the file records the offset and length of every
//! record. After that, any record can be fetched in constant time and the
//! file can be iterated as often as needed without scanning it again.
//!
//! ## Framing
//!
//! ```text
//! 00025....................00031..........................00012.......
//! ^ offset 0               ^ offset 25                    ^ offset 56
//! ```
//!
//! - Prefix: exactly five ASCII digits, zero padded, value `1..=99999`
//! - Body: opaque to this crate, handed whole to the record model
//! - The scan stops at the first prefix that is not five digits, is zero, or
//!   overruns the end of the file; everything after it is ignored without
//!   error, so trailing newlines and padding are harmless
//!
//! ## Basic Usage
//!
//! ```rust
//! use fastmarc::Reader;
//! use std::io::Cursor;
//!
//! # fn main() -> fastmarc::Result<()> {
//! let mut data = Vec::new();
//! for _ in 0..3 {
//!     data.extend_from_slice(b"00025");
//!     data.extend_from_slice(&[b'#'; 20]);
//! }
//!
//! let reader = Reader::open(Cursor::new(data.clone()))?;
//! assert_eq!(reader.len(), 3);
//! assert_eq!(reader.seek_map(), vec![0, 25, 50]);
//! assert_eq!(reader.get(1)?.as_bytes(), &data[25..50]);
//!
//! let total: usize = reader
//!     .iter()?
//!     .map(|record| record.map(|r| r.len()))
//!     .sum::<fastmarc::Result<usize>>()?;
//! assert_eq!(total, 75);
//! # Ok(())
//! # }
//! ```
//!
//! ## Files and Memory Mapping
//!
//! Files are memory-mapped when possible, which makes both the scan and
//! record access zero-copy. Pipes, empty files and any other handle that
//! cannot be mapped are read through seek-and-read instead; nothing about the
//! API changes. Pass `&File` to keep ownership of the file handle.
//!
//! ```rust,no_run
//! use fastmarc::Reader;
//! use std::fs::File;
//!
//! # fn main() -> fastmarc::Result<()> {
//! let file = File::open("records.mrc")?;
//! let reader = Reader::open(&file)?;
//! println!("{} records", reader.len());
//!
//! let zero_copy = reader.raw(0)?;
//! println!("first record is {} bytes", zero_copy.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Record Models
//!
//! Records are returned as [`RawRecord`]s by default. Any type implementing
//! [`FromRecordBytes`] can be used instead, which is how a full MARC parser
//! plugs in.
//!
//! ## Concurrency
//!
//! `get` takes `&self` and a `Reader` is `Sync`, so records can be fetched
//! from many threads at once. Every call to [`Reader::iter`] returns its own
//! cursor; independent passes over the same reader never interfere. The
//! [`ParallelReader`] trait splits the whole file across threads.
//!
//! ```rust
//! use fastmarc::{ParallelProcessor, ParallelReader, RawRecord, Reader};
//! use std::io::Cursor;
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Clone, Default)]
//! struct ByteCounter {
//!     local: usize,
//!     global: Arc<Mutex<usize>>,
//! }
//!
//! impl ParallelProcessor<RawRecord> for ByteCounter {
//!     fn process_record(&mut self, _idx: usize, record: RawRecord) -> fastmarc::Result<()> {
//!         self.local += record.len();
//!         Ok(())
//!     }
//!
//!     fn on_batch_complete(&mut self) -> fastmarc::Result<()> {
//!         *self.global.lock().unwrap() += self.local;
//!         self.local = 0;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> fastmarc::Result<()> {
//! let data = b"00010ABCDE00007XY".to_vec();
//! let reader = Reader::open(Cursor::new(data))?;
//! let counter = ByteCounter::default();
//! reader.process_parallel(counter.clone(), 0)?; // 0 = use all available cores
//! assert_eq!(*counter.global.lock().unwrap(), 17);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Malformed data never produces an error; only misuse does:
//!
//! ```rust
//! use fastmarc::{MarcError, Reader};
//! use std::io::Cursor;
//!
//! # fn main() -> fastmarc::Result<()> {
//! let mut reader = Reader::open(Cursor::new(b"00010ABCDE\r\n".to_vec()))?;
//! assert!(matches!(reader.get(1), Err(MarcError::IndexOutOfRange { idx: 1, max: 1 })));
//!
//! reader.close();
//! assert!(matches!(reader.get(0), Err(MarcError::Closed)));
//! # Ok(())
//! # }
//! ```

mod constructs;
mod error;
mod io;
mod parallel;

pub use constructs::{
    parse_length, FromRecordBytes, Index, IndexEntry, RawRecord, BYTES_PER_ENTRY, LEADER_LEN,
    LENGTH_PREFIX, MAX_PRESIZED_ENTRIES, MAX_RECORD_LEN, MIN_INDEX_CAPACITY,
};
pub use error::{IntoMarcError, MarcError, Result};
pub use io::{scan_bytes, scan_stream, Handle, Reader, ReaderOptions, Records};
pub use parallel::{ParallelProcessor, ParallelReader, BATCH_SIZE};
