//! Error handling for the fastmarc library.
//!
//! This module defines every error a caller can observe while indexing or
//! reading a record file. Structural anomalies in the input (a non-numeric
//! length prefix, a zero length, a record running past the end of the file)
//! are deliberately absent: the scanner treats them as end-of-data.

use std::collections::TryReserveError;
use std::error::Error as StdError;
use thiserror::Error;

/// A specialized `Result` type for fastmarc operations.
///
/// # Examples
///
/// ```rust
/// use fastmarc::{Reader, Result};
/// use std::io::Cursor;
///
/// fn count(data: Vec<u8>) -> Result<usize> {
///     let reader = Reader::open(Cursor::new(data))?;
///     Ok(reader.len())
/// }
///
/// assert_eq!(count(b"00010ABCDE".to_vec()).unwrap(), 1);
/// ```
pub type Result<T> = std::result::Result<T, MarcError>;

/// Error types for fastmarc operations.
///
/// # Examples
///
/// ```rust
/// use fastmarc::{MarcError, Reader};
/// use std::io::Cursor;
///
/// let reader = Reader::open(Cursor::new(b"00010ABCDE".to_vec())).unwrap();
///
/// match reader.get(7) {
///     Err(MarcError::IndexOutOfRange { idx, max }) => {
///         println!("No record {} (only {} records)", idx, max);
///     }
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum MarcError {
    /// I/O error from the underlying handle.
    ///
    /// Only the streaming backend performs I/O after construction, so this
    /// is raised either while opening a handle that can neither be mapped
    /// nor seeked, or while reading a record through the streaming backend.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// The index storage could not be grown.
    #[error("Failed to allocate index storage for {requested} entries")]
    AllocationFailure {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// The streaming backend returned fewer bytes than the index promised.
    ///
    /// This usually means the file was truncated after it was indexed.
    #[error("Short read at offset {offset}: expected {expected} bytes, found {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// A record index outside `[0, len)` was requested.
    #[error("Invalid index ({idx}) - Must be less than {max}")]
    IndexOutOfRange { idx: usize, max: usize },

    /// The reader was closed before the access.
    #[error("Reader is closed")]
    Closed,

    /// The record model rejected the raw record bytes.
    #[error("Record error: {0}")]
    Record(Box<dyn StdError + Send + Sync>),

    /// Error raised by a user-defined processor during parallel processing.
    #[error("Processing error: {0}")]
    Process(Box<dyn StdError + Send + Sync>),
}

impl MarcError {
    pub(crate) fn record<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Record(Box::new(err))
    }
}

/// Trait for converting errors into `MarcError::Process` variants.
///
/// This lets custom processors used with
/// [`ParallelReader`](crate::ParallelReader) propagate their own error types.
///
/// # Examples
///
/// ```rust
/// use fastmarc::{IntoMarcError, MarcError};
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct CustomError(String);
///
/// impl fmt::Display for CustomError {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "Custom error: {}", self.0)
///     }
/// }
///
/// impl std::error::Error for CustomError {}
///
/// let err = CustomError("something went wrong".to_string()).into_marc_error();
/// assert!(matches!(err, MarcError::Process(_)));
/// ```
pub trait IntoMarcError {
    /// Converts the error into a `MarcError`.
    fn into_marc_error(self) -> MarcError;
}

impl<E> IntoMarcError for E
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_marc_error(self) -> MarcError {
        MarcError::Process(self.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct CustomError(String);

    impl fmt::Display for CustomError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Custom error: {}", self.0)
        }
    }

    impl std::error::Error for CustomError {}

    fn reserve_error() -> TryReserveError {
        Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err()
    }

    #[test]
    fn test_error_display_messages() {
        let err = MarcError::ShortRead {
            offset: 1024,
            expected: 25,
            actual: 7,
        };
        let display = format!("{}", err);
        assert!(display.contains("1024"));
        assert!(display.contains("expected 25"));
        assert!(display.contains("found 7"));

        let err = MarcError::IndexOutOfRange { idx: 100, max: 50 };
        let display = format!("{}", err);
        assert!(display.contains("100"));
        assert!(display.contains("50"));

        let err = MarcError::Closed;
        assert_eq!(format!("{}", err), "Reader is closed");

        let err = MarcError::AllocationFailure {
            requested: 4096,
            source: reserve_error(),
        };
        assert!(format!("{}", err).contains("4096"));

        let err = MarcError::record(CustomError("bad leader".to_string()));
        assert!(format!("{}", err).contains("bad leader"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: MarcError = io_err.into();

        match err {
            MarcError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_allocation_failure_source() {
        let err = MarcError::AllocationFailure {
            requested: 1,
            source: reserve_error(),
        };
        let source = err.source().expect("allocation failure keeps its source");
        assert!(source.downcast_ref::<TryReserveError>().is_some());
    }

    #[test]
    fn test_into_marc_error_trait() {
        let err = CustomError("test".to_string()).into_marc_error();

        match err {
            MarcError::Process(boxed) => {
                assert!(format!("{}", boxed).contains("Custom error: test"));
            }
            _ => panic!("Expected Process variant"),
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<MarcError>();
        is_sync::<MarcError>();
    }
}
