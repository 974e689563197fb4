//! Byte access strategies for record files.
//!
//! A [`Handle`] is anything the reader can seek and read. Handles backed by a
//! regular file can additionally be memory-mapped; the reader always tries
//! that first and silently falls back to seek-and-read when it fails.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, Cursor, Read, Seek, SeekFrom},
    sync::{Mutex, MutexGuard, PoisonError},
};

use memmap2::Mmap;

use crate::MarcError;

/// A seekable byte handle that may support memory mapping.
///
/// The default [`map`](Handle::map) reports the handle as unmappable, which
/// makes the reader use the streaming backend.
///
/// Pass `&File` (or `&mut` to any handle) to keep ownership of the handle;
/// the reader never closes a handle it only borrows.
pub trait Handle: Read + Seek {
    /// Maps the whole handle read-only.
    fn map(&self) -> io::Result<Mmap> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "handle does not support memory mapping",
        ))
    }
}

impl Handle for File {
    fn map(&self) -> io::Result<Mmap> {
        map_file(self)
    }
}

impl Handle for &File {
    fn map(&self) -> io::Result<Mmap> {
        map_file(self)
    }
}

impl<T: AsRef<[u8]>> Handle for Cursor<T> {}

impl<H: Handle + ?Sized> Handle for &mut H {
    fn map(&self) -> io::Result<Mmap> {
        (**self).map()
    }
}

impl<H: Handle + ?Sized> Handle for Box<H> {
    fn map(&self) -> io::Result<Mmap> {
        (**self).map()
    }
}

fn map_file(file: &File) -> io::Result<Mmap> {
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "not a regular file",
        ));
    }
    if metadata.len() == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "cannot map an empty file",
        ));
    }
    // SAFETY: the map is read-only and the file must not be modified while
    // a reader holds it.
    unsafe { Mmap::map(file) }
}

/// Which backend a [`ByteSource`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Backend {
    Mapped,
    Streaming,
}

/// Raw byte access for one record file.
pub(crate) enum ByteSource<R> {
    /// Zero-copy view over the whole file
    Mapped(Mmap),
    /// Seek-and-read over the caller's handle
    Streaming(Streaming<R>),
}
impl<R: Handle> ByteSource<R> {
    /// Maps the handle when allowed and possible, streams otherwise.
    pub fn acquire(handle: R, try_map: bool) -> crate::Result<Self> {
        if try_map {
            match handle.map() {
                Ok(map) => return Ok(Self::Mapped(map)),
                Err(e) => {
                    log::debug!("memory mapping unavailable ({e}), falling back to streaming")
                }
            }
        }
        Streaming::new(handle).map(Self::Streaming)
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::Mapped(_) => Backend::Mapped,
            Self::Streaming(_) => Backend::Streaming,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Self::Mapped(map) => map.len() as u64,
            Self::Streaming(stream) => stream.size(),
        }
    }

    /// Returns `[offset, offset + length)`, borrowed when mapped.
    pub fn slice(&self, offset: u64, length: usize) -> crate::Result<Cow<'_, [u8]>> {
        match self {
            Self::Mapped(map) => {
                let short_read = || MarcError::ShortRead {
                    offset,
                    expected: length,
                    actual: map.len().saturating_sub(offset as usize),
                };
                let start = usize::try_from(offset).map_err(|_| short_read())?;
                let end = start.checked_add(length).ok_or_else(short_read)?;
                map.get(start..end).map(Cow::Borrowed).ok_or_else(short_read)
            }
            Self::Streaming(stream) => stream.read_at(offset, length).map(Cow::Owned),
        }
    }
}

/// Seek-and-read access to a handle shared between concurrent callers.
pub(crate) struct Streaming<R> {
    inner: Mutex<R>,
    size: u64,
}
impl<R: Read + Seek> Streaming<R> {
    fn new(mut inner: R) -> crate::Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner: Mutex::new(inner),
            size,
        })
    }

    /// Exclusive access to the handle, for the boundary scan.
    pub fn lock(&self) -> MutexGuard<'_, R> {
        // A panic mid-read leaves nothing half-updated: every access seeks first.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&self, offset: u64, length: usize) -> crate::Result<Vec<u8>> {
        let mut inner = self.lock();
        inner.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; length];
        let mut read = 0;
        while read < length {
            match inner.read(&mut buffer[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        if read < length {
            return Err(MarcError::ShortRead {
                offset,
                expected: length,
                actual: read,
            });
        }
        Ok(buffer)
    }
}
