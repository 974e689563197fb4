//! Boundary scanning.
//!
//! A scan walks the source once from offset zero, reading each five digit
//! length prefix and jumping over the record body. It stops without error at
//! the first prefix that is not five ASCII digits, declares a zero length, or
//! points past the end of the source. Everything from that offset on is
//! treated as trailing garbage.

use std::io::{self, Read, Seek, SeekFrom};

use crate::{parse_length, Index, IndexEntry, LENGTH_PREFIX};

/// Indexes records laid out back-to-back in `bytes`.
pub fn scan_bytes(bytes: &[u8], index: &mut Index) -> crate::Result<()> {
    let size = bytes.len();
    let mut pos = 0;
    while pos + LENGTH_PREFIX <= size {
        let Some(length) = bytes[pos..pos + LENGTH_PREFIX]
            .try_into()
            .ok()
            .and_then(parse_length)
        else {
            break;
        };
        let end = pos + length as usize;
        if end > size {
            break;
        }
        index.push(IndexEntry::new(pos as u64, length))?;
        pos = end;
    }
    Ok(())
}

/// Indexes records by reading only their prefixes from a seekable handle.
///
/// Record bodies are skipped with a relative seek and never read. The handle
/// is rewound to offset zero afterwards, whether or not the scan succeeded.
pub fn scan_stream<R: Read + Seek>(
    inner: &mut R,
    size: u64,
    index: &mut Index,
) -> crate::Result<()> {
    let walked = walk_stream(inner, size, index);
    let rewound = inner.seek(SeekFrom::Start(0));
    walked?;
    rewound?;
    Ok(())
}

fn walk_stream<R: Read + Seek>(
    inner: &mut R,
    size: u64,
    index: &mut Index,
) -> crate::Result<()> {
    let prefix_len = LENGTH_PREFIX as u64;
    let mut prefix = [0u8; LENGTH_PREFIX];
    let mut pos = inner.seek(SeekFrom::Start(0))?;
    while pos + prefix_len <= size {
        match inner.read_exact(&mut prefix) {
            Ok(()) => {}
            // The handle shrank underneath us; treat as end of data.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
        let Some(length) = parse_length(&prefix) else {
            break;
        };
        let end = pos + u64::from(length);
        if end > size {
            break;
        }
        index.push(IndexEntry::new(pos, length))?;
        inner.seek(SeekFrom::Current(i64::from(length) - prefix_len as i64))?;
        pos = end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(length: usize, fill: u8) -> Vec<u8> {
        let mut bytes = format!("{:05}", length).into_bytes();
        bytes.resize(length, fill);
        bytes
    }

    fn records(lengths: &[usize]) -> Vec<u8> {
        lengths
            .iter()
            .enumerate()
            .flat_map(|(i, &len)| record(len, b'a' + i as u8))
            .collect()
    }

    /// Runs both scanners and checks they agree.
    fn scan(bytes: &[u8]) -> Index {
        let mut mapped = Index::default();
        scan_bytes(bytes, &mut mapped).unwrap();

        let mut streamed = Index::default();
        let mut cursor = Cursor::new(bytes);
        scan_stream(&mut cursor, bytes.len() as u64, &mut streamed).unwrap();
        assert_eq!(cursor.position(), 0);

        assert_eq!(mapped, streamed);
        mapped
    }

    #[test]
    fn test_three_records() {
        let index = scan(&records(&[25, 25, 25]));
        assert_eq!(index.len(), 3);
        assert_eq!(index.seek_map(), vec![0, 25, 50]);
    }

    #[test]
    fn test_variable_lengths() {
        let lengths = [5, 120, 99_999, 7, 3000];
        let bytes = records(&lengths);
        let index = scan(&bytes);

        assert_eq!(index.len(), lengths.len());
        for (entry, &len) in index.iter().zip(&lengths) {
            assert_eq!(entry.len(), len);
        }
        assert_eq!(index.end(), bytes.len() as u64);
    }

    #[test]
    fn test_empty_source() {
        assert!(scan(b"").is_empty());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        for tail in [&b"\n"[..], b"\r\n", b"000", b"0001"] {
            let mut bytes = records(&[10, 20]);
            bytes.extend_from_slice(tail);
            let index = scan(&bytes);
            assert_eq!(index.len(), 2);
            assert_eq!(index.end(), 30);
        }
    }

    #[test]
    fn test_truncated_record() {
        let index = scan(b"00010AB");
        assert!(index.is_empty());

        let mut bytes = records(&[12]);
        bytes.extend_from_slice(b"00010AB");
        assert_eq!(scan(&bytes).len(), 1);
    }

    #[test]
    fn test_non_digit_prefix() {
        let mut bytes = b"0002X".to_vec();
        bytes.extend_from_slice(&[b'z'; 20]);
        assert!(scan(&bytes).is_empty());
    }

    #[test]
    fn test_garbage_keeps_earlier_entries() {
        let mut bytes = records(&[10, 11, 12]);
        bytes.extend_from_slice(b"ABCDE");
        bytes.extend_from_slice(&records(&[10]));
        let index = scan(&bytes);
        assert_eq!(index.seek_map(), vec![0, 10, 21]);
    }

    #[test]
    fn test_zero_length_stops() {
        let mut bytes = records(&[10]);
        bytes.extend_from_slice(b"00000");
        bytes.extend_from_slice(&records(&[10]));
        assert_eq!(scan(&bytes).len(), 1);
    }

    #[test]
    fn test_short_declared_length() {
        // A length below the prefix width is accepted; the next prefix
        // starts inside the previous one.
        let index = scan(b"000010abcde");
        assert_eq!(index.seek_map(), vec![0, 1]);
        assert_eq!(index.entries()[1].length, 10);
        assert_eq!(index.end(), 11);
    }

    #[test]
    fn test_streaming_skips_bodies() {
        /// Fails any read that is not a length prefix.
        struct PrefixOnly(Cursor<Vec<u8>>);

        impl Read for PrefixOnly {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                assert!(buf.len() <= LENGTH_PREFIX, "record body was read");
                self.0.read(buf)
            }
        }

        impl Seek for PrefixOnly {
            fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
                self.0.seek(pos)
            }
        }

        let bytes = records(&[100, 200, 300]);
        let size = bytes.len() as u64;
        let mut handle = PrefixOnly(Cursor::new(bytes));
        let mut index = Index::default();
        scan_stream(&mut handle, size, &mut index).unwrap();
        assert_eq!(index.seek_map(), vec![0, 100, 300]);
    }
}
