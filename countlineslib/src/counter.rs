//! Streaming line counter.
//!
//! Files are read in fixed 32 KiB chunks and `\n` bytes are counted, so
//! memory use does not depend on file size. Content is not decoded; binary
//! files are counted the same way as text.
//!
//! A final line without a trailing terminator still counts: the result is the
//! number of `\n` bytes, plus one when the stream is non-empty and does not
//! end in `\n`. An empty file has zero lines.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::error::CountlinesError;
use crate::Result;

/// Read buffer size.
pub const CHUNK_SIZE: usize = 32 * 1024;

const TERMINATOR: u8 = b'\n';

/// Count the lines in the file at `path`.
///
/// # Example
///
/// ```rust
/// use countlineslib::count_lines;
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let path = dir.path().join("main.go");
/// fs::write(&path, "package main\n\nfunc main() {}").unwrap();
///
/// assert_eq!(count_lines(&path).unwrap(), 3);
/// ```
pub fn count_lines(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CountlinesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    count_reader(file).map_err(|source| CountlinesError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Count the lines in any byte stream, using the same rule as [`count_lines`].
pub fn count_reader<R: Read>(mut reader: R) -> std::io::Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut lines = 0u64;
    let mut last_byte = None;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let chunk = &buf[..n];
        lines += bytecount::count(chunk, TERMINATOR) as u64;
        last_byte = chunk.last().copied();
    }

    match last_byte {
        Some(byte) if byte != TERMINATOR => Ok(lines + 1),
        _ => Ok(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn count_str(content: &str) -> u64 {
        count_reader(Cursor::new(content.as_bytes())).unwrap()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(count_str(""), 0);
    }

    #[test]
    fn test_trailing_terminator() {
        assert_eq!(count_str("a\nb\nc\n"), 3);
        assert_eq!(count_str("\n"), 1);
        assert_eq!(count_str("\n\n\n"), 3);
    }

    #[test]
    fn test_missing_trailing_terminator_adds_one() {
        assert_eq!(count_str("a\nb\nc"), 3);
        assert_eq!(count_str("single line"), 1);
    }

    #[test]
    fn test_crlf_counts_once() {
        assert_eq!(count_str("a\r\nb\r\n"), 2);
    }

    #[test]
    fn test_binary_content_counted_uniformly() {
        let data = [0u8, 159, 146, 150, b'\n', 0xff, 0xfe];
        assert_eq!(count_reader(Cursor::new(&data[..])).unwrap(), 2);
    }

    #[test]
    fn test_content_spanning_many_chunks() {
        let line = "x".repeat(99) + "\n";
        let content = line.repeat(1000);
        assert!(content.len() > CHUNK_SIZE * 3);

        assert_eq!(count_str(&content), 1000);
        assert_eq!(count_str(&content[..content.len() - 1]), 1000);
    }

    #[test]
    fn test_terminator_on_chunk_boundary() {
        let mut content = "y".repeat(CHUNK_SIZE - 1);
        content.push('\n');
        content.push_str("tail");

        assert_eq!(count_str(&content), 2);
    }

    #[test]
    fn test_count_lines_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("b.go");
        fs::write(&path, "1\n2\n3\n4\n5").unwrap();

        assert_eq!(count_lines(&path).unwrap(), 5);
    }

    #[test]
    fn test_count_lines_missing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing.txt");

        match count_lines(&path) {
            Err(CountlinesError::FileRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected FileRead error, got {other:?}"),
        }
    }

    #[test]
    fn test_count_lines_on_directory_fails() {
        let temp = tempdir().unwrap();

        assert!(count_lines(temp.path()).is_err());
    }
}
