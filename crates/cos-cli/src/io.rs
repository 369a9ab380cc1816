//! Snapshot input: disk files and stdin, size-capped and UTF-8 checked.
//!
//! `cos-core` never touches the filesystem; every read happens here and every
//! failure becomes an exit-code-2 [`CliError`].
use std::io::{ErrorKind, Read as _};
use std::path::Path;

use crate::PathOrStdin;
use crate::error::CliError;

/// Reads all of `source` into a `String`, refusing anything over `max_size`
/// bytes.
///
/// # Errors
///
/// Missing or unreadable file, oversized input, stdin failure, or invalid
/// UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    let bytes = match source {
        PathOrStdin::Path(path) => read_file(path, max_size)?,
        PathOrStdin::Stdin => read_stdin(max_size)?,
    };
    decode_utf8(bytes, &source.label())
}

fn read_file(path: &Path, max_size: u64) -> Result<Vec<u8>, CliError> {
    let size = std::fs::metadata(path)
        .map_err(|e| file_error(&e, path))?
        .len();
    if size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(size),
        });
    }
    std::fs::read(path).map_err(|e| file_error(&e, path))
}

fn read_stdin(max_size: u64) -> Result<Vec<u8>, CliError> {
    read_capped(std::io::stdin().lock(), max_size)
}

/// Reads at most `max_size + 1` bytes so an oversized stream is detected
/// without buffering all of it.
fn read_capped<R: std::io::Read>(reader: R, max_size: u64) -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;
    if buf.len() as u64 > max_size {
        return Err(CliError::FileTooLarge {
            source: "-".to_owned(),
            limit: max_size,
            actual: None,
        });
    }
    Ok(buf)
}

fn decode_utf8(bytes: Vec<u8>, source: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: source.to_owned(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

fn file_error(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::io::Write as _;

    use super::*;

    fn temp_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        f.write_all(content).expect("write");
        f
    }

    #[test]
    fn reads_small_file() {
        let f = temp_file(br#"{"league": {"name": "L"}}"#);
        let source = PathOrStdin::Path(f.path().to_path_buf());
        let text = read_input(&source, 1024).expect("read");
        assert!(text.contains("league"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let source = PathOrStdin::Path("/nonexistent/cos/season.json".into());
        let err = read_input(&source, 1024).expect_err("missing");
        assert!(matches!(err, CliError::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn oversized_file_reports_actual_size() {
        let f = temp_file(&[b'x'; 100]);
        let source = PathOrStdin::Path(f.path().to_path_buf());
        let err = read_input(&source, 10).expect_err("too large");
        assert!(matches!(
            err,
            CliError::FileTooLarge {
                limit: 10,
                actual: Some(100),
                ..
            }
        ));
    }

    #[test]
    fn file_exactly_at_limit_is_accepted() {
        let f = temp_file(&[b'x'; 10]);
        let source = PathOrStdin::Path(f.path().to_path_buf());
        assert_eq!(read_input(&source, 10).expect("read").len(), 10);
    }

    #[test]
    fn capped_reader_rejects_overflow() {
        let data = vec![b'x'; 11];
        let err = read_capped(data.as_slice(), 10).expect_err("too large");
        assert!(matches!(err, CliError::FileTooLarge { actual: None, .. }));
        assert_eq!(read_capped(&data[..10], 10).expect("fits").len(), 10);
    }

    #[test]
    fn invalid_utf8_reports_offset() {
        let f = temp_file(b"abc\xff\xfe");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        let err = read_input(&source, 1024).expect_err("bad utf-8");
        assert!(matches!(err, CliError::InvalidUtf8 { byte_offset: 3, .. }));
    }
}
