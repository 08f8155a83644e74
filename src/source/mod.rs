//! Interval input sources.
//!
//! Input is read once, either from a file or from piped stdin.

use crate::model::error::InputError;
use std::fs::File;
use std::io::{BufRead, BufReader, IsTerminal};
use std::path::PathBuf;
use tracing::debug;

/// Where the interval records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Read-once file input.
    File(PathBuf),
    /// Piped stdin, read to EOF.
    Stdin,
}

/// Detect the input source.
///
/// # Logic:
/// 1. If file path is provided: it must exist
/// 2. Else if stdin is piped: use stdin
/// 3. Else: `InputError::NoInput`
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the file does not exist.
/// Returns `InputError::NoInput` if no file is given and stdin is a terminal.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) if path.exists() => Ok(InputSource::File(path)),
        Some(path) => Err(InputError::FileNotFound { path }),
        None if std::io::stdin().is_terminal() => Err(InputError::NoInput),
        None => Ok(InputSource::Stdin),
    }
}

impl InputSource {
    /// Read every line of the source.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn read_lines(&self) -> Result<Vec<String>, InputError> {
        let lines = match self {
            InputSource::File(path) => read_all(BufReader::new(File::open(path)?))?,
            InputSource::Stdin => read_all(std::io::stdin().lock())?,
        };
        debug!(source = ?self, lines = lines.len(), "Input read");
        Ok(lines)
    }
}

/// Read a file or piped stdin in one go.
///
/// # Errors
///
/// See [`detect_input_source`] and [`InputSource::read_lines`].
pub fn read_lines(file: Option<PathBuf>) -> Result<Vec<String>, InputError> {
    detect_input_source(file)?.read_lines()
}

/// Collect every line of `reader`.
pub fn read_all<R: BufRead>(reader: R) -> Result<Vec<String>, InputError> {
    Ok(reader.lines().collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn missing_file_is_reported() {
        let path = PathBuf::from("/nonexistent/sheetline/input.jsonl");
        match detect_input_source(Some(path.clone())) {
            Err(InputError::FileNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn file_lines_are_read_in_order() {
        let path = std::env::temp_dir().join(format!("sheetline_source_{}.jsonl", std::process::id()));
        fs::write(&path, "first\nsecond\n\nfourth").unwrap();

        let lines = read_lines(Some(path.clone())).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(lines, vec!["first", "second", "", "fourth"]);
    }

    #[test]
    fn read_all_handles_empty_input() {
        assert!(read_all(Cursor::new(Vec::new())).unwrap().is_empty());
    }

    #[test]
    fn read_all_rejects_invalid_utf8() {
        let bytes = vec![b'o', b'k', b'\n', 0xff, 0xfe, b'\n'];
        assert!(matches!(read_all(Cursor::new(bytes)), Err(InputError::Io(_))));
    }
}
