//! Text object-file loader.
//!
//! An object file is a list of `0x`-prefixed hexadecimal words, one per
//! line, blank lines ignored. The first two words are the text and data
//! segment sizes in bytes, followed by the text words and then the data
//! words.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::memory::parse_hex_u32;
use crate::AddressSpace;

/// Loader failures.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// A non-blank line is not a `0x`-prefixed 32-bit word.
    #[error("invalid object file: line {line} is not a hexadecimal word")]
    InvalidFormat {
        /// 1-based line number.
        line: usize,
    },
    /// Declared section sizes disagree with the words present.
    #[error("section size does not match")]
    SectionSizeMismatch,
    /// The path names a directory.
    #[error("{} is a directory", .0.display())]
    IsDirectory(PathBuf),
    /// The path does not exist.
    #[error("{} does not exist", .0.display())]
    FileNotFound(PathBuf),
    /// Any other read failure.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

/// Parses one object-file word, ignoring surrounding whitespace.
#[must_use]
pub fn parse_word(text: &str) -> Option<u32> {
    parse_hex_u32(text.trim()).ok()
}

/// Segment images decoded from an object file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectImage {
    /// Text segment bytes, big-endian words.
    pub text: Vec<u8>,
    /// Data segment bytes, big-endian words.
    pub data: Vec<u8>,
}

impl ObjectImage {
    /// Parses object-file source text.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::InvalidFormat`] for a malformed line and
    /// [`ObjectError::SectionSizeMismatch`] when the header is missing, a
    /// size is not a multiple of four, or the word count disagrees with the
    /// declared sizes.
    pub fn parse(source: &str) -> Result<Self, ObjectError> {
        let mut words = Vec::new();

        for (index, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let word = parse_word(line).ok_or(ObjectError::InvalidFormat { line: index + 1 })?;
            words.push(word);
        }

        let [text_size, data_size, body @ ..] = words.as_slice() else {
            return Err(ObjectError::SectionSizeMismatch);
        };

        if text_size % 4 != 0 || data_size % 4 != 0 {
            return Err(ObjectError::SectionSizeMismatch);
        }

        let declared = u64::from(*text_size) + u64::from(*data_size);
        if declared != 4 * body.len() as u64 {
            return Err(ObjectError::SectionSizeMismatch);
        }

        let text_words =
            usize::try_from(text_size / 4).map_err(|_| ObjectError::SectionSizeMismatch)?;
        let (text, data) = body.split_at(text_words);

        Ok(Self {
            text: to_be_bytes(text),
            data: to_be_bytes(data),
        })
    }

    /// Reads and parses an object file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::IsDirectory`] or [`ObjectError::FileNotFound`]
    /// for unusable paths, [`ObjectError::Io`] for other read failures, and
    /// any [`ObjectImage::parse`] error.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ObjectError> {
        let path = path.as_ref();

        if path.is_dir() {
            return Err(ObjectError::IsDirectory(path.to_path_buf()));
        }

        let source = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ObjectError::FileNotFound(path.to_path_buf()),
            _ => ObjectError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Self::parse(&source)
    }

    /// Builds the address space for this image.
    #[must_use]
    pub fn into_address_space(self) -> AddressSpace {
        AddressSpace::new(&self.text, &self.data)
    }
}

fn to_be_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_word, ObjectError, ObjectImage};
    use crate::{Address, TEXT_BASE};

    #[rstest]
    #[case("0x0", Some(0))]
    #[case("0x28", Some(0x28))]
    #[case("  0x78A5c16f  ", Some(0x78A5_C16F))]
    #[case("0xFFFFFFFF", Some(u32::MAX))]
    #[case("0x100000000", None)]
    #[case("0x", None)]
    #[case("28", None)]
    #[case("0xg1", None)]
    #[case("0x12 34", None)]
    fn words_parse_as_prefixed_hex(#[case] text: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_word(text), expected);
    }

    #[test]
    fn parse_splits_text_and_data_words() {
        let source = "0x8\n0x4\n\n0x1234\n0x23452a45\n  \n0x78A5c16f\n";
        let image = ObjectImage::parse(source).expect("well-formed");

        assert_eq!(image.text, vec![0, 0, 0x12, 0x34, 0x23, 0x45, 0x2A, 0x45]);
        assert_eq!(image.data, vec![0x78, 0xA5, 0xC1, 0x6F]);
    }

    #[test]
    fn empty_sections_are_allowed() {
        let image = ObjectImage::parse("0x0\n0x0\n").expect("header only");
        assert!(image.text.is_empty());
        assert!(image.data.is_empty());
    }

    #[rstest]
    #[case::empty("")]
    #[case::single_word("0x4\n")]
    #[case::text_not_multiple_of_four("0x2\n0x4\n0x1234\n0x5678\n")]
    #[case::data_not_multiple_of_four("0x4\n0x2\n0x1234\n0x5678\n")]
    #[case::too_few_words("0x8\n0x4\n0x1\n0x2\n")]
    #[case::too_many_words("0x4\n0x0\n0x1\n0x2\n")]
    fn inconsistent_headers_are_rejected(#[case] source: &str) {
        assert!(matches!(
            ObjectImage::parse(source),
            Err(ObjectError::SectionSizeMismatch)
        ));
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let source = "0x4\n\n0x0\nnot a word\n";
        assert!(matches!(
            ObjectImage::parse(source),
            Err(ObjectError::InvalidFormat { line: 4 })
        ));
    }

    #[test]
    fn image_builds_an_address_space() {
        let image = ObjectImage::parse("0x4\n0x4\n0x3c081000\n0x2a\n").expect("well-formed");
        let state = image.into_address_space();

        assert_eq!(state.pc(), TEXT_BASE);
        assert_eq!(state.text_size(), 4);
        assert_eq!(state.word(Address::text(0)), Ok(0x3C08_1000));
        assert_eq!(state.word(Address::data(0)), Ok(0x2A));
    }
}
