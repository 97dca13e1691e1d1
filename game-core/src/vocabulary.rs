use std::cmp::Ordering;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rand::Rng;

use game_types::WORD_LEN;

/// Bytes per record: a 10-character word plus its newline delimiter.
pub const RECORD_LEN: u64 = WORD_LEN as u64 + 1;

/// Read-only index over a lexicographically sorted file of fixed-width word
/// records. The file is never loaded wholesale; lookups seek directly to
/// record boundaries.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    path: PathBuf,
}

impl Vocabulary {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path)
            .with_context(|| format!("cannot open word list at {}", path.display()))?;
        if metadata.len() == 0 {
            bail!("word list at {} is empty", path.display());
        }
        if metadata.len() % RECORD_LEN != 0 {
            bail!(
                "word list at {} is not a whole number of {}-byte records",
                path.display(),
                RECORD_LEN
            );
        }
        Ok(Self { path })
    }

    /// Binary search for an exact record match. Offsets are always rounded
    /// down to a record boundary and the half-open range narrows by whole
    /// records, so the search does O(log N) record reads.
    pub fn contains(&self, word: &str) -> Result<bool> {
        let mut file = self.open_file()?;
        let len = file.seek(SeekFrom::End(0))?;

        let mut lo = 0u64;
        let mut hi = len / RECORD_LEN;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let candidate = read_record(&mut file, mid)?;
            match candidate.as_str().cmp(word) {
                Ordering::Equal => return Ok(true),
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
            }
        }
        Ok(false)
    }

    /// Draw a uniformly random byte offset, round it down to a record
    /// boundary, and decode that record. No attempt is made to avoid
    /// returning the same word twice in a row.
    pub fn pick_random(&self) -> Result<String> {
        let mut file = self.open_file()?;
        let len = file.seek(SeekFrom::End(0))?;
        let offset = rand::thread_rng().gen_range(0..len);
        read_record(&mut file, offset / RECORD_LEN)
    }

    fn open_file(&self) -> Result<File> {
        File::open(&self.path)
            .with_context(|| format!("cannot open word list at {}", self.path.display()))
    }
}

fn read_record(file: &mut File, index: u64) -> Result<String> {
    file.seek(SeekFrom::Start(index * RECORD_LEN))?;
    let mut buf = [0u8; WORD_LEN];
    file.read_exact(&mut buf)
        .with_context(|| format!("short read at record {}", index))?;
    String::from_utf8(buf.to_vec()).context("word list record is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Ten 10-character words, already sorted.
    const WORDS: &[&str] = &[
        "aberration",
        "blacksmith",
        "chimpanzee",
        "dealership",
        "eatability",
        "flashlight",
        "greyhounds",
        "handlebars",
        "illuminate",
        "juxtaposed",
    ];

    fn write_word_file(words: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for word in words {
            writeln!(file, "{}", word).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_contains_every_record() {
        let file = write_word_file(WORDS);
        let vocabulary = Vocabulary::open(file.path()).unwrap();
        for word in WORDS {
            assert!(vocabulary.contains(word).unwrap(), "missing {}", word);
        }
    }

    #[test]
    fn test_contains_misses() {
        let file = write_word_file(WORDS);
        let vocabulary = Vocabulary::open(file.path()).unwrap();
        assert!(!vocabulary.contains("aaaaaaaaaa").unwrap());
        assert!(!vocabulary.contains("middlemost").unwrap());
        assert!(!vocabulary.contains("zzzzzzzzzz").unwrap());
    }

    #[test]
    fn test_contains_single_record() {
        let file = write_word_file(&["flashlight"]);
        let vocabulary = Vocabulary::open(file.path()).unwrap();
        assert!(vocabulary.contains("flashlight").unwrap());
        assert!(!vocabulary.contains("aberration").unwrap());
        assert!(!vocabulary.contains("juxtaposed").unwrap());
    }

    #[test]
    fn test_pick_random_is_a_member() {
        let file = write_word_file(WORDS);
        let vocabulary = Vocabulary::open(file.path()).unwrap();
        for _ in 0..50 {
            let word = vocabulary.pick_random().unwrap();
            assert_eq!(word.len(), WORD_LEN);
            assert!(WORDS.contains(&word.as_str()), "picked {}", word);
        }
    }

    #[test]
    fn test_open_rejects_empty_file() {
        let file = NamedTempFile::new().unwrap();
        assert!(Vocabulary::open(file.path()).is_err());
    }

    #[test]
    fn test_open_rejects_ragged_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "short\nwords\n").unwrap();
        file.flush().unwrap();
        assert!(Vocabulary::open(file.path()).is_err());
    }

    #[test]
    fn test_open_rejects_missing_file() {
        assert!(Vocabulary::open("/nonexistent/words.txt").is_err());
    }
}
