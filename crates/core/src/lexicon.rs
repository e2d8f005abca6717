//! Word lists: sentiment lexicons and stopwords.
//!
//! Lists are plain text, one word per line. Blank lines and lines starting
//! with `;` are skipped, and everything after a `|` on a line is treated as
//! an annotation (`SMITH | Surnames from 1990 census`). Words are lowercased.
//!
//! All lists are loaded once into a [`Lexicons`] value, which is immutable
//! and is shared by reference or through an `Arc`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{LexiscoreError, Result};

/// An immutable set of lowercase words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    /// Builds a set from arbitrary words, lowercasing each one.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
    }

    /// Parses the contents of a word-list file.
    pub fn parse(content: &str) -> Self {
        let words = content.lines().filter_map(parse_line).collect();
        Self { words }
    }

    /// Whether `word` (already lowercase) is in the set.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Adds every word of `other` to this set.
    pub fn extend(&mut self, other: WordSet) {
        self.words.extend(other.words);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

fn parse_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return None;
    }

    let word = line.split('|').next().unwrap_or(line).trim();
    if word.is_empty() { None } else { Some(word.to_lowercase()) }
}

/// Decodes a word-list file as UTF-8, falling back to Latin-1.
///
/// The widely used sentiment dictionaries ship in Latin-1, where every byte
/// maps to the code point of the same value.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Loads a single word-list file.
///
/// # Errors
///
/// Returns [`LexiscoreError::FileNotFound`] when the file does not exist and
/// [`LexiscoreError::LexiconError`] when it cannot be read.
pub fn load_word_set(path: impl AsRef<Path>) -> Result<WordSet> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LexiscoreError::FileNotFound(path.to_path_buf()));
    }

    let bytes =
        fs::read(path).map_err(|e| LexiscoreError::LexiconError { path: path.to_path_buf(), reason: e.to_string() })?;

    Ok(WordSet::parse(&decode(bytes)))
}

/// Loads every regular file in `dir` and unions the words into one set.
///
/// Files are read in name order so that logging is stable; the resulting
/// set does not depend on the order.
pub fn load_stopwords_dir(dir: impl AsRef<Path>) -> Result<WordSet> {
    let dir = dir.as_ref();

    if !dir.is_dir() {
        return Err(LexiscoreError::LexiconError { path: dir.to_path_buf(), reason: "not a directory".to_string() });
    }

    let entries =
        fs::read_dir(dir).map_err(|e| LexiscoreError::LexiconError { path: dir.to_path_buf(), reason: e.to_string() })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut stopwords = WordSet::default();
    for file in &files {
        let words = load_word_set(file)?;
        tracing::debug!(file = %file.display(), words = words.len(), "loaded stopword list");
        stopwords.extend(words);
    }

    Ok(stopwords)
}

/// The three word sets the analyzer scores against.
#[derive(Debug, Clone, Default)]
pub struct Lexicons {
    pub positive: WordSet,
    pub negative: WordSet,
    pub stopwords: WordSet,
}

impl Lexicons {
    pub fn new(positive: WordSet, negative: WordSet, stopwords: WordSet) -> Self {
        Self { positive, negative, stopwords }
    }

    /// Loads the positive and negative lists and the stopword directory.
    ///
    /// # Errors
    ///
    /// Any missing or unreadable list is an error; there is no fallback.
    pub fn load(positive: impl AsRef<Path>, negative: impl AsRef<Path>, stopwords_dir: impl AsRef<Path>) -> Result<Self> {
        let positive = load_word_set(positive)?;
        let negative = load_word_set(negative)?;
        let stopwords = load_stopwords_dir(stopwords_dir)?;

        tracing::info!(
            positive = positive.len(),
            negative = negative.len(),
            stopwords = stopwords.len(),
            "word lists loaded"
        );

        Ok(Self { positive, negative, stopwords })
    }
}
