//! Readability and sentiment metrics for a block of article text.
//!
//! [`analyze_text`] is a pure function: the same text and word lists always
//! produce the same [`TextMetrics`], and every ratio is guarded so that empty
//! or degenerate input still yields finite numbers.
//!
//! # Example
//!
//! ```rust
//! use lexiscore_core::{Lexicons, WordSet, analyze_text};
//!
//! let lexicons = Lexicons::new(
//!     WordSet::from_words(["great"]),
//!     WordSet::from_words(["terrible", "bad"]),
//!     WordSet::from_words(["this", "is", "and"]),
//! );
//!
//! let metrics = analyze_text("This is great. This is terrible and bad.", &lexicons);
//! assert_eq!(metrics.positive_score, 1);
//! assert_eq!(metrics.negative_score, 2);
//! assert!((metrics.polarity_score + 1.0 / 3.0).abs() < 1e-6);
//! ```

use serde::Serialize;

use crate::lexicon::Lexicons;
use crate::tokenize::{count_personal_pronouns, extract_words, split_sentences, syllable_count, word_tokenize};

/// Added to sentiment denominators so that zero scores divide cleanly.
pub const EPSILON: f64 = 1e-6;

/// Minimum syllable count for a word to be considered complex.
pub const COMPLEX_WORD_SYLLABLES: usize = 3;

/// Output column headers, in [`TextMetrics::values`] order.
pub const METRIC_COLUMNS: [&str; 13] = [
    "POSITIVE SCORE",
    "NEGATIVE SCORE",
    "POLARITY SCORE",
    "SUBJECTIVITY SCORE",
    "AVG SENTENCE LENGTH",
    "PERCENTAGE OF COMPLEX WORDS",
    "FOG INDEX",
    "AVG NUMBER OF WORDS PER SENTENCE",
    "COMPLEX WORD COUNT",
    "WORD COUNT",
    "SYLLABLE PER WORD",
    "PERSONAL PRONOUNS",
    "AVG WORD LENGTH",
];

/// A single metric value, either a count or a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(usize),
    Ratio(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Count(n) => n as f64,
            MetricValue::Ratio(x) => x,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Ratio(x) => write!(f, "{}", x),
        }
    }
}

/// The thirteen metrics computed for one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMetrics {
    /// Meaningful words found in the positive lexicon.
    pub positive_score: usize,
    /// Meaningful words found in the negative lexicon.
    pub negative_score: usize,
    /// `(pos - neg) / (pos + neg + ε)`, roughly in `[-1, 1]`.
    pub polarity_score: f64,
    /// `(pos + neg) / (meaningful words + ε)`.
    pub subjectivity_score: f64,
    /// Meaningful words per sentence.
    pub avg_sentence_length: f64,
    /// Fraction (not percent) of meaningful words that are complex.
    pub percentage_complex_words: f64,
    /// `0.4 * (avg sentence length + complex fraction)`.
    pub fog_index: f64,
    /// Treebank tokens per sentence, punctuation included.
    pub avg_words_per_sentence: f64,
    pub complex_word_count: usize,
    /// Number of meaningful (non-stopword) words.
    pub word_count: usize,
    pub syllables_per_word: f64,
    pub personal_pronouns: usize,
    /// Mean character length of meaningful words.
    pub avg_word_length: f64,
}

impl TextMetrics {
    /// The metrics in output column order.
    pub fn values(&self) -> [MetricValue; 13] {
        use MetricValue::{Count, Ratio};

        [
            Count(self.positive_score),
            Count(self.negative_score),
            Ratio(self.polarity_score),
            Ratio(self.subjectivity_score),
            Ratio(self.avg_sentence_length),
            Ratio(self.percentage_complex_words),
            Ratio(self.fog_index),
            Ratio(self.avg_words_per_sentence),
            Count(self.complex_word_count),
            Count(self.word_count),
            Ratio(self.syllables_per_word),
            Count(self.personal_pronouns),
            Ratio(self.avg_word_length),
        ]
    }

    /// Pairs each value with its column header.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, MetricValue)> {
        METRIC_COLUMNS.into_iter().zip(self.values())
    }
}

/// Divides by `max(1, denominator)`.
fn per(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}

/// Computes all metrics for `text`.
///
/// Word-level metrics use only *meaningful* words: `[a-zA-Z]+` runs whose
/// lowercase form is not a stopword. Average sentence length divides that
/// filtered count by the sentence count, while average words per sentence
/// counts Treebank tokens of each sentence instead. Personal pronouns are
/// counted on the raw text.
pub fn analyze_text(text: &str, lexicons: &Lexicons) -> TextMetrics {
    let sentences = split_sentences(text);

    let meaningful: Vec<(&str, String)> = extract_words(text)
        .into_iter()
        .map(|w| (w, w.to_lowercase()))
        .filter(|(_, lower)| !lexicons.stopwords.contains(lower))
        .collect();
    let word_count = meaningful.len();

    let positive_score = meaningful.iter().filter(|(_, lower)| lexicons.positive.contains(lower)).count();
    let negative_score = meaningful.iter().filter(|(_, lower)| lexicons.negative.contains(lower)).count();
    let sentiment_total = (positive_score + negative_score) as f64;

    let polarity_score = (positive_score as f64 - negative_score as f64) / (sentiment_total + EPSILON);
    let subjectivity_score = sentiment_total / (word_count as f64 + EPSILON);

    let syllables: Vec<usize> = meaningful.iter().map(|(w, _)| syllable_count(w)).collect();
    let complex_word_count = syllables.iter().filter(|&&s| s >= COMPLEX_WORD_SYLLABLES).count();

    let avg_sentence_length = per(word_count, sentences.len());
    let percentage_complex_words = per(complex_word_count, word_count);
    let fog_index = 0.4 * (avg_sentence_length + percentage_complex_words);

    // Independent of `extract_words`: punctuation and contraction suffixes
    // count as tokens here.
    let sentence_tokens: usize = sentences.iter().map(|s| word_tokenize(s).len()).sum();
    let avg_words_per_sentence = per(sentence_tokens, sentences.len());

    let syllables_per_word = per(syllables.iter().sum(), word_count);
    let personal_pronouns = count_personal_pronouns(text);
    let avg_word_length = per(meaningful.iter().map(|(w, _)| w.len()).sum(), word_count);

    TextMetrics {
        positive_score,
        negative_score,
        polarity_score,
        subjectivity_score,
        avg_sentence_length,
        percentage_complex_words,
        fog_index,
        avg_words_per_sentence,
        complex_word_count,
        word_count,
        syllables_per_word,
        personal_pronouns,
        avg_word_length,
    }
}
