//! Sentence splitting, word extraction and syllable counting.
//!
//! Two independent word tokenizers live here and they are not
//! interchangeable:
//!
//! - [`extract_words`] pulls maximal ASCII alphabetic runs out of the text.
//!   It feeds every lexicon- and syllable-based metric.
//! - [`word_tokenize`] is a Treebank-style tokenizer run per sentence, where
//!   punctuation marks, contraction suffixes and fused forms (`cannot`,
//!   `gonna`) become tokens of their own. It only feeds the
//!   average-words-per-sentence metric.
//!
//! Swapping one for the other changes the published metric values.
//!
//! `word_tokenize` keeps double quotes as they are instead of rewriting them
//! into opening and closing forms; token counts are unaffected.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("word pattern is valid"));

static PRONOUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(I|we|my|ours|us)\b").expect("pronoun pattern is valid"));

/// Abbreviations that end in a period without ending the sentence.
const ABBREVIATIONS: [&str; 27] = [
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd", "co", "corp", "fig", "e.g",
    "i.e", "u.s", "u.k", "a.m", "p.m", "jan", "feb", "aug", "sept", "oct", "nov",
];

/// Characters split off the front of a token.
const LEADING_PUNCT: &[char] = &['"', '(', '[', '{', '<', '`', '\u{201c}', '\u{2018}'];

/// Characters split off the end of a token.
const TRAILING_PUNCT: &[char] = &['"', ')', ']', '}', '>', '\'', '\u{201d}', '\u{2019}'];

/// Characters that are a token of their own wherever they appear.
const ALWAYS_SPLIT: &[char] = &[';', '@', '#', '$', '%', '&', '?', '!'];

/// Contraction suffixes split off a word, longest first.
const CONTRACTIONS: [&str; 7] = ["n't", "'ll", "'re", "'ve", "'s", "'m", "'d"];

/// Fused words and the length of their first part.
const FUSED_WORDS: [(&str, usize); 8] = [
    ("cannot", 3),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("wanna", 3),
    ("'tis", 2),
    ("'twas", 2),
];

/// Characters after which a segment may end a sentence.
const SENTENCE_TERMINALS: &[char] = &['.', '!', '?'];

/// Closing marks allowed between a terminal and the end of a sentence.
const SENTENCE_CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201d}', '\u{2019}'];

/// Splits text into sentences.
///
/// Boundaries follow Unicode sentence segmentation (UAX #29), restricted to
/// segments ending in `.`, `!` or `?` (optionally followed by closing quotes
/// or brackets). Segments broken at a line break, or ending in a common
/// abbreviation (`Mr.`, `e.g.`) or a single-letter initial, are joined with
/// the following segment. Returned sentences are trimmed and always contain
/// at least one alphanumeric character.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;

    for (idx, segment) in text.split_sentence_bound_indices() {
        let begin = *start.get_or_insert(idx);
        end = idx + segment.len();

        let candidate = &text[begin..end];
        if ends_with_terminal(candidate) && !ends_with_abbreviation(candidate) {
            push_sentence(&mut sentences, &text[begin..end]);
            start = None;
        }
    }

    if let Some(begin) = start {
        push_sentence(&mut sentences, &text[begin..end]);
    }

    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if trimmed.chars().any(char::is_alphanumeric) {
        sentences.push(trimmed);
    }
}

fn ends_with_terminal(segment: &str) -> bool {
    segment.trim_end().trim_end_matches(SENTENCE_CLOSERS).ends_with(SENTENCE_TERMINALS)
}

fn ends_with_abbreviation(segment: &str) -> bool {
    let Some(stem) = segment.trim_end().strip_suffix('.') else {
        return false;
    };
    let Some(last) = stem.split_whitespace().last() else {
        return false;
    };

    let word = last.trim_start_matches(LEADING_PUNCT).to_lowercase();
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_alphabetic() && c != 'i',
        (Some(_), Some(_)) => ABBREVIATIONS.contains(&word.as_str()),
        _ => false,
    }
}

/// Extracts every maximal ASCII alphabetic run delimited by word boundaries.
///
/// Runs glued to digits or non-ASCII letters (`abc123`, `café`) are not words.
pub fn extract_words(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Counts case-insensitive whole-word first-person pronouns (`I`, `we`, `my`,
/// `ours`, `us`).
///
/// The country abbreviation `US` is counted as well.
pub fn count_personal_pronouns(text: &str) -> usize {
    PRONOUN_RE.find_iter(text).count()
}

/// Tokenizes a single sentence Treebank-style.
///
/// Whitespace separates chunks. `; @ # $ % & ? !` are always tokens of their
/// own, as are `,` and `:` unless a digit follows (`1,000`, `12:30`).
/// Opening and closing punctuation become their own tokens, contraction
/// suffixes (`n't`, `'s`, `'ll`, ...) and fused words (`can not`) are split,
/// and a period is split off only at the very end of the sentence, so
/// abbreviations like `Mr.` stay intact.
pub fn word_tokenize(sentence: &str) -> Vec<&str> {
    let chunks: Vec<&str> = sentence.split_whitespace().collect();
    let mut tokens = Vec::with_capacity(chunks.len() * 2);

    for (i, chunk) in chunks.iter().enumerate() {
        tokenize_chunk(chunk, i + 1 == chunks.len(), &mut tokens);
    }

    tokens
}

fn tokenize_chunk<'a>(chunk: &'a str, sentence_end: bool, tokens: &mut Vec<&'a str>) {
    let mut start = 0;
    let mut chars = chunk.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let next_is_digit = chars.peek().is_some_and(|&(_, n)| n.is_ascii_digit());
        let separate = ALWAYS_SPLIT.contains(&c) || (matches!(c, ',' | ':') && !next_is_digit);
        if !separate {
            continue;
        }

        let after = idx + c.len_utf8();
        if start < idx {
            tokenize_piece(&chunk[start..idx], false, tokens);
        }
        tokens.push(&chunk[idx..after]);
        start = after;
    }

    if start < chunk.len() {
        tokenize_piece(&chunk[start..], sentence_end, tokens);
    }
}

fn tokenize_piece<'a>(piece: &'a str, sentence_end: bool, tokens: &mut Vec<&'a str>) {
    let mut core = piece;

    while let Some(c) = core.chars().next().filter(|c| LEADING_PUNCT.contains(c)) {
        let (head, rest) = core.split_at(c.len_utf8());
        tokens.push(head);
        core = rest;
    }

    let mut trailing = Vec::new();
    loop {
        let Some(c) = core.chars().next_back() else { break };

        if TRAILING_PUNCT.contains(&c) {
            let (rest, tail) = core.split_at(core.len() - c.len_utf8());
            trailing.push(tail);
            core = rest;
            continue;
        }

        if c == '.' {
            let dots = core.len() - core.trim_end_matches('.').len();
            if sentence_end || dots >= 3 {
                let (rest, tail) = core.split_at(core.len() - dots);
                trailing.push(tail);
                core = rest;
                continue;
            }
        }

        break;
    }

    if !core.is_empty() {
        match split_fused(core).or_else(|| split_contraction(core)) {
            Some((word, suffix)) => {
                tokens.push(word);
                tokens.push(suffix);
            }
            None => tokens.push(core),
        }
    }

    tokens.extend(trailing.into_iter().rev());
}

fn split_fused(word: &str) -> Option<(&str, &str)> {
    FUSED_WORDS
        .iter()
        .find(|(fused, _)| word.eq_ignore_ascii_case(fused))
        .map(|&(_, head)| word.split_at(head))
}

fn split_contraction(word: &str) -> Option<(&str, &str)> {
    let lower = word.to_ascii_lowercase();
    CONTRACTIONS.iter().find_map(|suffix| {
        if lower.len() > suffix.len() && lower.ends_with(suffix) && word.is_char_boundary(word.len() - suffix.len()) {
            Some(word.split_at(word.len() - suffix.len()))
        } else {
            None
        }
    })
}

/// Approximates the syllable count of a word.
///
/// Counts maximal runs of `a e i o u y`, drops one for an `es` or `ed`
/// ending, and never returns less than one.
pub fn syllable_count(word: &str) -> usize {
    let word = word.to_lowercase();

    let mut groups = 0usize;
    let mut in_vowel_run = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_vowel_run {
            groups += 1;
        }
        in_vowel_run = vowel;
    }

    if word.ends_with("es") || word.ends_with("ed") {
        groups = groups.saturating_sub(1);
    }

    groups.max(1)
}
