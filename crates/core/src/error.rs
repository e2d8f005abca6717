//! Error types for Lexiscore operations.
//!
//! This module defines the main error type [`LexiscoreError`] which represents
//! everything that can go wrong while fetching articles, loading word lists,
//! and reading or writing batch tables. The text analyzer itself never fails.
//!
//! # Example
//!
//! ```rust
//! use lexiscore_core::{LexiscoreError, Result};
//!
//! fn first_word(text: &str) -> Result<&str> {
//!     text.split_whitespace().next().ok_or(LexiscoreError::NoContent)
//! }
//! # assert!(first_word("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Lexiscore operations.
#[derive(Error, Debug)]
pub enum LexiscoreError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status code.
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The response body is not a text document.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// No usable article text could be extracted from the page.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the input table.
    #[error("Input table is missing required column `{0}`")]
    MissingColumn(String),

    /// A word list or stopword directory could not be loaded.
    ///
    /// Scores are meaningless without the word lists, so callers treat this
    /// as fatal.
    #[error("Failed to load word list {path}: {reason}")]
    LexiconError { path: PathBuf, reason: String },
}

/// Result type alias for LexiscoreError.
pub type Result<T> = std::result::Result<T, LexiscoreError>;
