//! Batch driver: fetch, persist and analyze every row of an input table.
//!
//! Rows are processed concurrently up to [`BatchConfig::concurrency`], but
//! each task carries its row index and writes into a slot of that index, so
//! the output always has one row per input row, in input order. A row whose
//! fetch fails is emitted with no metrics; it never stops the batch.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lexiscore_core::{BatchConfig, FetchConfig, InputTable, Lexicons, PageFetcher, run_batch};
//!
//! # async fn example() -> lexiscore_core::Result<()> {
//! let lexicons = Arc::new(Lexicons::load("positive-words.txt", "negative-words.txt", "stopwords")?);
//! let fetcher = Arc::new(PageFetcher::new(FetchConfig::default())?);
//! let table = InputTable::from_path("Input.csv")?;
//!
//! let config = BatchConfig::builder().concurrency(8).articles_dir("articles").build();
//! let outcome = run_batch(&table, fetcher, lexicons, &config).await?;
//! println!("{} of {} articles scored", outcome.summary.succeeded, outcome.summary.total);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::Result;
use crate::analyzer::{TextMetrics, analyze_text};
use crate::fetch::Fetcher;
use crate::lexicon::Lexicons;
use crate::table::{InputTable, OutputRow};

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum number of rows fetched at the same time (default: 4).
    pub concurrency: usize,

    /// Directory receiving `<URL_ID>.txt` for every fetched article
    /// (default: none, nothing is written).
    pub articles_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 4, articles_dir: None }
    }
}

impl BatchConfig {
    /// Creates a new builder for BatchConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lexiscore_core::BatchConfig;
    ///
    /// let config = BatchConfig::builder().concurrency(1).articles_dir("articles").build();
    /// assert_eq!(config.concurrency, 1);
    /// ```
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::new()
    }
}

/// Builder for BatchConfig.
#[derive(Debug, Default)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: BatchConfig::default() }
    }

    /// Sets the concurrency limit. Zero is treated as one.
    pub fn concurrency(mut self, value: usize) -> Self {
        self.config.concurrency = value.max(1);
        self
    }

    /// Sets the directory cleaned article text is saved to.
    pub fn articles_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.articles_dir = Some(dir.into());
        self
    }

    /// Disables saving article text.
    pub fn no_articles_dir(mut self) -> Self {
        self.config.articles_dir = None;
        self
    }

    pub fn build(self) -> BatchConfig {
        self.config
    }
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// The rows of a finished batch, in input order, and their summary.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub rows: Vec<OutputRow>,
    pub summary: BatchSummary,
}

/// Turns a URL_ID into a safe file stem.
///
/// Anything other than ASCII alphanumerics, `-`, `_` and `.` becomes `_`, so
/// an identifier can never name a path outside the articles directory.
pub fn article_file_name(url_id: &str) -> String {
    let stem: String = url_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();

    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') { format!("_{}", stem) } else { stem };
    format!("{}.txt", stem)
}

async fn save_article(dir: &Path, url_id: &str, text: &str) -> Result<PathBuf> {
    let path = dir.join(article_file_name(url_id));
    tokio::fs::write(&path, text).await?;
    Ok(path)
}

async fn process_row<F: Fetcher>(
    url_id: &str,
    url: &str,
    fetcher: &F,
    lexicons: &Lexicons,
    articles_dir: Option<&Path>,
) -> Option<TextMetrics> {
    let text = match fetcher.fetch(url).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(url_id, url, error = %e, "fetch failed, emitting empty metrics");
            return None;
        }
    };

    if let Some(dir) = articles_dir {
        match save_article(dir, url_id, &text).await {
            Ok(path) => tracing::debug!(url_id, path = %path.display(), "article saved"),
            Err(e) => tracing::warn!(url_id, error = %e, "failed to save article text"),
        }
    }

    let metrics = analyze_text(&text, lexicons);
    tracing::debug!(url_id, words = metrics.word_count, fog = metrics.fog_index, "article analyzed");
    Some(metrics)
}

/// Runs the whole batch.
///
/// # Errors
///
/// Only setup can fail (creating the articles directory). Per-row failures
/// are logged and reported as rows without metrics.
pub async fn run_batch<F>(
    table: &InputTable,
    fetcher: Arc<F>,
    lexicons: Arc<Lexicons>,
    config: &BatchConfig,
) -> Result<BatchOutcome>
where
    F: Fetcher + 'static,
{
    if let Some(dir) = &config.articles_dir {
        tokio::fs::create_dir_all(dir).await?;
    }

    tracing::info!(rows = table.len(), concurrency = config.concurrency, "starting batch");

    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, row) in table.rows.iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let lexicons = Arc::clone(&lexicons);
        let semaphore = Arc::clone(&semaphore);
        let articles_dir = config.articles_dir.clone();
        let url_id = row.url_id.clone();
        let url = row.url.clone();

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let metrics = process_row(&url_id, &url, fetcher.as_ref(), &lexicons, articles_dir.as_deref()).await;
            (index, metrics)
        });
    }

    let mut slots: Vec<Option<TextMetrics>> = vec![None; table.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, metrics)) => slots[index] = metrics,
            Err(e) => tracing::error!(error = %e, "row task aborted, emitting empty metrics"),
        }
    }

    let rows: Vec<OutputRow> = table
        .rows
        .iter()
        .zip(slots)
        .map(|(row, metrics)| OutputRow { cells: row.cells.clone(), metrics })
        .collect();

    let succeeded = rows.iter().filter(|r| r.metrics.is_some()).count();
    let summary = BatchSummary { total: rows.len(), succeeded, failed: rows.len() - succeeded };

    tracing::info!(total = summary.total, succeeded = summary.succeeded, failed = summary.failed, "batch finished");

    Ok(BatchOutcome { rows, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LexiscoreError;
    use crate::lexicon::WordSet;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves canned text after a per-source delay; unknown sources fail.
    struct StubFetcher {
        pages: HashMap<String, (u64, String)>,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, u64, &str)]) -> Self {
            let pages = pages
                .iter()
                .map(|(url, delay, text)| (url.to_string(), (*delay, text.to_string())))
                .collect();
            Self { pages }
        }
    }

    impl Fetcher for StubFetcher {
        async fn fetch(&self, source: &str) -> Result<String> {
            match self.pages.get(source) {
                Some((delay, text)) => {
                    tokio::time::sleep(Duration::from_millis(*delay)).await;
                    Ok(text.clone())
                }
                None => Err(LexiscoreError::NoContent),
            }
        }
    }

    fn table(urls: &[&str]) -> InputTable {
        let mut csv = String::from("URL_ID,URL,Note\n");
        for (i, url) in urls.iter().enumerate() {
            csv.push_str(&format!("id{},{},note{}\n", i, url, i));
        }
        InputTable::from_reader(csv.as_bytes()).unwrap()
    }

    fn lexicons() -> Arc<Lexicons> {
        Arc::new(Lexicons::new(
            WordSet::from_words(["good"]),
            WordSet::from_words(["bad"]),
            WordSet::from_words(["the", "is"]),
        ))
    }

    #[test]
    fn test_builder() {
        let config = BatchConfig::builder().concurrency(0).articles_dir("out").build();
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.articles_dir, Some(PathBuf::from("out")));

        let config = BatchConfig::builder().articles_dir("out").no_articles_dir().build();
        assert!(config.articles_dir.is_none());
    }

    #[test]
    fn test_article_file_name() {
        assert_eq!(article_file_name("blackassign0001"), "blackassign0001.txt");
        assert_eq!(article_file_name("123.0"), "123.0.txt");
        assert_eq!(article_file_name("../etc/passwd"), ".._etc_passwd.txt");
        assert_eq!(article_file_name("a b/c"), "a_b_c.txt");
        assert_eq!(article_file_name(""), "_.txt");
        assert_eq!(article_file_name(".."), "_...txt");
    }

    #[tokio::test]
    async fn test_order_preserved_when_completion_order_differs() {
        let fetcher = Arc::new(StubFetcher::new(&[
            ("u0", 60, "The food is good."),
            ("u1", 0, "The service is bad."),
            ("u2", 30, "Good good bad."),
        ]));
        let table = table(&["u0", "u1", "u2"]);
        let config = BatchConfig::builder().concurrency(3).build();

        let outcome = run_batch(&table, fetcher, lexicons(), &config).await.unwrap();

        assert_eq!(outcome.rows.len(), 3);
        for (i, row) in outcome.rows.iter().enumerate() {
            assert_eq!(row.cells[0], format!("id{}", i));
            assert_eq!(row.cells[2], format!("note{}", i));
        }
        assert_eq!(outcome.rows[0].metrics.as_ref().unwrap().positive_score, 1);
        assert_eq!(outcome.rows[1].metrics.as_ref().unwrap().negative_score, 1);
        assert_eq!(outcome.rows[2].metrics.as_ref().unwrap().positive_score, 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_empty_row_and_continues() {
        let fetcher = Arc::new(StubFetcher::new(&[("ok0", 0, "Good."), ("ok2", 0, "Bad.")]));
        let table = table(&["ok0", "missing", "ok2"]);

        let outcome = run_batch(&table, fetcher, lexicons(), &BatchConfig::default()).await.unwrap();

        assert!(outcome.rows[0].metrics.is_some());
        assert!(outcome.rows[1].metrics.is_none());
        assert!(outcome.rows[2].metrics.is_some());
        assert_eq!(outcome.summary, BatchSummary { total: 3, succeeded: 2, failed: 1 });
    }

    #[tokio::test]
    async fn test_sequential_run() {
        let fetcher = Arc::new(StubFetcher::new(&[("a", 5, "Good."), ("b", 0, "Bad.")]));
        let table = table(&["a", "b", "a"]);
        let config = BatchConfig::builder().concurrency(1).build();

        let outcome = run_batch(&table, fetcher, lexicons(), &config).await.unwrap();
        assert_eq!(outcome.summary.succeeded, 3);
        assert_eq!(outcome.rows[0].metrics, outcome.rows[2].metrics);
    }

    #[tokio::test]
    async fn test_articles_saved_only_for_fetched_rows() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("articles");
        let fetcher = Arc::new(StubFetcher::new(&[("a", 0, "Saved text.")]));
        let table = table(&["a", "missing"]);
        let config = BatchConfig::builder().articles_dir(&dir).build();

        run_batch(&table, fetcher, lexicons(), &config).await.unwrap();

        assert_eq!(std::fs::read_to_string(dir.join("id0.txt")).unwrap(), "Saved text.");
        assert!(!dir.join("id1.txt").exists());
    }

    #[tokio::test]
    async fn test_empty_table() {
        let fetcher = Arc::new(StubFetcher::new(&[]));
        let outcome = run_batch(&InputTable::default(), fetcher, lexicons(), &BatchConfig::default())
            .await
            .unwrap();
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.summary, BatchSummary::default());
    }
}
