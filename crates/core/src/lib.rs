pub mod analyzer;
#[cfg(feature = "fetch")]
pub mod batch;
pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod lexicon;
pub mod parse;
pub mod table;
pub mod tokenize;

pub use analyzer::{METRIC_COLUMNS, MetricValue, TextMetrics, analyze_text};
#[cfg(feature = "fetch")]
pub use batch::{BatchConfig, BatchConfigBuilder, BatchOutcome, BatchSummary, article_file_name, run_batch};
pub use error::{LexiscoreError, Result};
pub use extract::{clean_text, extract_article_text};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, Fetcher, PageFetcher, fetch_file, fetch_url};
pub use lexicon::{Lexicons, WordSet, load_stopwords_dir, load_word_set};
pub use parse::Document;
pub use table::{InputRow, InputTable, OutputRow, output_headers, write_output, write_output_path};
#[doc(hidden)]
pub use tokenize::{count_personal_pronouns, extract_words, split_sentences, syllable_count, word_tokenize};
