//! # Fund Insights
//!
//! Filtering, aggregation and prompt composition over the structured insights
//! extracted from hedge fund and venture capital partner letters.
//!
//! ## Core Concepts
//!
//! - **Quarter**: a `"2023 Q4"` token; ordering is lexicographic on the text
//! - **Records**: typed rows decoded from the insight tables, validated once at the storage boundary
//! - **Filters**: pure functions narrowing records by sector, quarter range, position flags, themes or investment attributes
//! - **Aggregates**: top sectors, best performer and top-N rankings over numeric-as-string fields
//! - **Tagged corpus**: letters wrapped in `<fund_year_quarter>` tags and sent to the LLM with fixed instructions
//! - **Answer extraction**: the text between `<answer>` markers, or the whole response when unmarked
//!
//! ## Example
//!
//! ```rust,ignore
//! use fund_insights::*;
//!
//! let config = InsightConfig::from_env()?;
//! let catalog = InsightCatalog::new(DirectoryStore::from_config(&config.storage), &config.storage);
//!
//! let funds = catalog.hedge_fund_names()?;
//! let filter = CompanyFilter::new()
//!     .sectors(["Energy", "Technology"])
//!     .between(Some(Quarter::parse("2022 Q4")?), Some(Quarter::parse("2023 Q2")?))
//!     .pitched(true);
//!
//! let records = aggregate(&catalog.companies_by_fund(&funds)?, &filter);
//! for (sector, count) in top_sectors(&records, DEFAULT_TOP_SECTORS) {
//!     println!("{sector}: {count}");
//! }
//! ```

pub mod aggregate;
pub mod answer;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod prompts;
pub mod quarter;
pub mod schema;
pub mod store;
pub mod utils;
pub mod views;

#[cfg(feature = "anthropic")]
pub mod llm;

pub use aggregate::{
    aggregate, available_quarters, best_by, best_performer, fair_values, investment_types,
    top_n_by_numeric, top_sectors, unique_fund_names, unique_themes, DEFAULT_TOP_N,
    DEFAULT_TOP_SECTORS,
};
pub use answer::{extract_answer, extract_between};
pub use catalog::{corpus_from_letters, InsightCatalog, Letter, LetterCorpus};
pub use config::{InsightConfig, LlmConfig, StorageConfig};
pub use corpus::{build_tagged_corpus, insight_digest, tag_document, FundIdentifier, PromptBundle};
pub use error::{InsightError, Result};
pub use filter::*;
pub use quarter::{quarter_range, Quarter};
pub use schema::*;
pub use store::{DirectoryStore, MemoryStore, RecordStore};
pub use utils::*;
