//! shelfpick - Browse, filter and randomly pick books from a remote catalog
//!
//! Books are fetched once at startup from a Google Books style volumes
//! endpoint, normalized into a deduplicated in-memory dataset, and then
//! queried by genre, minimum publication year and minimum ratings count.
//!
//! # Modules
//!
//! - `catalog`: Fetching, normalization, dataset queries
//! - `config`: Endpoint, subjects and limits
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List genres from the default subjects (Fiction, History)
//! shelfpick genres
//!
//! # Books tagged fiction since 2000 with at least one rating
//! shelfpick filter --genre fiction --min-year 2000 --min-ratings 1
//!
//! # A random pick, reproducible with a seed
//! shelfpick -s Poetry random --seed 42
//!
//! # Interactive session
//! shelfpick browse
//! ```

pub mod catalog;
pub mod cli;
pub mod config;

// Re-export main types at crate root for convenience
pub use catalog::{
    load_initial_dataset, BookRecord, CatalogFetcher, Dataset, FetchError, FilterCriteria,
    FilterInput, GoogleBooksFetcher, StartupError, ValidationError,
};
pub use config::Settings;
