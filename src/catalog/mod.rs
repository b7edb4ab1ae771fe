//! Book catalog acquisition and querying.
//!
//! # Flow
//!
//! ```text
//! subjects ──► CatalogFetcher::fetch (one GET per subject)
//!          ──► normalize (placeholders, dedupe)
//!          ──► Dataset::from_parts (merge, dedupe again)
//!          ──► filter / pick_random / available_genres
//! ```

pub mod dataset;
pub mod fetcher;
pub mod input;
pub mod record;

pub use dataset::{load_initial_dataset, Dataset, FilterCriteria, StartupError};
pub use fetcher::{parse_volumes, CatalogFetcher, FetchError, GoogleBooksFetcher};
pub use input::{FilterInput, ValidationError};
pub use record::BookRecord;
