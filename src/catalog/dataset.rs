//! In-memory book dataset and the queries run against it.
//!
//! A `Dataset` is assembled once from one or more fetch results and is
//! read-only afterwards. Filtering never fails: an empty result is a valid
//! "no matches" answer, distinct from any error.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use super::fetcher::{CatalogFetcher, FetchError};
use super::record::{normalize, BookRecord};

/// Typed filter criteria.
///
/// An empty `genre` applies no genre restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub genre: String,
    pub min_year: u32,
    pub min_ratings: u64,
}

impl FilterCriteria {
    pub fn new(genre: impl Into<String>, min_year: u32, min_ratings: u64) -> Self {
        Self {
            genre: genre.into(),
            min_year,
            min_ratings,
        }
    }

    /// Build a reusable predicate (lowercases the genre once)
    fn matcher(&self) -> impl Fn(&BookRecord) -> bool + '_ {
        let needle = self.genre.to_lowercase();
        move |record: &BookRecord| {
            (needle.is_empty() || record.genre_contains(&needle))
                && record.publication_year >= self.min_year
                && record.ratings_count >= self.min_ratings
        }
    }
}

/// Startup failure while assembling the initial dataset
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No books were returned for subjects: {}", subjects.join(", "))]
    EmptyCatalog { subjects: Vec<String> },
}

/// Deduplicated, ordered collection of books
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<BookRecord>,
    subjects: Vec<String>,
    assembled_at: DateTime<Utc>,
}

impl Dataset {
    /// Concatenate record sets in order and drop repeated `(title, authors)`
    /// pairs across all of them, keeping the first.
    pub fn from_parts<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = BookRecord>,
    {
        Self {
            records: normalize(parts.into_iter().flatten()),
            subjects: Vec::new(),
            assembled_at: Utc::now(),
        }
    }

    /// Record which subjects the dataset was built from
    pub fn with_subjects(mut self, subjects: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn assembled_at(&self) -> DateTime<Utc> {
        self.assembled_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching all criteria, in dataset order
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&BookRecord> {
        let matches = criteria.matcher();
        self.records.iter().filter(|r| matches(*r)).collect()
    }

    /// One record drawn uniformly from the filtered set, or `None` when
    /// nothing matches
    pub fn pick_random<R>(&self, criteria: &FilterCriteria, rng: &mut R) -> Option<&BookRecord>
    where
        R: Rng + ?Sized,
    {
        self.filter(criteria).choose(rng).copied()
    }

    /// Sorted, distinct first genre labels for populating a selector
    pub fn available_genres(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| r.primary_genre().to_string())
            .collect()
    }
}

/// Fetch every subject in order and merge the results.
///
/// Any failed fetch aborts the whole load; partial datasets are never
/// returned. An empty merged result is also treated as a failure.
pub async fn load_initial_dataset<F>(
    fetcher: &F,
    subjects: &[String],
    max_results: u32,
) -> Result<Dataset, StartupError>
where
    F: CatalogFetcher + ?Sized,
{
    let mut parts = Vec::with_capacity(subjects.len());

    for subject in subjects {
        let records = fetcher.fetch(subject, max_results).await.map_err(|e| {
            warn!(fetcher = fetcher.name(), subject = %subject, error = %e, "Fetch failed");
            e
        })?;
        parts.push(records);
    }

    let dataset = Dataset::from_parts(parts).with_subjects(subjects.iter().cloned());

    if dataset.is_empty() {
        return Err(StartupError::EmptyCatalog {
            subjects: subjects.to_vec(),
        });
    }

    info!(
        books = dataset.len(),
        subjects = subjects.len(),
        "Dataset assembled"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Dataset {
        Dataset::from_parts(vec![vec![
            BookRecord::new("T1", "A1", "Fiction", 2010, 5),
            BookRecord::new("T2", "A2", "History", 1990, 0),
            BookRecord::new("T1", "A1", "Fiction", 2010, 5),
        ]])
    }

    #[test]
    fn test_construction_dedupes() {
        let dataset = sample();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].title, "T1");
        assert_eq!(dataset.records()[1].title, "T2");
    }

    #[test]
    fn test_dedupe_across_parts_keeps_first() {
        let dataset = Dataset::from_parts(vec![
            vec![BookRecord::new("Shared", "A", "Fiction", 2000, 1)],
            vec![
                BookRecord::new("Shared", "A", "History", 1980, 9),
                BookRecord::new("Other", "B", "History", 1980, 9),
            ],
        ]);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].genre, "Fiction");
    }

    #[test]
    fn test_filter_scenario() {
        let dataset = sample();
        let result = dataset.filter(&FilterCriteria::new("fiction", 2000, 1));
        assert_eq!(result, vec![&BookRecord::new("T1", "A1", "Fiction", 2010, 5)]);
    }

    #[test]
    fn test_filter_no_matches() {
        let dataset = sample();
        assert!(dataset.filter(&FilterCriteria::new("", 2020, 0)).is_empty());
    }

    #[test]
    fn test_identity_filter() {
        let dataset = sample();
        let all: Vec<_> = dataset.records().iter().collect();
        assert_eq!(dataset.filter(&FilterCriteria::default()), all);
    }

    #[test]
    fn test_genre_is_substring_match() {
        let dataset = Dataset::from_parts(vec![vec![
            BookRecord::new("A", "X", "Juvenile Fiction, Animals", 2001, 2),
            BookRecord::new("B", "Y", "Nonfiction", 2001, 2),
            BookRecord::new("C", "Z", "Poetry", 2001, 2),
        ]]);

        let titles: Vec<_> = dataset
            .filter(&FilterCriteria::new("FICTION", 0, 0))
            .into_iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_pick_random_reproducible() {
        let dataset = sample();
        let criteria = FilterCriteria::default();

        let first = dataset.pick_random(&criteria, &mut StdRng::seed_from_u64(7));
        let second = dataset.pick_random(&criteria, &mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn test_pick_random_no_match() {
        let dataset = sample();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(dataset
            .pick_random(&FilterCriteria::new("poetry", 0, 0), &mut rng)
            .is_none());
    }

    #[test]
    fn test_available_genres() {
        let dataset = Dataset::from_parts(vec![vec![
            BookRecord::new("A", "X", "History, Europe", 2001, 2),
            BookRecord::new("B", "Y", "Fiction", 2001, 2),
            BookRecord::new("C", "Z", "History", 2001, 2),
        ]]);

        let genres: Vec<_> = dataset.available_genres().into_iter().collect();
        assert_eq!(genres, vec!["Fiction".to_string(), "History".to_string()]);
    }
}
