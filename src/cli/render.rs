//! Plain-text rendering of query results.

use crate::catalog::{BookRecord, Dataset};

pub const NO_FILTER_MATCHES: &str = "No books found with these filters.";
pub const NO_RANDOM_MATCH: &str = "No books match the criteria.";
pub const RANDOM_INPUT_ERROR: &str = "Year and Ratings must be integers.";

/// `<title> by <authors>`
pub fn title_line(record: &BookRecord) -> String {
    format!("{} by {}", record.title, record.authors)
}

/// One line per match, or the "no matches" message
pub fn listing(records: &[&BookRecord]) -> String {
    if records.is_empty() {
        return NO_FILTER_MATCHES.to_string();
    }

    records
        .iter()
        .map(|r| title_line(r))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detail block for a random pick, or the "no match" message
pub fn suggestion(record: Option<&BookRecord>) -> String {
    match record {
        Some(book) => format!(
            "Title: {}\nAuthors: {}\nGenre: {}\nPublished Year: {}\nRatings Count: {}",
            book.title, book.authors, book.genre, book.publication_year, book.ratings_count
        ),
        None => NO_RANDOM_MATCH.to_string(),
    }
}

/// Short description of a loaded dataset
pub fn summary(dataset: &Dataset) -> String {
    format!(
        "{} books from {} (loaded {})\n{} genres",
        dataset.len(),
        dataset.subjects().join(", "),
        dataset.assembled_at().format("%Y-%m-%d %H:%M:%S UTC"),
        dataset.available_genres().len()
    )
}
