//! Validation of user-entered filter values.
//!
//! The query engine only accepts typed criteria. Front ends collect the
//! minimum year and minimum ratings as text; this module is the single place
//! where that text becomes numbers.

use thiserror::Error;

use super::dataset::FilterCriteria;

/// Rejected filter input. The dataset is never touched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Year must be an integer.")]
    MinYear { value: String },

    #[error("Ratings must be an integer.")]
    MinRatings { value: String },
}

/// Filter values exactly as the user typed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    pub genre: String,
    pub min_year: String,
    pub min_ratings: String,
}

impl FilterInput {
    pub fn new(
        genre: impl Into<String>,
        min_year: impl Into<String>,
        min_ratings: impl Into<String>,
    ) -> Self {
        Self {
            genre: genre.into(),
            min_year: min_year.into(),
            min_ratings: min_ratings.into(),
        }
    }

    /// Parse into criteria. Blank numeric fields mean 0; negative integers
    /// are accepted and clamp to 0 since no record falls below it.
    pub fn parse(&self) -> Result<FilterCriteria, ValidationError> {
        let min_year = parse_bound(&self.min_year).ok_or_else(|| ValidationError::MinYear {
            value: self.min_year.clone(),
        })?;
        let min_ratings =
            parse_bound(&self.min_ratings).ok_or_else(|| ValidationError::MinRatings {
                value: self.min_ratings.clone(),
            })?;

        Ok(FilterCriteria::new(self.genre.trim(), min_year, min_ratings))
    }
}

fn parse_bound<T>(text: &str) -> Option<T>
where
    T: TryFrom<i64> + Bounded,
{
    let text = text.trim();
    if text.is_empty() {
        return Some(T::ZERO);
    }
    let value: i64 = text.parse().ok()?;
    Some(T::try_from(value.max(0)).unwrap_or(T::MAX))
}

/// Unsigned bound types a filter value can saturate into
trait Bounded: Sized {
    const ZERO: Self;
    const MAX: Self;
}

impl Bounded for u32 {
    const ZERO: Self = 0;
    const MAX: Self = u32::MAX;
}

impl Bounded for u64 {
    const ZERO: Self = 0;
    const MAX: Self = u64::MAX;
}
