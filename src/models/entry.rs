use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Inclusive range a score must fall in. The form treats it as a hint,
/// the store rejects anything outside it.
pub const SCORE_RANGE: RangeInclusive<i32> = 1..=5;

pub fn is_valid_score(score: i32) -> bool {
    SCORE_RANGE.contains(&score)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i64,
    pub date: NaiveDate,
    pub score: i32,
    pub note: Option<String>,
}

/// POST /api/entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateEntryRequest {
    pub date: NaiveDate,

    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: i32,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

/// PUT /api/entries/{id}. The date of an entry never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateEntryRequest {
    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: i32,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

impl From<&Entry> for UpdateEntryRequest {
    fn from(entry: &Entry) -> Self {
        Self {
            score: entry.score,
            note: entry.note.clone(),
        }
    }
}
