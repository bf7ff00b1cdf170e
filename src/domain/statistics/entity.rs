use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::rubric::RubricId;

/// Derived diary statistics.
/// Never a source of truth; recomputed from the entries on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryStatistics {
    pub total_films: u32,

    /// Entries logged in the calendar year of `generated_at`
    pub films_this_year: u32,

    pub distinct_genres: u32,
    pub distinct_decades: u32,
    pub distinct_countries: u32,
    pub distinct_directors: u32,

    /// Entries flagged as a first film by that director
    pub new_directors: u32,

    pub rated_films: u32,

    /// Mean plain rating over rated entries, one decimal, 0 when none
    pub average_rating: f64,

    /// Most logged genres, at most five
    pub top_genres: Vec<GenreCount>,

    /// Mean weighted score per rubric that has been used
    pub rubric_averages: Vec<RubricAverage>,

    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricAverage {
    pub rubric_id: RubricId,
    pub rubric_name: String,
    pub films_scored: u32,
    pub average_score: f64,
}

/// One calendar year of the diary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProgress {
    pub year: i32,
    pub total_films: u32,
    pub average_rating: f64,
    pub distinct_genres: u32,
    pub distinct_decades: u32,
    pub distinct_countries: u32,
    pub distinct_directors: u32,
    /// Films logged per month, January first
    pub monthly: [u32; 12],
}
