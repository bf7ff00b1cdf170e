// src/domain/mod.rs
//
// Domain Root
//
// Declares every domain module and re-exports its public API.
// Other modules import from `crate::domain::*`.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod film_log;
pub mod list;
pub mod rubric;
pub mod scoring;
pub mod statistics;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Film Log Domain
pub use film_log::{
    is_submittable, validate_draft, validate_draft_for_year, CategoryRatings, Decade,
    FilmLogDraft, FilmLogEntry, FilmLogId, Genre, Mood, Rating, RubricRatings,
};

// Rubric Domain
pub use rubric::{
    validate_rubric_draft, CategoryDraft, CategoryId, Rubric, RubricCategory, RubricDraft,
    RubricId, WeightWarning,
};

// Scoring
pub use scoring::{round_to_tenth, weighted_score};

// List Domain
pub use list::{validate_list, FilmList};

// Statistics (Derived Data)
pub use statistics::{
    compute_statistics, compute_yearly_progress, DiaryStatistics, GenreCount, RubricAverage,
    YearlyProgress,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
