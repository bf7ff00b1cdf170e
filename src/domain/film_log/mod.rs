pub mod entity;
pub mod invariants;
pub mod value_objects;

pub use entity::{FilmLogDraft, FilmLogEntry};
pub use invariants::{is_submittable, validate_draft, validate_draft_for_year, MIN_FILM_YEAR};
pub use value_objects::{
    CategoryRatings, Decade, FilmLogId, Genre, Mood, Rating, RubricRatings,
};
