pub mod entity;
pub mod invariants;

pub use entity::{CategoryDraft, CategoryId, Rubric, RubricCategory, RubricDraft, RubricId, WeightWarning};
pub use invariants::{validate_rubric_draft, MAX_CATEGORY_WEIGHT, MIN_CATEGORIES, MIN_CATEGORY_WEIGHT};
