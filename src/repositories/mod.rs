// src/repositories/mod.rs
//
// Repository layer (local SQLite only)
//
// RULES:
// - Repositories are data mappers
// - NO business logic beyond storage constraints (single default rubric)
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod rubric_repository;
pub mod list_repository;

pub use rubric_repository::{RubricRepository, SqliteRubricRepository};
pub use list_repository::{ListRepository, SqliteListRepository};
