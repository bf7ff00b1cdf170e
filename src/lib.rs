// src/lib.rs
// Filmdiary - Personal film diary core
//
// Architecture:
// - Domain-centric: entries, rubrics, scoring and lists live in `domain`
// - Remote film logs: the backend owns them, `integrations::backend` talks to it
// - Local-first extras: rubrics and lists persist in SQLite
// - Event-driven: services coordinate through the event bus
// - Explicit: No implicit behavior, no magic

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    compute_statistics,
    compute_yearly_progress,
    is_submittable,
    round_to_tenth,
    validate_draft,
    validate_list,
    validate_rubric_draft,
    weighted_score,
    // Film logs
    CategoryRatings,
    Decade,
    FilmLogDraft,
    FilmLogEntry,
    FilmLogId,
    Genre,
    Mood,
    Rating,
    RubricRatings,
    // Rubrics
    CategoryDraft,
    CategoryId,
    Rubric,
    RubricCategory,
    RubricDraft,
    RubricId,
    WeightWarning,
    // Lists
    FilmList,
    // Statistics
    DiaryStatistics,
    GenreCount,
    RubricAverage,
    YearlyProgress,
    // Errors
    DomainError,
    DomainResult,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::{load_config, load_effective_config, DiaryConfig, SyncStrategy};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    DefaultRubricChanged,
    DiaryRefreshed,
    DomainEvent,
    EmittedEvent,
    EventBus,
    FilmLogCreated,
    FilmLogDeleted,
    FilmLogUpdated,
    ListDeleted,
    ListUpdated,
    RubricDeleted,
    RubricSaved,
    SyncFailed,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, create_memory_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    ListRepository, RubricRepository, SqliteListRepository, SqliteRubricRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{DiaryService, DiaryState, ListService, RubricService, StatisticsService};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse, ErrorType};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{CreatedFilmLog, FilmLogApi, HttpFilmLogApi};
