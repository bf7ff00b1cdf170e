// events/types.rs
//
// Domain events emitted by the diary services.
// Each event represents an immutable fact that has already occurred.
//
// RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{FilmLogId, RubricId};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// FILM LOG EVENTS
// ============================================================================

/// The backend accepted a new film log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmLogCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub film_log_id: FilmLogId,
    pub title: String,
}

impl FilmLogCreated {
    pub fn new(film_log_id: FilmLogId, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            film_log_id,
            title,
        }
    }
}

impl DomainEvent for FilmLogCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FilmLogCreated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmLogUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub film_log_id: FilmLogId,
}

impl FilmLogUpdated {
    pub fn new(film_log_id: FilmLogId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            film_log_id,
        }
    }
}

impl DomainEvent for FilmLogUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FilmLogUpdated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmLogDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub film_log_id: FilmLogId,
}

impl FilmLogDeleted {
    pub fn new(film_log_id: FilmLogId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            film_log_id,
        }
    }
}

impl DomainEvent for FilmLogDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FilmLogDeleted" }
}

/// Local entries were replaced by a fresh copy of the backend collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryRefreshed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub entry_count: usize,
}

impl DiaryRefreshed {
    pub fn new(entry_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            entry_count,
        }
    }
}

impl DomainEvent for DiaryRefreshed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "DiaryRefreshed" }
}

/// A backend call failed; local entries were left as they were
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub action: String,
    pub message: String,
}

impl SyncFailed {
    pub fn new(action: String, message: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            action,
            message,
        }
    }
}

impl DomainEvent for SyncFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SyncFailed" }
}

// ============================================================================
// RUBRIC EVENTS
// ============================================================================

/// Created or updated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricSaved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub rubric_id: RubricId,
    pub name: String,
}

impl RubricSaved {
    pub fn new(rubric_id: RubricId, name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            rubric_id,
            name,
        }
    }
}

impl DomainEvent for RubricSaved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "RubricSaved" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub rubric_id: RubricId,
}

impl RubricDeleted {
    pub fn new(rubric_id: RubricId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            rubric_id,
        }
    }
}

impl DomainEvent for RubricDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "RubricDeleted" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultRubricChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub rubric_id: RubricId,
}

impl DefaultRubricChanged {
    pub fn new(rubric_id: RubricId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            rubric_id,
        }
    }
}

impl DomainEvent for DefaultRubricChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "DefaultRubricChanged" }
}

// ============================================================================
// LIST EVENTS
// ============================================================================

/// Created, renamed, or its films changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub list_id: Uuid,
    pub film_count: usize,
}

impl ListUpdated {
    pub fn new(list_id: Uuid, film_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            list_id,
            film_count,
        }
    }
}

impl DomainEvent for ListUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ListUpdated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub list_id: Uuid,
}

impl ListDeleted {
    pub fn new(list_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            list_id,
        }
    }
}

impl DomainEvent for ListDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ListDeleted" }
}
