// src/events/mod.rs
//
// Internal Event System - Public API
//
// Services emit facts here; the statistics cache listens.

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Film logs
    DiaryRefreshed,
    FilmLogCreated,
    FilmLogDeleted,
    FilmLogUpdated,
    SyncFailed,

    // Rubrics
    DefaultRubricChanged,
    RubricDeleted,
    RubricSaved,

    // Lists
    ListDeleted,
    ListUpdated,
};

pub use bus::{EmittedEvent, EventBus};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
