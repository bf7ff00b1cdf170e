// events/bus/mod.rs

pub mod event_bus;

pub use event_bus::{EmittedEvent, EventBus, DEFAULT_HISTORY_LIMIT};
