// events/bus/event_bus.rs
//
// In-process bus that lets the diary, rubric, list and statistics services
// react to each other's changes without holding references to each other.
//
// - Handlers run synchronously, in subscription order, on the emitting thread
// - A panicking handler is logged and skipped; later handlers still run
// - The handler table is not locked while handlers run, so a handler may
//   subscribe or emit in turn
// - The most recent emissions are kept in a bounded history

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::events::types::DomainEvent;

/// Emissions remembered by `EventBus::new`
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

type EventHandler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// One emission, as remembered in the bus history
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedEvent {
    pub event_type: &'static str,
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub handler_count: usize,
}

/// Shared handle; clones see the same handlers and history
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,
    history: Arc<RwLock<VecDeque<EmittedEvent>>>,
    history_limit: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// `0` keeps no history at all
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(VecDeque::with_capacity(history_limit))),
            history_limit,
        }
    }

    /// Registers `handler` for every later emission of `E`.
    ///
    /// ```ignore
    /// bus.subscribe::<FilmLogCreated, _>(|event| {
    ///     log::info!("Logged {}", event.title);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: EventHandler = Arc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let handlers: Vec<EventHandler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();

        log::debug!(
            "[EVENT] {} ({}) -> {} handler(s)",
            event.event_type(),
            event.event_id(),
            handlers.len()
        );
        self.remember(EmittedEvent {
            event_type: event.event_type(),
            event_id: event.event_id(),
            occurred_at: event.occurred_at(),
            handler_count: handlers.len(),
        });

        for (index, handler) in handlers.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&event as &dyn Any)));
            if outcome.is_err() {
                log::error!("Handler {} for {} panicked", index, event.event_type());
            }
        }
    }

    /// Recent emissions, oldest first
    pub fn recent_events(&self) -> Vec<EmittedEvent> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear_history(&self) {
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    fn remember(&self, emitted: EmittedEvent) {
        if self.history_limit == 0 {
            return;
        }
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        while history.len() >= self.history_limit {
            history.pop_front();
        }
        history.push_back(emitted);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilmLogId;
    use crate::events::types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn created(title: &str) -> FilmLogCreated {
        FilmLogCreated::new(FilmLogId::from("1"), title.to_string())
    }

    fn counting(bus: &EventBus) -> Arc<AtomicUsize> {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        bus.subscribe::<FilmLogCreated, _>(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        counter
    }

    #[test]
    fn test_subscribe_and_emit() {
        let bus = EventBus::new();
        let counter = counting(&bus);

        bus.emit(created("Close-Up"));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let sequence = Arc::new(RwLock::new(Vec::new()));

        for n in 1..=3 {
            let seq = Arc::clone(&sequence);
            bus.subscribe::<DiaryRefreshed, _>(move |_| {
                seq.write().unwrap().push(n);
            });
        }

        bus.emit(DiaryRefreshed::new(12));

        assert_eq!(*sequence.read().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_handlers_only_see_their_event_type() {
        let bus = EventBus::new();
        let counter = counting(&bus);

        bus.emit(RubricSaved::new(1, "Standard".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_history_records_emissions() {
        let bus = EventBus::new();
        counting(&bus);

        bus.emit(created("Yi Yi"));
        bus.emit(FilmLogDeleted::new(FilmLogId::from("1")));

        let history = bus.recent_events();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].event_type, "FilmLogCreated");
        assert_eq!(history[0].handler_count, 1);
        assert_eq!(history[1].event_type, "FilmLogDeleted");
        assert_eq!(history[1].handler_count, 0);

        bus.clear_history();
        assert!(bus.recent_events().is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let bus = EventBus::with_history_limit(3);

        let events: Vec<DiaryRefreshed> = (0..10).map(DiaryRefreshed::new).collect();
        for event in &events {
            bus.emit(event.clone());
        }

        let kept: Vec<Uuid> = bus.recent_events().into_iter().map(|e| e.event_id).collect();
        let newest: Vec<Uuid> = events[7..].iter().map(|e| e.event_id).collect();
        assert_eq!(kept, newest);

        let silent = EventBus::with_history_limit(0);
        silent.emit(DiaryRefreshed::new(1));
        assert!(silent.recent_events().is_empty());
    }

    #[test]
    fn test_subscriber_count_shared_between_clones() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count::<FilmLogCreated>(), 0);

        bus.subscribe::<FilmLogCreated, _>(|_| {});
        bus.clone().subscribe::<FilmLogCreated, _>(|_| {});

        assert_eq!(bus.subscriber_count::<FilmLogCreated>(), 2);
        assert_eq!(bus.subscriber_count::<FilmLogUpdated>(), 0);
    }

    #[test]
    fn test_handler_may_emit_while_handling() {
        let bus = EventBus::new();
        let counter = counting(&bus);

        let inner = bus.clone();
        bus.subscribe::<DiaryRefreshed, _>(move |_| inner.emit(created("Nested")));

        bus.emit(DiaryRefreshed::new(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_panic_doesnt_break_bus() {
        let bus = EventBus::new();
        bus.subscribe::<FilmLogCreated, _>(|_| panic!("handler failure"));
        let counter = counting(&bus);

        bus.emit(created("Test"));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
