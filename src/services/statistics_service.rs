// src/services/statistics_service.rs
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Datelike, Utc};

use crate::domain::{compute_statistics, compute_yearly_progress, DiaryStatistics, YearlyProgress};
use crate::error::AppResult;
use crate::events::{
    DefaultRubricChanged, DiaryRefreshed, EventBus, FilmLogCreated, FilmLogDeleted,
    FilmLogUpdated, RubricDeleted, RubricSaved,
};
use crate::repositories::RubricRepository;
use crate::services::DiaryService;

/// `generation` moves on every invalidation, so a computation that raced
/// with one is never stored
#[derive(Default)]
struct CacheSlot {
    generation: u64,
    stats: Option<DiaryStatistics>,
}

type StatisticsCache = Arc<RwLock<CacheSlot>>;

pub struct StatisticsService {
    diary: Arc<DiaryService>,
    rubric_repo: Arc<dyn RubricRepository>,
    event_bus: Arc<EventBus>,
    cache: StatisticsCache,
}

impl StatisticsService {
    pub fn new(
        diary: Arc<DiaryService>,
        rubric_repo: Arc<dyn RubricRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            diary,
            rubric_repo,
            event_bus,
            cache: Arc::new(RwLock::new(CacheSlot::default())),
        }
    }

    /// Cached statistics, recomputed after any change to entries or rubrics
    pub fn current(&self) -> AppResult<DiaryStatistics> {
        let generation = {
            let slot = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(stats) = slot.stats.as_ref() {
                return Ok(stats.clone());
            }
            slot.generation
        };

        let stats = self.calculate()?;
        if !self.store(generation, &stats) {
            log::debug!("Statistics changed while computing; result not cached");
        }
        Ok(stats)
    }

    /// Always recomputes, bypassing the cache
    pub fn calculate(&self) -> AppResult<DiaryStatistics> {
        let entries = self.diary.entries();
        let rubrics = self.rubric_repo.list_all()?;
        Ok(compute_statistics(&entries, &rubrics, Utc::now()))
    }

    /// Progress for one calendar year; computed on every call
    pub fn yearly_progress(&self, year: i32) -> YearlyProgress {
        compute_yearly_progress(&self.diary.entries(), year)
    }

    pub fn current_year_progress(&self) -> YearlyProgress {
        self.yearly_progress(Utc::now().year())
    }

    pub fn invalidate(&self) {
        invalidate(&self.cache);
    }

    pub fn is_cached(&self) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stats
            .is_some()
    }

    /// Caches `stats` unless an invalidation happened after `generation` was read
    fn store(&self, generation: u64, stats: &DiaryStatistics) -> bool {
        let mut slot = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            return false;
        }
        slot.stats = Some(stats.clone());
        true
    }

    pub fn register_event_handlers(&self) {
        macro_rules! invalidate_on {
            ($($event:ty),+ $(,)?) => {
                $(
                    let cache = Arc::clone(&self.cache);
                    self.event_bus.subscribe::<$event, _>(move |_| invalidate(&cache));
                )+
            };
        }

        invalidate_on!(
            DiaryRefreshed,
            FilmLogCreated,
            FilmLogUpdated,
            FilmLogDeleted,
            RubricSaved,
            RubricDeleted,
            DefaultRubricChanged,
        );
    }
}

fn invalidate(cache: &StatisticsCache) {
    let mut slot = cache.write().unwrap_or_else(PoisonError::into_inner);
    slot.generation = slot.generation.wrapping_add(1);
    slot.stats = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncStrategy;
    use crate::db::{create_memory_pool, initialize_database};
    use crate::domain::{FilmLogDraft, FilmLogId, Genre, Rating};
    use crate::integrations::backend::MockFilmLogApi;
    use crate::repositories::SqliteRubricRepository;

    fn entry(id: &str, genre: Genre, rating: u8) -> crate::domain::FilmLogEntry {
        let mut draft = FilmLogDraft::new(format!("Film {}", id), "Agnès Varda", 1962);
        draft.genre = genre;
        draft.country = "France".to_string();
        draft.rating = Rating::new(rating).ok();
        draft.into_entry(FilmLogId::from(id), Utc::now())
    }

    async fn service_with(entries: Vec<crate::domain::FilmLogEntry>) -> (StatisticsService, Arc<EventBus>) {
        let mut api = MockFilmLogApi::new();
        api.expect_list().returning(move || Ok(entries.clone()));

        let bus = Arc::new(EventBus::new());
        let diary = Arc::new(DiaryService::new(Arc::new(api), Arc::clone(&bus), SyncStrategy::Refetch));
        diary.refresh().await.unwrap();

        let pool = create_memory_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        let rubric_repo = Arc::new(SqliteRubricRepository::new(Arc::new(pool)));

        let service = StatisticsService::new(diary, rubric_repo, Arc::clone(&bus));
        service.register_event_handlers();
        (service, bus)
    }

    #[tokio::test]
    async fn test_current_computes_from_diary() {
        let (service, _bus) = service_with(vec![
            entry("1", Genre::Drama, 8),
            entry("2", Genre::Documentary, 9),
            entry("3", Genre::Drama, 7),
        ])
        .await;

        let stats = service.current().unwrap();
        assert_eq!(stats.total_films, 3);
        assert_eq!(stats.average_rating, 8.0);
        assert_eq!(stats.top_genres[0].genre, "Drama");
        assert_eq!(stats.top_genres[0].count, 2);
        assert_eq!(stats.distinct_directors, 1);
        assert!(service.is_cached());
    }

    #[tokio::test]
    async fn test_cache_invalidated_by_events() {
        let (service, bus) = service_with(vec![entry("1", Genre::Comedy, 6)]).await;

        service.current().unwrap();
        assert!(service.is_cached());

        bus.emit(FilmLogCreated::new(FilmLogId::from("2"), "Cléo from 5 to 7".to_string()));
        assert!(!service.is_cached());

        service.current().unwrap();
        bus.emit(RubricDeleted::new(1));
        assert!(!service.is_cached());
    }

    #[tokio::test]
    async fn test_result_of_raced_computation_not_cached() {
        let (service, bus) = service_with(vec![entry("1", Genre::Comedy, 6)]).await;

        let generation = service.cache.read().unwrap().generation;
        let stale = service.calculate().unwrap();
        bus.emit(DiaryRefreshed::new(4));

        assert!(!service.store(generation, &stale));
        assert!(!service.is_cached());

        service.current().unwrap();
        assert!(service.is_cached());
    }

    #[tokio::test]
    async fn test_yearly_progress_uses_diary_entries() {
        let (service, _bus) = service_with(vec![
            entry("1", Genre::Drama, 8),
            entry("2", Genre::Documentary, 5),
        ])
        .await;

        let progress = service.current_year_progress();
        assert_eq!(progress.year, Utc::now().year());
        assert_eq!(progress.total_films, 2);
        assert_eq!(progress.average_rating, 6.5);
        assert_eq!(progress.monthly.iter().sum::<u32>(), 2);
        assert_eq!(service.yearly_progress(1990).total_films, 0);
    }
}
