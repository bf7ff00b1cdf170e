// src/application/state.rs

use std::sync::Arc;

use crate::config::DiaryConfig;
use crate::db::{create_connection_pool, get_database_path, initialize_database, ConnectionPool};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::{FilmLogApi, HttpFilmLogApi};
use crate::repositories::{
    ListRepository, RubricRepository, SqliteListRepository, SqliteRubricRepository,
};
use crate::services::{DiaryService, ListService, RubricService, StatisticsService};

/// Application state shared by every entry point.
/// All fields are Arc-wrapped for thread-safe sharing.
pub struct AppState {
    pub config: DiaryConfig,
    pub event_bus: Arc<EventBus>,
    pub pool: Arc<ConnectionPool>,
    pub diary_service: Arc<DiaryService>,
    pub rubric_service: Arc<RubricService>,
    pub list_service: Arc<ListService>,
    pub statistics_service: Arc<StatisticsService>,
}

impl AppState {
    /// Wire the local store, the backend client and the services
    pub fn initialize(config: DiaryConfig) -> AppResult<Self> {
        config.validate()?;

        // 1. INFRASTRUCTURE
        let event_bus = Arc::new(EventBus::new());
        let db_path = match &config.database_path {
            Some(path) => path.clone(),
            None => get_database_path()?,
        };
        let pool = Arc::new(create_connection_pool(&db_path)?);

        // Initialize schema (idempotent)
        {
            let conn = pool.get()?;
            initialize_database(&conn)?;
        }

        let api: Arc<dyn FilmLogApi> = Arc::new(HttpFilmLogApi::new(&config)?);

        // 2. REPOSITORIES
        let rubric_repo: Arc<dyn RubricRepository> =
            Arc::new(SqliteRubricRepository::new(pool.clone()));
        let list_repo: Arc<dyn ListRepository> = Arc::new(SqliteListRepository::new(pool.clone()));

        // 3. SERVICES
        let diary_service = Arc::new(DiaryService::new(
            api,
            event_bus.clone(),
            config.sync_strategy,
        ));
        let rubric_service = Arc::new(RubricService::new(rubric_repo.clone(), event_bus.clone()));
        let list_service = Arc::new(ListService::new(list_repo, event_bus.clone()));
        let statistics_service = Arc::new(StatisticsService::new(
            diary_service.clone(),
            rubric_repo,
            event_bus.clone(),
        ));

        // 4. EVENT HANDLER REGISTRATION (WIRING)
        list_service.register_event_handlers();
        statistics_service.register_event_handlers();

        log::info!(
            "Diary ready: backend {}, local store {}",
            config.api_base_url,
            db_path.display()
        );

        Ok(Self {
            config,
            event_bus,
            pool,
            diary_service,
            rubric_service,
            list_service,
            statistics_service,
        })
    }
}
