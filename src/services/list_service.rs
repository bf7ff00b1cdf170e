// src/services/list_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{validate_list, FilmList, FilmLogId};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, FilmLogDeleted, ListDeleted, ListUpdated};
use crate::repositories::ListRepository;

pub struct ListService {
    list_repo: Arc<dyn ListRepository>,
    event_bus: Arc<EventBus>,
}

impl ListService {
    pub fn new(list_repo: Arc<dyn ListRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            list_repo,
            event_bus,
        }
    }

    pub fn create_list(&self, title: String, description: String) -> AppResult<FilmList> {
        let list = FilmList::new(title.trim().to_string(), description);

        validate_list(&list).map_err(AppError::Domain)?;
        self.list_repo.save(&list)?;

        self.event_bus.emit(ListUpdated::new(list.id, 0));
        Ok(list)
    }

    pub fn rename_list(
        &self,
        list_id: Uuid,
        title: Option<String>,
        description: Option<String>,
    ) -> AppResult<FilmList> {
        let mut list = self.load(list_id)?;

        list.update(title.map(|t| t.trim().to_string()), description);

        validate_list(&list).map_err(AppError::Domain)?;
        self.list_repo.save(&list)?;

        self.event_bus.emit(ListUpdated::new(list.id, list.films.len()));
        Ok(list)
    }

    pub fn delete_list(&self, list_id: Uuid) -> AppResult<()> {
        self.list_repo.delete(list_id)?;
        self.event_bus.emit(ListDeleted::new(list_id));
        Ok(())
    }

    /// Returns false when the film was already in the list
    pub fn add_film(&self, list_id: Uuid, film_id: FilmLogId) -> AppResult<bool> {
        let mut list = self.load(list_id)?;

        if !list.add_film(film_id) {
            return Ok(false);
        }

        self.list_repo.save(&list)?;
        self.event_bus.emit(ListUpdated::new(list.id, list.films.len()));
        Ok(true)
    }

    /// Returns false when the film was not in the list
    pub fn remove_film(&self, list_id: Uuid, film_id: &FilmLogId) -> AppResult<bool> {
        let mut list = self.load(list_id)?;

        if !list.remove_film(film_id) {
            return Ok(false);
        }

        self.list_repo.save(&list)?;
        self.event_bus.emit(ListUpdated::new(list.id, list.films.len()));
        Ok(true)
    }

    pub fn get_list(&self, list_id: Uuid) -> AppResult<Option<FilmList>> {
        self.list_repo.get_by_id(list_id)
    }

    pub fn list_all(&self) -> AppResult<Vec<FilmList>> {
        self.list_repo.list_all()
    }

    pub fn lists_for_film(&self, film_id: &FilmLogId) -> AppResult<Vec<Uuid>> {
        self.list_repo.lists_containing(film_id)
    }

    /// Deleted film logs disappear from every list
    pub fn register_event_handlers(&self) {
        let list_repo = Arc::clone(&self.list_repo);

        self.event_bus.subscribe::<FilmLogDeleted, _>(move |event| {
            match list_repo.remove_film_everywhere(&event.film_log_id) {
                Ok(0) => {}
                Ok(n) => log::info!("Removed film log {} from {} lists", event.film_log_id, n),
                Err(e) => log::error!(
                    "Failed to remove film log {} from lists: {}",
                    event.film_log_id,
                    e
                ),
            }
        });
    }

    fn load(&self, list_id: Uuid) -> AppResult<FilmList> {
        self.list_repo.get_by_id(list_id)?.ok_or(AppError::NotFound)
    }
}
