// src/services/diary_service.rs
//
// Film log submission and sync
//
// The backend owns the film logs. This service keeps a local copy of the
// collection, validates drafts before they leave the client and turns
// backend failures into an error notice instead of touching the copy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use crate::application::error_handling::ErrorResponse;
use crate::config::SyncStrategy;
use crate::domain::{validate_draft, FilmLogDraft, FilmLogEntry, FilmLogId};
use crate::error::{AppError, AppResult};
use crate::events::{
    DiaryRefreshed, EventBus, FilmLogCreated, FilmLogDeleted, FilmLogUpdated, SyncFailed,
};
use crate::integrations::{CreatedFilmLog, FilmLogApi};

/// Snapshot of what the diary view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiaryState {
    /// Newest first, as the backend orders them
    pub entries: Vec<FilmLogEntry>,

    /// Notice from the last failed backend call, cleared by the next success
    pub last_error: Option<ErrorResponse>,

    pub is_loading: bool,
}

/// Releases the in-flight flag when the write finishes, however it finishes
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> AppResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::SubmissionInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct DiaryService {
    api: Arc<dyn FilmLogApi>,
    event_bus: Arc<EventBus>,
    sync_strategy: SyncStrategy,
    state: RwLock<DiaryState>,
    in_flight: AtomicBool,
}

impl DiaryService {
    pub fn new(
        api: Arc<dyn FilmLogApi>,
        event_bus: Arc<EventBus>,
        sync_strategy: SyncStrategy,
    ) -> Self {
        Self {
            api,
            event_bus,
            sync_strategy,
            state: RwLock::new(DiaryState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub fn state(&self) -> DiaryState {
        self.read_state().clone()
    }

    pub fn entries(&self) -> Vec<FilmLogEntry> {
        self.read_state().entries.clone()
    }

    pub fn entry(&self, id: &FilmLogId) -> Option<FilmLogEntry> {
        self.read_state().entries.iter().find(|e| &e.id == id).cloned()
    }

    pub fn last_error(&self) -> Option<ErrorResponse> {
        self.read_state().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.write_state().last_error = None;
    }

    /// True while a create, update or delete is waiting on the backend
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ========================================================================
    // BACKEND OPERATIONS
    // ========================================================================

    /// Replace local entries with the backend collection
    pub async fn refresh(&self) -> AppResult<usize> {
        self.write_state().is_loading = true;

        match self.api.list().await {
            Ok(entries) => {
                let count = entries.len();
                {
                    let mut state = self.write_state();
                    state.entries = entries;
                    state.last_error = None;
                    state.is_loading = false;
                }
                log::info!("Diary refreshed with {} entries", count);
                self.event_bus.emit(DiaryRefreshed::new(count));
                Ok(count)
            }
            Err(e) => Err(self.record_failure("refresh", e)),
        }
    }

    /// Log a new film.
    ///
    /// Invalid drafts are refused before any request is made. While one write
    /// is in flight, others fail with `AppError::SubmissionInFlight`.
    pub async fn submit(&self, draft: &FilmLogDraft) -> AppResult<FilmLogId> {
        validate_draft(draft).map_err(AppError::Domain)?;
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        self.write_state().is_loading = true;
        let created = match self.api.create(draft).await {
            Ok(created) => created,
            Err(e) => return Err(self.record_failure("create", e)),
        };

        log::info!("Logged '{}' as film log {}", draft.title.trim(), created.id);

        match self.sync_strategy {
            SyncStrategy::Refetch => {
                if let Err(e) = self.refetch_after_write().await {
                    log::warn!("Refetch after create failed, merging locally: {}", e);
                    self.merge_created(draft, &created);
                }
            }
            SyncStrategy::Merge => self.merge_created(draft, &created),
        }

        self.event_bus
            .emit(FilmLogCreated::new(created.id.clone(), draft.title.trim().to_string()));
        Ok(created.id)
    }

    /// Replace a logged film with `draft`
    pub async fn update(&self, id: &FilmLogId, draft: &FilmLogDraft) -> AppResult<()> {
        validate_draft(draft).map_err(AppError::Domain)?;
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        self.write_state().is_loading = true;
        let updated = match self.api.update(id, draft).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.record_failure("update", e)),
        };

        log::info!("Updated film log {}", id);

        match self.sync_strategy {
            SyncStrategy::Refetch => {
                if let Err(e) = self.refetch_after_write().await {
                    log::warn!("Refetch after update failed, merging locally: {}", e);
                    self.merge_updated(id, draft, &updated);
                }
            }
            SyncStrategy::Merge => self.merge_updated(id, draft, &updated),
        }

        self.event_bus.emit(FilmLogUpdated::new(id.clone()));
        Ok(())
    }

    pub async fn delete(&self, id: &FilmLogId) -> AppResult<()> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        self.write_state().is_loading = true;
        if let Err(e) = self.api.delete(id).await {
            return Err(self.record_failure("delete", e));
        }

        log::info!("Deleted film log {}", id);

        match self.sync_strategy {
            SyncStrategy::Refetch => {
                if let Err(e) = self.refetch_after_write().await {
                    log::warn!("Refetch after delete failed, removing locally: {}", e);
                    self.remove_local(id);
                }
            }
            SyncStrategy::Merge => self.remove_local(id),
        }

        self.event_bus.emit(FilmLogDeleted::new(id.clone()));
        Ok(())
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, DiaryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, DiaryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log, store the notice, keep the entries; hands the error back
    fn record_failure(&self, action: &str, error: AppError) -> AppError {
        log::error!("Film log {} failed: {}", action, error);

        let notice = ErrorResponse::from_app_error(&error);
        {
            let mut state = self.write_state();
            state.last_error = Some(notice.clone());
            state.is_loading = false;
        }

        self.event_bus
            .emit(SyncFailed::new(action.to_string(), notice.message));
        error
    }

    /// Fetch after a confirmed write. Failures are left to the caller to
    /// degrade; the write itself already succeeded.
    async fn refetch_after_write(&self) -> AppResult<()> {
        let entries = self.api.list().await?;
        let count = entries.len();
        {
            let mut state = self.write_state();
            state.entries = entries;
            state.last_error = None;
            state.is_loading = false;
        }
        self.event_bus.emit(DiaryRefreshed::new(count));
        Ok(())
    }

    fn merge_created(&self, draft: &FilmLogDraft, created: &CreatedFilmLog) {
        let entry = draft
            .clone()
            .into_entry(created.id.clone(), created.logged_at().unwrap_or_else(Utc::now));

        let mut state = self.write_state();
        state.entries.retain(|e| e.id != entry.id);
        state.entries.insert(0, entry);
        state.last_error = None;
        state.is_loading = false;
    }

    fn merge_updated(&self, id: &FilmLogId, draft: &FilmLogDraft, updated: &CreatedFilmLog) {
        let mut state = self.write_state();

        let previous = state.entries.iter().position(|e| &e.id == id);
        let logged_at = updated
            .logged_at()
            .or_else(|| previous.map(|i| state.entries[i].logged_at))
            .unwrap_or_else(Utc::now);
        let entry = draft.clone().into_entry(id.clone(), logged_at);

        match previous {
            Some(i) => state.entries[i] = entry,
            None => state.entries.insert(0, entry),
        }
        state.last_error = None;
        state.is_loading = false;
    }

    fn remove_local(&self, id: &FilmLogId) {
        let mut state = self.write_state();
        state.entries.retain(|e| &e.id != id);
        state.last_error = None;
        state.is_loading = false;
    }
}
