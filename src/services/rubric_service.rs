// src/services/rubric_service.rs
use std::sync::Arc;

use crate::domain::{
    validate_rubric_draft, weighted_score, CategoryRatings, Rating, Rubric, RubricDraft, RubricId,
};
use crate::error::{AppError, AppResult};
use crate::events::{DefaultRubricChanged, EventBus, RubricDeleted, RubricSaved};
use crate::repositories::RubricRepository;

pub struct RubricService {
    rubric_repo: Arc<dyn RubricRepository>,
    event_bus: Arc<EventBus>,
}

impl RubricService {
    pub fn new(rubric_repo: Arc<dyn RubricRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            rubric_repo,
            event_bus,
        }
    }

    pub fn list_rubrics(&self) -> AppResult<Vec<Rubric>> {
        self.rubric_repo.list_all()
    }

    pub fn get_rubric(&self, rubric_id: RubricId) -> AppResult<Option<Rubric>> {
        self.rubric_repo.get_by_id(rubric_id)
    }

    pub fn default_rubric(&self) -> AppResult<Option<Rubric>> {
        self.rubric_repo.get_default()
    }

    pub fn create_rubric(&self, draft: RubricDraft) -> AppResult<Rubric> {
        validate_rubric_draft(&draft).map_err(AppError::Domain)?;
        if let Some(warning) = draft.weight_warning() {
            log::warn!("Rubric '{}': {}", draft.name.trim(), warning);
        }

        let rubric = self.rubric_repo.create(&draft)?;

        self.event_bus
            .emit(RubricSaved::new(rubric.id, rubric.name.clone()));
        if rubric.is_default {
            self.event_bus.emit(DefaultRubricChanged::new(rubric.id));
        }

        Ok(rubric)
    }

    pub fn update_rubric(&self, rubric_id: RubricId, draft: RubricDraft) -> AppResult<Rubric> {
        let existing = self
            .rubric_repo
            .get_by_id(rubric_id)?
            .ok_or(AppError::NotFound)?;

        validate_rubric_draft(&draft).map_err(AppError::Domain)?;
        if let Some(warning) = draft.weight_warning() {
            log::warn!("Rubric '{}': {}", draft.name.trim(), warning);
        }

        let rubric = self.rubric_repo.update(rubric_id, &draft)?;

        self.event_bus
            .emit(RubricSaved::new(rubric.id, rubric.name.clone()));
        if rubric.is_default && !existing.is_default {
            self.event_bus.emit(DefaultRubricChanged::new(rubric.id));
        }

        Ok(rubric)
    }

    /// Deleting the default rubric leaves the diary without one
    pub fn delete_rubric(&self, rubric_id: RubricId) -> AppResult<()> {
        self.rubric_repo.delete(rubric_id)?;
        self.event_bus.emit(RubricDeleted::new(rubric_id));
        Ok(())
    }

    pub fn set_default(&self, rubric_id: RubricId) -> AppResult<()> {
        self.rubric_repo.set_default(rubric_id)?;
        self.event_bus.emit(DefaultRubricChanged::new(rubric_id));
        Ok(())
    }

    /// Live score preview for the log form
    pub fn preview_score(
        &self,
        rubric_id: RubricId,
        ratings: &CategoryRatings,
        fallback: Option<Rating>,
    ) -> AppResult<f64> {
        let rubric = self
            .rubric_repo
            .get_by_id(rubric_id)?
            .ok_or(AppError::NotFound)?;

        Ok(weighted_score(&rubric.categories, Some(ratings), fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};
    use crate::domain::{CategoryDraft, DomainError};
    use crate::repositories::SqliteRubricRepository;

    fn service() -> (RubricService, Arc<EventBus>) {
        let pool = create_memory_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        let repo = Arc::new(SqliteRubricRepository::new(Arc::new(pool)));
        let bus = Arc::new(EventBus::new());
        (RubricService::new(repo, Arc::clone(&bus)), bus)
    }

    fn cinephile(is_default: bool) -> RubricDraft {
        RubricDraft {
            name: "Cinephile Standard".to_string(),
            description: "Craft first".to_string(),
            categories: vec![
                CategoryDraft::new("Story", 30),
                CategoryDraft::new("Direction", 25),
                CategoryDraft::new("Acting", 25),
                CategoryDraft::new("Cinematography", 20),
            ],
            is_default,
        }
    }

    #[test]
    fn test_create_emits_events() {
        let (service, bus) = service();
        let rubric = service.create_rubric(cinephile(true)).unwrap();

        assert!(rubric.is_default);
        let events: Vec<String> = bus.recent_events().into_iter().map(|e| e.event_type.to_string()).collect();
        assert_eq!(events, vec!["RubricSaved", "DefaultRubricChanged"]);
        assert_eq!(service.default_rubric().unwrap().unwrap().id, rubric.id);
    }

    #[test]
    fn test_invalid_rubric_rejected() {
        let (service, bus) = service();
        let mut draft = cinephile(false);
        draft.categories.truncate(1);

        assert!(matches!(
            service.create_rubric(draft),
            Err(AppError::Domain(DomainError::InvariantViolation(_)))
        ));
        assert!(service.list_rubrics().unwrap().is_empty());
        assert!(bus.recent_events().is_empty());
    }

    #[test]
    fn test_unbalanced_weights_are_saved() {
        let (service, _bus) = service();
        let mut draft = cinephile(false);
        draft.categories[0].weight = 15;

        let rubric = service.create_rubric(draft).unwrap();
        assert_eq!(rubric.total_weight(), 85);
        assert!(rubric.weight_warning().is_some());
    }

    #[test]
    fn test_set_default_moves_flag() {
        let (service, _bus) = service();
        let first = service.create_rubric(cinephile(true)).unwrap();
        let mut other = cinephile(false);
        other.name = "Vibes Only".to_string();
        let second = service.create_rubric(other).unwrap();

        service.set_default(second.id).unwrap();

        assert!(!service.get_rubric(first.id).unwrap().unwrap().is_default);
        assert_eq!(service.default_rubric().unwrap().unwrap().id, second.id);
    }

    #[test]
    fn test_delete_default_leaves_none() {
        let (service, _bus) = service();
        let rubric = service.create_rubric(cinephile(true)).unwrap();

        service.delete_rubric(rubric.id).unwrap();
        assert!(service.default_rubric().unwrap().is_none());
        assert!(matches!(service.delete_rubric(rubric.id), Err(AppError::NotFound)));
    }

    #[test]
    fn test_update_missing_rubric() {
        let (service, _bus) = service();
        assert!(matches!(
            service.update_rubric(404, cinephile(false)),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn test_preview_score() {
        let (service, _bus) = service();
        let rubric = service.create_rubric(cinephile(false)).unwrap();

        let mut ratings = CategoryRatings::new();
        for (category, value) in rubric.categories.iter().zip([9u8, 8, 8, 8]) {
            ratings.insert(category.id, Rating::new(value).unwrap());
        }
        // (9*30 + 8*25 + 8*25 + 8*20) / 100
        assert_eq!(service.preview_score(rubric.id, &ratings, None).unwrap(), 8.3);

        let fallback = Rating::new(7).ok();
        assert_eq!(
            service.preview_score(rubric.id, &CategoryRatings::new(), fallback).unwrap(),
            7.0
        );
        assert!(service.preview_score(999, &ratings, None).is_err());
    }
}
