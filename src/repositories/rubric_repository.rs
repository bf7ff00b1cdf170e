// src/repositories/rubric_repository.rs
//
// Rubric persistence (local SQLite)

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::ConnectionPool;
use crate::domain::{
    CategoryId, DomainError, Rubric, RubricCategory, RubricDraft, RubricId,
};
use crate::error::{AppError, AppResult};

pub trait RubricRepository: Send + Sync {
    fn create(&self, draft: &RubricDraft) -> AppResult<Rubric>;
    /// Replaces the whole rubric. Categories carrying an id keep it.
    fn update(&self, id: RubricId, draft: &RubricDraft) -> AppResult<Rubric>;
    fn get_by_id(&self, id: RubricId) -> AppResult<Option<Rubric>>;
    /// Default rubric first, then by name
    fn list_all(&self) -> AppResult<Vec<Rubric>>;
    fn get_default(&self) -> AppResult<Option<Rubric>>;
    /// Makes `id` the only default rubric
    fn set_default(&self, id: RubricId) -> AppResult<()>;
    fn delete(&self, id: RubricId) -> AppResult<()>;
}

pub struct SqliteRubricRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteRubricRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map a rubric row; categories are filled in separately
    fn row_to_rubric(row: &Row) -> Result<Rubric, rusqlite::Error> {
        Ok(Rubric {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            categories: Vec::new(),
            is_default: row.get::<_, i64>("is_default")? != 0,
        })
    }

    fn row_to_category(row: &Row) -> Result<RubricCategory, rusqlite::Error> {
        Ok(RubricCategory {
            id: row.get("id")?,
            name: row.get("name")?,
            weight: row.get("weight")?,
        })
    }

    fn load_categories(conn: &Connection, rubric_id: RubricId) -> AppResult<Vec<RubricCategory>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, weight FROM rubric_categories
             WHERE rubric_id = ?1
             ORDER BY position, id",
        )?;

        let categories = stmt
            .query_map(params![rubric_id], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    fn load_rubric(conn: &Connection, id: RubricId) -> AppResult<Option<Rubric>> {
        let rubric = conn
            .query_row(
                "SELECT id, name, description, is_default FROM rubrics WHERE id = ?1",
                params![id],
                Self::row_to_rubric,
            )
            .optional()?;

        match rubric {
            Some(mut rubric) => {
                rubric.categories = Self::load_categories(conn, rubric.id)?;
                Ok(Some(rubric))
            }
            None => Ok(None),
        }
    }

    fn clear_default(conn: &Connection, except: Option<RubricId>) -> AppResult<()> {
        conn.execute(
            "UPDATE rubrics SET is_default = 0 WHERE is_default = 1 AND id IS NOT ?1",
            params![except],
        )?;
        Ok(())
    }

    fn insert_category(
        conn: &Connection,
        rubric_id: RubricId,
        name: &str,
        weight: u32,
        position: usize,
    ) -> AppResult<()> {
        conn.execute(
            "INSERT INTO rubric_categories (rubric_id, name, weight, position)
             VALUES (?1, ?2, ?3, ?4)",
            params![rubric_id, name.trim(), weight, position as i64],
        )?;
        Ok(())
    }
}

impl RubricRepository for SqliteRubricRepository {
    fn create(&self, draft: &RubricDraft) -> AppResult<Rubric> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        if draft.is_default {
            Self::clear_default(&tx, None)?;
        }

        tx.execute(
            "INSERT INTO rubrics (name, description, is_default, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![draft.name.trim(), draft.description, draft.is_default, now],
        )?;
        let id = tx.last_insert_rowid();

        for (position, category) in draft.categories.iter().enumerate() {
            Self::insert_category(&tx, id, &category.name, category.weight, position)?;
        }

        let rubric = Self::load_rubric(&tx, id)?.ok_or(AppError::NotFound)?;
        tx.commit()?;

        log::info!("Created rubric '{}' (id {})", rubric.name, rubric.id);
        Ok(rubric)
    }

    fn update(&self, id: RubricId, draft: &RubricDraft) -> AppResult<Rubric> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let existing = Self::load_categories(&tx, id)?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM rubrics WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(AppError::NotFound);
        }

        if draft.is_default {
            Self::clear_default(&tx, Some(id))?;
        }

        tx.execute(
            "UPDATE rubrics SET name = ?1, description = ?2, is_default = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                draft.name.trim(),
                draft.description,
                draft.is_default,
                Utc::now().to_rfc3339(),
                id
            ],
        )?;

        let kept: Vec<CategoryId> = draft.categories.iter().filter_map(|c| c.id).collect();
        if let Some(foreign) = kept.iter().find(|cid| !existing.iter().any(|c| c.id == **cid)) {
            return Err(AppError::Domain(DomainError::NotFound(format!(
                "Category {} does not belong to rubric {}",
                foreign, id
            ))));
        }

        // Removed categories go first so renamed ones cannot collide with them
        for category in existing.iter().filter(|c| !kept.contains(&c.id)) {
            tx.execute(
                "DELETE FROM rubric_categories WHERE id = ?1",
                params![category.id],
            )?;
        }

        // UNIQUE (rubric_id, name) is checked per statement, so kept rows are
        // parked under placeholder names before swaps and reuses land
        tx.execute(
            "UPDATE rubric_categories SET name = char(1) || id WHERE rubric_id = ?1",
            params![id],
        )?;

        for (position, category) in draft.categories.iter().enumerate() {
            match category.id {
                Some(category_id) => {
                    tx.execute(
                        "UPDATE rubric_categories SET name = ?1, weight = ?2, position = ?3
                         WHERE id = ?4",
                        params![
                            category.name.trim(),
                            category.weight,
                            position as i64,
                            category_id,
                        ],
                    )?;
                }
                None => {
                    Self::insert_category(&tx, id, &category.name, category.weight, position)?;
                }
            }
        }

        let rubric = Self::load_rubric(&tx, id)?.ok_or(AppError::NotFound)?;
        tx.commit()?;

        log::info!("Updated rubric '{}' (id {})", rubric.name, rubric.id);
        Ok(rubric)
    }

    fn get_by_id(&self, id: RubricId) -> AppResult<Option<Rubric>> {
        let conn = self.pool.get()?;
        Self::load_rubric(&conn, id)
    }

    fn list_all(&self) -> AppResult<Vec<Rubric>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, description, is_default FROM rubrics
             ORDER BY is_default DESC, name",
        )?;

        let mut rubrics: Vec<Rubric> = stmt
            .query_map([], Self::row_to_rubric)?
            .collect::<Result<Vec<_>, _>>()?;

        for rubric in &mut rubrics {
            rubric.categories = Self::load_categories(&conn, rubric.id)?;
        }

        Ok(rubrics)
    }

    fn get_default(&self) -> AppResult<Option<Rubric>> {
        let conn = self.pool.get()?;

        let id: Option<RubricId> = conn
            .query_row(
                "SELECT id FROM rubrics WHERE is_default = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => Self::load_rubric(&conn, id),
            None => Ok(None),
        }
    }

    fn set_default(&self, id: RubricId) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        Self::clear_default(&tx, Some(id))?;
        let rows_affected = tx.execute(
            "UPDATE rubrics SET is_default = 1, updated_at = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), id],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tx.commit()?;
        log::info!("Rubric {} is now the default", id);
        Ok(())
    }

    fn delete(&self, id: RubricId) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM rubrics WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        log::info!("Deleted rubric {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};
    use crate::domain::CategoryDraft;

    fn repository() -> SqliteRubricRepository {
        let pool = create_memory_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        SqliteRubricRepository::new(Arc::new(pool))
    }

    fn draft(name: &str, is_default: bool) -> RubricDraft {
        RubricDraft {
            name: name.to_string(),
            description: String::new(),
            categories: vec![
                CategoryDraft::new("Direction", 50),
                CategoryDraft::new("Screenplay", 50),
            ],
            is_default,
        }
    }

    #[test]
    fn test_create_and_get() {
        let repo = repository();
        let created = repo.create(&draft("Cinephile Standard", true)).unwrap();

        assert!(created.id > 0);
        assert_eq!(created.categories.len(), 2);
        assert_eq!(created.categories[0].name, "Direction");
        assert_eq!(created.total_weight(), 100);

        let loaded = repo.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(repo.get_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn test_only_one_default() {
        let repo = repository();
        let first = repo.create(&draft("First", true)).unwrap();
        let second = repo.create(&draft("Second", true)).unwrap();

        assert!(!repo.get_by_id(first.id).unwrap().unwrap().is_default);
        assert_eq!(repo.get_default().unwrap().unwrap().id, second.id);

        repo.set_default(first.id).unwrap();
        let defaults: Vec<_> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .filter(|r| r.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, first.id);
    }

    #[test]
    fn test_set_default_unknown_rubric() {
        let repo = repository();
        let only = repo.create(&draft("Only", true)).unwrap();

        assert!(matches!(repo.set_default(42), Err(AppError::NotFound)));
        // the failed call rolled back, the old default stays
        assert_eq!(repo.get_default().unwrap().unwrap().id, only.id);
    }

    #[test]
    fn test_list_all_orders_default_first() {
        let repo = repository();
        repo.create(&draft("Alpha", false)).unwrap();
        repo.create(&draft("Zeta", true)).unwrap();
        repo.create(&draft("Beta", false)).unwrap();

        let names: Vec<String> = repo.list_all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Beta"]);
    }

    #[test]
    fn test_update_keeps_category_ids() {
        let repo = repository();
        let created = repo.create(&draft("Evolving", false)).unwrap();
        let direction_id = created.categories[0].id;

        let mut edit = RubricDraft::from(&created);
        edit.categories[0].weight = 40;
        edit.categories.remove(1);
        edit.categories.push(CategoryDraft::new("Pacing", 30));

        let updated = repo.update(created.id, &edit).unwrap();
        assert_eq!(updated.categories.len(), 2);
        assert_eq!(updated.categories[0].id, direction_id);
        assert_eq!(updated.categories[0].weight, 40);
        assert_eq!(updated.categories[1].name, "Pacing");
    }

    #[test]
    fn test_update_swaps_category_names() {
        let repo = repository();
        let created = repo.create(&draft("Swapped", false)).unwrap();

        let mut edit = RubricDraft::from(&created);
        edit.categories[0].name = "Screenplay".to_string();
        edit.categories[1].name = "Direction".to_string();

        let updated = repo.update(created.id, &edit).unwrap();
        assert_eq!(updated.categories[0].id, created.categories[0].id);
        assert_eq!(updated.categories[0].name, "Screenplay");
        assert_eq!(updated.categories[1].id, created.categories[1].id);
        assert_eq!(updated.categories[1].name, "Direction");
    }

    #[test]
    fn test_update_new_category_reuses_renamed_name() {
        let repo = repository();
        let created = repo.create(&draft("Reused", false)).unwrap();

        let mut edit = RubricDraft::from(&created);
        edit.categories[0].name = "Mise-en-scène".to_string();
        edit.categories[0].weight = 30;
        edit.categories.insert(0, CategoryDraft::new("Direction", 20));

        let updated = repo.update(created.id, &edit).unwrap();
        let names: Vec<&str> = updated.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Direction", "Mise-en-scène", "Screenplay"]);
        assert_ne!(updated.categories[0].id, created.categories[0].id);
        assert_eq!(updated.categories[1].id, created.categories[0].id);
    }

    #[test]
    fn test_update_rejects_foreign_category() {
        let repo = repository();
        let a = repo.create(&draft("A", false)).unwrap();
        let b = repo.create(&draft("B", false)).unwrap();

        let mut edit = RubricDraft::from(&a);
        edit.categories[0].id = Some(b.categories[0].id);

        assert!(repo.update(a.id, &edit).is_err());
        assert_eq!(repo.get_by_id(a.id).unwrap().unwrap(), a);
    }

    #[test]
    fn test_update_missing_rubric() {
        let repo = repository();
        assert!(matches!(repo.update(7, &draft("Ghost", false)), Err(AppError::NotFound)));
    }

    #[test]
    fn test_delete_cascades_categories() {
        let repo = repository();
        let created = repo.create(&draft("Temporary", true)).unwrap();

        repo.delete(created.id).unwrap();
        assert!(repo.get_by_id(created.id).unwrap().is_none());
        assert!(repo.get_default().unwrap().is_none());
        assert!(matches!(repo.delete(created.id), Err(AppError::NotFound)));

        let conn = repo.pool.get().unwrap();
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM rubric_categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }
}
