// src/repositories/list_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::{FilmList, FilmLogId};
use crate::error::{AppError, AppResult};

pub trait ListRepository: Send + Sync {
    /// Inserts or replaces the list together with its film order
    fn save(&self, list: &FilmList) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<FilmList>>;
    fn list_all(&self) -> AppResult<Vec<FilmList>>;
    fn delete(&self, id: Uuid) -> AppResult<()>;
    fn lists_containing(&self, film_id: &FilmLogId) -> AppResult<Vec<Uuid>>;
    /// Drops a film from every list; returns how many lists changed
    fn remove_film_everywhere(&self, film_id: &FilmLogId) -> AppResult<usize>;
}

pub struct SqliteListRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteListRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_list(row: &Row) -> Result<FilmList, rusqlite::Error> {
        let id = Uuid::parse_str(&row.get::<_, String>("id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let title: String = row.get("title")?;
        let description: String = row.get("description")?;

        let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("created_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(FilmList {
            id,
            title,
            description,
            films: Vec::new(),
            created_at,
        })
    }

    fn load_films(conn: &Connection, list_id: Uuid) -> AppResult<Vec<FilmLogId>> {
        let mut stmt = conn.prepare(
            "SELECT film_log_id FROM film_list_items WHERE list_id = ?1 ORDER BY position"
        )?;

        let films: Vec<FilmLogId> = stmt
            .query_map(params![list_id.to_string()], |row| {
                row.get::<_, String>(0).map(FilmLogId::new)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(films)
    }
}

impl ListRepository for SqliteListRepository {
    fn save(&self, list: &FilmList) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO film_lists (id, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description",
            params![
                list.id.to_string(),
                list.title,
                list.description,
                list.created_at.to_rfc3339(),
            ],
        )?;

        tx.execute(
            "DELETE FROM film_list_items WHERE list_id = ?1",
            params![list.id.to_string()],
        )?;

        for (position, film_id) in list.films.iter().enumerate() {
            tx.execute(
                "INSERT INTO film_list_items (list_id, film_log_id, position)
                 VALUES (?1, ?2, ?3)",
                params![list.id.to_string(), film_id.as_str(), position as i64],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<FilmList>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, description, created_at FROM film_lists WHERE id = ?1"
        )?;

        match stmt.query_row(params![id.to_string()], Self::row_to_list) {
            Ok(mut list) => {
                list.films = Self::load_films(&conn, list.id)?;
                Ok(Some(list))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<FilmList>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, description, created_at FROM film_lists
             ORDER BY created_at DESC, title"
        )?;

        let mut lists: Vec<FilmList> = stmt.query_map([], Self::row_to_list)?
            .collect::<Result<Vec<_>, _>>()?;

        for list in &mut lists {
            list.films = Self::load_films(&conn, list.id)?;
        }

        Ok(lists)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            "DELETE FROM film_lists WHERE id = ?1",
            params![id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn lists_containing(&self, film_id: &FilmLogId) -> AppResult<Vec<Uuid>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT list_id FROM film_list_items WHERE film_log_id = ?1"
        )?;

        let list_ids: Vec<Uuid> = stmt
            .query_map(params![film_id.as_str()], |row| {
                let id_str: String = row.get(0)?;
                Uuid::parse_str(&id_str)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(list_ids)
    }

    fn remove_film_everywhere(&self, film_id: &FilmLogId) -> AppResult<usize> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "DELETE FROM film_list_items WHERE film_log_id = ?1",
            params![film_id.as_str()],
        )?;

        Ok(rows_affected)
    }
}
