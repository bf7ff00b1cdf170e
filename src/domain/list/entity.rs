use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::film_log::FilmLogId;

/// A user-curated list of logged films ("Best of 2023").
/// Lists only reference entries; they never own or change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmList {
    /// Local identifier, lists are not synced to the backend
    pub id: Uuid,

    pub title: String,

    pub description: String,

    /// Ordered, without duplicates
    pub films: Vec<FilmLogId>,

    pub created_at: DateTime<Utc>,
}

impl FilmList {
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            films: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn contains(&self, film_id: &FilmLogId) -> bool {
        self.films.contains(film_id)
    }

    /// Appends the film; returns false if it was already listed
    pub fn add_film(&mut self, film_id: FilmLogId) -> bool {
        if self.contains(&film_id) {
            return false;
        }
        self.films.push(film_id);
        true
    }

    /// Returns false if the film was not listed
    pub fn remove_film(&mut self, film_id: &FilmLogId) -> bool {
        let before = self.films.len();
        self.films.retain(|id| id != film_id);
        self.films.len() != before
    }

    pub fn update(&mut self, title: Option<String>, description: Option<String>) {
        if let Some(t) = title {
            self.title = t;
        }
        if let Some(d) = description {
            self.description = d;
        }
    }
}

impl std::fmt::Display for FilmList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_film_ignores_duplicates() {
        let mut list = FilmList::new("Late Night Comfort Watches".to_string(), String::new());
        assert!(list.add_film(FilmLogId::from("4")));
        assert!(list.add_film(FilmLogId::from("6")));
        assert!(!list.add_film(FilmLogId::from("4")));
        assert_eq!(list.films, vec![FilmLogId::from("4"), FilmLogId::from("6")]);
    }

    #[test]
    fn test_remove_film() {
        let mut list = FilmList::new("Best of 2023".to_string(), String::new());
        list.add_film(FilmLogId::from("1"));
        assert!(list.remove_film(&FilmLogId::from("1")));
        assert!(!list.remove_film(&FilmLogId::from("1")));
        assert!(list.films.is_empty());
    }
}
