use std::collections::HashSet;

use super::entity::FilmList;
use crate::domain::{DomainError, DomainResult};

/// Validates list invariants
pub fn validate_list(list: &FilmList) -> DomainResult<()> {
    if list.title.trim().is_empty() {
        return Err(DomainError::MissingField("title"));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = list.films.iter().find(|id| !seen.insert(*id)) {
        return Err(DomainError::InvariantViolation(format!(
            "Film {} is listed twice",
            dup
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::film_log::FilmLogId;

    #[test]
    fn test_valid_list() {
        let list = FilmList::new("Best of 2023".to_string(), String::new());
        assert!(validate_list(&list).is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        let list = FilmList::new("  ".to_string(), String::new());
        assert!(validate_list(&list).is_err());
    }

    #[test]
    fn test_duplicate_films_fail() {
        let mut list = FilmList::new("Dupes".to_string(), String::new());
        list.films = vec![FilmLogId::from("1"), FilmLogId::from("1")];
        assert!(validate_list(&list).is_err());
    }
}
