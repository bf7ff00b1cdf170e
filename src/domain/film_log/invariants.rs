use chrono::{Datelike, Utc};

use super::entity::FilmLogDraft;
use crate::domain::{DomainError, DomainResult};

/// Earliest release year accepted for a logged film
pub const MIN_FILM_YEAR: i32 = 1890;

/// How far past the current year a release may be announced
const MAX_YEARS_AHEAD: i32 = 5;

/// Validates a draft against the current calendar year
pub fn validate_draft(draft: &FilmLogDraft) -> DomainResult<()> {
    validate_draft_for_year(draft, Utc::now().year())
}

/// Validates all submission invariants of a draft
pub fn validate_draft_for_year(draft: &FilmLogDraft, current_year: i32) -> DomainResult<()> {
    validate_required("title", &draft.title)?;
    validate_required("director", &draft.director)?;
    validate_required("country", &draft.country)?;
    validate_year(draft.year, current_year)?;
    validate_genre(draft)?;
    Ok(())
}

/// Cheap check for enabling the submit action
pub fn is_submittable(draft: &FilmLogDraft) -> bool {
    validate_draft(draft).is_ok()
}

fn validate_required(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(())
}

fn validate_year(year: i32, current_year: i32) -> DomainResult<()> {
    let max = current_year + MAX_YEARS_AHEAD;
    if !(MIN_FILM_YEAR..=max).contains(&year) {
        return Err(DomainError::OutOfRange {
            field: "year",
            value: i64::from(year),
            min: i64::from(MIN_FILM_YEAR),
            max: i64::from(max),
        });
    }
    Ok(())
}

fn validate_genre(draft: &FilmLogDraft) -> DomainResult<()> {
    if !draft.genre.is_known() {
        return Err(DomainError::InvariantViolation(format!(
            "Unknown genre: {}",
            draft.genre
        )));
    }
    Ok(())
}

/// Film log invariants:
///
/// 1. title, director and country are non-empty before submission
/// 2. year lies in [1890, current year + 5]
/// 3. genre is one of the known genres
/// 4. ratings are 1-10 (enforced by the Rating type)
/// 5. rating, review and rubric ratings stay optional
/// 6. decade is derived from year

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::film_log::Genre;

    fn valid_draft() -> FilmLogDraft {
        let mut draft = FilmLogDraft::new("Aftersun", "Charlotte Wells", 2022);
        draft.country = "UK".to_string();
        draft
    }

    #[test]
    fn test_valid_draft() {
        assert!(validate_draft_for_year(&valid_draft(), 2026).is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        let mut draft = valid_draft();
        draft.title = "   ".to_string();
        assert!(matches!(
            validate_draft_for_year(&draft, 2026),
            Err(DomainError::MissingField("title"))
        ));
    }

    #[test]
    fn test_empty_director_and_country_fail() {
        let mut draft = valid_draft();
        draft.director.clear();
        assert!(matches!(
            validate_draft_for_year(&draft, 2026),
            Err(DomainError::MissingField("director"))
        ));

        let mut draft = valid_draft();
        draft.country.clear();
        assert!(matches!(
            validate_draft_for_year(&draft, 2026),
            Err(DomainError::MissingField("country"))
        ));
    }

    #[test]
    fn test_year_bounds() {
        let mut draft = valid_draft();
        draft.year = 1890;
        assert!(validate_draft_for_year(&draft, 2026).is_ok());

        draft.year = 1889;
        assert!(validate_draft_for_year(&draft, 2026).is_err());

        draft.year = 2031;
        assert!(validate_draft_for_year(&draft, 2026).is_ok());

        draft.year = 2032;
        assert!(matches!(
            validate_draft_for_year(&draft, 2026),
            Err(DomainError::OutOfRange { field: "year", .. })
        ));
    }

    #[test]
    fn test_unknown_genre_fails() {
        let mut draft = valid_draft();
        draft.genre = Genre::Other("Western".to_string());
        assert!(validate_draft_for_year(&draft, 2026).is_err());
    }

    #[test]
    fn test_optional_fields_may_be_empty() {
        let draft = valid_draft();
        assert!(draft.rating.is_none());
        assert!(draft.review.is_empty());
        assert!(draft.rubric_ratings.is_empty());
        assert!(is_submittable(&draft));
    }
}
