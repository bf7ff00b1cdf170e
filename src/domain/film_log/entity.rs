use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{Decade, FilmLogId, Genre, Mood, Rating, RubricRatings};
use crate::domain::rubric::Rubric;
use crate::domain::scoring::weighted_score;

/// What the log form produces: a film log entry before the backend has
/// assigned it an id and a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmLogDraft {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub genre: Genre,
    pub country: String,
    pub mood: Mood,

    /// User-asserted; never inferred from the diary
    pub is_new_director: bool,

    pub rating: Option<Rating>,

    /// Empty means no review
    pub review: String,

    pub rubric_ratings: RubricRatings,
}

impl FilmLogDraft {
    pub fn new(title: impl Into<String>, director: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            director: director.into(),
            year,
            ..Self::default()
        }
    }

    /// Decade is always derived from the year, never set on its own
    pub fn decade(&self) -> Decade {
        Decade::from_year(self.year)
    }

    /// Promote to a canonical entry once the backend has confirmed it
    pub fn into_entry(self, id: FilmLogId, logged_at: DateTime<Utc>) -> FilmLogEntry {
        let decade = self.decade();
        FilmLogEntry {
            id,
            title: self.title,
            director: self.director,
            year: self.year,
            genre: self.genre,
            country: self.country,
            decade,
            mood: Some(self.mood),
            is_new_director: self.is_new_director,
            rating: self.rating,
            review: self.review,
            rubric_ratings: self.rubric_ratings,
            logged_at,
        }
    }
}

impl Default for FilmLogDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            director: String::new(),
            year: Utc::now().year(),
            genre: Genre::default(),
            country: String::new(),
            mood: Mood::default(),
            is_new_director: false,
            rating: None,
            review: String::new(),
            rubric_ratings: RubricRatings::new(),
        }
    }
}

/// The record of one watched film, as confirmed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmLogEntry {
    /// Assigned by the backend
    pub id: FilmLogId,

    pub title: String,
    pub director: String,
    pub year: i32,
    pub genre: Genre,
    pub country: String,
    pub decade: Decade,
    pub mood: Option<Mood>,
    pub is_new_director: bool,
    pub rating: Option<Rating>,
    pub review: String,
    pub rubric_ratings: RubricRatings,

    /// Backend timestamp when it sent one, otherwise the client clock
    pub logged_at: DateTime<Utc>,
}

impl FilmLogEntry {
    /// Back to an editable draft. Updates supersede the whole record.
    pub fn to_draft(&self) -> FilmLogDraft {
        FilmLogDraft {
            title: self.title.clone(),
            director: self.director.clone(),
            year: self.year,
            genre: self.genre.clone(),
            country: self.country.clone(),
            mood: self.mood.unwrap_or_default(),
            is_new_director: self.is_new_director,
            rating: self.rating,
            review: self.review.clone(),
            rubric_ratings: self.rubric_ratings.clone(),
        }
    }

    /// Weighted score of this entry under `rubric`, falling back to the
    /// plain rating when none of the rubric's categories were rated
    pub fn score_with(&self, rubric: &Rubric) -> f64 {
        weighted_score(
            &rubric.categories,
            self.rubric_ratings.get(&rubric.id),
            self.rating,
        )
    }

    pub fn has_review(&self) -> bool {
        !self.review.trim().is_empty()
    }

    /// Ids of every rubric this entry carries ratings for
    pub fn rated_rubrics(&self) -> impl Iterator<Item = i64> + '_ {
        self.rubric_ratings
            .iter()
            .filter(|(_, ratings)| !ratings.is_empty())
            .map(|(id, _)| *id)
    }
}

impl std::fmt::Display for FilmLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rubric::RubricCategory;
    use crate::domain::CategoryRatings;

    fn rating(v: u8) -> Rating {
        Rating::new(v).unwrap()
    }

    #[test]
    fn test_draft_decade_is_derived() {
        let draft = FilmLogDraft::new("Fallen Angels", "Wong Kar-wai", 1995);
        assert_eq!(draft.decade().to_string(), "1990s");
    }

    #[test]
    fn test_into_entry_keeps_fields() {
        let mut draft = FilmLogDraft::new("Past Lives", "Celine Song", 2023);
        draft.country = "USA/Korea".to_string();
        draft.mood = Mood::Melancholy;
        draft.rating = Some(rating(9));

        let logged_at = Utc::now();
        let entry = draft.clone().into_entry(FilmLogId::from("1"), logged_at);

        assert_eq!(entry.id.as_str(), "1");
        assert_eq!(entry.title, "Past Lives");
        assert_eq!(entry.decade.to_string(), "2020s");
        assert_eq!(entry.mood, Some(Mood::Melancholy));
        assert_eq!(entry.logged_at, logged_at);
        assert_eq!(entry.to_draft(), draft);
    }

    #[test]
    fn test_score_with_rubric() {
        let rubric = Rubric {
            id: 1,
            name: "Cinephile Standard".to_string(),
            description: String::new(),
            categories: vec![
                RubricCategory::new(1, "Direction", 50),
                RubricCategory::new(2, "Screenplay", 50),
            ],
            is_default: true,
        };

        let mut entry = FilmLogDraft::new("Ikiru", "Akira Kurosawa", 1952)
            .into_entry(FilmLogId::from("5"), Utc::now());
        entry.rating = Some(rating(6));
        assert_eq!(entry.score_with(&rubric), 6.0);

        let ratings: CategoryRatings = [(1, rating(10)), (2, rating(9))].into_iter().collect();
        entry.rubric_ratings.insert(1, ratings);
        assert_eq!(entry.score_with(&rubric), 9.5);
        assert_eq!(entry.rated_rubrics().collect::<Vec<_>>(), vec![1]);
    }
}
