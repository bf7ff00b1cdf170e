// src/integrations/backend/wire.rs
//
// Wire mapping for the film log resource.
//
// The only place that knows the backend's JSON shapes. Outgoing drafts are
// written in the flat POST shape; incoming records are read tolerantly:
// nested `film` fields fall back to top-level ones, a value of the wrong
// type reads as absent, and a record that cannot be read at all is skipped
// with a warning instead of failing the whole fetch.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{
    CategoryRatings, Decade, FilmLogDraft, FilmLogEntry, FilmLogId, Genre, Mood, Rating,
    RubricRatings,
};

// ============================================================================
// OUTGOING
// ============================================================================

/// Body of `POST /api/filmlogs/` and `PUT /api/filmlogs/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmLogPayload {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub genre: String,
    pub country: String,
    pub decade: String,
    pub mood: Mood,
    pub is_new_director: bool,
    /// `null` when unrated
    pub rating: Option<Rating>,
    pub review: String,
    /// Integer ids become string keys in JSON
    pub rubric_ratings: RubricRatings,
}

impl From<&FilmLogDraft> for FilmLogPayload {
    fn from(draft: &FilmLogDraft) -> Self {
        Self {
            title: draft.title.trim().to_string(),
            director: draft.director.trim().to_string(),
            year: draft.year,
            genre: draft.genre.label().to_string(),
            country: draft.country.trim().to_string(),
            decade: draft.decade().to_string(),
            mood: draft.mood,
            is_new_director: draft.is_new_director,
            rating: draft.rating,
            review: draft.review.clone(),
            rubric_ratings: draft.rubric_ratings.clone(),
        }
    }
}

// ============================================================================
// INCOMING
// ============================================================================

/// Body of `GET /api/filmlogs/`.
/// Records stay raw until `into_entries` so one malformed record cannot sink
/// the rest of the collection.
#[derive(Debug, Default, Deserialize)]
pub struct FilmLogListResponse {
    #[serde(default)]
    pub film_logs: Vec<Value>,
}

/// Nested film description
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilmRecord {
    #[serde(deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub director: Option<String>,
    #[serde(deserialize_with = "loose_integer")]
    pub year: Option<i64>,
    #[serde(deserialize_with = "loose_string")]
    pub genre: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub country: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub decade: Option<String>,
}

/// One film log as the backend sends it.
/// Every field is optional and a value of the wrong type reads as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilmLogRecord {
    #[serde(deserialize_with = "loose_id")]
    pub id: Option<FilmLogId>,

    #[serde(deserialize_with = "loose_film")]
    pub film: Option<FilmRecord>,

    // Top-level copies of the film fields, used when `film` lacks them
    #[serde(deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub director: Option<String>,
    #[serde(deserialize_with = "loose_integer")]
    pub year: Option<i64>,
    #[serde(deserialize_with = "loose_string")]
    pub genre: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub country: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub decade: Option<String>,

    #[serde(deserialize_with = "loose_string")]
    pub mood: Option<String>,
    #[serde(deserialize_with = "loose_bool")]
    pub is_new_director: Option<bool>,
    #[serde(deserialize_with = "loose_integer")]
    pub rating: Option<i64>,
    #[serde(deserialize_with = "loose_string")]
    pub review: Option<String>,
    #[serde(deserialize_with = "loose_rubric_ratings")]
    pub rubric_ratings: Option<BTreeMap<String, BTreeMap<String, Option<i64>>>>,

    #[serde(deserialize_with = "loose_timestamp")]
    pub watched_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "loose_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response to a create or update; at least the id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedFilmLog {
    pub id: FilmLogId,
    #[serde(default, deserialize_with = "loose_timestamp")]
    pub watched_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "loose_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CreatedFilmLog {
    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        self.watched_at.or(self.created_at)
    }
}

impl FilmLogRecord {
    /// Map to the canonical entry. `now` stamps records without a timestamp.
    /// A record without an id cannot be addressed and maps to `None`.
    pub fn into_entry(self, now: DateTime<Utc>) -> Option<FilmLogEntry> {
        let Some(id) = self.id else {
            log::warn!("Skipping film log without an id");
            return None;
        };
        let film = self.film.unwrap_or_default();

        let title = film.title.or(self.title).unwrap_or_default();
        let director = film.director.or(self.director).unwrap_or_default();
        let country = film.country.or(self.country).unwrap_or_default();
        let genre = film
            .genre
            .or(self.genre)
            .map(Genre::from)
            .unwrap_or_else(|| Genre::Other(String::new()));

        let year = film
            .year
            .or(self.year)
            .and_then(|y| i32::try_from(y).ok())
            .unwrap_or(0);
        let decade = if year > 0 {
            Decade::from_year(year)
        } else {
            film.decade
                .or(self.decade)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_else(|| Decade::from_year(year))
        };

        let mood = self.mood.as_deref().and_then(|raw| match raw.parse::<Mood>() {
            Ok(mood) => Some(mood),
            Err(_) => {
                log::debug!("Film log {}: ignoring unknown mood '{}'", id, raw);
                None
            }
        });

        let rating = self.rating.and_then(|value| decode_rating(&id, "rating", value));
        let rubric_ratings = decode_rubric_ratings(&id, self.rubric_ratings.unwrap_or_default());

        Some(FilmLogEntry {
            logged_at: self.watched_at.or(self.created_at).unwrap_or(now),
            id,
            title,
            director,
            year,
            genre,
            country,
            decade,
            mood,
            is_new_director: self.is_new_director.unwrap_or(false),
            rating,
            review: self.review.unwrap_or_default(),
            rubric_ratings,
        })
    }
}

impl FilmLogListResponse {
    pub fn into_entries(self, now: DateTime<Utc>) -> Vec<FilmLogEntry> {
        self.film_logs
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<FilmLogRecord>(raw) {
                Ok(record) => record.into_entry(now),
                Err(e) => {
                    log::warn!("Skipping film log #{}: {}", index, e);
                    None
                }
            })
            .collect()
    }
}

// ============================================================================
// INTERNAL: Lenient Field Readers
// ============================================================================

fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn loose_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(integer_value))
}

fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| match value {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }))
}

fn loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FilmLogId>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(FilmLogId::new(s.trim())),
        Value::Number(n) => Some(FilmLogId::new(n.to_string())),
        _ => None,
    }))
}

fn loose_film<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FilmRecord>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .filter(Value::is_object)
        .and_then(|value| serde_json::from_value(value).ok()))
}

fn loose_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Value::as_str)
        .and_then(parse_timestamp))
}

fn loose_rubric_ratings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, BTreeMap<String, Option<i64>>>>, D::Error> {
    let Some(Value::Object(rubrics)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let ratings: BTreeMap<String, BTreeMap<String, Option<i64>>> = rubrics
        .into_iter()
        .filter_map(|(rubric_key, categories)| match categories {
            Value::Object(categories) => {
                let categories: BTreeMap<String, Option<i64>> = categories
                    .into_iter()
                    .map(|(category_key, value)| (category_key, integer_value(&value)))
                    .collect();
                Some((rubric_key, categories))
            }
            _ => None,
        })
        .collect();

    Ok(Some(ratings))
}

/// Whole numbers only: `8`, `8.0` and `"8"` read as 8, `7.5` does not
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// RFC 3339, or a naive `YYYY-MM-DD[ T]HH:MM:SS[.f]` / `YYYY-MM-DD` read as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// 0 meant "unrated" in older records
fn decode_rating(id: &FilmLogId, field: &str, value: i64) -> Option<Rating> {
    if value == 0 {
        return None;
    }
    let rating = Rating::from_wire(value);
    if rating.is_none() {
        log::warn!("Film log {}: dropping out-of-range {} {}", id, field, value);
    }
    rating
}

fn decode_rubric_ratings(
    id: &FilmLogId,
    raw: BTreeMap<String, BTreeMap<String, Option<i64>>>,
) -> RubricRatings {
    let mut ratings = RubricRatings::new();

    for (rubric_key, categories) in raw {
        let Ok(rubric_id) = rubric_key.trim().parse::<i64>() else {
            log::warn!("Film log {}: dropping ratings for rubric key '{}'", id, rubric_key);
            continue;
        };

        let mut decoded = CategoryRatings::new();
        for (category_key, value) in categories {
            let Ok(category_id) = category_key.trim().parse::<i64>() else {
                log::warn!("Film log {}: dropping category key '{}'", id, category_key);
                continue;
            };
            if let Some(rating) = value.and_then(|v| decode_rating(id, "category rating", v)) {
                decoded.insert(category_id, rating);
            }
        }

        if !decoded.is_empty() {
            ratings.insert(rubric_id, decoded);
        }
    }

    ratings
}
