// src/domain/film_log/value_objects.rs
//
// Small typed values carried by a film log entry.
// Each one is checked once at construction so the rest of the code can
// trust it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::rubric::{CategoryId, RubricId};
use crate::domain::{DomainError, DomainResult};

// ============================================================================
// RATING
// ============================================================================

/// A 1-10 rating. Zero is not representable; an unrated value is `None`
/// or an absent map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> DomainResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::OutOfRange {
                field: "rating",
                value: i64::from(value),
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
            });
        }
        Ok(Self(value))
    }

    /// Lenient conversion for numbers coming off the wire
    pub fn from_wire(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(|v| Self::new(v).ok())
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// category id -> rating, for one rubric
pub type CategoryRatings = BTreeMap<CategoryId, Rating>;

/// rubric id -> per-category ratings
pub type RubricRatings = BTreeMap<RubricId, CategoryRatings>;

// ============================================================================
// GENRE
// ============================================================================

/// Film genre.
///
/// Drafts may only use the known variants. `Other` keeps whatever the
/// backend stored so fetched entries are never rejected over a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Genre {
    Drama,
    Comedy,
    Horror,
    Thriller,
    Documentary,
    Animation,
    SciFi,
    Romance,
    Other(String),
}

impl Genre {
    pub const KNOWN: [Genre; 8] = [
        Genre::Drama,
        Genre::Comedy,
        Genre::Horror,
        Genre::Thriller,
        Genre::Documentary,
        Genre::Animation,
        Genre::SciFi,
        Genre::Romance,
    ];

    pub fn is_known(&self) -> bool {
        !matches!(self, Genre::Other(_))
    }

    pub fn label(&self) -> &str {
        match self {
            Genre::Drama => "Drama",
            Genre::Comedy => "Comedy",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::Documentary => "Documentary",
            Genre::Animation => "Animation",
            Genre::SciFi => "Sci-Fi",
            Genre::Romance => "Romance",
            Genre::Other(raw) => raw,
        }
    }
}

impl Default for Genre {
    fn default() -> Self {
        Genre::Drama
    }
}

impl From<String> for Genre {
    fn from(raw: String) -> Self {
        Genre::KNOWN
            .iter()
            .find(|g| g.label().eq_ignore_ascii_case(raw.trim()))
            .cloned()
            .unwrap_or(Genre::Other(raw))
    }
}

impl From<&str> for Genre {
    fn from(raw: &str) -> Self {
        Genre::from(raw.to_string())
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.label().to_string()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// MOOD
// ============================================================================

/// How the film left the viewer feeling. Purely descriptive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Warm,
    Melancholy,
    Joyful,
    Reflective,
    Dreamy,
    Profound,
    Tense,
    Hopeful,
    Thrilled,
    Unsettled,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Warm => "warm",
            Mood::Melancholy => "melancholy",
            Mood::Joyful => "joyful",
            Mood::Reflective => "reflective",
            Mood::Dreamy => "dreamy",
            Mood::Profound => "profound",
            Mood::Tense => "tense",
            Mood::Hopeful => "hopeful",
            Mood::Thrilled => "thrilled",
            Mood::Unsettled => "unsettled",
        }
    }
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Warm
    }
}

impl FromStr for Mood {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warm" => Ok(Mood::Warm),
            "melancholy" => Ok(Mood::Melancholy),
            "joyful" => Ok(Mood::Joyful),
            "reflective" => Ok(Mood::Reflective),
            "dreamy" => Ok(Mood::Dreamy),
            "profound" => Ok(Mood::Profound),
            "tense" => Ok(Mood::Tense),
            "hopeful" => Ok(Mood::Hopeful),
            "thrilled" => Ok(Mood::Thrilled),
            "unsettled" => Ok(Mood::Unsettled),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown mood: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DECADE
// ============================================================================

/// Decade label derived from a release year ("1990s").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decade(i32);

impl Decade {
    pub fn from_year(year: i32) -> Self {
        Self(year - year.rem_euclid(10))
    }

    pub fn start_year(self) -> i32 {
        self.0
    }
}

impl FromStr for Decade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_suffix('s').unwrap_or(s.trim());
        let start: i32 = digits.parse().map_err(|_| {
            DomainError::InvariantViolation(format!("Invalid decade label: {}", s))
        })?;
        if start.rem_euclid(10) != 0 {
            return Err(DomainError::InvariantViolation(format!(
                "Decade must start on a multiple of ten: {}",
                s
            )));
        }
        Ok(Self(start))
    }
}

impl TryFrom<String> for Decade {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Decade> for String {
    fn from(decade: Decade) -> Self {
        decade.to_string()
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

// ============================================================================
// FILM LOG ID
// ============================================================================

/// Identifier assigned by the backend.
///
/// The backend has used both integer and UUID keys, so both JSON numbers
/// and strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FilmLogId(String);

impl FilmLogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilmLogId {
    Text(String),
    Number(i64),
}

impl<'de> Deserialize<'de> for FilmLogId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawFilmLogId::deserialize(deserializer)? {
            RawFilmLogId::Text(s) => FilmLogId(s),
            RawFilmLogId::Number(n) => FilmLogId(n.to_string()),
        })
    }
}

impl From<&str> for FilmLogId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for FilmLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
