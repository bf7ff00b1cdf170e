use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Utc};

use super::entity::{DiaryStatistics, GenreCount, RubricAverage, YearlyProgress};
use crate::domain::film_log::FilmLogEntry;
use crate::domain::rubric::Rubric;
use crate::domain::scoring::round_to_tenth;

pub const TOP_GENRE_LIMIT: usize = 5;

/// Builds the statistics for a snapshot of the diary.
///
/// Text fields are compared trimmed and case-insensitively, so "France" and
/// "france " count as one country. Blank values are not counted as distinct.
pub fn compute_statistics(
    entries: &[FilmLogEntry],
    rubrics: &[Rubric],
    now: DateTime<Utc>,
) -> DiaryStatistics {
    let films_this_year = entries
        .iter()
        .filter(|e| e.logged_at.year() == now.year())
        .count();

    let (rated_films, average_rating) = rating_summary(entries.iter());

    DiaryStatistics {
        total_films: entries.len() as u32,
        films_this_year: films_this_year as u32,
        distinct_genres: distinct(entries.iter().map(|e| e.genre.label())),
        distinct_decades: distinct_decades(entries.iter()),
        distinct_countries: distinct(entries.iter().flat_map(|e| countries(&e.country))),
        distinct_directors: distinct(entries.iter().map(|e| e.director.as_str())),
        new_directors: entries.iter().filter(|e| e.is_new_director).count() as u32,
        rated_films,
        average_rating,
        top_genres: top_genres(entries),
        rubric_averages: rubric_averages(entries, rubrics),
        generated_at: now,
    }
}

/// Progress for one calendar year of `logged_at`, with a per-month count.
pub fn compute_yearly_progress(entries: &[FilmLogEntry], year: i32) -> YearlyProgress {
    let year_entries: Vec<&FilmLogEntry> = entries
        .iter()
        .filter(|e| e.logged_at.year() == year)
        .collect();

    let mut monthly = [0u32; 12];
    for entry in &year_entries {
        monthly[entry.logged_at.month0() as usize] += 1;
    }

    let (_, average_rating) = rating_summary(year_entries.iter().copied());

    YearlyProgress {
        year,
        total_films: year_entries.len() as u32,
        average_rating,
        distinct_genres: distinct(year_entries.iter().copied().map(|e| e.genre.label())),
        distinct_decades: distinct_decades(year_entries.iter().copied()),
        distinct_countries: distinct(
            year_entries
                .iter()
                .copied()
                .flat_map(|e| countries(&e.country)),
        ),
        distinct_directors: distinct(year_entries.iter().copied().map(|e| e.director.as_str())),
        monthly,
    }
}

/// Co-productions are logged as "USA/South Korea"
fn countries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('/')
}

fn distinct_decades<'a>(entries: impl Iterator<Item = &'a FilmLogEntry>) -> u32 {
    entries.map(|e| e.decade).collect::<HashSet<_>>().len() as u32
}

/// Number of rated entries and their mean rating, 0 when none are rated
fn rating_summary<'a>(entries: impl Iterator<Item = &'a FilmLogEntry>) -> (u32, f64) {
    let ratings: Vec<u32> = entries
        .filter_map(|e| e.rating.map(|r| u32::from(r.value())))
        .collect();
    if ratings.is_empty() {
        return (0, 0.0);
    }
    let mean = f64::from(ratings.iter().sum::<u32>()) / ratings.len() as f64;
    (ratings.len() as u32, round_to_tenth(mean))
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> u32 {
    values.filter_map(normalize).collect::<HashSet<_>>().len() as u32
}

/// Most frequent first; ties broken alphabetically
fn top_genres(entries: &[FilmLogEntry]) -> Vec<GenreCount> {
    let mut counts: BTreeMap<String, (String, u32)> = BTreeMap::new();
    for entry in entries {
        let label = entry.genre.label();
        if let Some(key) = normalize(label) {
            counts
                .entry(key)
                .or_insert_with(|| (label.trim().to_string(), 0))
                .1 += 1;
        }
    }

    let mut ranked: Vec<GenreCount> = counts
        .into_values()
        .map(|(genre, count)| GenreCount { genre, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
    ranked.truncate(TOP_GENRE_LIMIT);
    ranked
}

fn rubric_averages(entries: &[FilmLogEntry], rubrics: &[Rubric]) -> Vec<RubricAverage> {
    rubrics
        .iter()
        .filter_map(|rubric| {
            let scores: Vec<f64> = entries
                .iter()
                .filter(|e| e.rated_rubrics().any(|id| id == rubric.id))
                .map(|e| e.score_with(rubric))
                .collect();

            if scores.is_empty() {
                return None;
            }

            Some(RubricAverage {
                rubric_id: rubric.id,
                rubric_name: rubric.name.clone(),
                films_scored: scores.len() as u32,
                average_score: round_to_tenth(scores.iter().sum::<f64>() / scores.len() as f64),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryRatings, FilmLogDraft, FilmLogId, Genre, Rating, RubricCategory};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn entry(id: &str, genre: Genre, year: i32, rating: Option<u8>, logged_year: i32) -> FilmLogEntry {
        let mut draft = FilmLogDraft::new(format!("Film {}", id), format!("Director {}", id), year);
        draft.genre = genre;
        draft.country = "France".to_string();
        draft.rating = rating.map(|v| Rating::new(v).unwrap());
        draft.into_entry(
            FilmLogId::from(id),
            Utc.with_ymd_and_hms(logged_year, 3, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_diary() {
        let stats = compute_statistics(&[], &[], now());
        assert_eq!(stats.total_films, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert!(stats.top_genres.is_empty());
        assert!(stats.rubric_averages.is_empty());
        assert_eq!(stats.generated_at, now());
    }

    #[test]
    fn test_counts_and_average() {
        let mut first = entry("1", Genre::Drama, 1994, Some(9), 2024);
        first.is_new_director = true;
        let mut second = entry("2", Genre::Horror, 1998, Some(6), 2023);
        second.country = " france".to_string();
        let third = entry("3", Genre::Drama, 2021, None, 2024);

        let stats = compute_statistics(&[first, second, third], &[], now());

        assert_eq!(stats.total_films, 3);
        assert_eq!(stats.films_this_year, 2);
        assert_eq!(stats.distinct_genres, 2);
        assert_eq!(stats.distinct_decades, 2);
        assert_eq!(stats.distinct_countries, 1);
        assert_eq!(stats.distinct_directors, 3);
        assert_eq!(stats.new_directors, 1);
        assert_eq!(stats.rated_films, 2);
        assert_eq!(stats.average_rating, 7.5);
    }

    #[test]
    fn test_top_genres_ranked_with_ties() {
        let genres = [
            Genre::Comedy,
            Genre::Drama,
            Genre::Drama,
            Genre::Animation,
            Genre::Horror,
            Genre::Romance,
            Genre::Thriller,
            Genre::Comedy,
        ];
        let entries: Vec<_> = genres
            .into_iter()
            .enumerate()
            .map(|(i, g)| entry(&i.to_string(), g, 2000, None, 2024))
            .collect();

        let top = compute_statistics(&entries, &[], now()).top_genres;
        let names: Vec<&str> = top.iter().map(|g| g.genre.as_str()).collect();

        assert_eq!(names, vec!["Comedy", "Drama", "Animation", "Horror", "Romance"]);
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_rubric_averages_skip_unused_rubrics() {
        let used = Rubric {
            id: 1,
            name: "Standard".to_string(),
            description: String::new(),
            categories: vec![RubricCategory::new(10, "Story", 50), RubricCategory::new(11, "Look", 50)],
            is_default: true,
        };
        let unused = Rubric { id: 2, name: "Unused".to_string(), ..used.clone() };

        let mut a = entry("a", Genre::Drama, 2010, None, 2024);
        let mut ratings = CategoryRatings::new();
        ratings.insert(10, Rating::new(8).unwrap());
        ratings.insert(11, Rating::new(6).unwrap());
        a.rubric_ratings.insert(1, ratings);

        let mut b = entry("b", Genre::Drama, 2010, None, 2024);
        let mut ratings = CategoryRatings::new();
        ratings.insert(10, Rating::new(9).unwrap());
        b.rubric_ratings.insert(1, ratings);

        let c = entry("c", Genre::Drama, 2010, Some(3), 2024);

        let averages = compute_statistics(&[a, b, c], &[used, unused], now()).rubric_averages;

        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].rubric_name, "Standard");
        assert_eq!(averages[0].films_scored, 2);
        // (7.0 + 9.0) / 2
        assert_eq!(averages[0].average_score, 8.0);
    }

    #[test]
    fn test_co_production_counts_each_country() {
        let mut first = entry("1", Genre::Drama, 2019, None, 2024);
        first.country = "USA/South Korea".to_string();
        let mut second = entry("2", Genre::Drama, 2019, None, 2024);
        second.country = "south korea".to_string();
        let third = entry("3", Genre::Drama, 2019, None, 2024);

        let stats = compute_statistics(&[first, second, third], &[], now());
        assert_eq!(stats.distinct_countries, 3);
    }

    #[test]
    fn test_yearly_progress_filters_by_logged_year() {
        let mut jan = entry("1", Genre::Drama, 1994, Some(9), 2024);
        jan.logged_at = Utc.with_ymd_and_hms(2024, 1, 5, 20, 0, 0).unwrap();
        jan.country = "France/Italy".to_string();
        let mut march = entry("2", Genre::Horror, 1978, Some(6), 2024);
        march.director = "Director 1".to_string();
        let mut unrated = entry("3", Genre::Horror, 1975, None, 2024);
        unrated.logged_at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        let last_year = entry("4", Genre::Comedy, 2022, Some(2), 2023);

        let progress = compute_yearly_progress(&[jan, march, unrated, last_year], 2024);

        assert_eq!(progress.year, 2024);
        assert_eq!(progress.total_films, 3);
        assert_eq!(progress.average_rating, 7.5);
        assert_eq!(progress.distinct_genres, 2);
        assert_eq!(progress.distinct_decades, 2);
        assert_eq!(progress.distinct_countries, 2);
        assert_eq!(progress.distinct_directors, 2);
        assert_eq!(progress.monthly, [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_yearly_progress_for_empty_year() {
        let entries = [entry("1", Genre::Drama, 2000, Some(8), 2023)];
        let progress = compute_yearly_progress(&entries, 2024);

        assert_eq!(progress.total_films, 0);
        assert_eq!(progress.average_rating, 0.0);
        assert_eq!(progress.monthly, [0; 12]);
    }
}
