// src/domain/scoring.rs
//
// Rubric-weighted scoring.

use super::film_log::{CategoryRatings, Rating};
use super::rubric::RubricCategory;

/// Weighted 0-10 score of a set of category ratings.
///
/// Only rated categories take part, and the sum is normalised by the
/// weight actually used, so a half-finished rubric still lands on the
/// 0-10 scale. With nothing rated the plain `fallback` rating is returned,
/// or 0 when there is none. Ratings for ids outside `categories` are
/// ignored. Weights are not validated here.
pub fn weighted_score(
    categories: &[RubricCategory],
    ratings: Option<&CategoryRatings>,
    fallback: Option<Rating>,
) -> f64 {
    let mut weighted_sum = 0u64;
    let mut total_weight = 0u64;

    if let Some(ratings) = ratings {
        for category in categories {
            if let Some(rating) = ratings.get(&category.id) {
                weighted_sum += u64::from(rating.value()) * u64::from(category.weight);
                total_weight += u64::from(category.weight);
            }
        }
    }

    if total_weight == 0 {
        return fallback.map(|r| f64::from(r.value())).unwrap_or(0.0);
    }

    round_to_tenth(weighted_sum as f64 / total_weight as f64)
}

/// Round half up to one decimal place (inputs are never negative)
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(v: u8) -> Rating {
        Rating::new(v).unwrap()
    }

    fn categories(weights: &[(i64, u32)]) -> Vec<RubricCategory> {
        weights
            .iter()
            .map(|(id, weight)| RubricCategory::new(*id, format!("Category {}", id), *weight))
            .collect()
    }

    fn ratings(values: &[(i64, u8)]) -> CategoryRatings {
        values.iter().map(|(id, v)| (*id, rating(*v))).collect()
    }

    #[test]
    fn test_full_rubric_is_weighted_mean() {
        let cats = categories(&[(1, 20), (2, 30), (3, 50)]);
        let rated = ratings(&[(1, 8), (2, 6), (3, 10)]);
        assert_eq!(weighted_score(&cats, Some(&rated), None), 8.4);
    }

    #[test]
    fn test_nothing_rated_falls_back_to_plain_rating() {
        let cats = categories(&[(1, 50), (2, 50)]);
        assert_eq!(weighted_score(&cats, None, Some(rating(7))), 7.0);
        assert_eq!(
            weighted_score(&cats, Some(&CategoryRatings::new()), Some(rating(7))),
            7.0
        );
    }

    #[test]
    fn test_nothing_rated_and_no_rating_is_zero() {
        let cats = categories(&[(1, 50), (2, 50)]);
        assert_eq!(weighted_score(&cats, None, None), 0.0);
    }

    #[test]
    fn test_partial_completion_normalises_by_used_weight() {
        let cats = categories(&[(1, 20), (2, 80)]);
        let rated = ratings(&[(1, 10)]);
        assert_eq!(weighted_score(&cats, Some(&rated), None), 10.0);
    }

    #[test]
    fn test_rubric_ratings_win_over_plain_rating() {
        let cats = categories(&[(1, 50), (2, 50)]);
        let rated = ratings(&[(1, 4), (2, 6)]);
        assert_eq!(weighted_score(&cats, Some(&rated), Some(rating(10))), 5.0);
    }

    #[test]
    fn test_unknown_category_ids_are_ignored() {
        let cats = categories(&[(1, 50), (2, 50)]);
        let rated = ratings(&[(1, 8), (99, 1)]);
        assert_eq!(weighted_score(&cats, Some(&rated), None), 8.0);
    }

    #[test]
    fn test_weights_need_not_sum_to_100() {
        // (9*20 + 10*20 + 8*15) / 55 = 9.09...
        let cats = categories(&[(1, 20), (2, 20), (3, 15)]);
        let rated = ratings(&[(1, 9), (2, 10), (3, 8)]);
        assert_eq!(weighted_score(&cats, Some(&rated), None), 9.1);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_to_tenth(8.25), 8.3);
        assert_eq!(round_to_tenth(7.04), 7.0);
        assert_eq!(round_to_tenth(6.75), 6.8);
    }
}
