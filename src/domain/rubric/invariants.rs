use std::collections::HashSet;

use super::entity::RubricDraft;
use crate::domain::{DomainError, DomainResult};

pub const MIN_CATEGORIES: usize = 2;
pub const MIN_CATEGORY_WEIGHT: u32 = 5;
pub const MAX_CATEGORY_WEIGHT: u32 = 50;

/// Validates a rubric before it is stored.
///
/// The weight total is advisory only, see `RubricDraft::weight_warning`.
pub fn validate_rubric_draft(draft: &RubricDraft) -> DomainResult<()> {
    validate_name(&draft.name)?;
    validate_category_count(draft)?;
    validate_categories(draft)?;
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::MissingField("name"));
    }
    Ok(())
}

fn validate_category_count(draft: &RubricDraft) -> DomainResult<()> {
    if draft.categories.len() < MIN_CATEGORIES {
        return Err(DomainError::InvariantViolation(format!(
            "A rubric needs at least {} categories, got {}",
            MIN_CATEGORIES,
            draft.categories.len()
        )));
    }
    Ok(())
}

/// Names are non-empty and unique ignoring case; weights stay in bounds
fn validate_categories(draft: &RubricDraft) -> DomainResult<()> {
    let mut seen = HashSet::new();

    for category in &draft.categories {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(DomainError::MissingField("category name"));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(DomainError::InvariantViolation(format!(
                "Duplicate category: {}",
                name
            )));
        }
        if !(MIN_CATEGORY_WEIGHT..=MAX_CATEGORY_WEIGHT).contains(&category.weight) {
            return Err(DomainError::OutOfRange {
                field: "category weight",
                value: i64::from(category.weight),
                min: i64::from(MIN_CATEGORY_WEIGHT),
                max: i64::from(MAX_CATEGORY_WEIGHT),
            });
        }
    }
    Ok(())
}
