use serde::{Deserialize, Serialize};

pub type RubricId = i64;
pub type CategoryId = i64;

/// Weight total a balanced rubric adds up to
pub const BALANCED_TOTAL_WEIGHT: u32 = 100;

/// A named, reusable set of weighted rating categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    pub id: RubricId,
    pub name: String,
    pub description: String,

    /// Ordered as the user arranged them
    pub categories: Vec<RubricCategory>,

    /// At most one rubric is the default; the repository keeps it that way
    pub is_default: bool,
}

/// One weighted criterion within a rubric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCategory {
    pub id: CategoryId,
    pub name: String,

    /// Integer percent
    pub weight: u32,
}

impl RubricCategory {
    pub fn new(id: CategoryId, name: impl Into<String>, weight: u32) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
        }
    }
}

/// Advisory notice shown when category weights do not add up to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightWarning {
    pub total_weight: u32,
    pub expected: u32,
}

impl std::fmt::Display for WeightWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total weight: {}% (should equal {}%)",
            self.total_weight, self.expected
        )
    }
}

impl Rubric {
    pub fn total_weight(&self) -> u32 {
        self.categories.iter().map(|c| c.weight).sum()
    }

    pub fn weight_warning(&self) -> Option<WeightWarning> {
        weight_warning_for(self.total_weight())
    }

    pub fn category(&self, id: CategoryId) -> Option<&RubricCategory> {
        self.categories.iter().find(|c| c.id == id)
    }
}

impl std::fmt::Display for Rubric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for creating or replacing a rubric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricDraft {
    pub name: String,
    pub description: String,
    pub categories: Vec<CategoryDraft>,
    pub is_default: bool,
}

/// A category inside a rubric draft.
///
/// `id` is set when editing an existing category so ratings that point at
/// it stay attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub id: Option<CategoryId>,
    pub name: String,
    pub weight: u32,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            weight,
        }
    }
}

impl RubricDraft {
    pub fn new(name: impl Into<String>, categories: Vec<CategoryDraft>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            categories,
            is_default: false,
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.categories.iter().map(|c| c.weight).sum()
    }

    pub fn weight_warning(&self) -> Option<WeightWarning> {
        weight_warning_for(self.total_weight())
    }
}

impl From<&Rubric> for RubricDraft {
    fn from(rubric: &Rubric) -> Self {
        Self {
            name: rubric.name.clone(),
            description: rubric.description.clone(),
            categories: rubric
                .categories
                .iter()
                .map(|c| CategoryDraft {
                    id: Some(c.id),
                    name: c.name.clone(),
                    weight: c.weight,
                })
                .collect(),
            is_default: rubric.is_default,
        }
    }
}

fn weight_warning_for(total_weight: u32) -> Option<WeightWarning> {
    if total_weight == BALANCED_TOTAL_WEIGHT {
        return None;
    }
    Some(WeightWarning {
        total_weight,
        expected: BALANCED_TOTAL_WEIGHT,
    })
}
