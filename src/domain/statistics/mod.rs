pub mod calculator;
pub mod entity;

pub use calculator::{compute_statistics, compute_yearly_progress, TOP_GENRE_LIMIT};
pub use entity::{DiaryStatistics, GenreCount, RubricAverage, YearlyProgress};
