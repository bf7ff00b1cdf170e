// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod diary_service;
pub mod list_service;
pub mod rubric_service;
pub mod statistics_service;


// Re-export all services and their types
pub use diary_service::{DiaryService, DiaryState};

pub use list_service::ListService;

pub use rubric_service::RubricService;

pub use statistics_service::StatisticsService;
