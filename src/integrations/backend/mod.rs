// src/integrations/backend/mod.rs

pub mod client;
pub mod wire;

pub use client::{FilmLogApi, HttpFilmLogApi};
pub use wire::{CreatedFilmLog, FilmLogListResponse, FilmLogPayload, FilmLogRecord};

#[cfg(test)]
pub use client::MockFilmLogApi;
