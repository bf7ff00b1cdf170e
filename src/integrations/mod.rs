// src/integrations/mod.rs
//
// External Integrations Module
//
// The film log backend is the only remote system the diary talks to.

pub mod backend;

pub use backend::{CreatedFilmLog, FilmLogApi, HttpFilmLogApi};
