// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Wires infrastructure, repositories and services into one state
// - Turns internal errors into user-facing notices

pub mod error_handling;
pub mod state;

pub use error_handling::{ErrorResponse, ErrorType};
pub use state::AppState;
