pub mod entity;
pub mod invariants;

pub use entity::FilmList;
pub use invariants::validate_list;
