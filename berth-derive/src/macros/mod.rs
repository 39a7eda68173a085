//! Macro implementations

pub mod from_row;
pub mod model;

pub use from_row::derive_from_row;
pub use model::derive_model;
