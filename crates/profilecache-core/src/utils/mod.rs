//! Display formatting helpers shared by front-ends.

pub mod format;

pub use format::{format_birth_date, format_coordinates, format_phone, truncate_string};
