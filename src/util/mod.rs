//! Pure helpers shared by the command layer: list filters and form validation.

pub mod filter;
pub mod validate;
