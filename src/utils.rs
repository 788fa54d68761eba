//! Shared formatting helpers

pub mod currency;
pub mod uri;
