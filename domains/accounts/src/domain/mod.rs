//! Accounts domain layer: entities and normalization rules

pub mod entities;
