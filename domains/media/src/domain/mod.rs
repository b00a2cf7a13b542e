//! Media domain layer: entities

pub mod entities;
