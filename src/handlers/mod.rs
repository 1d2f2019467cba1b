// src/handlers/mod.rs

pub mod comments;
pub mod explore;
pub mod reports;
