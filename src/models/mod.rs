// src/models/mod.rs

pub mod challenge;
pub mod comment;
pub mod report;
pub mod user;
