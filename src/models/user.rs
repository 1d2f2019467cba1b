// src/models/user.rs

use serde::{Deserialize, Serialize};

/// Role string carried in tokens for moderators.
pub const ADMIN_ROLE: &str = "admin";

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,

    /// User role: 'user' or 'admin'.
    pub role: String,
}
