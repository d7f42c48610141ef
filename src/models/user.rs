use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity record. Registration and token issuance live in an external
/// collaborator; this service reads users, denormalizes their display fields
/// into posts/comments, and deletes them on account removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Password hash. Never copied into responses or denormalized fields.
    #[serde(default)]
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
}
