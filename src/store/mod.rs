//! Schema-flexible document store over PostgreSQL JSONB.
//!
//! Each collection is a table of `(id uuid, doc jsonb, created_at)`; documents
//! are addressed by generated identifiers and filtered by JSONB containment.

pub mod collection;
pub mod manager;

use crate::models::{Post, Profile, User};
use collection::Collection;
use manager::{StoreError, StoreManager};

pub async fn users() -> Result<Collection<User>, StoreError> {
    Ok(Collection::new("users", StoreManager::pool().await?))
}

pub async fn profiles() -> Result<Collection<Profile>, StoreError> {
    Ok(Collection::new("profiles", StoreManager::pool().await?))
}

pub async fn posts() -> Result<Collection<Post>, StoreError> {
    Ok(Collection::new("posts", StoreManager::pool().await?))
}
