use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::store::manager::StoreError;

/// Typed handle on one document collection.
///
/// Filters are JSONB containment queries: `find_one(json!({"user": id}))`
/// matches every document whose `user` field equals `id`.
pub struct Collection<T> {
    name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + Unpin,
{
    pub fn new(name: &'static str, pool: PgPool) -> Self {
        Self { name, pool, _phantom: std::marker::PhantomData }
    }

    /// Insert a new document under the given identifier
    pub async fn insert(&self, id: Uuid, value: &T) -> Result<(), StoreError> {
        let doc = serde_json::to_value(value)?;
        let sql = format!("INSERT INTO \"{}\" (id, doc) VALUES ($1, $2)", self.name);
        sqlx::query(&sql).bind(id).bind(doc).execute(&self.pool).await?;
        Ok(())
    }

    /// Replace the document stored under the given identifier
    pub async fn update(&self, id: Uuid, value: &T) -> Result<(), StoreError> {
        let doc = serde_json::to_value(value)?;
        let sql = format!("UPDATE \"{}\" SET doc = $2 WHERE id = $1", self.name);
        let result = sqlx::query(&sql).bind(id).bind(doc).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("{} {} not found", self.name, id)));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT doc FROM \"{}\" WHERE id = $1", self.name);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(Self::decode_row).transpose()
    }

    /// Find the first document whose fields contain the filter
    pub async fn find_one(&self, filter: Value) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT doc FROM \"{}\" WHERE doc @> $1 LIMIT 1", self.name);
        let row = sqlx::query(&sql).bind(filter).fetch_optional(&self.pool).await?;
        row.map(Self::decode_row).transpose()
    }

    /// Find all matching documents, newest first
    pub async fn find_many(&self, filter: Value) -> Result<Vec<T>, StoreError> {
        let sql = format!(
            "SELECT doc FROM \"{}\" WHERE doc @> $1 ORDER BY created_at DESC",
            self.name
        );
        let rows = sqlx::query(&sql).bind(filter).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::decode_row).collect()
    }

    /// Find every document in the collection, newest first
    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!("SELECT doc FROM \"{}\" ORDER BY created_at DESC", self.name);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::decode_row).collect()
    }

    /// Delete by identifier; returns whether a document was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every matching document; returns the number removed
    pub async fn delete_many(&self, filter: Value) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE doc @> $1", self.name);
        let result = sqlx::query(&sql).bind(filter).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    fn decode_row(row: sqlx::postgres::PgRow) -> Result<T, StoreError> {
        let doc: Value = row.try_get("doc")?;
        Ok(serde_json::from_value(doc)?)
    }
}
