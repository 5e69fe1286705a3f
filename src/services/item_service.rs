use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::database::{DatabaseError, DatabaseManager};

/// Items hang off a parent resource
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub name: String,
    pub description: String,
}

/// Optional filters for item listing
#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    pub resource_id: Option<Uuid>,
    pub name: Option<String>,
}

/// Fields accepted when updating an item
#[derive(Debug, Default, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database manager error: {0}")]
    Pool(#[from] DatabaseError),
}

pub struct ItemService {
    pool: PgPool,
}

impl ItemService {
    pub fn new() -> Result<Self, ItemError> {
        Ok(Self {
            pool: DatabaseManager::pool()?,
        })
    }

    pub async fn create_item(
        &self,
        resource_id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<Item, ItemError> {
        let item = sqlx::query_as::<_, Item>(
            "INSERT INTO items (id, resource_id, name, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, resource_id, name, description",
        )
        .bind(Uuid::new_v4())
        .bind(resource_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn get_items(&self, query: &ItemQuery) -> Result<Vec<Item>, ItemError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, resource_id, name, description FROM items WHERE true",
        );

        if let Some(resource_id) = query.resource_id {
            builder.push(" AND resource_id = ").push_bind(resource_id);
        }
        if let Some(name) = &query.name {
            builder.push(" AND name = ").push_bind(name);
        }
        builder.push(" ORDER BY name");

        let items = builder
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<Item, ItemError> {
        sqlx::query_as::<_, Item>(
            "SELECT id, resource_id, name, description FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ItemError::NotFound(id))
    }

    pub async fn update_item(&self, id: Uuid, update: &ItemUpdate) -> Result<Item, ItemError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE items SET id = id");

        if let Some(name) = &update.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(description) = &update.description {
            builder.push(", description = ").push_bind(description);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING id, resource_id, name, description");

        builder
            .build_query_as::<Item>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), ItemError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ItemError::NotFound(id));
        }
        Ok(())
    }
}
