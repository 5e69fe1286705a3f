use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::database::{DatabaseError, DatabaseManager};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub value: i32,
}

/// Optional filters for resource listing
#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub title: Option<String>,
    pub value: Option<i32>,
}

/// Fields accepted when updating a resource
#[derive(Debug, Default, Deserialize)]
pub struct ResourceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub value: Option<i32>,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database manager error: {0}")]
    Pool(#[from] DatabaseError),
}

pub struct ResourceService {
    pool: PgPool,
}

impl ResourceService {
    pub fn new() -> Result<Self, ResourceError> {
        Ok(Self {
            pool: DatabaseManager::pool()?,
        })
    }

    pub async fn create_resource(
        &self,
        title: &str,
        description: &str,
        value: i32,
    ) -> Result<Resource, ResourceError> {
        let resource = sqlx::query_as::<_, Resource>(
            "INSERT INTO resources (id, title, description, value) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, description, value",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(resource)
    }

    pub async fn get_resources(&self, query: &ResourceQuery) -> Result<Vec<Resource>, ResourceError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, title, description, value FROM resources WHERE true",
        );

        if let Some(title) = &query.title {
            builder.push(" AND title = ").push_bind(title);
        }
        if let Some(value) = query.value {
            builder.push(" AND value = ").push_bind(value);
        }
        builder.push(" ORDER BY title");

        let resources = builder
            .build_query_as::<Resource>()
            .fetch_all(&self.pool)
            .await?;

        Ok(resources)
    }

    pub async fn get_resource(&self, id: Uuid) -> Result<Resource, ResourceError> {
        sqlx::query_as::<_, Resource>(
            "SELECT id, title, description, value FROM resources WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ResourceError::NotFound(id))
    }

    pub async fn update_resource(
        &self,
        id: Uuid,
        update: &ResourceUpdate,
    ) -> Result<Resource, ResourceError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE resources SET id = id");

        if let Some(title) = &update.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = &update.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(value) = update.value {
            builder.push(", value = ").push_bind(value);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING id, title, description, value");

        builder
            .build_query_as::<Resource>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ResourceError::NotFound(id))
    }

    pub async fn delete_resource(&self, id: Uuid) -> Result<(), ResourceError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ResourceError::NotFound(id));
        }
        Ok(())
    }
}
