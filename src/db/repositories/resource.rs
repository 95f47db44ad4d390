use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::{prelude::*, resources};

pub struct ResourceRepository {
    conn: DatabaseConnection,
}

impl ResourceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, group_id: i32, title: &str, url: &str) -> Result<resources::Model> {
        let model = resources::ActiveModel {
            group_id: Set(group_id),
            title: Set(title.to_string()),
            url: Set(url.to_string()),
            ..Default::default()
        };

        let created = model
            .insert(&self.conn)
            .await
            .context("Failed to insert resource")?;

        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<Option<resources::Model>> {
        Resources::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query resource")
    }

    pub async fn list(&self) -> Result<Vec<resources::Model>> {
        Resources::find()
            .all(&self.conn)
            .await
            .context("Failed to list resources")
    }

    /// Apply only the fields the caller provided; absent fields stay as-is.
    pub async fn update(
        &self,
        id: i32,
        title: Option<String>,
        url: Option<String>,
    ) -> Result<Option<resources::Model>> {
        let Some(resource) = Resources::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query resource for update")?
        else {
            return Ok(None);
        };

        if title.is_none() && url.is_none() {
            return Ok(Some(resource));
        }

        let mut active: resources::ActiveModel = resource.into();
        if let Some(title) = title {
            active.title = Set(title);
        }
        if let Some(url) = url {
            active.url = Set(url);
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update resource")?;

        Ok(Some(updated))
    }
}
