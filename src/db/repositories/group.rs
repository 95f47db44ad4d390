use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::entities::{group_members, prelude::*, resources, study_groups, study_sessions};

pub struct GroupRepository {
    conn: DatabaseConnection,
}

impl GroupRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, name: &str, description: Option<&str>) -> Result<study_groups::Model> {
        let model = study_groups::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.map(str::to_string)),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let created = model
            .insert(&self.conn)
            .await
            .context("Failed to insert study group")?;

        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<Option<study_groups::Model>> {
        StudyGroups::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query study group")
    }

    pub async fn list(&self) -> Result<Vec<study_groups::Model>> {
        StudyGroups::find()
            .all(&self.conn)
            .await
            .context("Failed to list study groups")
    }

    /// Apply only the fields the caller provided; absent fields stay as-is.
    /// The nested description option distinguishes "leave unchanged" (outer
    /// `None`) from "clear" (`Some(None)`).
    pub async fn update(
        &self,
        id: i32,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<Option<study_groups::Model>> {
        let Some(group) = StudyGroups::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query study group for update")?
        else {
            return Ok(None);
        };

        if name.is_none() && description.is_none() {
            return Ok(Some(group));
        }

        let mut active: study_groups::ActiveModel = group.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update study group")?;

        Ok(Some(updated))
    }

    /// Delete a group and everything that references it in one
    /// transaction: members, sessions, and resources go first, then the
    /// group row. Returns false when the group does not exist.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let Some(group) = StudyGroups::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query study group for deletion")?
        else {
            return Ok(false);
        };

        self.conn
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    GroupMembers::delete_many()
                        .filter(group_members::Column::GroupId.eq(id))
                        .exec(txn)
                        .await?;
                    StudySessions::delete_many()
                        .filter(study_sessions::Column::GroupId.eq(id))
                        .exec(txn)
                        .await?;
                    Resources::delete_many()
                        .filter(resources::Column::GroupId.eq(id))
                        .exec(txn)
                        .await?;
                    group.delete(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("Failed to delete study group")?;

        Ok(true)
    }
}
