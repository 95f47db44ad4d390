use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};

use crate::entities::{prelude::*, study_sessions};

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Schedule a session; when no time is given the session is scheduled
    /// for the moment of creation.
    pub async fn add(
        &self,
        group_id: i32,
        scheduled_time: Option<String>,
    ) -> Result<study_sessions::Model> {
        let scheduled_time = scheduled_time.unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let model = study_sessions::ActiveModel {
            group_id: Set(group_id),
            scheduled_time: Set(scheduled_time),
            ..Default::default()
        };

        let created = model
            .insert(&self.conn)
            .await
            .context("Failed to insert study session")?;

        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<Option<study_sessions::Model>> {
        StudySessions::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query study session")
    }

    pub async fn list(&self) -> Result<Vec<study_sessions::Model>> {
        StudySessions::find()
            .all(&self.conn)
            .await
            .context("Failed to list study sessions")
    }

    pub async fn update(
        &self,
        id: i32,
        scheduled_time: Option<String>,
    ) -> Result<Option<study_sessions::Model>> {
        let Some(session) = StudySessions::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query study session for update")?
        else {
            return Ok(None);
        };

        let Some(scheduled_time) = scheduled_time else {
            return Ok(Some(session));
        };

        let mut active: study_sessions::ActiveModel = session.into();
        active.scheduled_time = Set(scheduled_time);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update study session")?;

        Ok(Some(updated))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let Some(session) = StudySessions::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query study session for deletion")?
        else {
            return Ok(false);
        };

        session
            .delete(&self.conn)
            .await
            .context("Failed to delete study session")?;

        Ok(true)
    }
}
