//! Membership state machine over `group_members` row presence.
//!
//! A user is either unaffiliated (no row) or a member of exactly one group
//! (one row). There is no separate status field; join inserts the row and
//! leave deletes it.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    Set, SqlErr,
};
use thiserror::Error;

use crate::entities::{group_members, prelude::*};

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("User can only join one study group")]
    AlreadyMember,

    #[error("User is not in any study group")]
    NotAMember,

    #[error("User not found")]
    UserNotFound,

    #[error("Study group not found")]
    GroupNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct MembershipRepository {
    conn: DatabaseConnection,
}

impl MembershipRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_for_user(
        &self,
        user_id: i32,
    ) -> Result<Option<group_members::Model>, sea_orm::DbErr> {
        GroupMembers::find()
            .filter(group_members::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
    }

    /// Unaffiliated -> Member(group_id). Fails with [`MembershipError::AlreadyMember`]
    /// when any membership row exists for the user, including one for the
    /// same group.
    pub async fn join(
        &self,
        user_id: i32,
        group_id: i32,
    ) -> Result<group_members::Model, MembershipError> {
        if Users::find_by_id(user_id).one(&self.conn).await?.is_none() {
            return Err(MembershipError::UserNotFound);
        }

        if StudyGroups::find_by_id(group_id)
            .one(&self.conn)
            .await?
            .is_none()
        {
            return Err(MembershipError::GroupNotFound);
        }

        if self.get_for_user(user_id).await?.is_some() {
            return Err(MembershipError::AlreadyMember);
        }

        let model = group_members::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
            joined_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match model.insert(&self.conn).await {
            Ok(created) => Ok(created),
            // The unique index on user_id backstops the check above when
            // two joins for the same user race.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(MembershipError::AlreadyMember)
            }
            Err(e) => Err(MembershipError::Database(e)),
        }
    }

    /// Member(group_id) -> Unaffiliated.
    pub async fn leave(&self, user_id: i32) -> Result<(), MembershipError> {
        let membership = self
            .get_for_user(user_id)
            .await?
            .ok_or(MembershipError::NotAMember)?;

        membership.delete(&self.conn).await?;
        Ok(())
    }
}
