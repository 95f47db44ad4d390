use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::entities::users::Role;
use crate::entities::{group_members, resources, study_groups, study_sessions};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Public user representation; the password hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenDto {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct GroupDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<study_groups::Model> for GroupDto {
    fn from(model: study_groups::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipDto {
    pub id: i32,
    pub user_id: i32,
    pub group_id: i32,
}

impl From<group_members::Model> for MembershipDto {
    fn from(model: group_members::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            group_id: model.group_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub id: i32,
    pub group_id: i32,
    pub scheduled_time: String,
}

impl From<study_sessions::Model> for SessionDto {
    fn from(model: study_sessions::Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            scheduled_time: model.scheduled_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceDto {
    pub id: i32,
    pub group_id: i32,
    pub title: String,
    pub url: String,
}

impl From<resources::Model> for ResourceDto {
    fn from(model: resources::Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            title: model.title,
            url: model.url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}
