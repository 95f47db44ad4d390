use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::users::Role;
use crate::entities::{group_members, resources, study_groups, study_sessions};

pub mod migrator;
pub mod repositories;

pub use repositories::membership::MembershipError;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn group_repo(&self) -> repositories::group::GroupRepository {
        repositories::group::GroupRepository::new(self.conn.clone())
    }

    fn membership_repo(&self) -> repositories::membership::MembershipRepository {
        repositories::membership::MembershipRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn resource_repo(&self) -> repositories::resource::ResourceRepository {
        repositories::resource::ResourceRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(name, email, password, security)
            .await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, name, email).await
    }

    pub async fn set_user_role(&self, id: i32, role: Role) -> Result<Option<User>> {
        self.user_repo().set_role(id, role).await
    }

    pub async fn remove_user(&self, id: i32) -> Result<bool> {
        self.user_repo().remove(id).await
    }

    // ========== Groups ==========

    pub async fn add_group(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<study_groups::Model> {
        self.group_repo().add(name, description).await
    }

    pub async fn get_group(&self, id: i32) -> Result<Option<study_groups::Model>> {
        self.group_repo().get(id).await
    }

    pub async fn list_groups(&self) -> Result<Vec<study_groups::Model>> {
        self.group_repo().list().await
    }

    pub async fn update_group(
        &self,
        id: i32,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<Option<study_groups::Model>> {
        self.group_repo().update(id, name, description).await
    }

    pub async fn remove_group(&self, id: i32) -> Result<bool> {
        self.group_repo().remove(id).await
    }

    // ========== Membership ==========

    pub async fn join_group(
        &self,
        user_id: i32,
        group_id: i32,
    ) -> Result<group_members::Model, MembershipError> {
        self.membership_repo().join(user_id, group_id).await
    }

    pub async fn leave_group(&self, user_id: i32) -> Result<(), MembershipError> {
        self.membership_repo().leave(user_id).await
    }

    // ========== Sessions ==========

    pub async fn add_session(
        &self,
        group_id: i32,
        scheduled_time: Option<String>,
    ) -> Result<study_sessions::Model> {
        self.session_repo().add(group_id, scheduled_time).await
    }

    pub async fn get_session(&self, id: i32) -> Result<Option<study_sessions::Model>> {
        self.session_repo().get(id).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<study_sessions::Model>> {
        self.session_repo().list().await
    }

    pub async fn update_session(
        &self,
        id: i32,
        scheduled_time: Option<String>,
    ) -> Result<Option<study_sessions::Model>> {
        self.session_repo().update(id, scheduled_time).await
    }

    pub async fn remove_session(&self, id: i32) -> Result<bool> {
        self.session_repo().remove(id).await
    }

    // ========== Resources ==========

    pub async fn add_resource(
        &self,
        group_id: i32,
        title: &str,
        url: &str,
    ) -> Result<resources::Model> {
        self.resource_repo().add(group_id, title, url).await
    }

    pub async fn get_resource(&self, id: i32) -> Result<Option<resources::Model>> {
        self.resource_repo().get(id).await
    }

    pub async fn list_resources(&self) -> Result<Vec<resources::Model>> {
        self.resource_repo().list().await
    }

    pub async fn update_resource(
        &self,
        id: i32,
        title: Option<String>,
        url: Option<String>,
    ) -> Result<Option<resources::Model>> {
        self.resource_repo().update(id, title, url).await
    }
}
