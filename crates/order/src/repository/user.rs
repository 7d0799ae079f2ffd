use crate::{
    abstract_trait::user::UserRepositoryTrait, domain::requests::auth::CreateUserRecordRequest,
    model::user::User as UserModel, repository::bounded,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use std::time::Duration;
use tracing::{error, info};

pub struct UserRepository {
    db: ConnectionPool,
    timeout: Duration,
}

impl UserRepository {
    pub fn new(db: ConnectionPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, UserModel>(
                r#"
                SELECT user_id, email, password, is_active, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<UserModel>, RepositoryError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, UserModel>(
                r#"
                SELECT user_id, email, password, is_active, created_at, updated_at
                FROM users
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn create_user(
        &self,
        req: &CreateUserRecordRequest,
    ) -> Result<UserModel, RepositoryError> {
        let user = bounded(
            self.timeout,
            sqlx::query_as::<_, UserModel>(
                r#"
                INSERT INTO users (email, password, is_active, created_at, updated_at)
                VALUES ($1, $2, TRUE, current_timestamp, current_timestamp)
                RETURNING user_id, email, password, is_active, created_at, updated_at
                "#,
            )
            .bind(&req.email)
            .bind(&req.hashed_password)
            .fetch_one(&self.db),
        )
        .await
        .map_err(|err| {
            error!("❌ Failed to create user {}: {:?}", req.email, err);
            err
        })?;

        info!("✅ Created user ID {}", user.user_id);
        Ok(user)
    }
}
