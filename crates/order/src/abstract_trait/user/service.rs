use crate::domain::{
    requests::auth::{LoginRequest, RegisterRequest},
    response::auth::{TokenResponse, UserResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;

#[async_trait]
pub trait AuthServiceTrait {
    async fn register(&self, req: &RegisterRequest) -> Result<UserResponse, ServiceError>;
    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ServiceError>;
    async fn me(&self, user_id: i32) -> Result<UserResponse, ServiceError>;
}
