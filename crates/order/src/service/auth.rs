use crate::{
    abstract_trait::user::{AuthServiceTrait, DynUserRepository},
    domain::{
        requests::auth::{CreateUserRecordRequest, LoginRequest, RegisterRequest},
        response::auth::{TokenResponse, UserResponse},
    },
    service::OperationTracer,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynHashing, DynJwtService},
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use validator::Validate;

pub const ACCESS_TOKEN: &str = "access";

#[derive(Clone)]
pub struct AuthService {
    users: DynUserRepository,
    hashing: DynHashing,
    jwt: DynJwtService,
    tracer: OperationTracer,
}

pub struct AuthServiceDeps {
    pub users: DynUserRepository,
    pub hashing: DynHashing,
    pub jwt: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
}

impl AuthService {
    pub async fn new(deps: AuthServiceDeps) -> Self {
        let AuthServiceDeps {
            users,
            hashing,
            jwt,
            registry,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("auth_service", "AuthService", &mut *registry.lock().await);

        Self {
            users,
            hashing,
            jwt,
            tracer: OperationTracer::new("auth-service", metrics),
        }
    }
}

fn validation(err: validator::ValidationErrors) -> ServiceError {
    ServiceError::Validation(vec![err.to_string()])
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn register(&self, req: &RegisterRequest) -> Result<UserResponse, ServiceError> {
        info!("📝 Registering user {}", req.email);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "register",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "register"),
            ],
        );

        let result = async {
            req.validate().map_err(validation)?;

            if self.users.find_by_email(&req.email).await?.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "Email {} is already registered",
                    req.email
                )));
            }

            let hashed_password = self.hashing.hash_password(&req.password).await?;

            let user = self
                .users
                .create_user(&CreateUserRecordRequest {
                    email: req.email.clone(),
                    hashed_password,
                })
                .await
                .map_err(|e| match e {
                    RepositoryError::AlreadyExists(_) => ServiceError::Conflict(format!(
                        "Email {} is already registered",
                        req.email
                    )),
                    other => ServiceError::Repo(other),
                })?;

            Ok::<_, ServiceError>(UserResponse::from(user))
        }
        .await;

        match &result {
            Ok(user) => self.tracer.success(
                &tracing_ctx,
                method,
                &format!("Registered user {}", user.id),
            ),
            Err(e) => self.tracer.failure(&tracing_ctx, method, &e.to_string()),
        }

        result
    }

    async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ServiceError> {
        info!("🔐 Login attempt for {}", req.email);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "login",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "login"),
            ],
        );

        let result = async {
            req.validate().map_err(validation)?;

            let user = self
                .users
                .find_by_email(&req.email)
                .await?
                .ok_or(ServiceError::InvalidCredentials)?;

            if !user.is_active {
                return Err(ServiceError::InvalidCredentials);
            }

            self.hashing
                .compare_password(&user.password, &req.password)
                .await
                .map_err(|_| ServiceError::InvalidCredentials)?;

            let access_token = self.jwt.generate_token(user.user_id, ACCESS_TOKEN)?;

            Ok::<_, ServiceError>(TokenResponse {
                access_token,
                token_type: "bearer".to_string(),
            })
        }
        .await;

        match &result {
            Ok(_) => self.tracer.success(&tracing_ctx, method, "Login succeeded"),
            Err(e) => {
                error!("❌ Login failed for {}: {e}", req.email);
                self.tracer.failure(&tracing_ctx, method, "Login failed")
            }
        }

        result
    }

    async fn me(&self, user_id: i32) -> Result<UserResponse, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "me",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "me"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) if user.is_active => Ok(UserResponse::from(user)),
            Ok(Some(_)) => Err(ServiceError::InvalidCredentials),
            Ok(None) => Err(ServiceError::NotFound(format!("User {user_id} not found"))),
            Err(e) => Err(ServiceError::Repo(e)),
        };

        match &result {
            Ok(_) => self.tracer.success(&tracing_ctx, method, "Fetched user"),
            Err(e) => self.tracer.failure(&tracing_ctx, method, &e.to_string()),
        }

        result
    }
}
