use crate::{abstract_trait::user::DynAuthService, service::ACCESS_TOKEN};
use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    abstract_trait::DynJwtService,
    errors::{ErrorResponse, HttpError, ServiceError},
};
use tracing::warn;

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            status: "fail".to_string(),
            code: "unauthorized".to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Resolves the caller from the `token` cookie or a bearer header, checks the
/// account still exists and is active, and stores the user id (`i32`) in the
/// request extensions.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    Extension(auth): Extension<DynAuthService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        });

    let Some(token) = token else {
        return Err(unauthorized("You are not logged in, please provide token"));
    };

    let user_id = jwt
        .verify_token(&token, ACCESS_TOKEN)
        .map_err(|_| unauthorized("Invalid token"))?;

    match auth.me(user_id).await {
        Ok(_) => {}
        Err(ServiceError::NotFound(_) | ServiceError::InvalidCredentials) => {
            warn!("Rejected token of missing or inactive user {user_id}");
            return Err(unauthorized("User does not exist or is inactive"));
        }
        Err(e) => return Err(HttpError::from(e).into_response()),
    }

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}
