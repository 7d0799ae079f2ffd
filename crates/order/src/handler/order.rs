use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        requests::order::{CreateOrderRequest, UpdateOrderStatusRequest},
        response::{api::ApiResponse, order::OrderResponse},
    },
    middleware::{
        jwt::auth_middleware, rate_limit::rate_limit_middleware, validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let created = service.create_order(user_id, &body).await?;

    let message = if created.event.is_published() {
        "Order created successfully"
    } else {
        "Order created; event not published"
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(message, created.order)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found"),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let order = service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success("Order retrieved successfully", order)))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Order not found"),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_order_status(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let order = service.update_order_status(id, &body).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Order status updated successfully", order)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/user/{user_id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Orders of the user, newest first", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let orders = service.find_by_user(user_id).await?;
    Ok(Json(ApiResponse::success("Orders retrieved successfully", orders)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/{id}", get(get_order).patch(update_order_status))
        .route("/api/orders/user/{user_id}", get(get_user_orders))
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.di_container.auth_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
        .layer(Extension(app_state.rate_limit.clone()))
        .layer(Extension(app_state.rate_limit_policy))
}
