mod auth;
mod observe;
mod order;

pub use self::auth::{ACCESS_TOKEN, AuthService, AuthServiceDeps};
pub use self::observe::OperationTracer;
pub use self::order::{
    OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderQueryServiceDeps,
};
