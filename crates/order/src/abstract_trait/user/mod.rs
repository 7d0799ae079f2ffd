mod repository;
mod service;

pub use self::repository::{DynUserRepository, UserRepositoryTrait};
pub use self::service::{AuthServiceTrait, DynAuthService};
