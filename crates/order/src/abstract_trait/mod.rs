pub mod cache;
pub mod order;
pub mod rate_limit;
pub mod user;
