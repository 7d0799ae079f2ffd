mod order_cache;
mod rate_limit;

pub use self::order_cache::{OrderCache, order_cache_key};
pub use self::rate_limit::{RateLimiter, rate_limit_key};
