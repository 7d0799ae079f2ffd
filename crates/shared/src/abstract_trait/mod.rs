mod hashing;
mod jwt;
mod kafka;

pub use self::hashing::{DynHashing, HashingTrait};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
pub use self::kafka::{DynKafka, KafkaTrait};
