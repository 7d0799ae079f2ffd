mod database;
mod hashing;
mod jwt;
mod kafka;
mod redis;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::hashing::Hashing;
pub use self::jwt::{Claims, JwtConfig};
pub use self::kafka::{Kafka, KafkaProducerConfig};
pub use self::redis::{RedisClient, RedisConfig};
