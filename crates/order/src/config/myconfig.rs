use anyhow::{Context, Result, anyhow};
use std::{str::FromStr, time::Duration};

/// Reads an optional variable, falling back to `default` when unset.
pub fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Unable to parse {name} from '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: u8,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub kafka_broker: String,
    pub kafka_topic: String,
    pub redis: RedisSettings,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub cache_ttl: Duration,
    pub store_timeout: Duration,
    pub cache_timeout: Duration,
    pub publish_timeout: Duration,
    pub rate_limit_per_minute: u64,
    pub otel_endpoint: String,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let kafka_broker = std::env::var("KAFKA").context("Missing environment variable: KAFKA")?;
        let kafka_topic =
            std::env::var("KAFKA_TOPIC").unwrap_or_else(|_| "order.created".to_string());

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_conn: u32 = env_or("DB_MAX_CONNECTION", 5)?;
        let db_min_conn: u32 = env_or("DB_MIN_CONNECTION", 1)?;

        // redis
        let redis = RedisSettings {
            host: std::env::var("REDIS_HOST").unwrap_or_else(|_| "redis".to_string()),
            port: env_or("REDIS_PORT", 6379)?,
            db: env_or("REDIS_DB", 0)?,
            password: std::env::var("REDIS_PASSWORD")
                .ok()
                .filter(|pw| !pw.is_empty()),
        };

        // timeouts
        let cache_ttl = Duration::from_secs(env_or("CACHE_TTL_SECONDS", 300)?);
        let store_timeout = Duration::from_millis(env_or("STORE_TIMEOUT_MS", 5000)?);
        let cache_timeout = Duration::from_millis(env_or("CACHE_TIMEOUT_MS", 500)?);
        let publish_timeout = Duration::from_millis(env_or("PUBLISH_TIMEOUT_MS", 5000)?);

        let rate_limit_per_minute: u64 = env_or("RATE_LIMIT_PER_MINUTE", 10)?;

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            kafka_broker,
            kafka_topic,
            redis,
            db_max_conn,
            db_min_conn,
            cache_ttl,
            store_timeout,
            cache_timeout,
            publish_timeout,
            rate_limit_per_minute,
            otel_endpoint,
        })
    }
}
