mod myconfig;

pub use self::myconfig::{Config, env_or};
