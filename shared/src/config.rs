use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub admission: AdmissionConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse::<u16>()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST")?,
            port: std::env::var("REDIS_PORT")?.parse::<u16>()?,
        };
        let admission = AdmissionConfig {
            strict_capacity_on_confirm: std::env::var("STRICT_CAPACITY_ON_CONFIRM")
                .map(|v| v.parse::<bool>().unwrap_or(false))
                .unwrap_or(false),
        };
        Ok(Self {
            database,
            redis,
            admission,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

/// Knobs for the reservation admission path.
///
/// `strict_capacity_on_confirm` controls whether an admin transition to
/// CONFIRMED re-validates event capacity. Off by default: the capacity
/// gate normally runs only at creation time, so an admin confirm acts as
/// an override even when capacity was lowered afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmissionConfig {
    pub strict_capacity_on_confirm: bool,
}
