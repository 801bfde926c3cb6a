use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_minutes: i64,
    pub refresh_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub debug: bool,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let debug = std::env::var("APP_DEBUG")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "t"))
            .unwrap_or(true);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            access_minutes: std::env::var("ACCESS_TOKEN_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_days: std::env::var("REFRESH_TOKEN_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };
        Ok(Self {
            database_url,
            debug,
            jwt,
        })
    }
}
