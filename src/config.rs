use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

/// Server configuration, read from the environment (and `.env` via dotenv)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("PORT must be a valid port number: {}", e))?,
            None => DEFAULT_PORT,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| "JWT_SECRET must be set".to_string())?;

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost:27017/food-del"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 4000);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
    }

    #[test]
    fn test_missing_database_url_is_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "secret")]));
        assert_eq!(result.unwrap_err(), "DATABASE_URL must be set");
    }

    #[test]
    fn test_missing_jwt_secret_is_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "mongodb://db")]));
        assert_eq!(result.unwrap_err(), "JWT_SECRET must be set");
    }

    #[test]
    fn test_invalid_port_is_error() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://db"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]));
        assert!(result.unwrap_err().starts_with("PORT must be a valid port number"));
    }

    #[test]
    fn test_cors_origins_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://db"),
            ("JWT_SECRET", "secret"),
            ("CORS_ORIGINS", " https://shop.example.com/ ,,http://localhost:3000"),
        ]))
        .unwrap();

        assert_eq!(
            config.cors_origins,
            vec!["https://shop.example.com", "http://localhost:3000"]
        );
    }
}
