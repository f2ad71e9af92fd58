use std::env;

/// Server settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Secret used to sign session cookies. A random key is generated when unset.
    pub secret: Option<String>,
    /// Cookie domain; cookies are host-only when unset.
    pub domain: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "app.db".to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            domain: lookup("DOMAIN").filter(|value| !value.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn falls_back_to_defaults() {
        let config = ServerConfig::from_lookup(|_| None);

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.secret.is_none());
        assert!(config.domain.is_none());
    }

    #[test]
    fn reads_values_and_ignores_bad_port() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "recipes.db"),
            ("PORT", "not-a-port"),
            ("SECRET_KEY", ""),
            ("DOMAIN", "example.com"),
        ]);

        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_url, "recipes.db");
        assert_eq!(config.port, 8080);
        assert!(config.secret.is_none());
        assert_eq!(config.domain.as_deref(), Some("example.com"));
    }
}
