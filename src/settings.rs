use serde::Deserialize;

/// Runtime configuration, read from the environment (optionally via `.env`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub pg_database_url: String,
    pub redis_database_uri: String,
    pub webhook_secret: Option<String>,
    pub customer_website_url: String,
    pub customer_api_key: Option<String>,
    pub upload_dir: String,
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("bind_addr", "127.0.0.1:8080")?
            .set_default("customer_website_url", "https://port-antonio.com")?
            .set_default("upload_dir", "public/uploads")?
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_optional_keys() {
        std::env::set_var("PG_DATABASE_URL", "postgres://localhost/portal");
        std::env::set_var("REDIS_DATABASE_URI", "redis://127.0.0.1/");

        let settings = Settings::load().unwrap();

        assert_eq!(settings.bind_addr, "127.0.0.1:8080");
        assert_eq!(settings.upload_dir, "public/uploads");
        assert!(settings.customer_website_url.starts_with("https://"));
    }
}
