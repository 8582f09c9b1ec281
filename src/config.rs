use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Header carrying the authenticated user's id, set by the login layer
    /// in front of this service.
    pub actor_header: String,
    pub template_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set")?;

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        let actor_header = std::env::var("ACTOR_HEADER")
            .unwrap_or_else(|_| "x-portal-user".to_string())
            .to_ascii_lowercase();

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let template_dir = base_dir.join(
            std::env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".to_string())
        );

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse()
            .unwrap_or(5001);

        Ok(Self {
            database_url,
            db_max_connections,
            actor_header,
            template_dir,
            host,
            port,
        })
    }

    /// Settings for running without a database or environment, as the
    /// integration tests do.
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            db_max_connections: 1,
            actor_header: "x-portal-user".to_string(),
            template_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")),
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }
}
