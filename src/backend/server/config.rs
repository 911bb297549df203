/**
 * Server Configuration
 *
 * This module loads server configuration from environment variables and
 * opens the SQLite connection pool.
 *
 * # Configuration Sources
 *
 * `ServerConfig::from_env` reads the process environment (the binary loads a
 * `.env` file first when one exists). Every value has a development default
 * except the optional integrations: Facebook login and Cloudinary are only
 * enabled when all of their variables are present.
 *
 * Tests build configurations with `ServerConfig::builder()` instead, so they
 * never depend on the environment of the machine running them.
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

const DEV_ACCESS_SECRET: &str = "photogram-dev-access-secret";
const DEV_REFRESH_SECRET: &str = "photogram-dev-refresh-secret";

/// Secrets and lifetimes used to sign tokens
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// bcrypt work factor for stored passwords
    pub password_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: DEV_ACCESS_SECRET.to_string(),
            refresh_secret: DEV_REFRESH_SECRET.to_string(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Facebook app credentials and endpoints
#[derive(Debug, Clone)]
pub struct FacebookConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub graph_url: String,
    pub dialog_url: String,
}

/// Cloudinary account used for unsigned uploads
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub api_url: String,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    /// Frontend base URL used for login/logout redirects
    pub frontend_url: String,
    pub auth: AuthConfig,
    pub facebook: Option<FacebookConfig>,
    pub cloudinary: Option<CloudinaryConfig>,
    /// Directory for the local image store
    pub upload_dir: PathBuf,
    /// How often expired stories are purged
    pub story_purge_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            database_url: "sqlite://photogram.db?mode=rwc".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            auth: AuthConfig::default(),
            facebook: None,
            cloudinary: None,
            upload_dir: PathBuf::from("public/uploads"),
            story_purge_interval: Duration::from_secs(10 * 60),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let auth = AuthConfig {
            access_secret: secret_from_env("JWT_SECRET", DEV_ACCESS_SECRET),
            refresh_secret: secret_from_env("REFRESH_JWT_SECRET", DEV_REFRESH_SECRET),
            ..AuthConfig::default()
        };

        let facebook = match (
            env_opt("FACEBOOK_CLIENT_ID"),
            env_opt("FACEBOOK_SECRET"),
            env_opt("FACEBOOK_REDIRECT"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(FacebookConfig {
                client_id,
                client_secret,
                redirect_uri,
                graph_url: env_or("FACEBOOK_GRAPH_URL", "https://graph.facebook.com/v12.0"),
                dialog_url: env_or(
                    "FACEBOOK_DIALOG_URL",
                    "https://www.facebook.com/v12.0/dialog/oauth",
                ),
            }),
            _ => {
                tracing::warn!("Facebook credentials not set. Facebook login will be disabled.");
                None
            }
        };

        let cloudinary = match (
            env_opt("CLOUDINARY_CLOUD_NAME"),
            env_opt("CLOUDINARY_UPLOAD_PRESET"),
        ) {
            (Some(cloud_name), Some(upload_preset)) => Some(CloudinaryConfig {
                cloud_name,
                upload_preset,
                api_url: env_or("CLOUDINARY_API_URL", "https://api.cloudinary.com/v1_1"),
            }),
            _ => {
                tracing::info!("Cloudinary not configured. Images will be stored locally.");
                None
            }
        };

        Self {
            port,
            database_url: env_or("DATABASE_URL", &defaults.database_url),
            frontend_url: env_or("FE_URL", &defaults.frontend_url),
            auth,
            facebook,
            cloudinary,
            upload_dir: env_opt("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            story_purge_interval: defaults.story_purge_interval,
        }
    }
}

/// Builder for `ServerConfig`
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    pub fn frontend_url(mut self, url: impl Into<String>) -> Self {
        self.config.frontend_url = url.into();
        self
    }

    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    pub fn facebook(mut self, facebook: FacebookConfig) -> Self {
        self.config.facebook = Some(facebook);
        self
    }

    pub fn cloudinary(mut self, cloudinary: CloudinaryConfig) -> Self {
        self.config.cloudinary = Some(cloudinary);
        self
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    pub fn story_purge_interval(mut self, interval: Duration) -> Self {
        self.config.story_purge_interval = interval;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn secret_from_env(key: &str, fallback: &str) -> String {
    env_opt(key).unwrap_or_else(|| {
        tracing::warn!("Missing {}. Using an insecure development secret.", key);
        fallback.to_string()
    })
}

/// Open the SQLite pool and run migrations
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?
    };

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database ready");

    Ok(pool)
}
