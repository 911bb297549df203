//! Test server construction

use axum_test::TestServer;
use photogram::backend::server::config::{AuthConfig, ServerConfig, ServerConfigBuilder};
use photogram::backend::server::create_app;
use tempfile::TempDir;

/// A running app plus the upload directory it writes to
pub struct TestApp {
    pub server: TestServer,
    pub uploads: TempDir,
}

/// Base configuration: in-memory database, cheap bcrypt, temp upload dir
pub fn test_config(uploads: &TempDir) -> ServerConfigBuilder {
    ServerConfig::builder()
        .database_url("sqlite::memory:")
        .frontend_url("http://front.test")
        .upload_dir(uploads.path())
        .auth(AuthConfig {
            password_cost: 4,
            ..AuthConfig::default()
        })
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|builder| builder).await
}

/// Spawn an app with extra configuration applied to the base config
pub async fn spawn_app_with(configure: impl FnOnce(ServerConfigBuilder) -> ServerConfigBuilder) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = configure(test_config(&uploads)).build();
    let app = create_app(config).await.unwrap();
    TestApp {
        server: TestServer::new(app).unwrap(),
        uploads,
    }
}
