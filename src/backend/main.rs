/**
 * Photogram Server Entry Point
 *
 * Loads configuration from the environment (and `.env`), initializes
 * tracing and serves the Axum app.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use photogram::backend::server::{config::ServerConfig, init::create_app};
    use tracing_subscriber::EnvFilter;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Server initialization started");

    let config = ServerConfig::from_env();
    let port = config.port;
    let app = create_app(config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin photogram-server --features ssr");
    std::process::exit(1);
}
