use chrono::Local;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use partidas_server::cache::CachedIpClient;
use partidas_server::config::AppConfig;
use partidas_server::ip::IpClient;
use partidas_server::prefs::{FileStore, Preferences};
use partidas_server::session::Session;
use partidas_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("partidas_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();

    // Create timetable client
    let client = IpClient::new(config.ip.clone()).expect("Failed to create timetable client");
    let cached = CachedIpClient::new(client, &config.cache);

    // Restore saved preferences
    let prefs = Preferences::new(FileStore::new(&config.prefs_dir));
    let today = Local::now().date_naive();
    let session = Session::new(prefs, today);

    let state = AppState::new(session, cached, &config.search);

    // Initial fetch for a restored station, off the startup path
    let mount = state.session.clone();
    tokio::spawn(async move { mount.mount().await });

    let app = create_router(state, &config.static_dir);

    info!(
        base_url = %config.ip.base_url,
        prefs = %config.prefs_dir.display(),
        "Partidas listening on http://{}",
        config.addr
    );

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
