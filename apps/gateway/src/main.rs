use std::time::Duration;

use actix_web::{web, HttpServer};
use gateway::config::Config;
use gateway::state::build_state;
use gateway::{create_app, telemetry};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables must be set by the runtime environment:
    // - Docker: docker-compose env_file or docker run --env-file
    // - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid gateway configuration: {e}");
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(&config.log_level, config.runtime_env);

    let app_state = match build_state().with_config(&config).and_then(|b| b.build()) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        auth = app_state.backends.get(gateway::BackendId::Auth).base_url(),
        goals = app_state.backends.get(gateway::BackendId::Goals).base_url(),
        "backends configured"
    );

    let data = web::Data::new(app_state);
    let cors_origins = config.cors_allowed_origins.clone();

    info!(host = %config.host, port = config.port, env = ?config.runtime_env, "API gateway starting");

    // actix installs SIGINT/SIGTERM handlers and drains in-flight requests
    HttpServer::new(move || create_app(data.clone(), &cors_origins))
        .shutdown_timeout(config.shutdown_timeout_secs)
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    info!(
        grace = ?Duration::from_secs(config.shutdown_timeout_secs),
        "API gateway stopped"
    );
    Ok(())
}
