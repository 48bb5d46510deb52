use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use lexi_server::{
    app_state::AppState,
    config::Config,
    handlers::{configure, json_config},
    middleware::RequestIdMiddleware,
};

fn build_cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600);

    match &config.cors_allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let bind_address = (config.web_server_host.clone(), config.web_server_port);
    log::info!(
        "Starting server on {}:{} (deployment {}, timeout {}s, {} attempt(s))",
        bind_address.0,
        bind_address.1,
        config.openai_deployment,
        config.generation_timeout_secs,
        config.generation_max_attempts
    );

    let state = Arc::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .wrap(build_cors(&state.config))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
