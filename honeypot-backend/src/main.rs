use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod agent;
mod ai;
mod config;
mod controllers;
mod detector;
mod intel;
mod models;
mod session;

use agent::{HoneypotAgent, Persona};
use config::Config;
use session::{RateLimiter, SessionLocks, SessionStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SessionStore>,
    pub session_locks: SessionLocks,
    pub rate_limiter: RateLimiter,
    pub agent: HoneypotAgent,
    pub default_persona: Persona,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;
    let cors_origins = config.cors_origins.clone();

    if config.api_key == config::defaults::API_KEY {
        log::warn!("[BOOT] API_KEY is the default value; set it before exposing this service");
    }

    let store = session::store_from_config(&config);

    let llm = ai::client_from_config(&config);
    log::info!(
        "[BOOT] Reply backend: {}",
        if llm.is_some() { config.llm_provider.as_str() } else { "rule-based" }
    );

    let default_persona = Persona::parse_or(&config.persona_default, Persona::default());
    log::info!("[BOOT] Default persona: {}", default_persona);

    let state = web::Data::new(AppState {
        rate_limiter: RateLimiter::new(config.rate_limit_per_min),
        agent: HoneypotAgent::new(llm),
        session_locks: SessionLocks::new(),
        store,
        default_persona,
        config,
    });

    log::info!("Starting honeypot server on port {}", port);

    HttpServer::new(move || {
        let cors = if cors_origins.iter().any(|o| o == "*") {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        } else {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);
            for origin in &cors_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::message::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
