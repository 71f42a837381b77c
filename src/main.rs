//! NutriConnect API server.

use std::sync::Arc;

use http::{HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use nutri_connect::adapters::ai::GeminiProvider;
use nutri_connect::adapters::auth::JwtSessionValidator;
use nutri_connect::adapters::http::middleware::AuthState;
use nutri_connect::adapters::http::{nutrition_router, NutritionAppState};
use nutri_connect::adapters::profile::{InMemoryProfileRepository, PgProfileRepository};
use nutri_connect::config::{AppConfig, DatabaseConfig, ServerConfig};
use nutri_connect::ports::ProfileRepository;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let profile_repository = profile_repository(config.database.as_ref()).await?;
    let ai_provider = Arc::new(GeminiProvider::new(config.ai.gemini_config())?);
    let validator: AuthState = Arc::new(JwtSessionValidator::new(config.auth.jwt_config()));

    let state = NutritionAppState::new(profile_repository, ai_provider)
        .with_generation(config.ai.generation_settings());

    let app = nutrition_router(state, validator)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "NutriConnect listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`. JSON lines in production.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn profile_repository(
    database: Option<&DatabaseConfig>,
) -> Result<Arc<dyn ProfileRepository>, BoxError> {
    let Some(database) = database else {
        tracing::warn!("No database configured, profiles are kept in memory");
        return Ok(Arc::new(InMemoryProfileRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PgProfileRepository::new(pool)))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
