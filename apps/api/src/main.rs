use std::net::SocketAddr;
use std::sync::Arc;
use axum::http::{header, HeaderValue, Method};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use daily_insights_cell::api::{GeminiProvider, GenerationProvider};
use daily_insights_cell::InsightHandlers;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use wait_prediction_cell::WaitPredictionHandlers;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Patient Flow API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Collaborators are built once and shared by every request
    let supabase = Arc::new(SupabaseClient::new(&config));
    let provider: Option<Arc<dyn GenerationProvider>> = if config.is_gemini_configured() {
        match GeminiProvider::from_config(&config) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                error!("Failed to build Gemini client: {}", e);
                None
            }
        }
    } else {
        None
    };

    let wait_prediction = Arc::new(WaitPredictionHandlers::new(supabase));
    let insights = Arc::new(InsightHandlers::new(&config, provider));

    // Build the application router
    let app = router::create_router(wait_prediction, insights)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors_layer(&config.allowed_origins));

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("server error");
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
