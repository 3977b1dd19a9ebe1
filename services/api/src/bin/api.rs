//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{classifier::HttpClassifierAdapter, db::SqliteStore, reply_llm::OllamaReplyAdapter},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, signup_handler},
        chat::chat_handler,
        middleware::require_auth,
        rest::{
            activity_summary_handler, create_music_handler, create_quiz_handler,
            delete_music_handler, delete_quiz_handler, get_profile_handler, list_music_handler,
            list_quiz_handler, list_sessions_handler, list_users_handler, log_activity_handler,
            log_message_handler, log_mood_handler, message_history_handler,
            moods_by_owner_handler, moods_by_session_handler, session_messages_handler,
            update_music_handler, update_profile_handler, update_quiz_handler, ApiDoc,
        },
        state::AppState,
    },
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Database & Bring the Schema Up To Date ---
    info!("Opening database at {}", config.database_url);
    let store = Arc::new(SqliteStore::new(&config.database_url).await?);
    info!("Database schema ready.");

    // --- 3. Initialize Service Adapters ---
    let reply_adapter = Arc::new(OllamaReplyAdapter::new(
        config.llm_base_url.clone(),
        config.llm_model.clone(),
        config.llm_temperature,
        config.llm_num_predict,
        std::time::Duration::from_secs(config.llm_timeout_secs),
    )?);
    let classifier_adapter = Arc::new(HttpClassifierAdapter::new(config.classifier_url.clone()));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        store,
        config.clone(),
        reply_adapter,
        classifier_adapter,
    ));

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {e}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/messages", post(log_message_handler))
        .route("/api/session-messages", post(session_messages_handler))
        .route("/api/message-history", post(message_history_handler))
        .route("/api/sessions/{email}", get(list_sessions_handler))
        .route("/api/mood-log", post(log_mood_handler))
        .route(
            "/api/mood-logs/session/{session_id}",
            get(moods_by_session_handler),
        )
        .route("/api/mood-logs/email/{email}", get(moods_by_owner_handler))
        .route("/api/activity-log", post(log_activity_handler))
        .route(
            "/api/activity-summary/{email}",
            get(activity_summary_handler),
        )
        .route("/api/profile/{email}", get(get_profile_handler))
        .route("/api/profile", post(update_profile_handler))
        .route("/api/users", get(list_users_handler))
        .route("/api/quiz", get(list_quiz_handler).post(create_quiz_handler))
        .route(
            "/api/quiz/{id}",
            put(update_quiz_handler).delete(delete_quiz_handler),
        )
        .route(
            "/api/music",
            get(list_music_handler).post(create_music_handler),
        )
        .route(
            "/api/music/{id}",
            put(update_music_handler).delete(delete_music_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
