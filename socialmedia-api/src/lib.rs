use std::sync::Arc;

use axum::extract::FromRef;
use axum::middleware::from_fn;
use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use socialmedia_shared::middleware::{metrics_middleware, require_csrf_token};
use socialmedia_shared::types::auth::JwtSecret;

pub mod config;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod slug;
pub mod store;

use config::AppConfig;
use store::SocialStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SocialStore>,
    pub jwt_secret: JwtSecret,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn SocialStore>) -> Self {
        let jwt_secret = JwtSecret::new(config.jwt_secret.clone());
        Self {
            config: Arc::new(config),
            store,
            jwt_secret,
        }
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}

/// All HTTP routes of the service, with CSRF, metrics, CORS and tracing layers.
pub fn router(state: AppState) -> Router {
    let mut api: Router<AppState> = Router::new()
        // Chats
        .route("/chats/:chat_id", get(routes::chats::get_chat).post(routes::chats::post_message))
        // Notifications
        .route(
            "/notifications",
            get(routes::notifications::list_notifications)
                .delete(routes::notifications::clear_notifications),
        )
        .route("/notifications/:slug", delete(routes::notifications::dismiss_notification));

    if state.config.require_csrf {
        api = api.route_layer(from_fn(require_csrf_token));
    }

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(api)
        .route_layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
