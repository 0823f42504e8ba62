/// API route modules
pub mod catalog;
pub mod health;
pub mod proxy;

use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
///
/// API routes live under `/api`, the audio proxy on its configured path, and
/// everything else falls through to the static PWA shell when one is set.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/months", get(catalog::list_months))
        .route("/api/months/:month/parts", get(catalog::list_parts))
        .route(
            "/api/months/:month/parts/:part/tracks",
            get(catalog::list_tracks),
        )
        .route("/api/search", get(catalog::search))
        .route(&state.config.proxy.path, get(proxy::proxy_audio));

    // SPA: unknown paths get index.html
    if let Some(dir) = &state.config.web.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(
        TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)),
    )
    .layer(CorsLayer::permissive())
    .with_state(state)
}
