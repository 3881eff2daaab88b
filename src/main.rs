mod constants;
mod db;
mod middleware;
mod routes;
mod services;
mod state;
mod utils;

use axum::routing::get;

#[tokio::main]
async fn main() {
    let db_conn = db::connect()
        .await
        .expect("Failed to connect to the database");
    let session_store_conn = services::sessions::store::Connection::connect()
        .await
        .expect("Failed to connect to the session store");
    let state = state::AppState {
        db_conn,
        session_store_conn,
        identity: services::identity::Client::from_env(),
        login_limiter: utils::ratelimit::LoginRateLimiter::new(),
    };

    let api = axum::Router::new()
        .route("/", get(root))
        .nest("/auth", routes::auth::create_router(&state))
        .with_state(state);
    // Nesting at "/" panics, so only nest when an actual prefix is configured.
    let app = if constants::api::API_URI_PREFIX.as_str() == "/" {
        api
    } else {
        axum::Router::new().nest(&constants::api::API_URI_PREFIX, api)
    };

    let listener = tokio::net::TcpListener::bind(constants::api::BIND_ADDRESS.as_str())
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Failed to init Axum service");
}

async fn root() -> String {
    "VPeak auth service is running!".to_string()
}
