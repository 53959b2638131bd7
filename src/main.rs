use actix_web::{web, App, HttpServer};
use log::info;

mod game;
mod matchmaking;
mod models;
mod registry;
mod routes;
mod state;
mod websocket;

use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!("Starting tic-tac-toe server at http://{}", bind_addr);

    // Create shared application state
    let app_state = web::Data::new(AppState::new());

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
