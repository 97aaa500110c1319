//! Chiprack backend server.
//!
//! Wires admission routes and the WebSocket session route onto one
//! actix-web server backed by a [`Lobby`]. Persistence comes from
//! PostgreSQL when a connection string is supplied, otherwise an
//! in-memory store (fine for a kitchen-table deployment that accepts
//! losing state on restart).

pub mod handlers;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use rack_hosting::Lobby;
use rack_store::MemoryStore;
use rack_store::PgStore;
use rack_store::SnapshotStore;
use std::sync::Arc;

/// Server configuration, usually parsed from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind: String,
    pub database_url: Option<String>,
}

#[rustfmt::skip]
pub async fn run(config: Config) -> std::io::Result<()> {
    let store: Arc<dyn SnapshotStore> = match &config.database_url {
        Some(url) => {
            let client = rack_store::connect(url).await.map_err(std::io::Error::other)?;
            let store = PgStore::new(client);
            store.init().await.map_err(std::io::Error::other)?;
            Arc::new(store)
        }
        None => {
            log::warn!("no database configured, rooms will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };
    let lobby = Lobby::new(store);
    let restored = lobby.restore().await.map_err(std::io::Error::other)?;
    log::info!("starting server on {} ({} rooms restored)", config.bind, restored);
    let lobby = web::Data::from(lobby);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(lobby.clone())
            .route("/health", web::get().to(handlers::health))
            .route("/rooms", web::post().to(handlers::create))
            .route("/rooms", web::get().to(handlers::list))
            .route("/rooms/join", web::post().to(handlers::join))
            .route("/rooms/{id}/leave/{player_id}", web::post().to(handlers::leave))
            .route("/player-room/{player_id}", web::get().to(handlers::player_room))
            .route("/random-profile", web::get().to(handlers::random_profile))
            .route("/ws/{room_id}/{player_id}", web::get().to(handlers::session))
    })
    .workers(4)
    .bind(&config.bind)?
    .run()
    .await
}
