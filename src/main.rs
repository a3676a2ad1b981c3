use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

mod auth;
mod codec;
mod config;
mod controllers;
mod db;
mod models;
mod notes;
mod users;

use auth::TokenProvider;
use db::Database;
use notes::NoteStore;
use users::UserDirectory;

pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: TokenProvider,
    pub users: Arc<UserDirectory>,
    pub notes: Arc<NoteStore>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("noteapp-backend v{}", env!("CARGO_PKG_VERSION"));

    let db_path = config::database_url();
    let db = Arc::new(Database::new(&db_path).unwrap_or_else(|e| {
        panic!("Failed to open database at {}: {}", db_path, e);
    }));
    log::info!("Database ready at {}", db_path);

    let tokens = TokenProvider::new(config::jwt_secret(), config::jwt_expiration_ms());
    let users = Arc::new(UserDirectory::new(Arc::clone(&db), tokens.clone()));
    let notes = Arc::new(NoteStore::new(Arc::clone(&db)));

    let port = config::port();
    log::info!("Listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                tokens: tokens.clone(),
                users: Arc::clone(&users),
                notes: Arc::clone(&notes),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::auth::config)
            .configure(controllers::users::config)
            .configure(controllers::notes::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
