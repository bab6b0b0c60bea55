//! Multi-tenant sales and HR CRM served as a JSON API.
//!
//! Without the `server` feature only the persistence layer is compiled.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "crm";
pub const SERVICE_ADMIN_ROLE: &str = "crm_admin";
pub const SERVICE_SALES_ROLE: &str = "crm_sales";
pub const SERVICE_HR_ROLE: &str = "crm_hr";

/// Registers the JSON API and its shared state on an [`App`].
#[cfg(feature = "server")]
pub fn configure_app(
    repo: DieselRepository,
    server_config: ServerConfig,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(repo))
            .app_data(web::Data::new(server_config))
            .app_data(web::JsonConfig::default().limit(1 << 20))
            .service(web::scope("/api/v1").configure(routes::configure));
    }
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(configure_app(repo.clone(), server_config.clone()))
            .service(Files::new("/assets", &server_config.assets_dir))
    })
    .bind(bind_address)?
    .run()
    .await
}
