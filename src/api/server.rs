// API server implementation
// Author: Gabriel Demetrios Lafis

use std::io;
use std::net::SocketAddr;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

use crate::processing::{QueryOptions, TripService};
use crate::storage::{DatasetSlot, StorageError};
use super::routes;

/// API server configuration
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            enable_cors: false,
        }
    }
}

/// State shared by every worker
#[derive(Debug, Default)]
pub struct AppState {
    pub slot: DatasetSlot,
    pub options: QueryOptions,
}

impl AppState {
    /// Create a new application state
    pub fn new(slot: DatasetSlot, options: QueryOptions) -> Self {
        AppState { slot, options }
    }

    /// A query service over the installed dataset
    pub fn service(&self) -> Result<TripService, StorageError> {
        let dataset = self.slot.current()?;
        Ok(TripService::with_options(dataset, self.options.clone()))
    }
}

/// API server
pub struct Server {
    config: ServerConfig,
    state: web::Data<AppState>,
}

impl Server {
    /// Create a new API server
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Server {
            config,
            state: web::Data::new(state),
        }
    }

    /// Run the API server
    pub async fn run(&self) -> io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let state = self.state.clone();
        let enable_cors = self.config.enable_cors;

        info!("Starting server at http://{}", addr);

        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600)
            } else {
                Cors::default()
            };

            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .wrap(Logger::default())
                .configure(routes::configure)
        })
        .workers(self.config.workers)
        .bind(addr)?
        .run()
        .await
    }
}
