//! # minihttpd - Entry Point
//! src/main.rs
//!
//! Inicializa el logging, parsea la CLI y deja al servidor aceptando
//! conexiones hasta que el proceso se termine desde afuera.
//!
//! El único motivo para salir con código distinto de 0 es no poder abrir
//! el puerto.

use minihttpd::config::Config;
use minihttpd::server::Server;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minihttpd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new();
    config.log_summary();

    let mut server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Error fatal al iniciar el servidor");
            std::process::exit(1);
        }
    };

    server.run()
}
