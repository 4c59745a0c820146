//! # minihttpd
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo y concurrente, implementado desde cero sobre
//! `std::net`: un request por conexión, una tabla de rutas fija y un pool
//! de workers acotado.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing del request y serialización de la respuesta
//! - `router`: Tabla fija (método, target) → handler
//! - `handlers`: `/`, `/echo/*`, `/user-agent`, `/files/*`, 404 y 405
//! - `server`: Loop de accept y pool de workers
//! - `config`: Argumentos CLI y configuración inmutable compartida
//! - `error`: Errores de arranque
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use minihttpd::config::Config;
//! use minihttpd::server::Server;
//!
//! let mut config = Config::default();
//! config.directory = Some("/tmp".into());
//!
//! let mut server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run();
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod router;
pub mod server;
