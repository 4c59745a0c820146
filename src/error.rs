//! # Errores del Servidor
//! src/error.rs
//!
//! Errores que pueden terminar el arranque del servidor. Los errores por
//! conexión (parsing, handlers, sockets) se resuelven dentro del worker y
//! nunca llegan hasta aquí.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el puerto; es el único error fatal
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuración rechazada por `Config::validate`
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
