//! # Handlers
//!
//! Cada ruta de la tabla fija tiene su handler:
//!
//! - **basic**: `/`, `/echo/*`, `/user-agent`, 404 y 405
//! - **files**: `/files/*`, lectura de archivos del directorio configurado
//!
//! Los handlers que pueden fallar retornan [`HandlerError`], y
//! [`HandlerError::into_response`] es el único lugar donde esos fallos se
//! convierten en status + body.

pub mod basic;
pub mod files;

pub use basic::*;
pub use files::*;

use crate::http::{Response, StatusCode};
use thiserror::Error;

/// Fallos de un handler que terminan en una respuesta de error
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Se pidió /files/* pero el servidor arrancó sin --directory
    #[error("no serving directory configured")]
    MissingServingDirectory,

    /// Path vacío o que intenta salir del directorio servido
    #[error("invalid file path")]
    InvalidFilePath,

    /// El archivo no se pudo abrir o leer
    #[error("unable to read file: {0}")]
    FileUnavailable(#[source] std::io::Error),
}

impl HandlerError {
    /// Traduce el error a la respuesta que ve el cliente
    pub fn into_response(self) -> Response {
        match self {
            HandlerError::MissingServingDirectory => Response::plain(
                StatusCode::InternalServerError,
                "ERROR: Unable to serve files\n",
            ),
            HandlerError::InvalidFilePath => {
                Response::plain(StatusCode::BadRequest, "ERROR: Invalid file path\n")
            }
            HandlerError::FileUnavailable(_) => Response::plain(
                StatusCode::InternalServerError,
                "ERROR: Unable to serve file, It may not exist!\n",
            ),
        }
    }
}
