//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, target) a uno de los handlers de la tabla fija.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → resolve() → Route → handler → Response
//! ```
//!
//! El orden de decisión es fijo (gana la primera regla que aplica):
//!
//! 1. método distinto de GET → 405
//! 2. `/` → Root
//! 3. `/echo/...` → Echo con el resto del target
//! 4. `/user-agent` exacto → UserAgent
//! 5. `/files/...` con al menos un byte después → FileServe
//! 6. cualquier otra cosa → 404
//!
//! Las comparaciones son sobre el target crudo: sin decoding y sin quitar
//! la query string.

use crate::config::ServerConfig;
use crate::handlers::{self, HandlerError};
use crate::http::{Method, Request, Response};

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";

/// Ruta elegida para un request, con su parámetro de path si lo tiene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Echo(&'a str),
    UserAgent,
    FileServe(&'a str),
    NotFound,
    MethodNotAllowed,
}

impl Route<'_> {
    /// Nombre corto para logs
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Echo(_) => "echo",
            Route::UserAgent => "user-agent",
            Route::FileServe(_) => "files",
            Route::NotFound => "not-found",
            Route::MethodNotAllowed => "method-not-allowed",
        }
    }
}

/// Decide la ruta para un método y target
///
/// Es una función pura y total: todo target tiene ruta.
///
/// # Ejemplo
/// ```
/// use minihttpd::http::Method;
/// use minihttpd::router::{resolve, Route};
///
/// assert_eq!(resolve(&Method::GET, "/echo/a?b=1"), Route::Echo("a?b=1"));
/// assert_eq!(resolve(&Method::GET, "/files/"), Route::NotFound);
/// ```
pub fn resolve<'a>(method: &Method, target: &'a str) -> Route<'a> {
    if *method != Method::GET {
        return Route::MethodNotAllowed;
    }

    if target == "/" {
        return Route::Root;
    }

    if let Some(text) = target.strip_prefix(ECHO_PREFIX) {
        return Route::Echo(text);
    }

    if target == "/user-agent" {
        return Route::UserAgent;
    }

    match target.strip_prefix(FILES_PREFIX) {
        Some(file_path) if !file_path.is_empty() => Route::FileServe(file_path),
        _ => Route::NotFound,
    }
}

/// Resuelve la ruta del request y ejecuta su handler
///
/// Los errores de los handlers ya salen convertidos en respuesta.
pub fn dispatch(request: &Request, config: &ServerConfig) -> Response {
    let route = resolve(request.method(), request.target());

    let result: Result<Response, HandlerError> = match route {
        Route::Root => Ok(handlers::root_handler()),
        Route::Echo(text) => Ok(handlers::echo_handler(text)),
        Route::UserAgent => Ok(handlers::user_agent_handler(request)),
        Route::FileServe(file_path) => handlers::files_handler(file_path, config),
        Route::NotFound => Ok(handlers::not_found_handler()),
        Route::MethodNotAllowed => Ok(handlers::method_not_allowed_handler()),
    };

    result.unwrap_or_else(|error| {
        tracing::debug!(route = route.name(), error = %error, "Handler falló");
        error.into_response()
    })
}
