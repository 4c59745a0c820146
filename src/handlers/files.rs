//! # Servir Archivos
//! src/handlers/files.rs
//!
//! `/files/{path}` lee el archivo completo desde el directorio configurado
//! con `--directory`. Sin caché y sin lecturas parciales: open, read, close.
//!
//! Solo se aceptan paths relativos formados por segmentos normales. `..`,
//! paths absolutos y prefijos de plataforma se rechazan con 400.

use super::HandlerError;
use crate::config::ServerConfig;
use crate::http::{Response, StatusCode};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Handler para `/files/{path}`
///
/// # Errores
///
/// - [`HandlerError::MissingServingDirectory`] si no hay `--directory`
/// - [`HandlerError::InvalidFilePath`] si el path está vacío o escapa del directorio
/// - [`HandlerError::FileUnavailable`] si no se puede leer el archivo
pub fn files_handler(file_path: &str, config: &ServerConfig) -> Result<Response, HandlerError> {
    let directory = config
        .serving_directory()
        .ok_or(HandlerError::MissingServingDirectory)?;

    let full_path = resolve_file_path(directory, file_path).ok_or(HandlerError::InvalidFilePath)?;

    let contents = fs::read(&full_path).map_err(HandlerError::FileUnavailable)?;

    Ok(Response::new(StatusCode::Ok)
        .with_header("Content-Type", "application/octet-stream")
        .with_header("Content-Length", &contents.len().to_string())
        .with_body_bytes(contents))
}

/// Une el directorio servido con el path pedido por el cliente
///
/// Retorna `None` si el path está vacío o tiene componentes que no sean
/// segmentos normales (`..`, `/`, prefijos de Windows).
///
/// # Ejemplo
/// ```
/// use minihttpd::handlers::resolve_file_path;
/// use std::path::Path;
///
/// let root = Path::new("/srv");
/// assert_eq!(resolve_file_path(root, "a/b.txt"), Some(Path::new("/srv/a/b.txt").to_path_buf()));
/// assert_eq!(resolve_file_path(root, "../etc/passwd"), None);
/// ```
pub fn resolve_file_path(directory: &Path, file_path: &str) -> Option<PathBuf> {
    if file_path.is_empty() {
        return None;
    }

    let relative = Path::new(file_path);
    let stays_inside = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

    stays_inside.then(|| directory.join(relative))
}
