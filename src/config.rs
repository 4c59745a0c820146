//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor a partir de argumentos CLI.
//!
//! ## Ejemplos de uso
//!
//! ```bash
//! ./minihttpd --directory /tmp/files
//! ./minihttpd --port 8080 --workers 8 --queue-capacity 32
//! ```
//!
//! Los flags desconocidos se loguean y se ignoran; nunca impiden arrancar.
//!
//! De aquí sale [`ServerConfig`], la única pieza de estado compartida entre
//! workers. Es inmutable y se pasa explícitamente hasta los handlers.

use clap::{Arg, CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuración del servidor tal como llega por CLI
#[derive(Debug, Clone, Parser)]
#[command(name = "minihttpd")]
#[command(about = "Servidor HTTP/1.1 concurrente con pool de workers acotado")]
#[command(version)]
pub struct Config {
    /// Directorio desde el que se sirven los archivos de /files/*
    #[arg(long, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Puerto en el que escucha el servidor (0 = efímero)
    #[arg(short, long, default_value_t = 9090)]
    pub port: u16,

    /// Número fijo de workers
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Conexiones que pueden esperar un worker libre antes de responder 500
    #[arg(long = "queue-capacity", default_value_t = 16)]
    pub queue_capacity: usize,
}

impl Config {
    /// Parsea los argumentos del proceso
    pub fn new() -> Self {
        Self::from_args(std::env::args())
    }

    /// Parsea una lista de argumentos (el primero es el nombre del programa)
    ///
    /// Los flags que el servidor no conoce se descartan con un warning
    /// antes de pasarle el resto a clap.
    ///
    /// # Ejemplo
    /// ```rust
    /// use minihttpd::config::Config;
    ///
    /// let config = Config::from_args(["minihttpd", "--directory", "/tmp", "--verbose"]);
    /// assert_eq!(config.directory.as_deref(), Some(std::path::Path::new("/tmp")));
    /// ```
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let (known, unknown) = split_known_args(args);

        for flag in &unknown {
            warn!(flag = %flag, "Argumento desconocido, se ignora");
        }

        Config::parse_from(known)
    }

    /// Obtiene la dirección completa para bind (host:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        Ok(())
    }

    /// Configuración inmutable que ven los handlers
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.directory.clone())
    }

    /// Loguea un resumen de la configuración
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            "Configuración cargada"
        );

        match &self.directory {
            Some(dir) => info!(directory = %dir.display(), "Sirviendo archivos"),
            None => info!("Sin --directory: /files/* responderá 500"),
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            directory: None,
            host: "127.0.0.1".to_string(),
            port: 9090,
            workers: 4,
            queue_capacity: 16,
        }
    }
}

/// Configuración de solo lectura compartida por todos los workers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    serving_directory: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(serving_directory: Option<PathBuf>) -> Self {
        Self { serving_directory }
    }

    /// Directorio raíz de /files/*, si se configuró
    pub fn serving_directory(&self) -> Option<&Path> {
        self.serving_directory.as_deref()
    }
}

/// Separa los argumentos que clap conoce de los que no
///
/// Retorna `(conocidos, desconocidos)`. El nombre del programa siempre
/// queda en los conocidos.
fn split_known_args<I, T>(args: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let command = Config::command();
    let mut args = args.into_iter().map(Into::into);

    let mut known = Vec::new();
    let mut unknown = Vec::new();

    if let Some(program) = args.next() {
        known.push(program);
    }

    while let Some(arg) = args.next() {
        if matches!(arg.as_str(), "-h" | "--help" | "-V" | "--version") {
            known.push(arg);
            continue;
        }

        match lookup_flag(&command, &arg) {
            Some((flag, inline_value)) => {
                let needs_value = flag.get_action().takes_values() && !inline_value;
                known.push(arg);

                if needs_value {
                    if let Some(value) = args.next() {
                        known.push(value);
                    }
                }
            }
            None => unknown.push(arg),
        }
    }

    (known, unknown)
}

/// Busca el flag en la definición de clap
///
/// Retorna el `Arg` y si el valor viene pegado (`--port=80`, `-p80`).
fn lookup_flag<'a>(command: &'a clap::Command, arg: &str) -> Option<(&'a Arg, bool)> {
    if let Some(long) = arg.strip_prefix("--") {
        let (name, inline_value) = match long.split_once('=') {
            Some((name, _)) => (name, true),
            None => (long, false),
        };

        return command
            .get_arguments()
            .find(|flag| flag.get_long() == Some(name))
            .map(|flag| (flag, inline_value));
    }

    let short = arg.strip_prefix('-')?;
    let mut chars = short.chars();
    let letter = chars.next()?;
    let inline_value = chars.next().is_some();

    command
        .get_arguments()
        .find(|flag| flag.get_short() == Some(letter))
        .map(|flag| (flag, inline_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 4);
        assert!(config.directory.is_none());
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "127.0.0.1:9090");
    }

    #[test]
    fn test_parse_no_args_matches_default() {
        let config = Config::from_args(["minihttpd"]);
        let default = Config::default();

        assert_eq!(config.address(), default.address());
        assert_eq!(config.workers, default.workers);
        assert_eq!(config.queue_capacity, default.queue_capacity);
        assert!(config.directory.is_none());
    }

    #[test]
    fn test_parse_directory() {
        let config = Config::from_args(["minihttpd", "--directory", "/tmp/data"]);
        assert_eq!(config.directory, Some(PathBuf::from("/tmp/data")));
        assert_eq!(
            config.server_config().serving_directory(),
            Some(Path::new("/tmp/data"))
        );
    }

    #[test]
    fn test_parse_inline_values() {
        let config = Config::from_args(["minihttpd", "--port=8081", "--directory=/srv"]);
        assert_eq!(config.port, 8081);
        assert_eq!(config.directory, Some(PathBuf::from("/srv")));
    }

    #[test]
    fn test_parse_short_port() {
        let config = Config::from_args(["minihttpd", "-p", "7000"]);
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let config = Config::from_args([
            "minihttpd",
            "--verbose",
            "--directory",
            "/srv",
            "--color",
            "always",
            "-x",
        ]);
        assert_eq!(config.directory, Some(PathBuf::from("/srv")));
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_split_known_args() {
        let (known, unknown) = split_known_args([
            "minihttpd",
            "--bogus",
            "--workers",
            "2",
            "stray",
            "-p9000",
        ]);

        assert_eq!(known, vec!["minihttpd", "--workers", "2", "-p9000"]);
        assert_eq!(unknown, vec!["--bogus", "stray"]);
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_workers() {
        let mut config = Config::default();
        config.workers = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Workers"));
    }

    #[test]
    fn test_validate_zero_queue_is_fine() {
        let mut config = Config::default();
        config.queue_capacity = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_without_directory() {
        let server_config = Config::default().server_config();
        assert_eq!(server_config, ServerConfig::default());
        assert!(server_config.serving_directory().is_none());
    }
}
