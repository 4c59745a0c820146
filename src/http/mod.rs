//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.1 que necesita el servidor:
//!
//! - Lectura y parsing del encabezado del request
//! - Construcción y serialización de responses
//! - Códigos de estado
//!
//! No hay keep-alive, chunked encoding ni lectura de body: un request
//! por conexión y la conexión se cierra después de responder.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Echo-Length: 3\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```

pub mod request; // Parsing de HTTP requests
pub mod response; // Construcción de HTTP responses
pub mod status; // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, ReadError, Request};
pub use response::Response;
pub use status::StatusCode;
