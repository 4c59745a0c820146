//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.1 y serializarlas al socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Echo-Length: 4\r\n
//! Content-Length: 4\r\n
//! \r\n
//! hola
//! ```
//!
//! Los headers salen en el orden en que se declararon. `Content-Length`
//! lo calcula siempre el writer a partir del body, nunca el handler.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use minihttpd::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("hola");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"Content-Length: 4\r\n\r\nhola"));
//! ```

use super::StatusCode;
use std::io::{self, Write};

const CONTENT_LENGTH: &str = "Content-Length";

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en orden de declaración (sin Content-Length)
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta con body de texto y sin headers extra
    ///
    /// # Ejemplo
    /// ```
    /// use minihttpd::http::{Response, StatusCode};
    ///
    /// let response = Response::plain(StatusCode::NotFound, "NOT FOUND\n");
    /// assert_eq!(response.body(), b"NOT FOUND\n");
    /// ```
    pub fn plain(status: StatusCode, body: &str) -> Self {
        Self::new(status).with_body(body)
    }

    /// Agrega un header al final de la lista
    ///
    /// Un `Content-Length` declarado aquí se ignora al serializar.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para archivos binarios y bodies comprimidos.
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers declarados: `Name: Value\r\n`
    /// - `Content-Length` calculado
    /// - Línea vacía y body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
                continue;
            }
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(format!("{}: {}\r\n", CONTENT_LENGTH, self.body.len()).as_bytes());
        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Escribe la respuesta completa en una sola escritura lógica
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene los headers declarados, en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene el primer header con ese nombre
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_headers_keep_declaration_order() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("Echo-Length", "3")
            .with_body("abc");

        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nEcho-Length: 3\r\nContent-Length: 3\r\n\r\nabc"
        );
    }

    #[test]
    fn test_content_length_is_always_computed() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Length", "999")
            .with_body("foo");

        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert_eq!(text.matches("Content-Length").count(), 1);
        assert!(text.contains("Content-Length: 3\r\n"));
    }

    #[test]
    fn test_empty_body_response() {
        let text = String::from_utf8(Response::new(StatusCode::BadRequest).to_bytes()).unwrap();
        assert_eq!(text, "HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_with_body_bytes() {
        let binary_data = vec![0x00, 0x01, 0x02, 0xFF];
        let response = Response::new(StatusCode::Ok).with_body_bytes(binary_data.clone());

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&[b'\r', b'\n', 0x00, 0x01, 0x02, 0xFF]));
        assert_eq!(response.body(), &binary_data[..]);
    }

    #[test]
    fn test_write_to() {
        let mut sink = Vec::new();
        Response::plain(StatusCode::Ok, "OK\n").write_to(&mut sink).unwrap();
        assert_eq!(sink, b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\nOK\n");
    }

    #[test]
    fn test_header_lookup() {
        let response = Response::new(StatusCode::Ok).with_header("Content-Type", "text/plain");
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("Echo-Length"), None);
    }
}
