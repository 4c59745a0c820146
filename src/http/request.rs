//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo implementa un parser del encabezado HTTP/1.1 desde cero.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /echo/hola HTTP/1.1\r\n
//! Host: localhost:9090\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /target HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea, en orden)
//! 3. **Empty Line**: `\r\n` que cierra el encabezado
//! 4. **Body**: nunca se lee
//!
//! El target se guarda tal cual llega: sin URL decoding y sin separar
//! la query string.

use std::io::{ErrorKind, Read};
use thiserror::Error;

/// Máximo de bytes que se bufferean para el encabezado
pub const MAX_HEAD_BYTES: usize = 1024;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Método HTTP del request
///
/// Solo GET se atiende; el resto se conserva para poder loguearlo y
/// el router lo responde con 405.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// Cualquier otro token (POST, PUT, HEAD, basura...)
    Other(String),
}

impl Method {
    /// Interpreta el token de método. Nunca falla.
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::Other(token) => token,
        }
    }
}

/// Representa el encabezado de un request HTTP ya parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Target crudo (path + query), ej: "/echo/a?b=1"
    target: String,

    /// Headers en el orden en que llegaron
    headers: Vec<(String, String)>,
}

/// Errores que pueden ocurrir durante el parsing del encabezado
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// El cliente cerró antes de mandar el encabezado completo
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    /// La request line no tiene un espacio que separe método y target
    #[error("Malformed request line")]
    MalformedRequestLine,

    /// El buffer se llenó sin encontrar `\r\n\r\n`
    #[error("Request head exceeds {} bytes", MAX_HEAD_BYTES)]
    RequestTooLarge,

    /// Header sin ':'
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// Errores al leer un request desde el socket
#[derive(Debug, Error)]
pub enum ReadError {
    /// El encabezado llegó pero no es HTTP válido
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Falló el socket mientras leíamos
    #[error("socket read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Request {
    /// Lee el encabezado de un request desde un stream
    ///
    /// Acumula hasta [`MAX_HEAD_BYTES`] bytes hasta ver la línea vacía.
    /// Lo que venga después del encabezado (un body) se ignora.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use minihttpd::http::Request;
    /// use std::io::Cursor;
    ///
    /// let mut stream = Cursor::new(b"GET /echo/hi HTTP/1.1\r\nHost: x\r\n\r\n".to_vec());
    /// let request = Request::read_from(&mut stream).unwrap();
    ///
    /// assert_eq!(request.target(), "/echo/hi");
    /// assert_eq!(request.header("Host"), Some("x"));
    /// ```
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ReadError> {
        let mut buffer = [0u8; MAX_HEAD_BYTES];
        let mut filled = 0;

        loop {
            if let Some(end) = find_head_end(&buffer[..filled]) {
                return Ok(Self::parse(&buffer[..end])?);
            }

            if filled == buffer.len() {
                return Err(ParseError::RequestTooLarge.into());
            }

            match reader.read(&mut buffer[filled..]) {
                Ok(0) => return Err(ParseError::IncompleteRequest.into()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReadError::Io(e)),
            }
        }
    }

    /// Parsea un encabezado HTTP ya bufferizado
    ///
    /// El buffer puede incluir o no la línea vacía final.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use minihttpd::http::request::{Method, Request};
    ///
    /// let request = Request::parse(b"POST /files/a HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(request.method(), &Method::Other("POST".to_string()));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Convertir a string (validando que sea UTF-8 válido)
        let head = std::str::from_utf8(buffer).map_err(|_| ParseError::MalformedRequestLine)?;

        let mut lines = head.split("\r\n");

        // 1. Request line
        let request_line = lines.next().unwrap_or_default();
        let (method, target) = Self::parse_request_line(request_line)?;

        // 2. Headers hasta la línea vacía
        let headers = Self::parse_headers(lines)?;

        Ok(Request {
            method,
            target,
            headers,
        })
    }

    /// Formato: `GET /target HTTP/1.1`
    ///
    /// El método es todo lo anterior al primer espacio; el target llega
    /// hasta el siguiente espacio (o al final si no hay versión).
    fn parse_request_line(line: &str) -> Result<(Method, String), ParseError> {
        let (method, rest) = line
            .split_once(' ')
            .ok_or(ParseError::MalformedRequestLine)?;

        let target = rest.split_once(' ').map_or(rest, |(target, _version)| target);

        Ok((Method::from_token(method), target.to_string()))
    }

    /// Cada header tiene formato: "Name: Value"
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<Vec<(String, String)>, ParseError> {
        let mut headers = Vec::new();

        for line in lines {
            if line.is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.push((name.trim().to_string(), value.trim().to_string()));
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el target crudo del request
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Obtiene todos los headers, en orden de llegada
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene el primer header con ese nombre exacto (sensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Posición justo después de `\r\n\r\n`, si ya llegó
fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
        .map(|pos| pos + HEAD_TERMINATOR.len())
}
