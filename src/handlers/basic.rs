//! # Handlers Básicos
//! src/handlers/basic.rs
//!
//! - `/`: Health check
//! - `/echo/{texto}`: Devuelve el texto tal cual
//! - `/user-agent`: Refleja el header User-Agent
//! - 404 y 405 para todo lo demás

use crate::http::{Request, Response, StatusCode};

/// Handler para `/`
pub fn root_handler() -> Response {
    Response::plain(StatusCode::Ok, "OK\n")
}

/// Handler para `/echo/{texto}`
///
/// El texto es lo que sigue a `/echo/`, sin decodificar. El body es
/// siempre ese texto, sin importar lo que pida `Accept-Encoding`.
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
/// Echo-Length: 4
/// Content-Length: 4
///
/// hola
/// ```
pub fn echo_handler(text: &str) -> Response {
    Response::new(StatusCode::Ok)
        .with_header("Content-Type", "text/plain")
        .with_header("Echo-Length", &text.len().to_string())
        .with_body(text)
}

/// Handler para `/user-agent`
///
/// Busca el header `User-Agent` con ese nombre exacto.
pub fn user_agent_handler(request: &Request) -> Response {
    match request.header("User-Agent") {
        Some(agent) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("Content-Length", &agent.len().to_string())
            .with_body(agent),
        None => Response::plain(StatusCode::BadRequest, "No User-Agent header provided\n"),
    }
}

/// Handler para rutas que no existen
pub fn not_found_handler() -> Response {
    Response::plain(StatusCode::NotFound, "NOT FOUND\n")
}

/// Handler para cualquier método distinto de GET
pub fn method_not_allowed_handler() -> Response {
    Response::plain(StatusCode::MethodNotAllowed, "METHOD NOT ALLOWED\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> Request {
        Request::parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_root() {
        let response = root_handler();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"OK\n");
        assert!(response.headers().is_empty());
    }

    #[test]
    fn test_echo() {
        let response = echo_handler("abc");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("Echo-Length"), Some("3"));
        assert_eq!(response.header("Content-Encoding"), None);
        assert_eq!(response.body(), b"abc");
    }

    #[test]
    fn test_echo_empty() {
        let response = echo_handler("");

        assert_eq!(response.header("Echo-Length"), Some("0"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_user_agent() {
        let req = request("GET /user-agent HTTP/1.1\r\nUser-Agent: foo\r\n\r\n");
        let response = user_agent_handler(&req);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("Content-Length"), Some("3"));
        assert_eq!(response.body(), b"foo");
    }

    #[test]
    fn test_user_agent_missing() {
        let req = request("GET /user-agent HTTP/1.1\r\nuser-agent: foo\r\n\r\n");
        let response = user_agent_handler(&req);

        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(response.body(), b"No User-Agent header provided\n");
    }

    #[test]
    fn test_not_found_and_method_not_allowed() {
        let not_found = not_found_handler();
        assert_eq!(not_found.status(), StatusCode::NotFound);
        assert_eq!(not_found.body(), b"NOT FOUND\n");

        let not_allowed = method_not_allowed_handler();
        assert_eq!(not_allowed.status(), StatusCode::MethodNotAllowed);
        assert_eq!(not_allowed.body(), b"METHOD NOT ALLOWED\n");
    }
}
