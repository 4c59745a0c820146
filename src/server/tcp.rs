//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Loop de accept + pipeline por conexión. El thread principal solo acepta
//! sockets y los entrega al [`WorkerPool`]; cada worker hace el recorrido
//! completo de una conexión:
//!
//! ```text
//! read_from → resolve/dispatch → write_to → close
//! ```
//!
//! Toda conexión aceptada se cierra exactamente una vez. Si el pool está
//! lleno, el mismo loop de accept responde 500 y cierra sin esperar.

use super::pool::WorkerPool;
use crate::config::{Config, ServerConfig};
use crate::error::ServerError;
use crate::http::{ReadError, Request, Response, StatusCode};
use crate::router;
use std::io;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

/// Una conexión aceptada, en camino a un worker
pub struct Connection {
    id: u64,
    peer: String,
    stream: TcpStream,
}

impl Connection {
    fn new(id: u64, stream: TcpStream) -> Self {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        Self { id, peer, stream }
    }

    /// Responde 500 sin leer el request y cierra
    fn reject(self) {
        let Connection { mut stream, .. } = self;
        send(&mut stream, &Response::new(StatusCode::InternalServerError));
        close(stream);
    }
}

/// Servidor HTTP/1.1 con pool de workers acotado
pub struct Server {
    listener: TcpListener,
    pool: WorkerPool<Connection>,
    next_id: u64,
}

impl Server {
    /// Abre el puerto y arranca los workers
    ///
    /// # Errores
    ///
    /// [`ServerError::Bind`] si el puerto no se puede abrir. En Unix,
    /// `TcpListener::bind` ya habilita `SO_REUSEADDR`.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::InvalidConfig)?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        let server_config = Arc::new(config.server_config());
        let pool = WorkerPool::new(
            config.workers,
            config.queue_capacity,
            move |connection: Connection| handle_connection(connection, &server_config),
        )?;

        info!(
            address = %listener.local_addr()?,
            workers = pool.workers(),
            capacity = pool.capacity(),
            "Servidor escuchando"
        );

        Ok(Self {
            listener,
            pool,
            next_id: 0,
        })
    }

    /// Dirección real en la que quedó escuchando (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Acepta conexiones para siempre
    ///
    /// No retorna: un error de accept se loguea y el loop sigue. El proceso
    /// termina solo desde afuera.
    pub fn run(&mut self) -> ! {
        loop {
            match self.listener.accept() {
                Ok((stream, _)) => self.dispatch(stream),
                Err(e) => warn!(error = %e, "Error al aceptar conexión"),
            }
        }
    }

    /// Entrega la conexión al pool o la rechaza con 500
    fn dispatch(&mut self, stream: TcpStream) {
        self.next_id += 1;
        let connection = Connection::new(self.next_id, stream);
        debug!(conn = connection.id, peer = %connection.peer, "Nueva conexión");

        if let Err(connection) = self.pool.try_execute(connection) {
            warn!(
                conn = connection.id,
                peer = %connection.peer,
                in_flight = self.pool.in_flight(),
                "Pool saturado, respondiendo 500"
            );
            connection.reject();
        }
    }
}

/// Pipeline completo de una conexión dentro de un worker
fn handle_connection(connection: Connection, config: &ServerConfig) {
    let span = info_span!("connection", id = connection.id, peer = %connection.peer);
    let _enter = span.enter();

    let Connection { mut stream, .. } = connection;
    let start = Instant::now();

    let request = match Request::read_from(&mut stream) {
        Ok(request) => request,
        Err(ReadError::Parse(e)) => {
            warn!(error = %e, "Request inválido, respondiendo 400");
            send(&mut stream, &Response::new(StatusCode::BadRequest));
            close(stream);
            return;
        }
        Err(ReadError::Io(e)) => {
            warn!(error = %e, "Error leyendo del socket, se abandona la conexión");
            close(stream);
            return;
        }
    };

    let response = panic::catch_unwind(AssertUnwindSafe(|| router::dispatch(&request, config)))
        .unwrap_or_else(|_| {
            error!(uri = request.target(), "Panic en el handler, respondiendo 500");
            Response::new(StatusCode::InternalServerError)
        });

    if send(&mut stream, &response) {
        let status = response.status();
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        if status.is_server_error() {
            warn!(
                method = request.method().as_str(),
                uri = request.target(),
                status = status.as_u16(),
                latency_ms,
                "Request atendido"
            );
        } else {
            info!(
                method = request.method().as_str(),
                uri = request.target(),
                status = status.as_u16(),
                latency_ms,
                "Request atendido"
            );
        }
    }

    close(stream);
}

/// Escribe la respuesta; si el cliente ya se fue, solo se loguea
fn send(stream: &mut TcpStream, response: &Response) -> bool {
    match response.write_to(stream) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                error = %e,
                status = response.status().as_u16(),
                "No se pudo escribir la respuesta"
            );
            false
        }
    }
}

fn close(stream: TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        debug!(error = %e, "Shutdown del socket falló");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::thread;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    /// Acepta una conexión, la procesa con `handle_connection` y retorna
    /// lo que recibió el cliente
    fn roundtrip(raw: &[u8], config: ServerConfig) -> String {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(Connection::new(1, stream), &config);
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        server.join().unwrap();

        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_handle_connection_root() {
        let text = roundtrip(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n", ServerConfig::default());
        assert_eq!(text, "HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\nOK\n");
    }

    #[test]
    fn test_handle_connection_parse_error() {
        let text = roundtrip(b"GARBAGE\r\n\r\n", ServerConfig::default());
        assert_eq!(text, "HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_handle_connection_incomplete_head() {
        let text = roundtrip(b"GET / HTTP/1.1\r\nHost: x\r\n", ServerConfig::default());
        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            // El peer no manda nada: EOF → 400 que nadie lee, sin panic
            handle_connection(Connection::new(1, stream), &ServerConfig::default());
        });

        drop(TcpStream::connect(addr).unwrap());
        server.join().unwrap();
    }

    #[test]
    fn test_reject_writes_500() {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            Connection::new(7, stream).reject();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        server.join().unwrap();

        assert_eq!(
            String::from_utf8_lossy(&buf),
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn test_bind_rejects_zero_workers() {
        let mut config = Config::default();
        config.port = 0;
        config.workers = 0;

        assert!(matches!(Server::bind(config), Err(ServerError::InvalidConfig(_))));
    }

    #[test]
    fn test_bind_fails_on_taken_port() {
        let taken = ephemeral_listener();
        let mut config = Config::default();
        config.port = taken.local_addr().unwrap().port();

        assert!(matches!(Server::bind(config), Err(ServerError::Bind { .. })));
    }
}
