//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones y las entrega a un pool fijo de workers
//! 3. Lee, enruta y responde un request por conexión
//! 4. Cierra cada conexión después de responder

pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use pool::WorkerPool;
pub use tcp::Server;
