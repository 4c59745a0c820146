//! # Pool de Workers Acotado
//! src/server/pool.rs
//!
//! Un número fijo de threads consume una cola FIFO protegida con
//! `Mutex` + `Condvar`.
//!
//! La admisión es inmediata o nada: como mucho `workers + queue_capacity`
//! items pueden estar en vuelo (esperando o procesándose). Si no hay lugar,
//! [`WorkerPool::try_execute`] devuelve el item para que quien lo envió
//! decida qué hacer con él; nunca bloquea.
//!
//! Un panic dentro del handler se atrapa en el worker, que sigue vivo.

use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Pool de threads que procesa items de tipo `T`
pub struct WorkerPool<T: Send + 'static> {
    shared: Arc<Shared<T>>,
    workers: Vec<JoinHandle<()>>,
}

struct Shared<T> {
    state: Mutex<PoolState<T>>,

    /// Notifica a los workers cuando hay trabajo o shutdown
    condvar: Condvar,

    /// workers + capacidad de la cola
    max_in_flight: usize,
}

struct PoolState<T> {
    queue: VecDeque<T>,

    /// Items encolados + items en proceso
    in_flight: usize,

    shutdown: bool,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, PoolState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cuerpo de un worker, listo para correr en su propio thread
type WorkerBody = Box<dyn FnOnce() + Send + 'static>;

impl<T: Send + 'static> WorkerPool<T> {
    /// Crea el pool y arranca los workers
    ///
    /// `workers` se fuerza a al menos 1. Cada item se entrega a `handler`
    /// en exactamente un worker.
    ///
    /// # Errores
    ///
    /// Si el sistema no puede crear alguno de los threads, los workers que
    /// ya arrancaron se detienen y se esperan antes de retornar el error.
    pub fn new<F>(workers: usize, queue_capacity: usize, handler: F) -> io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::with_spawner(workers, queue_capacity, handler, spawn_named)
    }

    fn with_spawner<F, S>(
        workers: usize,
        queue_capacity: usize,
        handler: F,
        mut spawn: S,
    ) -> io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
        S: FnMut(String, WorkerBody) -> io::Result<JoinHandle<()>>,
    {
        let workers = workers.max(1);
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: VecDeque::with_capacity(queue_capacity),
                in_flight: 0,
                shutdown: false,
            }),
            condvar: Condvar::new(),
            max_in_flight: workers + queue_capacity,
        });
        let handler = Arc::new(handler);

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let name = format!("worker-{}", i);
            let worker_shared = Arc::clone(&shared);
            let worker_handler = Arc::clone(&handler);
            let body_name = name.clone();
            let body: WorkerBody =
                Box::new(move || worker_loop(body_name, worker_shared, worker_handler));

            match spawn(name, body) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!(worker = i, error = %e, "No se pudo crear el worker");
                    stop_workers(&shared, &mut handles);
                    return Err(e);
                }
            }
        }

        Ok(Self {
            shared,
            workers: handles,
        })
    }

    /// Intenta entregar un item al pool sin bloquear
    ///
    /// Retorna `Err(item)` si el pool está lleno o apagándose.
    pub fn try_execute(&self, item: T) -> Result<(), T> {
        let mut state = self.shared.lock();

        if state.shutdown || state.in_flight >= self.shared.max_in_flight {
            return Err(item);
        }

        state.in_flight += 1;
        state.queue.push_back(item);
        drop(state);

        // Notificar a un worker esperando
        self.shared.condvar.notify_one();

        Ok(())
    }

    /// Items esperando o en proceso
    pub fn in_flight(&self) -> usize {
        self.shared.lock().in_flight
    }

    /// Máximo de items en vuelo
    pub fn capacity(&self) -> usize {
        self.shared.max_in_flight
    }

    /// Número de threads del pool
    pub fn workers(&self) -> usize {
        self.workers.len()
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    /// Deja de aceptar trabajo, drena la cola y espera a los workers
    fn drop(&mut self) {
        stop_workers(&self.shared, &mut self.workers);
    }
}

fn spawn_named(name: String, body: WorkerBody) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name(name).spawn(body)
}

/// Marca el shutdown, despierta a todos y espera a que terminen
fn stop_workers<T>(shared: &Shared<T>, handles: &mut Vec<JoinHandle<()>>) {
    shared.lock().shutdown = true;
    shared.condvar.notify_all();

    for handle in handles.drain(..) {
        if handle.join().is_err() {
            error!("Worker terminó con panic");
        }
    }
}

/// Loop principal del worker
fn worker_loop<T, F>(name: String, shared: Arc<Shared<T>>, handler: Arc<F>)
where
    F: Fn(T),
{
    debug!(worker = %name, "Worker iniciado");

    loop {
        // Esperar por un item (o por el shutdown con la cola vacía)
        let item = {
            let mut state = shared.lock();
            loop {
                if let Some(item) = state.queue.pop_front() {
                    break item;
                }
                if state.shutdown {
                    debug!(worker = %name, "Worker detenido");
                    return;
                }
                state = shared
                    .condvar
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        if panic::catch_unwind(AssertUnwindSafe(|| handler(item))).is_err() {
            error!(worker = %name, "Panic procesando una conexión; el worker sigue activo");
        }

        shared.lock().in_flight -= 1;
    }
}
