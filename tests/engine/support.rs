//! Shared fixtures for engine tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use configmaps::{
    CallContext, CreateOptions, Driver, DriverError, DriverOptions, DriverRegistry, Engine, InMemoryDriver,
    LocalEngine, Manager, ManagerConfig,
};

/// A local engine over an in-memory manager whose default driver is `memory`.
pub fn memory_engine() -> LocalEngine {
    memory_engine_with(DriverRegistry::default())
}

pub fn memory_engine_with(drivers: DriverRegistry) -> LocalEngine {
    let config = ManagerConfig::new(std::env::temp_dir()).with_default_driver("memory");
    LocalEngine::new(Arc::new(Manager::ephemeral(config, drivers)))
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub async fn create(engine: &dyn Engine, name: &str, data: &[u8]) -> String {
    engine
        .create(
            &CallContext::background(),
            name,
            &mut Cursor::new(data.to_vec()),
            CreateOptions::default(),
        )
        .await
        .unwrap()
        .id
}

/// Names of every listed configmap, in listing order.
pub async fn listed_names(engine: &dyn Engine) -> Vec<String> {
    engine
        .list(&CallContext::background(), &Default::default())
        .await
        .unwrap()
        .into_iter()
        .map(|report| report.spec.name)
        .collect()
}

/// Bind to port 0, serve `engine` in the background and return the base URL.
#[cfg(feature = "http")]
pub async fn start_server(engine: Arc<dyn Engine>) -> String {
    let app = configmaps::server::router(engine);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A memory driver whose first delete blocks until the test releases it.
pub struct GatedDriver {
    inner: InMemoryDriver,
    started: Mutex<Option<Sender<()>>>,
    release: Mutex<Receiver<()>>,
}

pub struct Gate {
    pub started: Receiver<()>,
    pub release: Sender<()>,
}

impl GatedDriver {
    pub fn new() -> (Self, Gate) {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let driver = GatedDriver {
            inner: InMemoryDriver::new(),
            started: Mutex::new(Some(started_tx)),
            release: Mutex::new(release_rx),
        };
        let gate = Gate {
            started: started_rx,
            release: release_tx,
        };
        (driver, gate)
    }
}

impl Driver for GatedDriver {
    fn put(&self, options: &DriverOptions, id: &str, payload: &[u8]) -> Result<(), DriverError> {
        self.inner.put(options, id, payload)
    }

    fn get(&self, options: &DriverOptions, id: &str) -> Result<Vec<u8>, DriverError> {
        self.inner.get(options, id)
    }

    fn delete(&self, options: &DriverOptions, id: &str) -> Result<(), DriverError> {
        let first = self.started.lock().unwrap().take();
        if let Some(started) = first {
            started.send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
        }
        self.inner.delete(options, id)
    }
}
