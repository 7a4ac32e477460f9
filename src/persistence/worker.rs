/// Background writer: `persist` enqueues and returns immediately, a tokio
/// task performs the blocking I/O. Loads go straight to the inner store and
/// are only done at startup.
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::PersistenceError;
use crate::persistence::store::KeyValueStore;

#[derive(Debug)]
enum WriteCommand {
    Persist { key: String, value: JsonValue },
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct QueuedStore {
    inner: Arc<dyn KeyValueStore>,
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl QueuedStore {
    /// Start the writer task on `runtime`. The task ends once every clone of
    /// the returned store has been dropped and the queue is drained.
    pub fn spawn(inner: Arc<dyn KeyValueStore>, runtime: &Handle) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = runtime.spawn(run_writer(inner.clone(), rx));
        (Self { inner, tx }, task)
    }

    /// Resolves once every write queued before this call has been attempted
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Flush(ack_tx))
            .map_err(|_| PersistenceError::WriterClosed)?;
        ack_rx.await.map_err(|_| PersistenceError::WriterClosed)
    }
}

impl KeyValueStore for QueuedStore {
    fn load(&self, key: &str) -> Result<Option<JsonValue>, PersistenceError> {
        self.inner.load(key)
    }

    fn persist(&self, key: &str, value: &JsonValue) -> Result<(), PersistenceError> {
        self.tx
            .send(WriteCommand::Persist {
                key: key.to_string(),
                value: value.clone(),
            })
            .map_err(|_| PersistenceError::WriterClosed)
    }
}

async fn run_writer(inner: Arc<dyn KeyValueStore>, mut rx: mpsc::UnboundedReceiver<WriteCommand>) {
    info!("Persistence writer started");

    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Persist { key, value } => {
                let store = inner.clone();
                let log_key = key.clone();
                let result = tokio::task::spawn_blocking(move || store.persist(&key, &value)).await;
                match result {
                    Ok(Ok(())) => debug!("Wrote '{}'", log_key),
                    Ok(Err(e)) => error!("Failed to persist '{}': {}", log_key, e),
                    Err(e) => error!("Persistence task for '{}' panicked: {}", log_key, e),
                }
            }
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    info!("Persistence writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::InMemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_writes_reach_inner_store_in_order() {
        let inner = InMemoryStore::new();
        let (store, _task) = QueuedStore::spawn(Arc::new(inner.clone()), &Handle::current());

        store.persist("recipe_memory", &json!({"A": "1"})).unwrap();
        store.persist("recipe_memory", &json!({"A": "2"})).unwrap();
        store.flush().await.unwrap();

        assert_eq!(inner.write_count(), 2);
        assert_eq!(store.load("recipe_memory").unwrap(), Some(json!({"A": "2"})));
    }

    #[tokio::test]
    async fn test_writer_stops_when_store_dropped() {
        let inner = InMemoryStore::new();
        let (store, task) = QueuedStore::spawn(Arc::new(inner.clone()), &Handle::current());
        store.persist("k", &json!(true)).unwrap();
        drop(store);

        task.await.unwrap();
        assert_eq!(inner.write_count(), 1);
    }
}
