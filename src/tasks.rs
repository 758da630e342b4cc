//! Background loading of the candidate collection.
//!
//! The load runs as a tokio task so the picker stays responsive; the result
//! comes back through a channel:
//! 1. `TaskSpawner::spawn_load` starts the fetch
//! 2. The main loop keeps rendering and handling input
//! 3. The task sends a `SourceMessage` when done
//! 4. The main loop drains the channel with `try_recv()` on every iteration

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::entity::Record;
use crate::source::{self, Source, SourceClient, SourceError};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum SourceMessage {
    /// The records finished loading, or the load failed.
    Loaded(Result<Vec<Record>, SourceError>),
}

/// Spawns background tasks on a tokio runtime.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<SourceMessage>,
    handle: Handle,
}

impl TaskSpawner {
    /// Create a spawner sending results through `tx`, running tasks on `handle`.
    pub fn new(tx: mpsc::UnboundedSender<SourceMessage>, handle: Handle) -> Self {
        Self { tx, handle }
    }

    /// Spawn a task loading all records from `source`.
    pub fn spawn_load(&self, source: Source, timeout: Duration) {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = match &source {
                Source::Url(url) => match SourceClient::new(timeout) {
                    Ok(client) => client.fetch(url).await,
                    Err(e) => Err(e),
                },
                Source::File(path) => source::load_file(path).await,
            };
            match &result {
                Ok(records) => info!(source = %source.describe(), count = records.len(), "Load finished"),
                Err(e) => warn!(source = %source.describe(), error = %e, "Load failed"),
            }
            let _ = tx.send(SourceMessage::Loaded(result));
        });
    }
}
