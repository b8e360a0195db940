use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{sync_channel, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use uuid::Uuid;

use crate::responder::{MatchType, ResponseBundle};

const QUEUE_CAPACITY: usize = 1024;

/// One processed exchange, written as a single JSON line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub response: String,
    pub match_type: MatchType,
    pub confidence: f64,
}

impl InteractionRecord {
    pub fn new(id: Uuid, user_input: &str, bundle: &ResponseBundle) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            user_input: user_input.to_string(),
            response: bundle.response.clone(),
            match_type: bundle.match_type,
            confidence: bundle.confidence,
        }
    }
}

/// Best-effort append-only sink. A background thread owns the file so a slow
/// or failing disk never holds up a reply.
pub struct InteractionLogger {
    tx: Option<SyncSender<InteractionRecord>>,
    writer: Option<JoinHandle<()>>,
}

impl InteractionLogger {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = sync_channel::<InteractionRecord>(QUEUE_CAPACITY);
        let spawned = thread::Builder::new()
            .name("interaction-log".to_string())
            .spawn(move || {
                let mut sink = AppendSink::new(path);
                for record in rx {
                    if let Err(e) = sink.append(&record) {
                        log::warn!("Dropping interaction record {}: {:#}", record.id, e);
                    }
                }
            });
        match spawned {
            Ok(handle) => Self {
                tx: Some(tx),
                writer: Some(handle),
            },
            Err(e) => {
                log::warn!("Interaction logging disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            tx: None,
            writer: None,
        }
    }

    /// Queues a record without waiting. Never fails.
    pub fn log(&self, id: Uuid, user_input: &str, bundle: &ResponseBundle) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(InteractionRecord::new(id, user_input, bundle)) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                log::warn!("Interaction log queue full, dropping record {}", record.id)
            }
            Err(TrySendError::Disconnected(record)) => {
                log::warn!("Interaction log writer gone, dropping record {}", record.id)
            }
        }
    }

    /// Flushes queued records and stops the writer.
    pub fn close(mut self) {
        self.tx.take();
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                log::warn!("Interaction log writer panicked");
            }
        }
    }
}

/// Append-mode handle kept open between records, reopened after a failure.
struct AppendSink {
    path: PathBuf,
    file: Option<File>,
}

impl AppendSink {
    fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    fn append(&mut self, record: &InteractionRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {:?}", self.path))?,
        };
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        self.file = Some(file);
        Ok(())
    }
}
