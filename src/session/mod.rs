//! Session store: ordered shot history, current-shot lifetime, statistics
//! and persistence.
//!
//! The store is a cheap cloneable handle; every mutation goes through one
//! internal lock so the two extraction paths can interleave freely without
//! tearing an append. Persistence is best-effort: storage failures are
//! logged and the in-memory session continues.

pub mod export;
pub mod stats;
pub mod storage;

pub use export::SessionExport;
pub use stats::{FieldAverages, SessionStats};
pub use storage::{FileStorage, MemoryStorage, ShotStorage};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::Result;
use crate::shot::ShotRecord;

/// Storage key holding the JSON-encoded history array.
pub const HISTORY_KEY: &str = "golf-shots";

/// How long a freshly appended shot stays published as the current shot.
const CURRENT_SHOT_TTL: Duration = Duration::from_secs(3);

struct State {
    /// Newest first.
    history: Vec<ShotRecord>,
    current_shot: Option<ShotRecord>,
    /// Pending expiry timer for the current shot.
    expiry: Option<JoinHandle<()>>,
    /// Bumped on every append; a stale timer must not clear a newer shot.
    generation: u64,
}

struct Inner {
    state: Mutex<State>,
    storage: Arc<dyn ShotStorage>,
    processing: AtomicBool,
}

/// Cloneable handle to the shared session state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Opens the store, loading any persisted history once.
    ///
    /// Missing or unparseable stored content is an empty history, never a
    /// startup fault.
    pub fn open(storage: Arc<dyn ShotStorage>) -> Self {
        let history = match storage.load(HISTORY_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<ShotRecord>>(&json) {
                Ok(history) => history,
                Err(e) => {
                    warn!(error = %e, "persisted history unparseable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load persisted history, starting empty");
                Vec::new()
            }
        };
        info!(shots = history.len(), "session store opened");

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    history,
                    current_shot: None,
                    expiry: None,
                    generation: 0,
                }),
                storage,
                processing: AtomicBool::new(false),
            }),
        }
    }

    /// Appends a record as the new history head and republishes it as the
    /// current shot, restarting the expiry timer.
    pub async fn append(&self, record: ShotRecord) {
        let mut state = self.inner.state.lock().await;
        state.history.insert(0, record.clone());
        state.current_shot = Some(record);
        state.generation += 1;

        if let Some(timer) = state.expiry.take() {
            timer.abort();
        }
        let generation = state.generation;
        let store = self.clone();
        state.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(CURRENT_SHOT_TTL).await;
            store.expire_current(generation).await;
        }));

        self.persist(&state.history);
    }

    async fn expire_current(&self, generation: u64) {
        let mut state = self.inner.state.lock().await;
        if state.generation == generation {
            state.current_shot = None;
        }
    }

    /// Best-effort write of the full history.
    fn persist(&self, history: &[ShotRecord]) {
        let json = match serde_json::to_string(history) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize history");
                return;
            }
        };
        if let Err(e) = self.inner.storage.save(HISTORY_KEY, &json) {
            warn!(error = %e, "failed to persist history, continuing in memory");
        }
    }

    /// Empties history, the current shot, the processing flag and the
    /// persisted copy.
    pub async fn clear(&self) {
        let mut state = self.inner.state.lock().await;
        state.history.clear();
        state.current_shot = None;
        if let Some(timer) = state.expiry.take() {
            timer.abort();
        }
        drop(state);

        self.inner.processing.store(false, Ordering::SeqCst);
        if let Err(e) = self.inner.storage.remove(HISTORY_KEY) {
            warn!(error = %e, "failed to remove persisted history");
        }
    }

    /// Snapshot of the history, newest first.
    pub async fn history(&self) -> Vec<ShotRecord> {
        self.inner.state.lock().await.history.clone()
    }

    /// The shot appended within the last three seconds, if any.
    pub async fn current_shot(&self) -> Option<ShotRecord> {
        self.inner.state.lock().await.current_shot.clone()
    }

    /// Aggregate statistics; `None` while the history is empty.
    pub async fn stats(&self) -> Option<SessionStats> {
        let state = self.inner.state.lock().await;
        stats::compute(&state.history)
    }

    /// Pretty-printed JSON of the full history with a dated filename.
    pub async fn export(&self) -> Result<SessionExport> {
        let state = self.inner.state.lock().await;
        export::export_history(&state.history)
    }

    /// Cancels the pending current-shot expiry. Call on teardown so a late
    /// timer cannot touch a store the owner has dropped interest in.
    pub async fn close(&self) {
        let mut state = self.inner.state.lock().await;
        if let Some(timer) = state.expiry.take() {
            timer.abort();
        }
    }

    /// Raises or clears the explicit extraction-in-progress flag.
    pub fn set_processing(&self, processing: bool) {
        self.inner.processing.store(processing, Ordering::SeqCst);
    }

    /// The explicit flag only; the combined busy gate lives on the
    /// extractor, which also sees the OCR engine.
    pub fn processing(&self) -> bool {
        self.inner.processing.load(Ordering::SeqCst)
    }
}
