//! Two-path shot extraction orchestrator.
//!
//! Path A: a video frame goes through region preprocessing, the shared OCR
//! engine and the numeric classifier. Path B: model content chunks are
//! scanned for the data sentinel and parsed from labeled lines. Both paths
//! reconcile into a [`ShotRecord`] and publish through the same
//! [`SessionStore`], so they may interleave freely.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ocr::{self, OcrEngine, RangeTable, SharedEngine, TesseractEngine};
use crate::parser;
use crate::session::SessionStore;
use crate::shot::{ShotFields, ShotRecord};
use crate::stream::{ContentBus, HandlerId, ServerContent};

struct Inner<E> {
    engine: SharedEngine<E>,
    store: SessionStore,
    table: RangeTable,
}

/// Cloneable handle driving both extraction paths against one session.
pub struct ShotExtractor<E: OcrEngine = TesseractEngine> {
    inner: Arc<Inner<E>>,
}

impl<E: OcrEngine> Clone for ShotExtractor<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: OcrEngine> ShotExtractor<E> {
    /// Creates an extractor over `store` with the default range table.
    pub fn new(store: SessionStore) -> Self {
        Self::with_table(store, RangeTable::default())
    }

    /// Creates an extractor with a custom classification table, for displays
    /// whose value ranges differ from the default layout.
    pub fn with_table(store: SessionStore, table: RangeTable) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine: SharedEngine::new(),
                store,
                table,
            }),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    /// Runs the OCR path over one frame.
    ///
    /// Returns the appended record, or `None` when the frame was unusable,
    /// the engine failed, or nothing classifiable was recognized; never an
    /// error. The processing flag is cleared on every exit path. Repeated
    /// calls while the display is unchanged will record duplicate shots;
    /// there is deliberately no de-duplication here.
    pub async fn extract_from_frame(&self, frame: &RgbaImage) -> Option<ShotRecord> {
        self.inner.store.set_processing(true);
        let record = match self.try_extract(frame).await {
            Ok(Some(fields)) => Some(self.publish(ShotRecord::from_fields(fields)).await),
            Ok(None) => {
                debug!("no shot data recognized in frame");
                None
            }
            Err(e) => {
                warn!(error = %e, "frame extraction failed");
                None
            }
        };
        self.inner.store.set_processing(false);
        record
    }

    async fn try_extract(&self, frame: &RgbaImage) -> Result<Option<ShotFields>> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            // Reject before any preprocessing or OCR call
            return Err(Error::AcquisitionUnavailable { width, height });
        }
        ocr::extract_fields(&self.inner.engine, frame, &self.inner.table).await
    }

    /// Runs the text-response path over one content chunk.
    ///
    /// Only parts carrying the data sentinel are parsed; the first one that
    /// yields fields wins. Finding data also clears the explicit processing
    /// flag, since the answer this chunk delivers is what the trigger was
    /// waiting for.
    pub async fn handle_content(&self, content: &ServerContent) -> Option<ShotRecord> {
        let turn = content.model_turn.as_ref()?;
        for part in &turn.parts {
            let Some(text) = part.text.as_deref() else {
                continue;
            };
            let Some(fields) = parser::parse_response(text) else {
                continue;
            };
            self.inner.store.set_processing(false);
            return Some(self.publish(ShotRecord::from_fields(fields)).await);
        }
        None
    }

    /// Records a manually entered shot through the same reconciler.
    pub async fn add_manual(&self, fields: ShotFields) -> ShotRecord {
        self.publish(ShotRecord::manual(fields)).await
    }

    async fn publish(&self, record: ShotRecord) -> ShotRecord {
        self.inner.store.append(record.clone()).await;
        record
    }

    /// Registers this extractor on a content bus; handlers dispatch onto
    /// the current runtime. Keep the returned id and pass it to
    /// [`ContentBus::unsubscribe`] on teardown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach(&self, bus: &ContentBus) -> HandlerId {
        let extractor = self.clone();
        let runtime = tokio::runtime::Handle::current();
        bus.subscribe(move |content| {
            let extractor = extractor.clone();
            let content = content.clone();
            runtime.spawn(async move {
                extractor.handle_content(&content).await;
            });
        })
    }

    /// Combined busy gate: the explicit trigger flag or an in-flight OCR
    /// call. External triggers are gated on this to prevent overlap.
    pub fn is_processing(&self) -> bool {
        self.inner.store.processing() || self.inner.engine.is_busy()
    }

    /// Releases the OCR engine and cancels the current-shot expiry timer.
    pub async fn shutdown(&self) {
        self.inner.engine.release().await;
        self.inner.store.close().await;
    }
}
