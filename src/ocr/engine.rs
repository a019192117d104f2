//! Character recognition boundary.
//!
//! [`TesseractEngine`] shells out to the `tesseract` binary, configured for
//! a digit/point/minus whitelist and single-block segmentation. The engine
//! sits behind [`SharedEngine`], which owns the process-lifetime singleton:
//! lazy construction coalesced across concurrent first callers, a busy flag
//! covering each recognition, and an explicit release for teardown.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::GrayImage;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Characters the recognizer is allowed to emit.
const CHAR_WHITELIST: &str = "0123456789.-";
/// Page segmentation mode 6: assume a single uniform block of text.
const PAGE_SEG_MODE: &str = "6";

/// A character-recognition capability over enhanced grayscale images.
pub trait OcrEngine: Send + Sync + 'static {
    /// Constructs the engine. Called at most once per process by
    /// [`SharedEngine`]; a failed initialization is retried on the next use.
    fn init() -> impl Future<Output = Result<Self>> + Send
    where
        Self: Sized;

    /// Recognizes text in an enhanced image. The text may be empty.
    fn recognize(&self, image: &GrayImage) -> impl Future<Output = Result<String>> + Send;
}

/// Recognizer backed by the `tesseract` command-line binary.
pub struct TesseractEngine {
    executable: PathBuf,
}

impl OcrEngine for TesseractEngine {
    async fn init() -> Result<Self> {
        let executable = PathBuf::from("tesseract");
        let output = Command::new(&executable)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Engine(format!("tesseract not available: {e}")))?;
        if !output.status.success() {
            return Err(Error::Engine(format!(
                "tesseract --version failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        let version = String::from_utf8_lossy(&output.stdout);
        info!(version = %version.lines().next().unwrap_or(""), "ocr engine ready");
        Ok(Self { executable })
    }

    async fn recognize(&self, image: &GrayImage) -> Result<String> {
        let input = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| Error::Engine(format!("temp image: {e}")))?;
        image
            .save(input.path())
            .map_err(|e| Error::Engine(format!("save temp image: {e}")))?;

        let output = Command::new(&self.executable)
            .arg(input.path())
            .arg("stdout")
            .arg("--psm")
            .arg(PAGE_SEG_MODE)
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={CHAR_WHITELIST}"))
            .arg("-c")
            .arg("preserve_interword_spaces=0")
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Engine(format!("spawn tesseract: {e}")))?;

        if !output.status.success() {
            return Err(Error::Engine(format!(
                "tesseract failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), "recognition complete");
        Ok(text)
    }
}

/// Process-lifetime handle to a lazily constructed, shared engine.
///
/// The slot mutex serializes first use, so concurrent callers wait on a
/// single initialization instead of constructing two engines. `is_busy`
/// reports whether a recognition is in flight; the flag is cleared on every
/// exit path, including failures.
pub struct SharedEngine<E> {
    slot: Mutex<Option<Arc<E>>>,
    busy: AtomicBool,
}

impl<E: OcrEngine> SharedEngine<E> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            busy: AtomicBool::new(false),
        }
    }

    async fn acquire(&self) -> Result<Arc<E>> {
        let mut slot = self.slot.lock().await;
        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }
        let engine = Arc::new(E::init().await?);
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// Recognizes text in an image, initializing the engine on first use.
    pub async fn recognize(&self, image: &GrayImage) -> Result<String> {
        self.busy.store(true, Ordering::SeqCst);
        let result = async {
            let engine = self.acquire().await?;
            engine.recognize(image).await
        }
        .await;
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    /// Whether a recognition (including first-use initialization) is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Releases the engine. The next recognition reinitializes it.
    pub async fn release(&self) {
        *self.slot.lock().await = None;
    }
}

impl<E: OcrEngine> Default for SharedEngine<E> {
    fn default() -> Self {
        Self::new()
    }
}
