//! OCR extraction path: frame → region preprocessing → recognition →
//! numeric classification.

pub mod classify;
pub mod engine;
pub mod preprocess;

pub use classify::{classify_text, RangeRule, RangeTable};
pub use engine::{OcrEngine, SharedEngine, TesseractEngine};
pub use preprocess::{crop_hud_region, enhance_for_ocr, preprocess_frame};

use image::RgbaImage;
use tracing::debug;

use crate::error::Result;
use crate::shot::ShotFields;

/// Runs the full OCR path over one frame.
///
/// The caller has already rejected zero-area frames. `Ok(None)` means the
/// recognizer produced no classifiable tokens, which is not an error.
pub async fn extract_fields<E: OcrEngine>(
    engine: &SharedEngine<E>,
    frame: &RgbaImage,
    table: &RangeTable,
) -> Result<Option<ShotFields>> {
    let enhanced = preprocess_frame(frame);
    debug!(
        width = enhanced.width(),
        height = enhanced.height(),
        "recognizing enhanced HUD region"
    );
    let text = engine.recognize(&enhanced).await?;
    debug!(text = text.trim(), "recognized text");
    Ok(classify_text(&text, table))
}
