//! Shot-data extraction for golf launch-monitor displays.
//!
//! Two independent paths feed one session: an OCR path that crops the
//! monitor's data panel out of a video frame, enhances it and classifies
//! the recognized numbers by expected value range, and a text path that
//! parses sentinel-tagged model responses with labeled lines. Both
//! reconcile into canonical [`ShotRecord`]s held in a [`SessionStore`]
//! with persistence, statistics and JSON export.
//!
//! [`ShotRecord`]: shot::ShotRecord
//! [`SessionStore`]: session::SessionStore

pub mod error;
pub mod extractor;
pub mod ocr;
pub mod parser;
pub mod session;
pub mod shot;
pub mod stream;

pub use error::{Error, Result};
pub use extractor::ShotExtractor;
pub use ocr::{OcrEngine, RangeRule, RangeTable, SharedEngine, TesseractEngine};
pub use parser::parse_response;
pub use session::{
    FieldAverages, FileStorage, MemoryStorage, SessionExport, SessionStats, SessionStore,
    ShotStorage,
};
pub use shot::{Field, ShotFields, ShotQuality, ShotRecord, Side};
pub use stream::{ContentBus, ContentPart, HandlerId, ModelTurn, ServerContent};
