//! HUD region preprocessing for character recognition.
//!
//! The simulator draws its data panel in a fixed zone: the left quarter of
//! the frame, excluding the bottom strip where playback controls sit. The
//! pipeline crops that zone, upscales it, and pushes pixel brightness toward
//! black/white so digits stand out for the recognizer.

use image::imageops::FilterType;
use image::{imageops, GrayImage, RgbaImage};

/// Fraction of the frame width occupied by the data panel.
const HUD_WIDTH_FRACTION: f32 = 0.25;
/// Fraction of the frame height above the playback controls.
const HUD_HEIGHT_FRACTION: f32 = 0.8;
/// Upscale factor applied before recognition.
const UPSCALE: u32 = 3;
/// Channel means above this become pure white.
const WHITE_CUTOFF: f32 = 140.0;
/// Channel means below this become pure black.
const BLACK_CUTOFF: f32 = 60.0;

/// Crops the fixed HUD zone from the top-left of a frame.
///
/// Callers reject zero-area frames before this stage; for very small frames
/// the crop is clamped to at least one pixel.
pub fn crop_hud_region(frame: &RgbaImage) -> RgbaImage {
    let (width, height) = frame.dimensions();
    let crop_w = ((width as f32 * HUD_WIDTH_FRACTION) as u32).max(1);
    let crop_h = ((height as f32 * HUD_HEIGHT_FRACTION) as u32).max(1);
    imageops::crop_imm(frame, 0, 0, crop_w, crop_h).to_image()
}

/// Upscales a cropped region and applies threshold-based contrast
/// enhancement, returning the grayscale image handed to the recognizer.
///
/// Each output pixel is the mean of the source RGB channels, snapped to
/// white above [`WHITE_CUTOFF`], to black below [`BLACK_CUTOFF`], and left
/// unchanged in between.
pub fn enhance_for_ocr(region: &RgbaImage) -> GrayImage {
    let (width, height) = region.dimensions();
    let scaled = imageops::resize(
        region,
        width * UPSCALE,
        height * UPSCALE,
        FilterType::Lanczos3,
    );

    let mut output = GrayImage::new(scaled.width(), scaled.height());
    for (x, y, pixel) in scaled.enumerate_pixels() {
        let mean = (pixel[0] as f32 + pixel[1] as f32 + pixel[2] as f32) / 3.0;
        let value = if mean > WHITE_CUTOFF {
            255
        } else if mean < BLACK_CUTOFF {
            0
        } else {
            mean.round() as u8
        };
        output.put_pixel(x, y, image::Luma([value]));
    }
    output
}

/// Full preprocessing pipeline: crop, upscale, enhance.
pub fn preprocess_frame(frame: &RgbaImage) -> GrayImage {
    enhance_for_ocr(&crop_hud_region(frame))
}
