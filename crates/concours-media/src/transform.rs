//! Image normalization pipeline: validate, decode, orient, resize, re-encode

use std::io::Cursor;

use image::{
    codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, ImageDecoder, ImageReader,
};
use thiserror::Error;

/// MIME types accepted at the transport boundary
pub const ALLOWED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload size ceiling, checked before any decode work
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Quality of the canonical JPEG output
pub const JPEG_QUALITY: u8 = 85;

/// Asset class: decides the target box and the storage subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    /// User profile photo, square
    Avatar,
    /// Vehicle photo, wide
    Vehicle,
    /// Site background image
    Background,
}

impl AssetClass {
    /// Storage subdirectory under the media root
    pub const fn dir(&self) -> &'static str {
        match self {
            AssetClass::Avatar => "avatars",
            AssetClass::Vehicle => "vehicles",
            AssetClass::Background => "backgrounds",
        }
    }

    /// Target box (width, height) the source is cover-fitted into
    pub const fn target(&self) -> (u32, u32) {
        match self {
            AssetClass::Avatar => (512, 512),
            AssetClass::Vehicle => (1024, 640),
            AssetClass::Background => (1920, 1080),
        }
    }
}

/// Media pipeline errors
#[derive(Debug, Error)]
pub enum MediaError {
    /// The request carried no file data
    #[error("No file was uploaded")]
    MissingFile,

    /// Declared content type outside the allow-list
    #[error("Unsupported file type '{0}': only JPEG, PNG, GIF and WebP images are accepted")]
    UnsupportedType(String),

    /// Payload above the size ceiling
    #[error("File is too large ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    /// The image could not be decoded or transformed
    #[error("Could not process image: {0}")]
    Processing(String),

    /// Disk write failure
    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the full transform pipeline over raw upload bytes
///
/// Type and size checks run before any decode so a hostile payload costs no
/// decode work. The output is always an upright JPEG filling the class box
/// (cover fit: crop overflow, preserve aspect ratio, center anchor).
pub fn process(
    data: &[u8],
    content_type: &str,
    class: AssetClass,
) -> Result<Vec<u8>, MediaError> {
    if data.is_empty() {
        return Err(MediaError::MissingFile);
    }

    if !ALLOWED_MIME_TYPES.contains(&content_type) {
        return Err(MediaError::UnsupportedType(content_type.to_string()));
    }

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(MediaError::TooLarge {
            size: data.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    // Sniff the real format rather than trusting the declared type
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| MediaError::Processing(e.to_string()))?;

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| MediaError::Processing(e.to_string()))?;

    // Capture the EXIF orientation before the decoder is consumed; the
    // stored file carries upright pixels and no metadata.
    let orientation = decoder
        .orientation()
        .map_err(|e| MediaError::Processing(e.to_string()))?;

    let mut img = DynamicImage::from_decoder(decoder)
        .map_err(|e| MediaError::Processing(e.to_string()))?;
    img.apply_orientation(orientation);

    let (width, height) = class.target();
    let resized = img.resize_to_fill(width, height, FilterType::Lanczos3);

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| MediaError::Processing(e.to_string()))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    /// In-memory PNG of the given size
    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .expect("Failed to encode test image");
        out
    }

    #[test]
    fn test_empty_payload_is_missing_file() {
        let result = process(&[], "image/png", AssetClass::Avatar);
        assert!(matches!(result, Err(MediaError::MissingFile)));
    }

    #[test]
    fn test_disallowed_type_rejected_before_decode() {
        // Valid image bytes under a disallowed declared type must be turned
        // away by the allow-list, not by the decoder.
        let png = sample_png(16, 16);
        let result = process(&png, "text/plain", AssetClass::Avatar);
        assert!(matches!(result, Err(MediaError::UnsupportedType(t)) if t == "text/plain"));

        let result = process(b"hello world", "application/pdf", AssetClass::Avatar);
        assert!(matches!(result, Err(MediaError::UnsupportedType(_))));
    }

    #[test]
    fn test_oversized_payload_rejected_before_decode() {
        // Garbage content: if the size check did not run first this would
        // surface as a processing error instead.
        let oversized = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let result = process(&oversized, "image/jpeg", AssetClass::Avatar);
        assert!(matches!(
            result,
            Err(MediaError::TooLarge { size, limit })
                if size == MAX_UPLOAD_BYTES + 1 && limit == MAX_UPLOAD_BYTES
        ));
    }

    #[test]
    fn test_corrupt_image_is_processing_error() {
        let result = process(&[0xFF, 0xD8, 0x00, 0x01, 0x02], "image/jpeg", AssetClass::Avatar);
        assert!(matches!(result, Err(MediaError::Processing(_))));
    }

    #[test]
    fn test_output_is_jpeg_at_class_box() {
        let png = sample_png(800, 600);
        let jpeg = process(&png, "image/png", AssetClass::Avatar).expect("Pipeline failed");

        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&jpeg).expect("Output must decode");
        assert_eq!((decoded.width(), decoded.height()), AssetClass::Avatar.target());
    }

    #[test]
    fn test_cover_fit_crops_instead_of_letterboxing() {
        // A very wide source must fill the square box exactly
        let png = sample_png(1000, 100);
        let jpeg = process(&png, "image/png", AssetClass::Avatar).expect("Pipeline failed");
        let decoded = image::load_from_memory(&jpeg).expect("Output must decode");
        assert_eq!((decoded.width(), decoded.height()), (512, 512));
    }

    #[test]
    fn test_vehicle_and_background_boxes() {
        let png = sample_png(640, 480);

        let vehicle = process(&png, "image/png", AssetClass::Vehicle).expect("Pipeline failed");
        let decoded = image::load_from_memory(&vehicle).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 640));

        let background =
            process(&png, "image/png", AssetClass::Background).expect("Pipeline failed");
        let decoded = image::load_from_memory(&background).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1920, 1080));
    }

    #[test]
    fn test_jpeg_input_round_trips() {
        // Canonical output format fed back in is still accepted
        let png = sample_png(100, 100);
        let first = process(&png, "image/png", AssetClass::Avatar).expect("Pipeline failed");
        let second = process(&first, "image/jpeg", AssetClass::Avatar).expect("Pipeline failed");
        assert_eq!(&second[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_class_directories_are_distinct() {
        assert_eq!(AssetClass::Avatar.dir(), "avatars");
        assert_eq!(AssetClass::Vehicle.dir(), "vehicles");
        assert_eq!(AssetClass::Background.dir(), "backgrounds");
    }
}
