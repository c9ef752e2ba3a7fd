//! Media asset pipeline for the Concours portal
//!
//! Uploaded images pass through a fixed pipeline: type and size checks
//! before any decode, orientation normalization, cover-fit resize into the
//! asset class target box, then JPEG re-encode. [`MediaStore`] owns the
//! on-disk layout (`<class-dir>/<random-hex>.jpg`) and the best-effort
//! cleanup side of replacement.

pub mod store;
pub mod transform;

pub use store::{MediaStore, URL_PREFIX};
pub use transform::{
    process, AssetClass, MediaError, ALLOWED_MIME_TYPES, JPEG_QUALITY, MAX_UPLOAD_BYTES,
};
