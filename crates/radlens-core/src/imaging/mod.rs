//! Medical image loading: validation, decoding, preparation, quality.
//!
//! ```text
//! File → Validate (size, magic bytes) → Decode (JPG/PNG/DICOM) →
//! Quality check (Laplacian variance) → Prepare (downscale + PNG encode)
//! ```

mod decode;
mod dicom;
mod prepare;
mod quality;
mod validate;

pub use decode::{ImageDecoder, LoadedImage};
pub use prepare::{ImagePreparer, PreparedImage};
pub use quality::{check_sharpness, laplacian_variance};
pub use validate::{SniffedKind, Validator};
