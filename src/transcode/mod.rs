//! On-demand image transcoding.
//!
//! # Pipeline
//!
//! ```text
//! SourceImage::open(path)      decode (format sniffed from content)
//!        │
//!        ▼
//! SourceImage::resize(size)    layout::plan → crop + scale (downscale only)
//!        │
//!        ▼
//! SourceImage::encode(target)  webp / avif
//!        │ on failure
//!        ▼
//! SourceImage::encode_native   png / jpeg / webp (format of the source)
//!        │ on failure
//!        ▼
//! original file, unchanged
//! ```
//!
//! Nothing is written to disk: every request transcodes from the original.

mod encode;
pub mod layout;

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;

use crate::settings::TargetFormat;
use crate::sizes::SizeDefinition;
use crate::utils::mime::types;

/// Transcoding errors
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to open `{0}`")]
    Open(PathBuf, #[source] std::io::Error),

    #[error("unrecognized image format in `{0}`")]
    UnknownFormat(PathBuf),

    #[error("failed to decode `{0}`")]
    Decode(PathBuf, #[source] image::ImageError),

    #[error("failed to encode {format}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode webp: {0}")]
    Webp(String),

    #[error("failed to encode avif: {0}")]
    Avif(String),

    #[error("no encoder for {0:?}")]
    Unsupported(ImageFormat),
}

/// Encoded output and its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// A decoded source image, ready to resize and encode.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl SourceImage {
    /// Decode the file at `path`.
    ///
    /// Fails for missing files, unknown formats and corrupt data.
    pub fn open(path: &Path) -> Result<Self, TranscodeError> {
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| TranscodeError::Open(path.to_path_buf(), err))?;

        let format = reader
            .format()
            .ok_or_else(|| TranscodeError::UnknownFormat(path.to_path_buf()))?;
        let image = reader
            .decode()
            .map_err(|err| TranscodeError::Decode(path.to_path_buf(), err))?;

        Ok(Self { image, format })
    }

    #[cfg(test)]
    pub fn from_image(image: DynamicImage, format: ImageFormat) -> Self {
        Self { image, format }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Resize to `size`. Returns `false` when the size leaves the image
    /// unchanged (no box, or the source already fits).
    pub fn resize(&mut self, size: &SizeDefinition) -> bool {
        let (width, height) = self.dimensions();
        let Some(planned) = layout::plan(width, height, size) else {
            return false;
        };
        let image = std::mem::replace(&mut self.image, DynamicImage::new_rgb8(0, 0));
        self.image = layout::apply(image, &planned);
        true
    }

    /// Encode in the configured target format.
    pub fn encode(&self, target: TargetFormat, quality: u8) -> Result<Encoded, TranscodeError> {
        let bytes = match target {
            TargetFormat::WebP => encode::webp(&self.image, quality)?,
            TargetFormat::Avif => encode::avif(&self.image, quality)?,
        };
        Ok(Encoded {
            bytes,
            mime_type: target.mime(),
        })
    }

    /// Encode in the format the source was decoded from.
    pub fn encode_native(&self, quality: u8) -> Result<Encoded, TranscodeError> {
        let (bytes, mime_type) = match self.format {
            ImageFormat::Jpeg => (encode::jpeg(&self.image, quality)?, types::JPEG),
            ImageFormat::Png => (encode::png(&self.image)?, types::PNG),
            ImageFormat::WebP => (encode::webp(&self.image, quality)?, types::WEBP),
            other => return Err(TranscodeError::Unsupported(other)),
        };
        Ok(Encoded { bytes, mime_type })
    }
}
