//! Text recognition boundary.
//!
//! The pipeline only sees [`TextExtractor`]. The bundled implementation
//! shells out to the `tesseract` executable, and nothing checks for it until
//! the first image is recognized, so media-only runs never need it.

use crate::config::OcrSettings;
use crate::error::{ConvertError, Result};
use crate::types::{MediaFile, Pair};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Turns one image into text.
pub trait TextExtractor {
    /// Engine identifier.
    fn name(&self) -> &str;

    /// Recognized text, returned as produced by the engine.
    fn extract(&self, image: &Path) -> Result<String>;
}

/// Tesseract command-line engine.
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    binary: PathBuf,
    lang: String,
}

impl TesseractExtractor {
    pub fn new(settings: &OcrSettings) -> Self {
        Self {
            binary: settings.binary.clone(),
            lang: settings.lang.clone(),
        }
    }

    fn missing(&self) -> ConvertError {
        ConvertError::DependencyMissing {
            engine: self.binary.display().to_string(),
            remedy: "install Tesseract OCR (e.g. `apt install tesseract-ocr` or \
                     `brew install tesseract`) or point SNAPDECK_TESSERACT at the executable"
                .to_string(),
        }
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new(&OcrSettings::default())
    }
}

impl TextExtractor for TesseractExtractor {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn extract(&self, image: &Path) -> Result<String> {
        if !image.is_file() {
            return Err(ConvertError::io(
                image,
                std::io::Error::new(ErrorKind::NotFound, "image not found"),
            ));
        }

        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => self.missing(),
                _ => ConvertError::io(&self.binary, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Recognition {
                path: image.to_path_buf(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Recognize both sides of every pair, preserving order.
pub fn extract_pairs(
    pairs: Vec<Pair<MediaFile>>,
    extractor: &dyn TextExtractor,
) -> Result<Vec<Pair<String>>> {
    pairs
        .into_iter()
        .map(|pair| pair.try_map(|file| extractor.extract(file.path())))
        .collect()
}
