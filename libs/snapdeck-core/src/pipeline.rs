//! The conversion pipeline shared by every entry point.
//!
//! Enumerate, validate, pair, optionally recognize text, assemble, write.
//! Everything before the package write is side-effect free, so a failure
//! leaves the filesystem untouched.

use crate::assemble::{assemble_media_deck, assemble_text_deck};
use crate::config::ConvertConfig;
use crate::enumerate::{enumerate_media, ordering_for, MediaOrdering};
use crate::error::{ConvertError, Result};
use crate::ids::{IdGenerator, RandomIds};
use crate::ocr::{extract_pairs, TesseractExtractor, TextExtractor};
use crate::package::PackageWriter;
use crate::pairing::pair_up;
use crate::types::{CardTemplate, Package};
use serde::Serialize;
use std::path::PathBuf;

/// The three inputs of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub image_dir: PathBuf,
    pub deck_name: String,
    pub ocr: bool,
}

impl ConversionRequest {
    /// Surrounding whitespace is removed from the deck name here, so every
    /// entry point names the deck and its package the same way.
    pub fn new(image_dir: impl Into<PathBuf>, deck_name: impl Into<String>, ocr: bool) -> Self {
        Self {
            image_dir: image_dir.into(),
            deck_name: deck_name.into().trim().to_string(),
            ocr,
        }
    }

    /// Check arguments before touching the image directory.
    pub fn validate(&self) -> Result<()> {
        let name = self.deck_name.as_str();
        if name.is_empty() {
            return Err(ConvertError::Argument("deck name must not be empty".to_string()));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ConvertError::Argument(format!(
                "deck name '{}' cannot be used as a file name",
                self.deck_name
            )));
        }
        if !self.image_dir.is_dir() {
            return Err(ConvertError::Argument(format!(
                "image directory does not exist: {}",
                self.image_dir.display()
            )));
        }
        Ok(())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub output: PathBuf,
    pub deck_id: i64,
    pub deck_name: String,
    pub note_count: usize,
    pub media_count: usize,
    pub template: CardTemplate,
    /// Field values per note, in deck order.
    pub notes: Vec<Vec<String>>,
    /// Base names of the embedded media files.
    pub media: Vec<String>,
}

/// Conversion pipeline with injectable ordering, OCR engine and ids.
pub struct Pipeline {
    config: ConvertConfig,
    ordering: Box<dyn MediaOrdering>,
    extractor: Box<dyn TextExtractor>,
    ids: Box<dyn IdGenerator>,
}

impl Pipeline {
    /// Pipeline using the configured ordering, Tesseract, and random ids.
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            ordering: ordering_for(config.order),
            extractor: Box::new(TesseractExtractor::new(&config.ocr)),
            ids: Box::new(RandomIds),
            config,
        }
    }

    pub fn with_ordering(mut self, ordering: impl MediaOrdering + 'static) -> Self {
        self.ordering = Box::new(ordering);
        self
    }

    pub fn with_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Run one conversion.
    pub fn run(&mut self, request: &ConversionRequest) -> Result<ConversionReport> {
        request.validate()?;

        tracing::info!(
            "img_dir={} deck={} ocr={}",
            request.image_dir.display(),
            request.deck_name,
            request.ocr
        );

        let files = enumerate_media(
            &request.image_dir,
            &self.config.extensions,
            self.ordering.as_ref(),
        )?;
        let pairs = pair_up(files)?;
        tracing::info!(pairs = pairs.len(), "paired media files");

        let package = if request.ocr {
            tracing::info!(engine = self.extractor.name(), "recognizing text");
            let text_pairs = extract_pairs(pairs, self.extractor.as_ref())?;
            let deck = assemble_text_deck(&request.deck_name, text_pairs, self.ids.as_mut());
            Package::new(deck, Vec::new())
        } else {
            assemble_media_deck(&request.deck_name, pairs, self.ids.as_mut())
        };

        let output = PackageWriter::from_config(&self.config).write(&package)?;

        let notes = package
            .deck
            .notes()
            .iter()
            .map(|note| note.fields().iter().map(|f| f.to_string()).collect())
            .collect();
        let media = package
            .media
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        Ok(ConversionReport {
            output,
            deck_id: package.deck.id,
            deck_name: package.deck.name.clone(),
            note_count: package.deck.notes().len(),
            media_count: package.media.len(),
            template: package.deck.model.template,
            notes,
            media,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_deck_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let request = ConversionRequest::new(dir.path(), "  ", false);
        assert!(matches!(request.validate(), Err(ConvertError::Argument(_))));
    }

    #[test]
    fn deck_name_with_separator_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let request = ConversionRequest::new(dir.path(), "../escape", false);
        assert!(matches!(request.validate(), Err(ConvertError::Argument(_))));
    }

    #[test]
    fn missing_image_dir_rejected() {
        let request = ConversionRequest::new("/no/such/dir", "Deck", false);
        assert!(matches!(request.validate(), Err(ConvertError::Argument(_))));
    }

    #[test]
    fn deck_name_is_trimmed_once() {
        let request = ConversionRequest::new("/cards", "  Bio \t", false);
        assert_eq!(request.deck_name, "Bio");
    }

    #[test]
    fn valid_request_passes() {
        let dir = tempfile::tempdir().unwrap();
        let request = ConversionRequest::new(dir.path(), "Biology 101", true);
        assert!(request.validate().is_ok());
    }
}
