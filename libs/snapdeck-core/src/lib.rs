//! Core library for turning photographed flashcards into Anki decks.
//!
//! Provides:
//! - Directory enumeration with pluggable ordering
//! - Question/answer pairing
//! - OCR boundary with a Tesseract implementation
//! - Deck assembly and `.apkg` package writing/reading
//! - The conversion pipeline and a form adapter for desktop front-ends

pub mod assemble;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod form;
pub mod ids;
pub mod ocr;
pub mod package;
pub mod pairing;
pub mod pipeline;
pub mod types;

pub use config::{ConvertConfig, ExtensionAllowList, OcrSettings, SortKey};
pub use enumerate::{enumerate_media, ByComparator, FileName, MediaOrdering, ModifiedTime};
pub use error::{ConvertError, Result};
pub use form::{ConversionForm, FormError, FormField, FormStatus};
pub use ids::{IdGenerator, RandomIds, SeededIds};
pub use ocr::{TesseractExtractor, TextExtractor};
pub use package::{read_package, PackageContents, PackageWriter};
pub use pairing::pair_up;
pub use pipeline::{ConversionReport, ConversionRequest, Pipeline};
pub use types::{CardTemplate, Deck, MediaFile, Note, NoteModel, Package, Pair};
