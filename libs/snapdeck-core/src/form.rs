//! Form adapter for desktop front-ends.
//!
//! Holds the three form inputs and drives the same [`Pipeline`] as the
//! command line. Errors never escape as panics: they come back as a status
//! the form can show inline. The run is synchronous on the caller's thread.

use crate::error::ConvertError;
use crate::pipeline::{ConversionReport, ConversionRequest, Pipeline};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inputs that must be filled before the run action is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    ImageDir,
    DeckName,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ImageDir => "image directory",
            Self::DeckName => "deck name",
        }
    }
}

/// Error surfaced to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormError {
    pub message: String,
    pub exit_code: u8,
}

impl From<ConvertError> for FormError {
    fn from(e: ConvertError) -> Self {
        Self {
            exit_code: e.exit_code(),
            message: e.to_string(),
        }
    }
}

/// Result of pressing the run action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormStatus {
    /// Required inputs are empty; nothing was run.
    Blocked { missing: Vec<FormField> },
    Failed { error: FormError },
    Done {
        message: String,
        report: ConversionReport,
    },
}

/// State of the conversion form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionForm {
    pub image_dir: String,
    pub deck_name: String,
    pub ocr: bool,
}

impl ConversionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory picker result.
    pub fn choose_image_dir(&mut self, dir: impl Into<PathBuf>) {
        self.image_dir = dir.into().display().to_string();
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        if self.image_dir.trim().is_empty() {
            missing.push(FormField::ImageDir);
        }
        if self.deck_name.trim().is_empty() {
            missing.push(FormField::DeckName);
        }
        missing
    }

    /// Whether the run action should be enabled.
    pub fn can_run(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn to_request(&self) -> ConversionRequest {
        ConversionRequest::new(&self.image_dir, &self.deck_name, self.ocr)
    }

    /// Run the conversion and report the outcome for display.
    pub fn submit(&self, pipeline: &mut Pipeline) -> FormStatus {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return FormStatus::Blocked { missing };
        }

        match pipeline.run(&self.to_request()) {
            Ok(report) => FormStatus::Done {
                message: format!(
                    "conversion complete, packaged to {}",
                    report.output.display()
                ),
                report,
            },
            Err(e) => {
                tracing::warn!("conversion failed: {e}");
                FormStatus::Failed { error: e.into() }
            }
        }
    }
}
