//! Command-line adapter for the snapdeck pipeline.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use snapdeck_core::{
    read_package, ConversionReport, ConversionRequest, ConvertConfig, ConvertError,
    PackageContents, Pipeline, SeededIds, SortKey,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "snapdeck")]
#[command(version, about = "Convert a directory of question/answer images into an Anki deck", long_about = None)]
pub struct Cli {
    /// Directory with question and answer images, in pairs
    pub image_directory: PathBuf,

    /// Name of the deck and of the output package
    pub deck_name: String,

    /// Convert the images to text through OCR (good handwriting required)
    #[arg(long)]
    pub ocr: bool,

    /// Accept media extensions regardless of case (e.g. IMG_0001.JPG)
    #[arg(long)]
    pub ignore_ext_case: bool,

    /// How files are ordered before pairing
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Directory the package is written to (default: current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// OCR language code passed to tesseract
    #[arg(long)]
    pub lang: Option<String>,

    /// Path to the tesseract executable
    #[arg(long)]
    pub tesseract: Option<PathBuf>,

    /// Seed for deck and model ids (reproducible output)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Re-open the written package and check its contents
    #[arg(long)]
    pub verify: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderArg {
    /// Modification time, oldest first
    Mtime,
    /// File name
    Name,
}

impl From<OrderArg> for SortKey {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Mtime => SortKey::Mtime,
            OrderArg::Name => SortKey::Name,
        }
    }
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> Result<ConvertConfig, ConvertError> {
        let mut config = ConvertConfig::from_env()?;
        if let Some(order) = self.order {
            config.order = order.into();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.ignore_ext_case {
            config.extensions.set_ignore_case(true);
        }
        if let Some(lang) = &self.lang {
            config.ocr.lang = lang.clone();
        }
        if let Some(binary) = &self.tesseract {
            config.ocr.binary = binary.clone();
        }
        Ok(config)
    }

    pub fn request(&self) -> ConversionRequest {
        ConversionRequest::new(&self.image_directory, &self.deck_name, self.ocr)
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--quiet`.
pub fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run one conversion as described by the arguments.
pub fn run(cli: &Cli) -> Result<ConversionReport, ConvertError> {
    let config = cli.config()?;
    let mut pipeline = Pipeline::new(config);
    if let Some(seed) = cli.seed {
        pipeline = pipeline.with_ids(SeededIds::new(seed));
    }

    let report = pipeline.run(&cli.request())?;

    if cli.verify {
        verify(&report)?;
    }
    Ok(report)
}

/// Check that the written package holds what the run produced.
pub fn verify(report: &ConversionReport) -> Result<(), ConvertError> {
    let contents = read_package(&report.output)?;
    check_contents(report, &contents)?;

    tracing::info!(
        notes = contents.note_count(),
        media = contents.media.len(),
        "verified {}",
        report.output.display()
    );
    Ok(())
}

/// Compare a package as read back against the report of the run that wrote it.
pub fn check_contents(
    report: &ConversionReport,
    contents: &PackageContents,
) -> Result<(), ConvertError> {
    if contents.deck_name != report.deck_name {
        return Err(ConvertError::InvalidPackage(format!(
            "expected deck '{}', found '{}'",
            report.deck_name, contents.deck_name
        )));
    }
    if contents.note_count() != report.note_count {
        return Err(ConvertError::InvalidPackage(format!(
            "expected {} notes, found {}",
            report.note_count,
            contents.note_count()
        )));
    }
    if let Some((idx, (expected, found))) = report
        .notes
        .iter()
        .zip(&contents.notes)
        .enumerate()
        .find(|(_, (expected, found))| expected != found)
    {
        return Err(ConvertError::InvalidPackage(format!(
            "note {} differs: expected {:?}, found {:?}",
            idx + 1,
            expected,
            found
        )));
    }

    let expected: BTreeSet<&str> = report.media.iter().map(String::as_str).collect();
    let found: BTreeSet<&str> = contents.media.keys().map(String::as_str).collect();
    if contents.media.len() != report.media_count || expected != found {
        return Err(ConvertError::InvalidPackage(format!(
            "expected media {:?}, found {:?}",
            expected, found
        )));
    }
    Ok(())
}
