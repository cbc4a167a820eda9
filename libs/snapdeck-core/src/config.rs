//! Conversion configuration.
//!
//! Defaults reproduce the stock command-line behaviour. `ConvertConfig::from_env`
//! layers environment overrides on top (a `.env` file is honoured):
//! - `SNAPDECK_ORDER`: `mtime` or `name`
//! - `SNAPDECK_OUTPUT_DIR`: directory the package is written to
//! - `SNAPDECK_PACKAGE_EXT`: package file extension
//! - `SNAPDECK_EXTRA_EXTENSIONS`: comma separated extra media extensions
//! - `SNAPDECK_IGNORE_EXT_CASE`: match extensions ignoring case (`true`/`false`)
//! - `SNAPDECK_TESSERACT`: OCR executable
//! - `SNAPDECK_OCR_LANG`: OCR language code

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Media extensions accepted in an image directory.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "jpg", "png", "gif", "tiff", "svg", "tif", "jpeg", "mp3", "ogg", "wav", "avi", "ogv", "mpg",
    "mpeg", "mov", "mp4", "mkv", "ogx", "oga", "flv", "swf", "flac", "webp", "m4a",
];

pub const DEFAULT_PACKAGE_EXTENSION: &str = "apkg";

/// Set of allowed file extensions.
///
/// Comparison is exact by default, so `IMG_0001.JPG` is rejected unless
/// `JPG` is listed or case folding is switched on with
/// [`ExtensionAllowList::case_insensitive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionAllowList {
    extensions: Vec<String>,
    #[serde(default)]
    ignore_case: bool,
}

impl ExtensionAllowList {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            extensions: Vec::new(),
            ignore_case: false,
        };
        list.extend(extensions);
        list
    }

    /// Match extensions ignoring ASCII case.
    pub fn case_insensitive(mut self) -> Self {
        self.set_ignore_case(true);
        self
    }

    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.ignore_case = ignore_case;
    }

    pub fn ignores_case(&self) -> bool {
        self.ignore_case
    }

    /// Add extensions, ignoring a leading dot and duplicates.
    pub fn extend<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = normalize(ext.as_ref());
            if !ext.is_empty() && !self.extensions.contains(&ext) {
                self.extensions.push(ext);
            }
        }
    }

    pub fn allows(&self, extension: &str) -> bool {
        let ext = normalize(extension);
        if ext.is_empty() {
            return false;
        }
        if self.ignore_case {
            self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        } else {
            self.extensions.contains(&ext)
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Human readable listing for error messages.
    pub fn describe(&self) -> String {
        self.extensions.join(", ")
    }
}

impl Default for ExtensionAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

fn normalize(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConvertError::Argument(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

/// Sort key used to order files before pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Modification time, oldest first.
    Mtime,
    /// File name, lexical.
    Name,
}

impl Default for SortKey {
    fn default() -> Self {
        Self::Mtime
    }
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mtime => "mtime",
            Self::Name => "name",
        }
    }
}

impl FromStr for SortKey {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mtime" => Ok(Self::Mtime),
            "name" => Ok(Self::Name),
            other => Err(ConvertError::Argument(format!(
                "unknown sort order '{other}' (expected 'mtime' or 'name')"
            ))),
        }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrSettings {
    pub binary: PathBuf,
    pub lang: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            lang: "eng".to_string(),
        }
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    pub extensions: ExtensionAllowList,
    pub order: SortKey,
    pub package_extension: String,
    pub output_dir: PathBuf,
    pub ocr: OcrSettings,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            extensions: ExtensionAllowList::default(),
            order: SortKey::default(),
            package_extension: DEFAULT_PACKAGE_EXTENSION.to_string(),
            output_dir: PathBuf::from("."),
            ocr: OcrSettings::default(),
        }
    }
}

impl ConvertConfig {
    /// Load defaults overridden by `SNAPDECK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(order) = lookup("SNAPDECK_ORDER") {
            config.order = order.parse()?;
        }
        if let Some(dir) = lookup("SNAPDECK_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(ext) = lookup("SNAPDECK_PACKAGE_EXT") {
            let ext = normalize(&ext).to_ascii_lowercase();
            if ext.is_empty() {
                return Err(ConvertError::Argument(
                    "SNAPDECK_PACKAGE_EXT must not be empty".to_string(),
                ));
            }
            config.package_extension = ext;
        }
        if let Some(extra) = lookup("SNAPDECK_EXTRA_EXTENSIONS") {
            config.extensions.extend(extra.split(','));
        }
        if let Some(flag) = lookup("SNAPDECK_IGNORE_EXT_CASE") {
            config
                .extensions
                .set_ignore_case(parse_flag("SNAPDECK_IGNORE_EXT_CASE", &flag)?);
        }
        if let Some(binary) = lookup("SNAPDECK_TESSERACT") {
            config.ocr.binary = PathBuf::from(binary);
        }
        if let Some(lang) = lookup("SNAPDECK_OCR_LANG") {
            config.ocr.lang = lang;
        }

        Ok(config)
    }

    /// Output path for a deck name.
    pub fn package_path(&self, deck_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", deck_name, self.package_extension))
    }
}
