//! Shared helpers for pipeline integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use snapdeck_core::{ConvertConfig, ConvertError, TextExtractor};
use tempfile::TempDir;

/// Scratch space with an image directory and an output directory.
pub struct Workspace {
    root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(root.path().join("cards")).expect("create cards dir");
        fs::create_dir(root.path().join("out")).expect("create out dir");
        Self { root }
    }

    pub fn cards(&self) -> PathBuf {
        self.root.path().join("cards")
    }

    pub fn out(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Create a card file whose modification time is `secs` after the epoch.
    pub fn add_card(&self, name: &str, secs: u64) -> PathBuf {
        let path = self.cards().join(name);
        fs::write(&path, format!("bytes of {name}")).expect("write card");
        set_mtime(&path, secs);
        path
    }

    pub fn config(&self) -> ConvertConfig {
        ConvertConfig {
            output_dir: self.out(),
            ..ConvertConfig::default()
        }
    }

    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.out())
            .expect("read out dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn set_mtime(path: &Path, secs: u64) {
    File::options()
        .write(true)
        .open(path)
        .expect("open for mtime")
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + secs))
        .expect("set mtime");
}

/// OCR stand-in keyed by file name.
pub struct FakeOcr {
    texts: HashMap<String, String>,
}

impl FakeOcr {
    pub fn new(texts: &[(&str, &str)]) -> Self {
        Self {
            texts: texts
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl TextExtractor for FakeOcr {
    fn name(&self) -> &str {
        "fake"
    }

    fn extract(&self, image: &Path) -> snapdeck_core::Result<String> {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.texts
            .get(&name)
            .cloned()
            .ok_or_else(|| ConvertError::Recognition {
                path: image.to_path_buf(),
                message: "no text for image".to_string(),
            })
    }
}
