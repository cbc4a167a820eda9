//! Serialization of a deck and its media into a single package file.

use super::schema;
use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};
use crate::types::{Deck, Note, Package};
use chrono::Utc;
use rusqlite::{params, Connection};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const BASE91_TABLE: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

/// Writes `<output_dir>/<deck name>.<extension>`.
#[derive(Debug, Clone)]
pub struct PackageWriter {
    output_dir: PathBuf,
    extension: String,
}

impl PackageWriter {
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &ConvertConfig) -> Self {
        Self::new(&config.output_dir, &config.package_extension)
    }

    /// Path the package for `deck_name` is written to.
    pub fn target_path(&self, deck_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", deck_name, self.extension))
    }

    /// Write the package, replacing any existing file of the same name.
    ///
    /// Every media path is checked before anything is created. The archive
    /// is built in a temporary file next to the target and renamed into
    /// place, so a failed write leaves no partial package behind.
    pub fn write(&self, package: &Package) -> Result<PathBuf> {
        for path in &package.media {
            fs::metadata(path).map_err(|e| ConvertError::io(path, e))?;
        }

        let target = self.target_path(&package.deck.name);
        fs::create_dir_all(&self.output_dir).map_err(|e| ConvertError::io(&self.output_dir, e))?;

        let collection = build_collection(&package.deck)?;

        let mut staged = tempfile::NamedTempFile::new_in(&self.output_dir)
            .map_err(|e| ConvertError::io(&self.output_dir, e))?;
        write_archive(staged.as_file_mut(), &collection, &package.media)?;

        if target.exists() {
            tracing::warn!("replacing existing package {}", target.display());
        }
        staged
            .persist(&target)
            .map_err(|e| ConvertError::io(&target, e.error))?;

        tracing::info!(
            notes = package.deck.notes().len(),
            media = package.media.len(),
            "wrote {}",
            target.display()
        );
        Ok(target)
    }
}

fn write_archive(file: &mut fs::File, collection: &[u8], media: &[PathBuf]) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(file);

    zip.start_file(schema::COLLECTION_ENTRY, options)?;
    zip.write_all(collection)
        .map_err(|e| ConvertError::io(schema::COLLECTION_ENTRY, e))?;

    let mut manifest = BTreeMap::new();
    for (idx, path) in media.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConvertError::Argument(format!("not a file: {}", path.display())))?;
        let data = fs::read(path).map_err(|e| ConvertError::io(path, e))?;

        // Media entries are stored under their index, the manifest maps
        // them back to the referenced name.
        zip.start_file(idx.to_string(), options)?;
        zip.write_all(&data).map_err(|e| ConvertError::io(path, e))?;
        manifest.insert(idx.to_string(), name);
    }

    zip.start_file(schema::MEDIA_ENTRY, options)?;
    zip.write_all(serde_json::to_string(&manifest)?.as_bytes())
        .map_err(|e| ConvertError::io(schema::MEDIA_ENTRY, e))?;

    zip.finish()?;
    Ok(())
}

/// Build the SQLite collection and return its bytes.
fn build_collection(deck: &Deck) -> Result<Vec<u8>> {
    let workdir = tempfile::tempdir().map_err(|e| ConvertError::io(std::env::temp_dir(), e))?;
    let db_path = workdir.path().join(schema::COLLECTION_ENTRY);

    {
        let mut conn = Connection::open(&db_path)?;
        populate(&mut conn, deck)?;
    }

    fs::read(&db_path).map_err(|e| ConvertError::io(&db_path, e))
}

fn populate(conn: &mut Connection, deck: &Deck) -> Result<()> {
    let now = Utc::now();
    let now_secs = now.timestamp();
    let now_millis = now.timestamp_millis();

    conn.execute_batch(schema::SCHEMA)?;

    let tx = conn.transaction()?;
    tx.execute(
        schema::INSERT_COL,
        params![
            now_secs,
            now_millis,
            schema::SCHEMA_VERSION,
            schema::collection_conf(deck.notes().len() as i64 + 1).to_string(),
            schema::models_json(deck, now_secs).to_string(),
            schema::decks_json(deck, now_secs).to_string(),
            schema::deck_conf_json().to_string(),
        ],
    )?;

    for (idx, note) in deck.notes().iter().enumerate() {
        let position = idx as i64;
        let note_id = now_millis + position;
        let sort_field = &note.question;

        tx.execute(
            schema::INSERT_NOTE,
            params![
                note_id,
                note_guid(deck.id, idx, note),
                deck.model.id,
                now_secs,
                join_fields(note),
                sort_field,
                field_checksum(sort_field),
            ],
        )?;
        tx.execute(
            schema::INSERT_CARD,
            params![note_id, note_id, deck.id, now_secs, position + 1],
        )?;
    }

    tx.commit()?;
    Ok(())
}

fn join_fields(note: &Note) -> String {
    note.fields().join(schema::FIELD_SEPARATOR)
}

/// Stable note identifier, base91 encoded.
///
/// Deck id and position are hashed with the fields so that two notes with
/// identical text in one deck stay distinct on import.
pub fn note_guid(deck_id: i64, position: usize, note: &Note) -> String {
    let key = format!(
        "{}__{}__{}__{}",
        deck_id, position, note.question, note.answer
    );
    let digest = Sha256::digest(key.as_bytes());

    let mut value = digest[..8]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

    let base = BASE91_TABLE.len() as u64;
    let mut reversed = Vec::new();
    while value > 0 {
        reversed.push(BASE91_TABLE[(value % base) as usize]);
        value /= base;
    }
    reversed.reverse();
    String::from_utf8_lossy(&reversed).into_owned()
}

/// First 32 bits of the SHA-1 of the sort field with markup removed, the
/// value Anki stores in `notes.csum`.
pub fn field_checksum(field: &str) -> i64 {
    let digest = Sha1::digest(strip_html_keep_media(field).as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

/// Remove HTML tags, replacing image tags by their source name.
pub fn strip_html_keep_media(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut rest = field;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        match after.find('>') {
            Some(end) => {
                let tag = &after[1..end];
                if let Some(src) = image_source(tag) {
                    out.push(' ');
                    out.push_str(src);
                    out.push(' ');
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

fn image_source(tag: &str) -> Option<&str> {
    let tag = tag.trim();
    if !tag.get(..3).is_some_and(|t| t.eq_ignore_ascii_case("img")) {
        return None;
    }
    let idx = tag.find("src=")?;
    let value = &tag[idx + 4..];
    let value = value.trim_end_matches('/').trim();
    let value = match value.chars().next() {
        Some(q @ ('"' | '\'')) => value[1..].split(q).next().unwrap_or_default(),
        _ => value.split_whitespace().next().unwrap_or_default(),
    };
    Some(value)
}
