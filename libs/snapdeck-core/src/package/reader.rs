//! Reading a package back, for verification.

use super::schema;
use crate::error::{ConvertError, Result};
use rusqlite::Connection;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use zip::ZipArchive;

/// What a package holds, as seen by an importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageContents {
    pub deck_id: i64,
    pub deck_name: String,
    pub model_name: String,
    pub field_names: Vec<String>,
    /// Field values per note, in note id order.
    pub notes: Vec<Vec<String>>,
    /// Media name to byte size.
    pub media: BTreeMap<String, u64>,
}

impl PackageContents {
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

#[derive(Debug, Deserialize)]
struct ModelJson {
    name: String,
    flds: Vec<FieldJson>,
}

#[derive(Debug, Deserialize)]
struct FieldJson {
    name: String,
    ord: usize,
}

#[derive(Debug, Deserialize)]
struct DeckJson {
    id: i64,
    name: String,
}

/// Open a package and read its deck, notes and media listing.
pub fn read_package(path: &Path) -> Result<PackageContents> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let mut archive = ZipArchive::new(file)?;

    let media = read_media(&mut archive)?;

    let workdir = tempfile::tempdir().map_err(|e| ConvertError::io(std::env::temp_dir(), e))?;
    let db_path = workdir.path().join(schema::COLLECTION_ENTRY);
    {
        let mut entry = archive.by_name(schema::COLLECTION_ENTRY)?;
        let mut out = File::create(&db_path).map_err(|e| ConvertError::io(&db_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| ConvertError::io(&db_path, e))?;
    }

    let conn = Connection::open(&db_path)?;
    let (models, decks): (String, String) =
        conn.query_row("SELECT models, decks FROM col", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

    let models: HashMap<String, ModelJson> = serde_json::from_str(&models)?;
    let model = models
        .into_values()
        .next()
        .ok_or_else(|| ConvertError::InvalidPackage("no note model".to_string()))?;
    let mut fields = model.flds;
    fields.sort_by_key(|f| f.ord);

    let decks: HashMap<String, DeckJson> = serde_json::from_str(&decks)?;
    let deck = decks
        .into_values()
        .find(|d| d.id != schema::DEFAULT_DECK_ID)
        .ok_or_else(|| ConvertError::InvalidPackage("no exported deck".to_string()))?;

    let mut stmt = conn.prepare("SELECT flds FROM notes ORDER BY id")?;
    let notes = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .map(|flds| {
            flds.map(|f| {
                f.split(schema::FIELD_SEPARATOR)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(PackageContents {
        deck_id: deck.id,
        deck_name: deck.name,
        model_name: model.name,
        field_names: fields.into_iter().map(|f| f.name).collect(),
        notes,
        media,
    })
}

/// Index entry name to referenced media name.
fn read_manifest(archive: &mut ZipArchive<File>) -> Result<HashMap<String, String>> {
    let mut entry = archive.by_name(schema::MEDIA_ENTRY)?;
    let mut raw = String::new();
    entry
        .read_to_string(&mut raw)
        .map_err(|e| ConvertError::io(schema::MEDIA_ENTRY, e))?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_media(archive: &mut ZipArchive<File>) -> Result<BTreeMap<String, u64>> {
    let manifest = read_manifest(archive)?;

    let mut media = BTreeMap::new();
    for (index, name) in manifest {
        let entry = archive.by_name(&index)?;
        media.insert(name, entry.size());
    }
    Ok(media)
}

/// Extract the raw bytes of one media file by its referenced name.
pub fn read_media_file(path: &Path, name: &str) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let mut archive = ZipArchive::new(file)?;

    let index = read_manifest(&mut archive)?
        .into_iter()
        .find(|(_, n)| n == name)
        .map(|(i, _)| i)
        .ok_or_else(|| ConvertError::InvalidPackage(format!("no media named {name}")))?;

    let mut entry = archive.by_name(&index)?;
    let mut data = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut data)
        .map_err(|e| ConvertError::io(path, e))?;
    Ok(data)
}
