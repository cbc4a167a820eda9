//! Directory enumeration and ordering of media files.

use crate::config::{ExtensionAllowList, SortKey};
use crate::error::{ConvertError, Result};
use crate::types::MediaFile;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// Ordering strategy applied before pairing.
pub trait MediaOrdering {
    /// Strategy identifier.
    fn name(&self) -> &'static str;

    fn compare(&self, a: &MediaFile, b: &MediaFile) -> Ordering;
}

/// Oldest modification time first.
///
/// Timestamps can change when a directory is copied or extracted, which
/// silently reshuffles pairs. `FileName` avoids that.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedTime;

impl MediaOrdering for ModifiedTime {
    fn name(&self) -> &'static str {
        "mtime"
    }

    fn compare(&self, a: &MediaFile, b: &MediaFile) -> Ordering {
        a.modified.cmp(&b.modified)
    }
}

/// Lexical order of base names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileName;

impl MediaOrdering for FileName {
    fn name(&self) -> &'static str {
        "name"
    }

    fn compare(&self, a: &MediaFile, b: &MediaFile) -> Ordering {
        a.file_name().cmp(&b.file_name())
    }
}

/// Caller supplied comparator.
pub struct ByComparator<F>(pub F);

impl<F> MediaOrdering for ByComparator<F>
where
    F: Fn(&MediaFile, &MediaFile) -> Ordering,
{
    fn name(&self) -> &'static str {
        "custom"
    }

    fn compare(&self, a: &MediaFile, b: &MediaFile) -> Ordering {
        (self.0)(a, b)
    }
}

/// Get the ordering strategy for a configured sort key.
pub fn ordering_for(key: SortKey) -> Box<dyn MediaOrdering> {
    match key {
        SortKey::Mtime => Box::new(ModifiedTime),
        SortKey::Name => Box::new(FileName),
    }
}

/// List the direct children of `dir`, validate every extension, then sort.
///
/// Validation is all-or-nothing: one disallowed entry fails the run before
/// anything is returned. The sort is stable, so ties keep traversal order.
pub fn enumerate_media(
    dir: &Path,
    allowed: &ExtensionAllowList,
    ordering: &dyn MediaOrdering,
) -> Result<Vec<MediaFile>> {
    let entries = fs::read_dir(dir).map_err(|e| ConvertError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConvertError::io(dir, e))?;
        let path = entry.path();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !allowed.allows(extension) {
            return Err(ConvertError::FormatViolation {
                path,
                allowed: allowed.describe(),
            });
        }

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| ConvertError::io(&path, e))?;
        files.push(MediaFile::new(path, modified));
    }

    files.sort_by(|a, b| ordering.compare(a, b));

    tracing::debug!(
        count = files.len(),
        order = ordering.name(),
        "enumerated {}",
        dir.display()
    );
    Ok(files)
}
