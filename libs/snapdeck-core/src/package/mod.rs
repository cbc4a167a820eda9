//! Anki package (`.apkg`) reading and writing.
//!
//! A package is a zip archive holding `collection.anki2` (a schema 11
//! SQLite collection), a `media` manifest mapping entry indices to file
//! names, and one entry per media file.

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::{read_media_file, read_package, PackageContents};
pub use writer::PackageWriter;
