//! Core types for deck conversion.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A media file found in the image directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    /// Used only for ordering.
    pub modified: SystemTime,
    /// Used only for validation. Stored without the leading dot.
    pub extension: String,
}

impl MediaFile {
    pub fn new(path: PathBuf, modified: SystemTime) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            path,
            modified,
            extension,
        }
    }

    /// Base name used to reference the file inside the package.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Question/answer pair built from two consecutive entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair<T> {
    pub question: T,
    pub answer: T,
}

impl<T> Pair<T> {
    pub fn new(question: T, answer: T) -> Self {
        Self { question, answer }
    }

    /// Apply a fallible conversion to both sides, question first.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Pair<U>, E> {
        Ok(Pair {
            question: f(self.question)?,
            answer: f(self.answer)?,
        })
    }
}

/// Card template variant. Exactly one is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTemplate {
    /// Plain text fields from recognized text.
    Text,
    /// Image references to embedded media.
    Media,
}

impl CardTemplate {
    /// Select the template for a run.
    pub fn for_run(ocr: bool) -> Self {
        if ocr {
            Self::Text
        } else {
            Self::Media
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Text => "Simple Model",
            Self::Media => "Simple Model with Media",
        }
    }

    pub fn field_names(&self) -> [&'static str; 2] {
        match self {
            Self::Text => ["Question", "Answer"],
            Self::Media => ["QuestionImage", "AnswerImage"],
        }
    }

    /// Front side render string.
    pub fn question_format(&self) -> String {
        format!("{{{{{}}}}}", self.field_names()[0])
    }

    /// Back side render string.
    pub fn answer_format(&self) -> String {
        format!(
            "{{{{FrontSide}}}}<hr id=\"answer\">{{{{{}}}}}",
            self.field_names()[1]
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Media => "media",
        }
    }
}

/// A card template bound to a model id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteModel {
    pub id: i64,
    pub template: CardTemplate,
}

/// One note: the two field values of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub question: String,
    pub answer: String,
}

impl Note {
    pub fn fields(&self) -> [&str; 2] {
        [&self.question, &self.answer]
    }
}

/// Deck under construction. Only grows by appending notes.
#[derive(Debug, Clone)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub model: NoteModel,
    notes: Vec<Note>,
}

impl Deck {
    pub fn new(id: i64, name: impl Into<String>, model: NoteModel) -> Self {
        Self {
            id,
            name: name.into(),
            model,
            notes: Vec::new(),
        }
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

/// A deck plus the media files that must be embedded with it.
#[derive(Debug, Clone)]
pub struct Package {
    pub deck: Deck,
    pub media: Vec<PathBuf>,
}

impl Package {
    pub fn new(deck: Deck, media: Vec<PathBuf>) -> Self {
        Self { deck, media }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_file_strips_directory() {
        let file = MediaFile::new(PathBuf::from("/cards/set1/q1.png"), SystemTime::UNIX_EPOCH);
        assert_eq!(file.file_name(), "q1.png");
        assert_eq!(file.extension, "png");
    }

    #[test]
    fn template_selected_by_ocr_flag() {
        assert_eq!(CardTemplate::for_run(true), CardTemplate::Text);
        assert_eq!(CardTemplate::for_run(false), CardTemplate::Media);
    }

    #[test]
    fn template_render_strings() {
        assert_eq!(CardTemplate::Text.question_format(), "{{Question}}");
        assert_eq!(
            CardTemplate::Media.answer_format(),
            "{{FrontSide}}<hr id=\"answer\">{{AnswerImage}}"
        );
    }

    #[test]
    fn pair_try_map_keeps_order() {
        let pair = Pair::new(1, 2);
        let mapped: Result<Pair<String>, ()> = pair.try_map(|n| Ok(n.to_string()));
        assert_eq!(mapped.unwrap(), Pair::new("1".to_string(), "2".to_string()));
    }
}
