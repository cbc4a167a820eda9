//! Building decks from question/answer pairs.

use crate::ids::IdGenerator;
use crate::types::{CardTemplate, Deck, MediaFile, Note, NoteModel, Package, Pair};

/// Image reference for a media field. Only the base name is used, so the
/// embedded file must carry the same name.
pub fn image_tag(file: &MediaFile) -> String {
    format!("<img src={}>", file.file_name())
}

fn new_deck(name: &str, template: CardTemplate, ids: &mut dyn IdGenerator) -> Deck {
    let deck_id = ids.next_id();
    let model = NoteModel {
        id: ids.next_id(),
        template,
    };
    Deck::new(deck_id, name, model)
}

/// Build a plain-text deck from recognized pairs. Text is kept verbatim.
pub fn assemble_text_deck(
    name: &str,
    pairs: Vec<Pair<String>>,
    ids: &mut dyn IdGenerator,
) -> Deck {
    let mut deck = new_deck(name, CardTemplate::Text, ids);
    for pair in pairs {
        tracing::info!("Added note: q_text: {}, a_text: {}", pair.question, pair.answer);
        deck.add_note(Note {
            question: pair.question,
            answer: pair.answer,
        });
    }
    deck
}

/// Build an image deck and collect the media that must ship with it.
pub fn assemble_media_deck(
    name: &str,
    pairs: Vec<Pair<MediaFile>>,
    ids: &mut dyn IdGenerator,
) -> Package {
    let mut deck = new_deck(name, CardTemplate::Media, ids);
    let mut media = Vec::with_capacity(pairs.len() * 2);

    for pair in pairs {
        tracing::info!(
            "Added note with q_img: {}, a_img: {}",
            pair.question.file_name(),
            pair.answer.file_name()
        );
        deck.add_note(Note {
            question: image_tag(&pair.question),
            answer: image_tag(&pair.answer),
        });
        media.push(pair.question.path);
        media.push(pair.answer.path);
    }

    Package::new(deck, media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{SeededIds, ID_RANGE};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn media(path: &str) -> MediaFile {
        MediaFile::new(PathBuf::from(path), SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn media_fields_use_base_names() {
        let pairs = vec![Pair::new(media("/cards/q1.png"), media("/cards/a1.png"))];
        let package = assemble_media_deck("Bio", pairs, &mut SeededIds::new(1));

        assert_eq!(
            package.deck.notes(),
            &[Note {
                question: "<img src=q1.png>".to_string(),
                answer: "<img src=a1.png>".to_string(),
            }]
        );
        assert_eq!(
            package.media,
            vec![PathBuf::from("/cards/q1.png"), PathBuf::from("/cards/a1.png")]
        );
        assert_eq!(package.deck.model.template, CardTemplate::Media);
    }

    #[test]
    fn text_fields_are_verbatim() {
        let pairs = vec![Pair::new("2+2=?".to_string(), "4\n".to_string())];
        let deck = assemble_text_deck("Math", pairs, &mut SeededIds::new(1));

        assert_eq!(deck.notes()[0].question, "2+2=?");
        assert_eq!(deck.notes()[0].answer, "4\n");
        assert_eq!(deck.model.template, CardTemplate::Text);
        assert_eq!(deck.name, "Math");
    }

    #[test]
    fn notes_follow_pair_order() {
        let pairs = (0..4)
            .map(|i| Pair::new(format!("q{i}"), format!("a{i}")))
            .collect();
        let deck = assemble_text_deck("Order", pairs, &mut SeededIds::new(3));
        let questions: Vec<&str> = deck.notes().iter().map(|n| n.question.as_str()).collect();
        assert_eq!(questions, vec!["q0", "q1", "q2", "q3"]);
    }

    #[test]
    fn ids_come_from_generator() {
        let deck = assemble_text_deck("Ids", Vec::new(), &mut SeededIds::new(9));
        let mut expected = SeededIds::new(9);
        assert_eq!(deck.id, expected.next_id());
        assert_eq!(deck.model.id, expected.next_id());
        assert!(ID_RANGE.contains(&deck.id));
    }
}
