//! Anki collection (schema 11) definitions.

use crate::types::Deck;
use serde_json::{json, Value};

/// Collection schema version written to `col.ver`.
pub const SCHEMA_VERSION: i64 = 11;

/// Id of the built-in default deck and options group.
pub const DEFAULT_DECK_ID: i64 = 1;

/// Separator between note fields in `notes.flds`.
pub const FIELD_SEPARATOR: &str = "\x1f";

/// Entry names inside the package archive.
pub const COLLECTION_ENTRY: &str = "collection.anki2";
pub const MEDIA_ENTRY: &str = "media";

/// Complete schema for an exported collection.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS col (
    id INTEGER PRIMARY KEY,
    crt INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    scm INTEGER NOT NULL,
    ver INTEGER NOT NULL,
    dty INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    ls INTEGER NOT NULL,
    conf TEXT NOT NULL,
    models TEXT NOT NULL,
    decks TEXT NOT NULL,
    dconf TEXT NOT NULL,
    tags TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY,
    guid TEXT NOT NULL,
    mid INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    tags TEXT NOT NULL,
    flds TEXT NOT NULL,
    sfld INTEGER NOT NULL,
    csum INTEGER NOT NULL,
    flags INTEGER NOT NULL,
    data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cards (
    id INTEGER PRIMARY KEY,
    nid INTEGER NOT NULL,
    did INTEGER NOT NULL,
    ord INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    type INTEGER NOT NULL,
    queue INTEGER NOT NULL,
    due INTEGER NOT NULL,
    ivl INTEGER NOT NULL,
    factor INTEGER NOT NULL,
    reps INTEGER NOT NULL,
    lapses INTEGER NOT NULL,
    left INTEGER NOT NULL,
    odue INTEGER NOT NULL,
    odid INTEGER NOT NULL,
    flags INTEGER NOT NULL,
    data TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS revlog (
    id INTEGER PRIMARY KEY,
    cid INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    ease INTEGER NOT NULL,
    ivl INTEGER NOT NULL,
    lastIvl INTEGER NOT NULL,
    factor INTEGER NOT NULL,
    time INTEGER NOT NULL,
    type INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS graves (
    usn INTEGER NOT NULL,
    oid INTEGER NOT NULL,
    type INTEGER NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS ix_notes_usn ON notes (usn);
CREATE INDEX IF NOT EXISTS ix_cards_usn ON cards (usn);
CREATE INDEX IF NOT EXISTS ix_revlog_usn ON revlog (usn);
CREATE INDEX IF NOT EXISTS ix_cards_nid ON cards (nid);
CREATE INDEX IF NOT EXISTS ix_cards_sched ON cards (did, queue, due);
CREATE INDEX IF NOT EXISTS ix_revlog_cid ON revlog (cid);
CREATE INDEX IF NOT EXISTS ix_notes_csum ON notes (csum);
"#;

/// Insert the single collection row.
pub const INSERT_COL: &str = r#"
INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
VALUES (1, ?1, ?2, ?2, ?3, 0, 0, 0, ?4, ?5, ?6, ?7, '{}')
"#;

pub const INSERT_NOTE: &str = r#"
INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')
"#;

/// New card: type 0, queue 0, no review history.
pub const INSERT_CARD: &str = r#"
INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps, lapses, left, odue, odid, flags, data)
VALUES (?1, ?2, ?3, 0, ?4, -1, 0, 0, ?5, 0, 0, 0, 0, 0, 0, 0, 0, '')
"#;

const CARD_CSS: &str = ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";

const LATEX_POST: &str = "\\end{document}";

/// `col.conf`. `next_pos` is the due position the next new card gets.
pub fn collection_conf(next_pos: i64) -> Value {
    json!({
        "activeDecks": [DEFAULT_DECK_ID],
        "curDeck": DEFAULT_DECK_ID,
        "newSpread": 0,
        "collapseTime": 1200,
        "timeLim": 0,
        "estTimes": true,
        "dueCounts": true,
        "curModel": null,
        "nextPos": next_pos,
        "sortType": "noteFld",
        "sortBackwards": false,
        "addToCur": true
    })
}

/// `col.models`: the deck's single note model, keyed by id.
pub fn models_json(deck: &Deck, modified: i64) -> Value {
    let template = deck.model.template;
    let fields: Vec<Value> = template
        .field_names()
        .iter()
        .enumerate()
        .map(|(ord, name)| {
            json!({
                "name": name,
                "ord": ord,
                "font": "Arial",
                "size": 20,
                "media": [],
                "rtl": false,
                "sticky": false
            })
        })
        .collect();

    let mut models = serde_json::Map::new();
    models.insert(
        deck.model.id.to_string(),
        json!({
            "id": deck.model.id,
            "name": template.model_name(),
            "type": 0,
            "mod": modified,
            "usn": -1,
            "sortf": 0,
            "did": deck.id,
            "tmpls": [{
                "name": "Card 1",
                "ord": 0,
                "qfmt": template.question_format(),
                "afmt": template.answer_format(),
                "bqfmt": "",
                "bafmt": "",
                "did": null
            }],
            "flds": fields,
            "css": CARD_CSS,
            "latexPre": LATEX_PRE,
            "latexPost": LATEX_POST,
            "tags": [],
            "vers": [],
            "req": [[0, "any", [0]]]
        }),
    );
    Value::Object(models)
}

fn deck_entry(id: i64, name: &str, modified: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "desc": "",
        "mod": modified,
        "usn": -1,
        "collapsed": false,
        "dyn": 0,
        "conf": DEFAULT_DECK_ID,
        "extendNew": 10,
        "extendRev": 50,
        "newToday": [0, 0],
        "revToday": [0, 0],
        "lrnToday": [0, 0],
        "timeToday": [0, 0]
    })
}

/// `col.decks`: the default deck plus the exported one.
pub fn decks_json(deck: &Deck, modified: i64) -> Value {
    let mut decks = serde_json::Map::new();
    decks.insert(
        DEFAULT_DECK_ID.to_string(),
        deck_entry(DEFAULT_DECK_ID, "Default", modified),
    );
    decks.insert(deck.id.to_string(), deck_entry(deck.id, &deck.name, modified));
    Value::Object(decks)
}

/// `col.dconf`: the default options group.
pub fn deck_conf_json() -> Value {
    json!({
        "1": {
            "id": DEFAULT_DECK_ID,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "dyn": false,
            "autoplay": true,
            "replayq": true,
            "timer": 0,
            "maxTaken": 60,
            "new": {
                "bury": true,
                "delays": [1, 10],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true
            },
            "lapse": {
                "delays": [10],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100
            }
        }
    })
}
