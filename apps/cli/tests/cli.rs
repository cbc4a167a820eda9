//! Argument parsing and end-to-end runs through the command-line adapter.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;
use snapdeck_cli::{check_contents, run, Cli, OrderArg};
use snapdeck_core::{read_package, ConvertError, SortKey};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("snapdeck").chain(args.iter().copied()))
        .expect("arguments should parse")
}

#[test]
fn positional_arguments_and_defaults() {
    let cli = parse(&["cards", "Biology"]);
    assert_eq!(cli.image_directory, PathBuf::from("cards"));
    assert_eq!(cli.deck_name, "Biology");
    assert!(!cli.ocr);
    assert!(!cli.verify);
    assert_eq!(cli.order, None);
    assert_eq!(cli.seed, None);
}

#[test]
fn flags_are_parsed() {
    let cli = parse(&[
        "cards",
        "Math",
        "--ocr",
        "--order",
        "name",
        "--output-dir",
        "/tmp/decks",
        "--lang",
        "deu",
        "--seed",
        "42",
        "--verify",
        "-q",
    ]);
    assert!(cli.ocr);
    assert_eq!(cli.order, Some(OrderArg::Name));
    assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/decks")));
    assert_eq!(cli.lang.as_deref(), Some("deu"));
    assert_eq!(cli.seed, Some(42));
    assert!(cli.verify);
    assert!(cli.quiet);
    assert!(!cli.ignore_ext_case);
}

#[test]
fn missing_deck_name_is_rejected() {
    let result = Cli::try_parse_from(["snapdeck", "cards"]);
    assert!(result.is_err());
}

#[test]
fn unknown_order_is_rejected() {
    let result = Cli::try_parse_from(["snapdeck", "cards", "Deck", "--order", "size"]);
    assert!(result.is_err());
}

#[test]
fn command_line_overrides_config() {
    let cli = parse(&["cards", "Deck", "--order", "name", "--tesseract", "/opt/tess"]);
    let config = cli.config().unwrap();
    assert_eq!(config.order, SortKey::Name);
    assert_eq!(config.ocr.binary, PathBuf::from("/opt/tess"));
}

#[test]
fn run_writes_and_verifies_package() {
    let dir = tempfile::tempdir().unwrap();
    let cards = dir.path().join("cards");
    let out = dir.path().join("out");
    fs::create_dir(&cards).unwrap();
    fs::write(cards.join("q1.png"), b"question").unwrap();
    fs::write(cards.join("a1.png"), b"answer").unwrap();

    let cli = parse(&[
        cards.to_str().unwrap(),
        "Chemistry",
        "--order",
        "name",
        "--output-dir",
        out.to_str().unwrap(),
        "--seed",
        "7",
        "--verify",
    ]);
    let report = run(&cli).unwrap();

    assert_eq!(report.output, out.join("Chemistry.apkg"));
    let contents = read_package(&report.output).unwrap();
    // Lexical order puts a1 first.
    assert_eq!(
        contents.notes,
        vec![vec!["<img src=a1.png>", "<img src=q1.png>"]]
    );
}

#[test]
fn verification_compares_fields_and_media_names() {
    let dir = tempfile::tempdir().unwrap();
    let cards = dir.path().join("cards");
    let out = dir.path().join("out");
    fs::create_dir(&cards).unwrap();
    fs::write(cards.join("q1.png"), b"question").unwrap();
    fs::write(cards.join("a1.png"), b"answer").unwrap();

    let cli = parse(&[
        cards.to_str().unwrap(),
        "Physics",
        "--order",
        "name",
        "--output-dir",
        out.to_str().unwrap(),
    ]);
    let report = run(&cli).unwrap();
    let contents = read_package(&report.output).unwrap();
    assert!(check_contents(&report, &contents).is_ok());

    let mut changed_field = contents.clone();
    changed_field.notes[0][1] = "<img src=other.png>".to_string();
    assert!(matches!(
        check_contents(&report, &changed_field),
        Err(ConvertError::InvalidPackage(_))
    ));

    let mut renamed_media = contents.clone();
    let size = renamed_media.media.remove("q1.png").unwrap();
    renamed_media.media.insert("q9.png".to_string(), size);
    assert!(matches!(
        check_contents(&report, &renamed_media),
        Err(ConvertError::InvalidPackage(_))
    ));
}

#[test]
fn uppercase_extensions_need_flag() {
    let dir = tempfile::tempdir().unwrap();
    let cards = dir.path().join("cards");
    let out = dir.path().join("out");
    fs::create_dir(&cards).unwrap();
    fs::write(cards.join("IMG_0001.JPG"), b"q").unwrap();
    fs::write(cards.join("IMG_0002.JPG"), b"a").unwrap();

    let base = [
        cards.to_str().unwrap(),
        "Camera",
        "--output-dir",
        out.to_str().unwrap(),
    ];
    let error = run(&parse(&base)).unwrap_err();
    assert!(matches!(error, ConvertError::FormatViolation { .. }));
    assert_eq!(error.exit_code(), 3);

    let mut args = base.to_vec();
    args.push("--ignore-ext-case");
    let report = run(&parse(&args)).unwrap();
    assert_eq!(report.note_count, 1);
}

#[test]
fn seeded_runs_reuse_deck_id() {
    let dir = tempfile::tempdir().unwrap();
    let cards = dir.path().join("cards");
    fs::create_dir(&cards).unwrap();
    fs::write(cards.join("q.png"), b"q").unwrap();
    fs::write(cards.join("a.png"), b"a").unwrap();
    let out = dir.path().join("out");

    let args = [
        cards.to_str().unwrap(),
        "Seeded",
        "--output-dir",
        out.to_str().unwrap(),
        "--seed",
        "3",
    ];
    let first = run(&parse(&args)).unwrap();
    let second = run(&parse(&args)).unwrap();
    assert_eq!(first.deck_id, second.deck_id);
}

#[test]
fn odd_directory_maps_to_count_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let cards = dir.path().join("cards");
    fs::create_dir(&cards).unwrap();
    fs::write(cards.join("lonely.png"), b"q").unwrap();
    let out = dir.path().join("out");

    let cli = parse(&[
        cards.to_str().unwrap(),
        "Odd",
        "--output-dir",
        out.to_str().unwrap(),
    ]);
    let error = run(&cli).unwrap_err();

    assert!(matches!(error, ConvertError::CountViolation { count: 1 }));
    assert_eq!(error.exit_code(), 4);
    assert!(!out.exists());
}
