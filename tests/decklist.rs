use decklist::combinator::{Cursor, Parser, alternative, literal, sequence};
use decklist::{
    CardCache, CardEntry, CardResolver, Decklist, JsonCardSource, Lookup, ParsedLine, parse_line,
    try_parse_line,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("")]
#[case("#")]
#[case("//")]
#[case("x")]
#[case("1")]
#[case("1 ")]
#[case("1 (")]
#[case("1x (ABC)")]
#[case("1 [")]
#[case("1 [ABC#1]")]
#[case("2x Brainstorm (STA")]
#[case("\u{1f0cf} 4 Joker")]
#[case("4 Fire // Ice")]
#[case("7 Seven Dwarves\u{0}")]
fn every_line_gets_exactly_one_classification(#[case] line: &str) {
    let parsed = parse_line(line);
    match &parsed {
        ParsedLine::Comment { text } | ParsedLine::Uncertain { text } => assert_eq!(text, line),
        ParsedLine::Card(entry) => {
            assert!(entry.count >= 1);
            assert!(!entry.card_name.is_empty());
            assert!(!entry.card_name.contains(['(', '[', '#']));
        }
        ParsedLine::Blank => assert!(line.trim().is_empty()),
    }
    assert_eq!(parsed.is_uncertain(), try_parse_line(line).is_err());
}

#[test]
fn split_card_names_with_slashes_are_cards() {
    assert_eq!(parse_line("4 Fire // Ice"), ParsedLine::Card(CardEntry::new("Fire // Ice", 4)));
}

#[test]
fn furthest_failure_wins_across_alternatives() {
    let at_two = sequence((literal("ab"), literal("!"))).map(|_| "two");
    let at_five = sequence((literal("abcde"), literal("!"))).map(|_| "five");
    let parser = alternative(vec![at_two.boxed(), at_five.boxed()]);

    let failure = parser.parse(Cursor::new("abcdefg")).unwrap_err();
    assert_eq!(failure.cursor.index(), 5);
    assert_eq!(failure.expected, "!");
}

#[test]
fn deck_round_trip_through_resolver() {
    let deck = Decklist::parse(
        "// Main\n4 Lightning Bolt\n1 [MH2#123] Solitude\n2x Brainstorm (STA)\nwho knows\n",
    );
    let source = JsonCardSource::from_json(
        r#"[{"name": "Lightning Bolt", "set": "m10"}, {"name": "Brainstorm", "set": "sta"}]"#,
    )
    .unwrap();
    let resolver = CardResolver::new(source);
    let mut cache = CardCache::new();

    let outcomes: Vec<(String, bool)> = deck
        .entries()
        .map(|entry| {
            let found = matches!(
                resolver.resolve_entry(&mut cache, entry).unwrap(),
                Lookup::Found(_)
            );
            (entry.card_name.clone(), found)
        })
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("Lightning Bolt".to_string(), true),
            ("Solitude".to_string(), false),
            ("Brainstorm".to_string(), true),
        ]
    );
    assert_eq!(cache.get("Solitude", Some("MH2")), Some(&Lookup::NotFound));
    assert_eq!(deck.stats().uncertain, 1);
}

#[test]
fn lines_parse_independently_across_threads() {
    let lines = ["4 Lightning Bolt", "# c", "1 [MH2#123] Solitude", "???"];
    let handles: Vec<_> = lines
        .iter()
        .map(|line| {
            let line = line.to_string();
            std::thread::spawn(move || parse_line(&line))
        })
        .collect();
    let threaded: Vec<ParsedLine> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let sequential: Vec<ParsedLine> = lines.iter().map(|line| parse_line(line)).collect();
    assert_eq!(threaded, sequential);
}

fn check_classification(line: &str) -> Result<(), TestCaseError> {
    let parsed = parse_line(line);
    let trimmed = line.trim_start();
    let is_comment = trimmed.starts_with('#') || trimmed.starts_with("//");
    match &parsed {
        ParsedLine::Blank => prop_assert!(line.trim().is_empty()),
        ParsedLine::Comment { text } => {
            prop_assert_eq!(text, line);
            prop_assert!(is_comment);
        }
        ParsedLine::Uncertain { text } => {
            prop_assert_eq!(text, line);
            prop_assert!(!is_comment && !line.trim().is_empty());
        }
        ParsedLine::Card(entry) => {
            prop_assert!(entry.count >= 1);
            prop_assert!(!entry.card_name.is_empty());
            prop_assert_eq!(entry.card_name.trim(), entry.card_name.as_str());
            prop_assert!(!entry.card_name.contains(['(', '[', '#']));
        }
    }
    prop_assert_eq!(&parse_line(line), &parsed);
    Ok(())
}

proptest! {
    #[test]
    fn any_string_is_classified(line in any::<String>()) {
        check_classification(&line)?;
    }

    #[test]
    fn deck_shaped_strings_are_classified(
        line in r"[ \t]{0,2}(#|//|[0-9]{0,3}[xX]?)?[ \t]{0,2}(\[[A-Za-z0-9#]{0,6}\])?[ A-Za-z,'/]{0,20}(\([A-Za-z0-9]{0,5}\)?)?[ 0-9*F\[\]^]{0,10}"
    ) {
        check_classification(&line)?;
    }
}
