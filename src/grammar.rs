//! Deck-list line grammar.
//!
//! Accepted card shapes, tried in order; the first that matches a prefix of
//! the line wins and anything it leaves unconsumed is ignored:
//!
//! 1. `4 Lightning Bolt`, optionally followed by `(M10) 146` as in Arena exports
//! 2. `1 [MH2#123] Solitude`
//! 3. `2x Brainstorm (STA) *F* [Draw] ^Have,#37d67a^`
//!
//! Comments start with `#` or `//`, optionally after leading whitespace.

use once_cell::sync::Lazy;

use crate::combinator::{
    BoxedParser, Cursor, Parser, alternative, literal, optional, pattern, repeat, sequence, try_map,
};
use crate::line::{CardEntry, LineError, ParsedLine};

static GRAMMAR: Lazy<Grammar> =
    Lazy::new(|| Grammar::new().expect("deck-line grammar patterns are valid"));

/// Classify one line. Never fails: unmatched lines become [`ParsedLine::Uncertain`].
pub fn parse_line(line: &str) -> ParsedLine {
    match try_parse_line(line) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("unrecognized deck line: {err}");
            ParsedLine::Uncertain { text: err.text }
        }
    }
}

/// Classify one line, returning the furthest grammar failure instead of
/// falling back to [`ParsedLine::Uncertain`].
pub fn try_parse_line(line: &str) -> Result<ParsedLine, LineError> {
    if line.trim().is_empty() {
        return Ok(ParsedLine::Blank);
    }
    match GRAMMAR.line.parse(Cursor::new(line)) {
        Ok((Shape::Comment, _)) => Ok(ParsedLine::Comment {
            text: line.to_string(),
        }),
        Ok((Shape::Card(entry), _)) => Ok(ParsedLine::Card(entry)),
        Err(failure) => Err(LineError {
            expected: failure.expected,
            offset: failure.cursor.index(),
            text: line.to_string(),
        }),
    }
}

enum Shape {
    Comment,
    Card(CardEntry),
}

enum Annotation {
    Foil,
    Tags(Vec<String>),
    EarColor(String),
}

/// `(SET)`, an optional collector number, and whatever follows.
struct Printing {
    set_code: String,
    collector_number: Option<u32>,
    annotations: Vec<Annotation>,
}

impl Printing {
    fn apply(self, entry: CardEntry) -> CardEntry {
        let mut entry = entry.with_printing(self.set_code, self.collector_number);
        for annotation in self.annotations {
            match annotation {
                Annotation::Foil => entry.foil = true,
                Annotation::Tags(tags) => entry.tags.extend(tags),
                Annotation::EarColor(color) => entry.ear_color = Some(color),
            }
        }
        entry
    }
}

struct Grammar {
    line: BoxedParser<Shape>,
}

type Terminal<T> = Result<BoxedParser<T>, regex::Error>;

impl Grammar {
    fn new() -> Result<Self, regex::Error> {
        let card = alternative(vec![
            plain_entry()?,
            bracketed_entry()?,
            moxfield_entry()?,
        ])
        .map(Shape::Card);
        let line = alternative(vec![comment()?, card.boxed()]);
        Ok(Self { line: line.boxed() })
    }
}

fn whitespace() -> Terminal<String> {
    Ok(pattern(r"\s", "whitespace")?.boxed())
}

fn spaces() -> Terminal<String> {
    Ok(pattern(r"\s+", "whitespace")?.boxed())
}

/// Positive integer without leading zeros.
fn count() -> Terminal<u32> {
    let digits = pattern("[1-9][0-9]*", "count")?;
    Ok(try_map(digits, |digits: String| digits.parse::<u32>().ok(), "count").boxed())
}

fn collector_number() -> Terminal<u32> {
    count()
}

fn card_name() -> Terminal<String> {
    let name = pattern(r"[^(\[#\s][^(\[#]*", "card name")?;
    Ok(name.map(|name: String| name.trim().to_string()).boxed())
}

fn set_code() -> Terminal<String> {
    let code = pattern("[A-Za-z0-9]{3,4}", "set code")?;
    Ok(code.map(|code: String| code.to_ascii_uppercase()).boxed())
}

fn rest_of_line() -> Terminal<String> {
    Ok(pattern("(?s).*", "rest of line")?.boxed())
}

fn foil() -> BoxedParser<Annotation> {
    literal("*F*").map(|_| Annotation::Foil).boxed()
}

fn tag_list() -> Terminal<Annotation> {
    let tags = pattern(r"\[[^\]]*\]", "tag list")?;
    Ok(tags
        .map(|raw: String| {
            let inner = &raw[1..raw.len() - 1];
            Annotation::Tags(
                inner
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        })
        .boxed())
}

fn ear_color() -> Terminal<Annotation> {
    let ear = pattern(r"\^[^\^]*\^", "ear color")?;
    Ok(ear
        .map(|raw: String| Annotation::EarColor(raw[1..raw.len() - 1].trim().to_string()))
        .boxed())
}

fn annotations() -> Terminal<Vec<Annotation>> {
    let one = sequence((
        optional(spaces()?),
        alternative(vec![foil(), tag_list()?, ear_color()?]),
    ))
    .map(|(_, annotation)| annotation);
    Ok(repeat(one).boxed())
}

fn printing() -> Terminal<Printing> {
    let number = sequence((spaces()?, collector_number()?)).map(|(_, number)| number);
    let tail = sequence((
        literal("("),
        set_code()?,
        literal(")"),
        optional(number),
        annotations()?,
        rest_of_line()?,
    ));
    Ok(tail
        .map(|(_, set_code, _, collector_number, annotations, _)| Printing {
            set_code,
            collector_number,
            annotations,
        })
        .boxed())
}

/// `4 Lightning Bolt`, or `4 Lightning Bolt (M10) 146`.
fn plain_entry() -> Terminal<CardEntry> {
    let shape = sequence((count()?, spaces()?, card_name()?, optional(printing()?)));
    Ok(shape
        .map(|(count, _, name, printing)| {
            let entry = CardEntry::new(name, count);
            match printing {
                Some(printing) => printing.apply(entry),
                None => entry,
            }
        })
        .boxed())
}

/// `1 [MH2#123] Solitude`
fn bracketed_entry() -> Terminal<CardEntry> {
    let printing = sequence((
        literal("["),
        set_code()?,
        literal("#"),
        collector_number()?,
        literal("]"),
    ))
    .map(|(_, set_code, _, number, _)| (set_code, number));
    let shape = sequence((
        count()?,
        spaces()?,
        printing,
        spaces()?,
        card_name()?,
    ));
    Ok(shape
        .map(|(count, _, (set_code, number), _, name)| {
            CardEntry::new(name, count).with_printing(set_code, Some(number))
        })
        .boxed())
}

/// `2x Brainstorm (STA)`, with optional foil/tag/ear-color suffixes.
fn moxfield_entry() -> Terminal<CardEntry> {
    let times = pattern("[xX]", "'x'")?;
    let shape = sequence((count()?, times, spaces()?, card_name()?, printing()?));
    Ok(shape
        .map(|(count, _, _, name, printing)| printing.apply(CardEntry::new(name, count)))
        .boxed())
}

/// `# ...` or `// ...`, after optional leading whitespace.
fn comment() -> Terminal<Shape> {
    let marker = alternative(vec![literal("#").boxed(), literal("//").boxed()]);
    let shape = sequence((repeat(whitespace()?), marker, rest_of_line()?));
    Ok(shape.map(|_| Shape::Comment).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn card(line: &str) -> CardEntry {
        match parse_line(line) {
            ParsedLine::Card(entry) => entry,
            other => panic!("expected a card for {line:?}, got {other:?}"),
        }
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t")]
    #[case(" \t \u{a0}")]
    fn blank_lines(#[case] line: &str) {
        assert_eq!(parse_line(line), ParsedLine::Blank);
    }

    #[rstest]
    #[case("# Commander")]
    #[case("  // note")]
    #[case("//Sideboard")]
    #[case("\t# 4 Lightning Bolt")]
    fn comments_keep_original_text(#[case] line: &str) {
        assert_eq!(
            parse_line(line),
            ParsedLine::Comment {
                text: line.to_string()
            }
        );
    }

    #[test]
    fn plain_entry() {
        assert_eq!(card("4 Lightning Bolt"), CardEntry::new("Lightning Bolt", 4));
    }

    #[test]
    fn plain_entry_trims_name() {
        assert_eq!(card("1   Sol Ring  "), CardEntry::new("Sol Ring", 1));
    }

    #[test]
    fn bracketed_entry() {
        assert_eq!(
            card("1 [MH2#123] Solitude"),
            CardEntry::new("Solitude", 1).with_printing("MH2", Some(123))
        );
    }

    #[test]
    fn moxfield_entry() {
        assert_eq!(
            card("2x Brainstorm (STA)"),
            CardEntry::new("Brainstorm", 2).with_printing("STA", None)
        );
    }

    #[test]
    fn moxfield_entry_with_suffixes() {
        let entry = card("1x Brainstorm (sta) *F* [Draw, Cantrip] ^Have,#37d67a^");
        assert_eq!(entry.card_name, "Brainstorm");
        assert_eq!(entry.set_code.as_deref(), Some("STA"));
        assert!(entry.foil);
        assert_eq!(entry.tags, vec!["Draw".to_string(), "Cantrip".to_string()]);
        assert_eq!(entry.ear_color.as_deref(), Some("Have,#37d67a"));
    }

    #[test]
    fn moxfield_entry_ignores_unknown_remainder() {
        let entry = card("3x Island (UND) some trailing notes");
        assert_eq!(entry, CardEntry::new("Island", 3).with_printing("UND", None));
    }

    #[rstest]
    #[case("4 Lightning Bolt # burn", CardEntry::new("Lightning Bolt", 4))]
    #[case("1 Sol Ring (foo bar)", CardEntry::new("Sol Ring", 1))]
    #[case("2 Fire // Ice [Draw]", CardEntry::new("Fire // Ice", 2))]
    #[case(
        "1 [MH2#123] Solitude (x)",
        CardEntry::new("Solitude", 1).with_printing("MH2", Some(123))
    )]
    #[case(
        "1 [MH2#123]  Solitude  # evoke",
        CardEntry::new("Solitude", 1).with_printing("MH2", Some(123))
    )]
    fn trailing_text_after_name_is_ignored(#[case] line: &str, #[case] expected: CardEntry) {
        assert_eq!(card(line), expected);
    }

    #[test]
    fn arena_entry_with_collector_number() {
        assert_eq!(
            card("4 Lightning Bolt (M10) 146"),
            CardEntry::new("Lightning Bolt", 4).with_printing("M10", Some(146))
        );
    }

    #[test]
    fn unclosed_set_code_keeps_plain_entry() {
        assert_eq!(card("4 Lightning Bolt (M10"), CardEntry::new("Lightning Bolt", 4));
    }

    #[test]
    fn arena_entry_without_collector_number() {
        assert_eq!(
            card("1 Counterspell (MH2)"),
            CardEntry::new("Counterspell", 1).with_printing("MH2", None)
        );
    }

    #[rstest]
    #[case("this is not a decklist line at all {weird}")]
    #[case("0 Black Lotus")]
    #[case("04 Black Lotus")]
    #[case("99999999999 Relentless Rats")]
    #[case("Lightning Bolt")]
    #[case("4")]
    fn uncertain_lines_keep_original_text(#[case] line: &str) {
        assert_eq!(
            parse_line(line),
            ParsedLine::Uncertain {
                text: line.to_string()
            }
        );
    }

    #[test]
    fn diagnostic_names_furthest_failure() {
        let err = try_parse_line("4").unwrap_err();
        assert_eq!(err.expected, "whitespace");
        assert_eq!(err.offset, 1);

        let err = try_parse_line("1 [MH2#12").unwrap_err();
        assert_eq!(err.expected, "]");
        assert_eq!(err.offset, 9);
    }

    #[test]
    fn diagnostic_for_unstructured_text() {
        let err = try_parse_line("this is not a decklist line at all {weird}").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.text, "this is not a decklist line at all {weird}");
    }

    #[test]
    fn overflowing_count_is_reported_as_count() {
        let err = try_parse_line("99999999999 Relentless Rats").unwrap_err();
        assert_eq!(err.expected, "count");
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn reparsing_is_stable() {
        for line in ["2x Brainstorm (STA)", "# c", "", "???", "1 [MH2#123] Solitude"] {
            assert_eq!(parse_line(line), parse_line(line));
        }
    }
}
