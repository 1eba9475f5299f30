//! Parser combinators over an immutable cursor.
//!
//! A parser takes a [`Cursor`] by value and returns either the parsed value
//! with an advanced cursor, or a [`Failure`] recording what was expected and
//! how far matching got. Cursors are `Copy`, so backtracking is just reusing
//! the cursor an attempt started from.

use std::fmt;

use regex::Regex;

/// Position inside a single line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    text: &'a str,
    index: usize,
}

impl<'a> Cursor<'a> {
    /// Start a cursor at the beginning of `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text, index: 0 }
    }

    /// The full text being parsed.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset into [`Cursor::text`].
    pub fn index(&self) -> usize {
        self.index
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.text[self.index..]
    }

    pub fn is_at_end(&self) -> bool {
        self.index == self.text.len()
    }

    fn advance(self, len: usize) -> Self {
        Self {
            index: self.index + len,
            ..self
        }
    }
}

/// A failed parse: what was expected, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<'a> {
    pub expected: String,
    pub cursor: Cursor<'a>,
}

impl<'a> Failure<'a> {
    pub fn new<S: Into<String>>(expected: S, cursor: Cursor<'a>) -> Self {
        Self {
            expected: expected.into(),
            cursor,
        }
    }
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} at offset {}", self.expected, self.cursor.index)
    }
}

pub type ParseResult<'a, T> = Result<(T, Cursor<'a>), Failure<'a>>;

/// Type-erased parser, shareable across threads.
pub type BoxedParser<T> = Box<dyn Parser<Output = T> + Send + Sync>;

/// Anything that can consume input from a cursor.
pub trait Parser {
    type Output;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output>;

    /// Transform the value of a successful parse.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        map(self, f)
    }

    fn boxed(self) -> BoxedParser<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Box::new(self)
    }
}

impl<P: Parser + ?Sized> Parser for Box<P> {
    type Output = P::Output;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        (**self).parse(cursor)
    }
}

impl<P: Parser + ?Sized> Parser for &P {
    type Output = P::Output;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        (**self).parse(cursor)
    }
}

/// Matches an exact string.
#[derive(Debug, Clone, Copy)]
pub struct Literal {
    text: &'static str,
}

pub fn literal(text: &'static str) -> Literal {
    Literal { text }
}

impl Parser for Literal {
    type Output = &'static str;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        if cursor.rest().starts_with(self.text) {
            Ok((self.text, cursor.advance(self.text.len())))
        } else {
            Err(Failure::new(self.text, cursor))
        }
    }
}

/// Matches a regular expression anchored at the cursor.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    label: &'static str,
}

/// Build a pattern terminal. `label` is reported when it fails to match.
pub fn pattern(re: &str, label: &'static str) -> Result<Pattern, regex::Error> {
    let regex = Regex::new(&format!("^(?:{re})"))?;
    Ok(Pattern { regex, label })
}

impl Parser for Pattern {
    type Output = String;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        match self.regex.find(cursor.rest()) {
            Some(found) => Ok((found.as_str().to_string(), cursor.advance(found.end()))),
            None => Err(Failure::new(self.label, cursor)),
        }
    }
}

/// Succeeds only when no input remains.
#[derive(Debug, Clone, Copy)]
pub struct End;

pub fn end() -> End {
    End
}

impl Parser for End {
    type Output = ();

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        if cursor.is_at_end() {
            Ok(((), cursor))
        } else {
            Err(Failure::new("end of line", cursor))
        }
    }
}

/// Runs a tuple of parsers in order. See [`sequence`].
#[derive(Debug, Clone)]
pub struct Sequence<T>(T);

/// Run each parser of the tuple in turn, yielding a tuple of their values.
///
/// The first failure is returned as-is, so its cursor reflects how much of
/// the sequence matched.
pub fn sequence<T>(parsers: T) -> Sequence<T>
where
    Sequence<T>: Parser,
{
    Sequence(parsers)
}

macro_rules! impl_sequence {
    ($($ty:ident $parser:ident $value:ident),+) => {
        impl<$($ty: Parser),+> Parser for Sequence<($($ty,)+)> {
            type Output = ($($ty::Output,)+);

            fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
                let ($($parser,)+) = &self.0;
                $(let ($value, cursor) = $parser.parse(cursor)?;)+
                Ok((($($value,)+), cursor))
            }
        }
    };
}

impl_sequence!(A pa va, B pb vb);
impl_sequence!(A pa va, B pb vb, C pc vc);
impl_sequence!(A pa va, B pb vb, C pc vc, D pd vd);
impl_sequence!(A pa va, B pb vb, C pc vc, D pd vd, E pe ve);
impl_sequence!(A pa va, B pb vb, C pc vc, D pd vd, E pe ve, F pf vf);
impl_sequence!(A pa va, B pb vb, C pc vc, D pd vd, E pe ve, F pf vf, G pg vg);
impl_sequence!(A pa va, B pb vb, C pc vc, D pd vd, E pe ve, F pf vf, G pg vg, H ph vh);

/// Ordered choice between parsers of the same output type.
pub struct Alternative<T> {
    parsers: Vec<BoxedParser<T>>,
}

/// Try each parser from the same cursor and return the first success.
///
/// When every branch fails, the failure that got furthest into the input is
/// reported. Ties go to the earlier branch.
pub fn alternative<T>(parsers: Vec<BoxedParser<T>>) -> Alternative<T> {
    Alternative { parsers }
}

impl<T> Parser for Alternative<T> {
    type Output = T;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        let mut furthest: Option<Failure<'a>> = None;
        for parser in &self.parsers {
            match parser.parse(cursor) {
                Ok(success) => return Ok(success),
                Err(failure) => {
                    if furthest
                        .as_ref()
                        .is_none_or(|best| failure.cursor.index > best.cursor.index)
                    {
                        furthest = Some(failure);
                    }
                }
            }
        }
        Err(furthest.unwrap_or_else(|| Failure::new("nothing", cursor)))
    }
}

#[derive(Debug, Clone)]
pub struct Optional<P>(P);

/// Always succeeds; yields `None` and leaves the cursor alone when `parser` fails.
pub fn optional<P: Parser>(parser: P) -> Optional<P> {
    Optional(parser)
}

impl<P: Parser> Parser for Optional<P> {
    type Output = Option<P::Output>;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        match self.0.parse(cursor) {
            Ok((value, next)) => Ok((Some(value), next)),
            Err(_) => Ok((None, cursor)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Repeat<P>(P);

/// Greedy zero-or-more repetition.
///
/// Stops at the first failure, or at a success that consumed nothing (which
/// would otherwise loop forever).
pub fn repeat<P: Parser>(parser: P) -> Repeat<P> {
    Repeat(parser)
}

impl<P: Parser> Parser for Repeat<P> {
    type Output = Vec<P::Output>;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        let mut values = Vec::new();
        let mut cursor = cursor;
        while let Ok((value, next)) = self.0.parse(cursor) {
            if next.index == cursor.index {
                break;
            }
            values.push(value);
            cursor = next;
        }
        Ok((values, cursor))
    }
}

#[derive(Debug, Clone)]
pub struct Map<P, F> {
    parser: P,
    f: F,
}

pub fn map<P, F, U>(parser: P, f: F) -> Map<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> U,
{
    Map { parser, f }
}

impl<P, F, U> Parser for Map<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        self.parser
            .parse(cursor)
            .map(|(value, next)| ((self.f)(value), next))
    }
}

#[derive(Debug, Clone)]
pub struct TryMap<P, F> {
    parser: P,
    f: F,
    label: &'static str,
}

/// Like [`map`], but `f` may reject the value.
///
/// A rejected value fails with `label` at the cursor where `parser` started.
pub fn try_map<P, F, U>(parser: P, f: F, label: &'static str) -> TryMap<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> Option<U>,
{
    TryMap { parser, f, label }
}

impl<P, F, U> Parser for TryMap<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> Option<U>,
{
    type Output = U;

    fn parse<'a>(&self, cursor: Cursor<'a>) -> ParseResult<'a, Self::Output> {
        let (value, next) = self.parser.parse(cursor)?;
        match (self.f)(value) {
            Some(mapped) => Ok((mapped, next)),
            None => Err(Failure::new(self.label, cursor)),
        }
    }
}
