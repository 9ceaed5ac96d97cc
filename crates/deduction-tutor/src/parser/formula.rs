//! Infix formula grammar and printers.
//!
//! Precedence from loosest to tightest: `implies` (right-associative),
//! `or`, `and` (both left-associative), `not`. Atoms are `T`, `F`,
//! identifiers matching `[A-Z][a-zA-Z0-9]*` and parenthesized formulas.
//! Whitespace between tokens is insignificant.

use crate::error::ParseError;
use crate::logic::proposition::NEGATION_RANK;
use crate::logic::{Connective, Position, Proposition};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace0, satisfy},
    combinator::{all_consuming, map, opt, recognize},
    multi::fold_many0,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use serde::Serialize;

/// Parse a formula, requiring the whole input to be consumed
pub fn parse(input: &str) -> Result<Proposition, ParseError> {
    match all_consuming(terminated(parse_implication, multispace0))(input) {
        Ok((_, prop)) => Ok(prop),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let offset = input.len() - e.input.len();
            let message = if e.input.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected input at offset {}", offset)
            };
            Err(ParseError::new(input, message))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::new(input, "incomplete input")),
    }
}

/// Parse a keyword, skipping leading whitespace
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(kw))
}

/// implication := disjunction ("implies" implication)?
fn parse_implication(input: &str) -> IResult<&str, Proposition> {
    let (input, antecedent) = parse_disjunction(input)?;
    match opt(preceded(keyword("implies"), parse_implication))(input)? {
        (input, Some(consequent)) => Ok((input, Proposition::implication(antecedent, consequent))),
        (input, None) => Ok((input, antecedent)),
    }
}

/// disjunction := conjunction ("or" conjunction)*
fn parse_disjunction(input: &str) -> IResult<&str, Proposition> {
    let (input, first) = parse_conjunction(input)?;
    fold_many0(
        preceded(keyword("or"), parse_conjunction),
        move || first.clone(),
        Proposition::disjunction,
    )(input)
}

/// conjunction := negation ("and" negation)*
fn parse_conjunction(input: &str) -> IResult<&str, Proposition> {
    let (input, first) = parse_negation(input)?;
    fold_many0(
        preceded(keyword("and"), parse_negation),
        move || first.clone(),
        Proposition::conjunction,
    )(input)
}

fn parse_negation(input: &str) -> IResult<&str, Proposition> {
    alt((
        map(preceded(keyword("not"), parse_negation), Proposition::negation),
        parse_primary,
    ))(input)
}

fn parse_primary(input: &str) -> IResult<&str, Proposition> {
    preceded(
        multispace0,
        alt((
            delimited(char('('), parse_implication, preceded(multispace0, char(')'))),
            parse_atom,
        )),
    )(input)
}

/// `T` and `F` are constants only as whole words; `Tx` is a variable.
fn parse_atom(input: &str) -> IResult<&str, Proposition> {
    map(parse_identifier, |name| match name {
        "T" => Proposition::True,
        "F" => Proposition::False,
        _ => Proposition::variable(name),
    })(input)
}

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_uppercase()),
        take_while(|c: char| c.is_ascii_alphanumeric()),
    ))(input)
}

/// Which side of a binary operator an operand sits on
#[derive(Clone, Copy, PartialEq, Eq)]
enum Operand {
    Left,
    Right,
}

/// Whether an operand of `parent` needs parentheses.
///
/// Looser operands are always wrapped. At equal rank, the side that the
/// grammar would not re-associate is wrapped: the right side of `and`/`or`
/// and the left side of `implies`.
fn wraps_operand(parent: Connective, child: &Proposition, side: Operand) -> bool {
    let (child_rank, parent_rank) = (child.rank(), parent.rank());
    if child_rank != parent_rank {
        return child_rank > parent_rank;
    }
    match parent {
        Connective::And | Connective::Or => side == Operand::Right,
        Connective::Implies => side == Operand::Left,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Notation {
    Ascii,
    Unicode,
}

/// Whether a highlighted subterm matches a forward or a backward rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Forward,
    Backward,
}

/// Byte range of a highlighted subterm within formatted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: MatchKind,
}

/// Formatted text plus highlighted subterm ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedProposition {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<HighlightSpan>,
}

struct Printer<'h> {
    notation: Notation,
    out: String,
    requested: &'h [(Position, MatchKind)],
    spans: Vec<HighlightSpan>,
}

impl<'h> Printer<'h> {
    fn new(notation: Notation, requested: &'h [(Position, MatchKind)]) -> Self {
        Printer {
            notation,
            out: String::new(),
            requested,
            spans: Vec::new(),
        }
    }

    fn write(&mut self, prop: &Proposition, here: &mut Vec<usize>) {
        let start = self.out.len();
        match prop {
            Proposition::True => self.out.push('T'),
            Proposition::False => self.out.push('F'),
            Proposition::Variable(name) => self.out.push_str(name),
            Proposition::Negation(inner) => {
                match self.notation {
                    Notation::Ascii => self.out.push_str("not "),
                    Notation::Unicode => self.out.push('\u{00AC}'),
                }
                let wrap = inner.rank() > NEGATION_RANK;
                self.write_child(inner, 0, wrap, here);
            }
            Proposition::Operator(kind, left, right) => {
                let wrap_left = wraps_operand(*kind, left, Operand::Left);
                self.write_child(left, 0, wrap_left, here);
                self.out.push(' ');
                self.out.push_str(match self.notation {
                    Notation::Ascii => kind.keyword(),
                    Notation::Unicode => kind.symbol(),
                });
                self.out.push(' ');
                let wrap_right = wraps_operand(*kind, right, Operand::Right);
                self.write_child(right, 1, wrap_right, here);
            }
        }
        let end = self.out.len();
        for (pos, kind) in self.requested {
            if pos.path == *here {
                self.spans.push(HighlightSpan {
                    start,
                    end,
                    kind: *kind,
                });
            }
        }
    }

    fn write_child(&mut self, child: &Proposition, idx: usize, wrap: bool, here: &mut Vec<usize>) {
        if wrap {
            self.out.push('(');
        }
        here.push(idx);
        self.write(child, here);
        here.pop();
        if wrap {
            self.out.push(')');
        }
    }
}

fn print(prop: &Proposition, notation: Notation) -> String {
    let mut printer = Printer::new(notation, &[]);
    printer.write(prop, &mut Vec::new());
    printer.out
}

/// Display form with operator glyphs and minimal parentheses
pub fn format(prop: &Proposition) -> String {
    print(prop, Notation::Unicode)
}

/// Keyword form that re-parses to an equal proposition
pub fn stringify(prop: &Proposition) -> String {
    print(prop, Notation::Ascii)
}

/// Display form with the subterms at the given positions highlighted.
///
/// Spans are ordered by where their subterm finishes printing, so nested
/// spans come before the spans enclosing them.
pub fn format_highlighted(prop: &Proposition, positions: &[(Position, MatchKind)]) -> FormattedProposition {
    let mut printer = Printer::new(Notation::Unicode, positions);
    printer.write(prop, &mut Vec::new());
    FormattedProposition {
        text: printer.out,
        highlights: printer.spans,
    }
}
