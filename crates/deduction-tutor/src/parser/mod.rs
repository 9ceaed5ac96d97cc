//! Formula grammar, printers and statement entry

pub mod formula;
pub mod statement;


pub use formula::{format, format_highlighted, parse, stringify, FormattedProposition, HighlightSpan, MatchKind};
pub use statement::{StatementEntry, StatementField};
