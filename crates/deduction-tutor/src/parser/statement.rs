//! Statement entry: the two formulas a proof starts from and aims for.
//!
//! Text is kept as typed; each field is parsed independently and a failed
//! parse only marks that field as erroneous.

use super::formula::parse;
use crate::error::ParseError;
use crate::logic::Proposition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementField {
    Start,
    End,
}

#[derive(Debug, Clone, Default)]
pub struct StatementEntry {
    start_text: String,
    end_text: String,
}

impl StatementEntry {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        StatementEntry {
            start_text: start.into(),
            end_text: end.into(),
        }
    }

    pub fn set_text(&mut self, field: StatementField, text: impl Into<String>) {
        match field {
            StatementField::Start => self.start_text = text.into(),
            StatementField::End => self.end_text = text.into(),
        }
    }

    pub fn text(&self, field: StatementField) -> &str {
        match field {
            StatementField::Start => &self.start_text,
            StatementField::End => &self.end_text,
        }
    }

    /// The parsed field, or `None` when it is empty or malformed
    pub fn proposition(&self, field: StatementField) -> Option<Proposition> {
        parse(self.text(field)).ok()
    }

    /// The parse failure of a non-empty field
    pub fn error(&self, field: StatementField) -> Option<ParseError> {
        let text = self.text(field);
        if text.is_empty() {
            return None;
        }
        parse(text).err()
    }

    /// Both fields are filled in and parse
    pub fn is_ready(&self) -> bool {
        self.statement().is_some()
    }

    /// Start and end propositions, once both parse
    pub fn statement(&self) -> Option<(Proposition, Proposition)> {
        let start = self.proposition(StatementField::Start)?;
        let end = self.proposition(StatementField::End)?;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_not_errors() {
        let entry = StatementEntry::default();
        assert!(entry.error(StatementField::Start).is_none());
        assert!(entry.error(StatementField::End).is_none());
        assert!(!entry.is_ready());
    }

    #[test]
    fn test_malformed_field_reports_error() {
        let mut entry = StatementEntry::new("P and", "Q");
        assert!(entry.error(StatementField::Start).is_some());
        assert!(entry.error(StatementField::End).is_none());
        assert!(!entry.is_ready());

        entry.set_text(StatementField::Start, "P and R");
        assert!(entry.error(StatementField::Start).is_none());
        assert!(entry.is_ready());
        let (start, end) = entry.statement().unwrap();
        assert_eq!(start, Proposition::conjunction(Proposition::variable("P"), Proposition::variable("R")));
        assert_eq!(end, Proposition::variable("Q"));
    }
}
