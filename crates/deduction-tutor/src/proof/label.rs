//! Line labels of a natural-deduction proof.
//!
//! A label is a dot-separated path of positive integers. `2.1` is the
//! first line of the subproof that justifies line `2`. Lines of a
//! subproof are listed before the line they justify, so in proof order a
//! label sorts after every label it is a prefix of.

use crate::error::LabelError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(Vec<u32>);

impl Label {
    pub fn new(parts: Vec<u32>) -> Self {
        debug_assert!(!parts.is_empty() && parts.iter().all(|&p| p > 0), "bad label {:?}", parts);
        Label(parts)
    }

    /// A top-level label
    pub fn top(n: u32) -> Self {
        Label::new(vec![n])
    }

    pub fn parts(&self) -> &[u32] {
        &self.0
    }

    /// Nesting depth; top-level lines have depth 1
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Label of the `n`-th line of this line's subproof
    pub fn child(&self, n: u32) -> Self {
        let mut parts = self.0.clone();
        parts.push(n);
        Label(parts)
    }

    /// Same label with the last component moved by `delta`
    pub fn offset_last(&self, delta: i32) -> Self {
        let mut parts = self.0.clone();
        if let Some(last) = parts.last_mut() {
            *last = last.saturating_add_signed(delta);
        }
        Label::new(parts)
    }

    /// Whether this label lies inside the subproof of `other`
    pub fn is_descendant_of(&self, other: &Label) -> bool {
        self.0.len() > other.0.len() && self.0.starts_with(&other.0)
    }

    /// Label after `delta` lines are inserted (or removed, when negative)
    /// just before the line labeled `pos`.
    ///
    /// Only lines of the subproof `pos` belongs to are renumbered: later
    /// siblings of `pos` (and `pos` itself) together with their subproofs.
    pub fn shifted(&self, pos: &Label, delta: i32) -> Label {
        let d = pos.depth();
        let (label, at) = (&self.0, &pos.0);
        if label.len() < d || label[..d - 1] != at[..d - 1] {
            return self.clone();
        }
        let shifts = match label[d - 1].cmp(&at[d - 1]) {
            Ordering::Less => false,
            Ordering::Equal => label.len() == d,
            Ordering::Greater => true,
        };
        if !shifts {
            return self.clone();
        }
        let mut parts = label.clone();
        parts[d - 1] = parts[d - 1].saturating_add_signed(delta);
        debug_assert!(parts[d - 1] > 0, "label {} shifted below 1", self);
        Label(parts)
    }

    /// Whether a line labeled `self` may be cited from the line labeled
    /// `from`.
    ///
    /// Earlier siblings and earlier siblings of enclosing subproofs are
    /// visible. Lines inside a closed subproof are not, and neither is the
    /// header of a subproof from inside it.
    pub fn in_scope_at(&self, from: &Label) -> bool {
        for (i, (mine, theirs)) in self.0.iter().zip(&from.0).enumerate() {
            match mine.cmp(theirs) {
                Ordering::Less => return self.0.len() == i + 1,
                Ordering::Greater => return false,
                Ordering::Equal => {}
            }
        }
        false
    }
}

/// Proof order: lexicographic, except that a label sorts after the
/// labels of its own subproof.
impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.cmp(b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        other.0.len().cmp(&self.0.len())
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(|part| part.trim().parse::<u32>().ok().filter(|&n| n > 0))
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(|| LabelError(s.to_string()))?;
        Ok(Label(parts))
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> Label {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(label("2.1.3").parts(), &[2, 1, 3]);
        assert_eq!(label("2.1.3").to_string(), "2.1.3");
        for bad in ["", "0", "1..2", "a", "1.-2", "2."] {
            assert!(bad.parse::<Label>().is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_subproof_lines_sort_before_their_header() {
        let order = ["1", "2.1", "2.2.1", "2.2", "2", "3"];
        for pair in order.windows(2) {
            assert!(label(pair[0]) < label(pair[1]), "{} < {}", pair[0], pair[1]);
        }
        let mut shuffled: Vec<Label> = ["3", "2", "2.2", "1", "2.1", "2.2.1"].iter().map(|s| label(s)).collect();
        shuffled.sort();
        let sorted: Vec<String> = shuffled.iter().map(|l| l.to_string()).collect();
        assert_eq!(sorted, order);
    }

    #[test]
    fn test_shift_renumbers_later_siblings() {
        let pos = label("2");
        assert_eq!(label("1").shifted(&pos, 1), label("1"));
        assert_eq!(label("2").shifted(&pos, 1), label("3"));
        assert_eq!(label("3.1").shifted(&pos, 1), label("4.1"));
        assert_eq!(label("2.1").shifted(&pos, 1), label("2.1"));
        assert_eq!(label("4").shifted(&pos, -1), label("3"));
    }

    #[test]
    fn test_shift_stays_inside_enclosing_subproof() {
        let pos = label("2.2");
        assert_eq!(label("2.1").shifted(&pos, 1), label("2.1"));
        assert_eq!(label("2.2").shifted(&pos, 1), label("2.3"));
        assert_eq!(label("2.3.1").shifted(&pos, 1), label("2.4.1"));
        assert_eq!(label("2").shifted(&pos, 1), label("2"));
        assert_eq!(label("3").shifted(&pos, 1), label("3"));
        assert_eq!(label("3.1").shifted(&pos, 1), label("3.1"));
    }

    #[test]
    fn test_scope() {
        let from = label("3.2");
        assert!(label("1").in_scope_at(&from));
        assert!(label("2").in_scope_at(&from));
        assert!(label("3.1").in_scope_at(&from));
        assert!(!label("2.1").in_scope_at(&from));
        assert!(!label("3").in_scope_at(&from));
        assert!(!label("3.2").in_scope_at(&from));
        assert!(!label("3.3").in_scope_at(&from));
        assert!(!label("4").in_scope_at(&from));
    }

    #[test]
    fn test_descendants_and_offsets() {
        assert!(label("2.1.1").is_descendant_of(&label("2")));
        assert!(!label("2").is_descendant_of(&label("2")));
        assert!(!label("3.1").is_descendant_of(&label("2")));
        assert_eq!(label("2.1").offset_last(2), label("2.3"));
        assert_eq!(label("4").child(1), label("4.1"));
    }

    #[test]
    fn test_serde_as_text() {
        let json = serde_json::to_string(&label("2.1")).unwrap();
        assert_eq!(json, "\"2.1\"");
        let back: Label = serde_json::from_str(&json).unwrap();
        assert_eq!(back, label("2.1"));
        assert!(serde_json::from_str::<Label>("\"x\"").is_err());
    }
}
