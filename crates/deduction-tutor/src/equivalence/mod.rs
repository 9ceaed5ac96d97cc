//! Equivalence rules: rewrites that preserve truth in both directions.
//!
//! An [`Equivalence`] names one of twelve laws, the direction it is read
//! in and, for the right-to-left forms that lost information, which
//! connective to rebuild. Matching is purely structural and happens at
//! every subterm; enumeration order is pre-order (a node before its
//! children, left subtree before right).

mod rules;


use crate::logic::{Position, Proposition};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquivalenceRule {
    Identity,
    Domination,
    Idempotency,
    Commutativity,
    Associativity,
    Distributivity,
    Absorption,
    Negation,
    DeMorgan,
    DoubleNegation,
    LawOfImplication,
    Contrapositive,
}

impl EquivalenceRule {
    pub const ALL: [EquivalenceRule; 12] = [
        EquivalenceRule::Identity,
        EquivalenceRule::Domination,
        EquivalenceRule::Idempotency,
        EquivalenceRule::Commutativity,
        EquivalenceRule::Associativity,
        EquivalenceRule::Distributivity,
        EquivalenceRule::Absorption,
        EquivalenceRule::Negation,
        EquivalenceRule::DeMorgan,
        EquivalenceRule::DoubleNegation,
        EquivalenceRule::LawOfImplication,
        EquivalenceRule::Contrapositive,
    ];

    /// Snapshot code, 1-based in declaration order
    pub fn code(self) -> u8 {
        Self::ALL.iter().position(|r| *r == self).map_or(0, |i| i as u8 + 1)
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code).checked_sub(1)?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            EquivalenceRule::Identity => "Identity",
            EquivalenceRule::Domination => "Domination",
            EquivalenceRule::Idempotency => "Idempotency",
            EquivalenceRule::Commutativity => "Commutativity",
            EquivalenceRule::Associativity => "Associativity",
            EquivalenceRule::Distributivity => "Distributivity",
            EquivalenceRule::Absorption => "Absorption",
            EquivalenceRule::Negation => "Negation",
            EquivalenceRule::DeMorgan => "De Morgan",
            EquivalenceRule::DoubleNegation => "Double Negation",
            EquivalenceRule::LawOfImplication => "Law of Implication",
            EquivalenceRule::Contrapositive => "Contrapositive",
        }
    }

    /// Whether the right-to-left form can ever match.
    ///
    /// Domination, Absorption and Negation discard a subterm that cannot be
    /// recovered from the result.
    pub fn is_reversible(self) -> bool {
        !matches!(
            self,
            EquivalenceRule::Domination | EquivalenceRule::Absorption | EquivalenceRule::Negation
        )
    }

    /// Whether the right-to-left form needs a connective chosen
    pub fn needs_version(self) -> bool {
        matches!(self, EquivalenceRule::Identity | EquivalenceRule::Idempotency)
    }
}

impl fmt::Display for EquivalenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Connective rebuilt by a right-to-left Identity or Idempotency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquivalenceVersion {
    And,
    Or,
}

impl EquivalenceVersion {
    pub fn code(self) -> u8 {
        match self {
            EquivalenceVersion::And => 1,
            EquivalenceVersion::Or => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(EquivalenceVersion::And),
            2 => Some(EquivalenceVersion::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Equivalence {
    pub rule: Option<EquivalenceRule>,
    pub left_to_right: bool,
    pub version: Option<EquivalenceVersion>,
}

impl Default for Equivalence {
    fn default() -> Self {
        Equivalence {
            rule: None,
            left_to_right: true,
            version: None,
        }
    }
}

impl Equivalence {
    /// A rule read left to right
    pub fn new(rule: EquivalenceRule) -> Self {
        Equivalence {
            rule: Some(rule),
            ..Default::default()
        }
    }

    /// A rule read right to left
    pub fn reversed(rule: EquivalenceRule, version: Option<EquivalenceVersion>) -> Self {
        Equivalence {
            rule: Some(rule),
            left_to_right: false,
            version,
        }
    }

    /// Whether a version must be chosen before the rule can be applied
    pub fn has_version(&self) -> bool {
        !self.left_to_right && self.rule.map_or(false, EquivalenceRule::needs_version)
    }

    pub fn is_complete(&self) -> bool {
        self.rule.is_some() && (!self.has_version() || self.version.is_some())
    }

    /// Rewrite of the whole proposition, if the rule matches at its root
    pub fn rewrite_at(&self, prop: &Proposition) -> Option<Proposition> {
        let rule = self.rule?;
        if self.left_to_right {
            rules::rewrite_left_to_right(rule, prop)
        } else {
            rules::rewrite_right_to_left(rule, self.version, prop)
        }
    }

    pub fn matches_at(&self, prop: &Proposition) -> bool {
        self.rewrite_at(prop).is_some()
    }

    /// Every subterm the rule matches, in pre-order
    pub fn matches<'p>(&self, prop: &'p Proposition) -> Vec<&'p Proposition> {
        let mut out = Vec::new();
        self.collect_matches(prop, &mut out);
        out
    }

    fn collect_matches<'p>(&self, prop: &'p Proposition, out: &mut Vec<&'p Proposition>) {
        if self.matches_at(prop) {
            out.push(prop);
        }
        for child in prop.children() {
            self.collect_matches(child, out);
        }
    }

    /// Positions of every match, in the same order as [`Equivalence::matches`]
    pub fn match_positions(&self, prop: &Proposition) -> Vec<Position> {
        prop.positions()
            .into_iter()
            .filter(|pos| prop.subterm(pos).map_or(false, |sub| self.matches_at(sub)))
            .collect()
    }

    pub fn match_count(&self, prop: &Proposition) -> usize {
        self.matches(prop).len()
    }

    /// Rewrite every outermost match; matches nested inside a rewritten
    /// subterm are left alone.
    pub fn apply_all(&self, prop: &Proposition) -> Proposition {
        if let Some(rewritten) = self.rewrite_at(prop) {
            return rewritten;
        }
        match prop {
            Proposition::True | Proposition::False | Proposition::Variable(_) => prop.clone(),
            Proposition::Negation(inner) => Proposition::negation(self.apply_all(inner)),
            Proposition::Operator(kind, left, right) => {
                Proposition::operator(*kind, self.apply_all(left), self.apply_all(right))
            }
        }
    }

    /// Rewrite only the match with the given pre-order index.
    ///
    /// An index past the last match leaves the proposition unchanged.
    pub fn apply_once(&self, prop: &Proposition, index: usize) -> Proposition {
        let mut seen = 0;
        self.apply_once_from(prop, index, &mut seen)
    }

    fn apply_once_from(&self, prop: &Proposition, index: usize, seen: &mut usize) -> Proposition {
        if *seen > index {
            return prop.clone();
        }
        if let Some(rewritten) = self.rewrite_at(prop) {
            *seen += 1;
            if *seen == index + 1 {
                return rewritten;
            }
        }
        match prop {
            Proposition::True | Proposition::False | Proposition::Variable(_) => prop.clone(),
            Proposition::Negation(inner) => Proposition::negation(self.apply_once_from(inner, index, seen)),
            Proposition::Operator(kind, left, right) => {
                let left = self.apply_once_from(left, index, seen);
                let right = self.apply_once_from(right, index, seen);
                Proposition::operator(*kind, left, right)
            }
        }
    }
}

impl fmt::Display for Equivalence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            Some(rule) => write!(f, "{}", rule),
            None => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn prop(text: &str) -> Proposition {
        parse(text).unwrap()
    }

    #[test]
    fn test_codes() {
        for (i, rule) in EquivalenceRule::ALL.iter().enumerate() {
            assert_eq!(rule.code() as usize, i + 1);
            assert_eq!(EquivalenceRule::from_code(rule.code()), Some(*rule));
        }
        assert_eq!(EquivalenceRule::from_code(0), None);
        assert_eq!(EquivalenceRule::from_code(13), None);
        assert_eq!(EquivalenceRule::Contrapositive.code(), 12);
    }

    #[test]
    fn test_completeness() {
        assert!(!Equivalence::default().is_complete());
        assert!(Equivalence::new(EquivalenceRule::Identity).is_complete());

        let reversed = Equivalence::reversed(EquivalenceRule::Identity, None);
        assert!(reversed.has_version());
        assert!(!reversed.is_complete());
        assert!(Equivalence::reversed(EquivalenceRule::Identity, Some(EquivalenceVersion::Or)).is_complete());

        let commuted = Equivalence::reversed(EquivalenceRule::Commutativity, None);
        assert!(!commuted.has_version());
        assert!(commuted.is_complete());
    }

    #[test]
    fn test_identity_both_directions() {
        let ltr = Equivalence::new(EquivalenceRule::Identity);
        let p_and_t = prop("P and T");
        assert_eq!(ltr.match_count(&p_and_t), 1);
        assert_eq!(ltr.apply_all(&p_and_t), prop("P"));

        let rtl = Equivalence::reversed(EquivalenceRule::Identity, Some(EquivalenceVersion::And));
        assert_eq!(rtl.apply_all(&prop("P")), p_and_t);

        let rtl_or = Equivalence::reversed(EquivalenceRule::Identity, Some(EquivalenceVersion::Or));
        assert_eq!(rtl_or.apply_all(&prop("P")), prop("P or F"));

        let unversioned = Equivalence::reversed(EquivalenceRule::Identity, None);
        assert_eq!(unversioned.match_count(&prop("P")), 0);
    }

    #[test]
    fn test_left_to_right_rewrites() {
        let cases = [
            (EquivalenceRule::Domination, "P or T", "T"),
            (EquivalenceRule::Domination, "P and F", "F"),
            (EquivalenceRule::Idempotency, "Q or Q", "Q"),
            (EquivalenceRule::Commutativity, "P and Q", "Q and P"),
            (EquivalenceRule::Associativity, "(P or Q) or R", "P or (Q or R)"),
            (EquivalenceRule::Distributivity, "P and (Q or R)", "P and Q or P and R"),
            (EquivalenceRule::Distributivity, "P or Q and R", "(P or Q) and (P or R)"),
            (EquivalenceRule::Absorption, "P or P and Q", "P"),
            (EquivalenceRule::Absorption, "P and (P or Q)", "P"),
            (EquivalenceRule::Negation, "P or not P", "T"),
            (EquivalenceRule::Negation, "P and not P", "F"),
            (EquivalenceRule::DeMorgan, "not (P or Q)", "not P and not Q"),
            (EquivalenceRule::DeMorgan, "not (P and Q)", "not P or not Q"),
            (EquivalenceRule::DoubleNegation, "not not P", "P"),
            (EquivalenceRule::LawOfImplication, "P implies Q", "not P or Q"),
            (EquivalenceRule::Contrapositive, "P implies Q", "not Q implies not P"),
        ];
        for (rule, before, after) in cases {
            let equiv = Equivalence::new(rule);
            assert_eq!(equiv.apply_all(&prop(before)), prop(after), "{} on {}", rule, before);
        }
    }

    #[test]
    fn test_right_to_left_rewrites() {
        let cases = [
            (EquivalenceRule::Idempotency, Some(EquivalenceVersion::Or), "Q", "Q or Q"),
            (EquivalenceRule::Commutativity, None, "P or Q", "Q or P"),
            (EquivalenceRule::Associativity, None, "P and (Q and R)", "(P and Q) and R"),
            (EquivalenceRule::Distributivity, None, "P and Q or P and R", "P and (Q or R)"),
            (EquivalenceRule::Distributivity, None, "(P or Q) and (P or R)", "P or Q and R"),
            (EquivalenceRule::DeMorgan, None, "not P and not Q", "not (P or Q)"),
            (EquivalenceRule::DeMorgan, None, "not P or not Q", "not (P and Q)"),
            (EquivalenceRule::DoubleNegation, None, "P", "not not P"),
            (EquivalenceRule::LawOfImplication, None, "not P or Q", "P implies Q"),
            (EquivalenceRule::Contrapositive, None, "not Q implies not P", "P implies Q"),
        ];
        for (rule, version, before, after) in cases {
            let equiv = Equivalence::reversed(rule, version);
            assert_eq!(equiv.apply_all(&prop(before)), prop(after), "{} on {}", rule, before);
        }
    }

    #[test]
    fn test_right_to_left_requires_shape() {
        let distrib = Equivalence::reversed(EquivalenceRule::Distributivity, None);
        assert_eq!(distrib.match_count(&prop("P and Q or R and S")), 0);

        let implication = Equivalence::reversed(EquivalenceRule::LawOfImplication, None);
        assert_eq!(implication.match_count(&prop("P or Q")), 0);

        let contra = Equivalence::reversed(EquivalenceRule::Contrapositive, None);
        assert_eq!(contra.match_count(&prop("not Q implies P")), 0);
    }

    #[test]
    fn test_irreversible_rules_never_match_backward() {
        let subject = prop("P or P and Q or not P and T");
        for rule in EquivalenceRule::ALL.iter().filter(|r| !r.is_reversible()) {
            for version in [None, Some(EquivalenceVersion::And), Some(EquivalenceVersion::Or)] {
                let equiv = Equivalence::reversed(*rule, version);
                assert_eq!(equiv.match_count(&subject), 0);
                assert_eq!(equiv.apply_all(&subject), subject);
            }
        }
    }

    #[test]
    fn test_matches_in_preorder() {
        let subject = prop("not not (P and not not Q)");
        let equiv = Equivalence::new(EquivalenceRule::DoubleNegation);
        let found = equiv.matches(&subject);
        assert_eq!(found, vec![&subject, &prop("not not Q")]);

        let paths: Vec<Vec<usize>> = equiv.match_positions(&subject).into_iter().map(|p| p.path).collect();
        assert_eq!(paths, vec![vec![], vec![0, 0, 1]]);
    }

    #[test]
    fn test_double_negation_backward_matches_every_node() {
        let subject = prop("P and not Q");
        let equiv = Equivalence::reversed(EquivalenceRule::DoubleNegation, None);
        assert_eq!(equiv.match_count(&subject), subject.size());
    }

    #[test]
    fn test_apply_all_skips_nested_matches() {
        let equiv = Equivalence::new(EquivalenceRule::DoubleNegation);
        let subject = prop("not not not not P");
        assert_eq!(equiv.match_count(&subject), 3);
        assert_eq!(equiv.apply_all(&subject), prop("not not P"));
    }

    #[test]
    fn test_apply_once_rewrites_selected_match() {
        let equiv = Equivalence::new(EquivalenceRule::DoubleNegation);
        let subject = prop("not not P and not not Q");
        assert_eq!(equiv.match_count(&subject), 2);

        assert_eq!(equiv.apply_once(&subject, 0), prop("P and not not Q"));
        assert_eq!(equiv.apply_once(&subject, 1), prop("not not P and Q"));
        assert_eq!(equiv.apply_once(&subject, 2), subject);
    }

    #[test]
    fn test_apply_once_counts_overlapping_matches() {
        let equiv = Equivalence::new(EquivalenceRule::Commutativity);
        let subject = prop("(P and Q) or R");
        assert_eq!(equiv.apply_once(&subject, 0), prop("R or P and Q"));
        assert_eq!(equiv.apply_once(&subject, 1), prop("Q and P or R"));
    }
}
