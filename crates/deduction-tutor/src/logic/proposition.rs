//! Propositions over variables, constants and the three binary connectives

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binding rank of atoms (variables and constants)
pub const ATOM_RANK: u8 = 0;
/// Binding rank of negation
pub const NEGATION_RANK: u8 = 1;

/// A binary connective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    And,
    Or,
    Implies,
}

impl Connective {
    /// Binding rank; a larger rank binds more loosely.
    pub fn rank(self) -> u8 {
        match self {
            Connective::And => 2,
            Connective::Or => 3,
            Connective::Implies => 4,
        }
    }

    /// Keyword used by the text grammar
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
            Connective::Implies => "implies",
        }
    }

    /// Symbol used for display
    pub fn symbol(self) -> &'static str {
        match self {
            Connective::And => "\u{22C0}",
            Connective::Or => "\u{22C1}",
            Connective::Implies => "\u{2192}",
        }
    }
}

/// A propositional formula.
///
/// Equality is structural. Values are immutable once built; rewriting
/// produces new trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proposition {
    True,
    False,
    Variable(String),
    Negation(Box<Proposition>),
    Operator(Connective, Box<Proposition>, Box<Proposition>),
}

impl Proposition {
    pub fn variable(name: impl Into<String>) -> Self {
        Proposition::Variable(name.into())
    }

    pub fn negation(inner: Proposition) -> Self {
        Proposition::Negation(Box::new(inner))
    }

    pub fn operator(kind: Connective, left: Proposition, right: Proposition) -> Self {
        Proposition::Operator(kind, Box::new(left), Box::new(right))
    }

    pub fn conjunction(left: Proposition, right: Proposition) -> Self {
        Self::operator(Connective::And, left, right)
    }

    pub fn disjunction(left: Proposition, right: Proposition) -> Self {
        Self::operator(Connective::Or, left, right)
    }

    pub fn implication(left: Proposition, right: Proposition) -> Self {
        Self::operator(Connective::Implies, left, right)
    }

    /// Binding rank of the outermost constructor
    pub fn rank(&self) -> u8 {
        match self {
            Proposition::True | Proposition::False | Proposition::Variable(_) => ATOM_RANK,
            Proposition::Negation(_) => NEGATION_RANK,
            Proposition::Operator(kind, _, _) => kind.rank(),
        }
    }

    pub fn is_atomic(&self) -> bool {
        self.rank() == ATOM_RANK
    }

    /// The connective, if this is a binary operator
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Proposition::Operator(kind, _, _) => Some(*kind),
            _ => None,
        }
    }

    /// Both operands of a binary operator with the given connective
    pub fn operands(&self, kind: Connective) -> Option<(&Proposition, &Proposition)> {
        match self {
            Proposition::Operator(k, left, right) if *k == kind => Some((left.as_ref(), right.as_ref())),
            _ => None,
        }
    }

    /// The negated proposition, if this is a negation
    pub fn negated(&self) -> Option<&Proposition> {
        match self {
            Proposition::Negation(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }

    /// Direct children in left-to-right order
    pub fn children(&self) -> Vec<&Proposition> {
        match self {
            Proposition::True | Proposition::False | Proposition::Variable(_) => vec![],
            Proposition::Negation(inner) => vec![inner.as_ref()],
            Proposition::Operator(_, left, right) => vec![left.as_ref(), right.as_ref()],
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::parser::format(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> Proposition {
        Proposition::variable("P")
    }

    fn q() -> Proposition {
        Proposition::variable("Q")
    }

    #[test]
    fn test_structural_equality() {
        let a = Proposition::conjunction(p(), q());
        let b = Proposition::conjunction(p(), q());
        assert_eq!(a, b);
        assert_ne!(a, Proposition::conjunction(q(), p()));
        assert_ne!(a, Proposition::disjunction(p(), q()));
    }

    #[test]
    fn test_ranks() {
        assert_eq!(Proposition::True.rank(), 0);
        assert_eq!(p().rank(), 0);
        assert_eq!(Proposition::negation(p()).rank(), 1);
        assert_eq!(Proposition::conjunction(p(), q()).rank(), 2);
        assert_eq!(Proposition::disjunction(p(), q()).rank(), 3);
        assert_eq!(Proposition::implication(p(), q()).rank(), 4);
    }

    #[test]
    fn test_accessors() {
        let imp = Proposition::implication(p(), Proposition::negation(q()));
        assert_eq!(imp.connective(), Some(Connective::Implies));
        assert_eq!(imp.operands(Connective::And), None);
        let (left, right) = imp.operands(Connective::Implies).unwrap();
        assert_eq!(left, &p());
        assert_eq!(right.negated(), Some(&q()));
        assert_eq!(imp.size(), 4);
    }
}
