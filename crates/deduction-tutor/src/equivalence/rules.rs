//! Root-level rewrites for each equivalence law

use super::{EquivalenceRule, EquivalenceVersion};
use crate::logic::{Connective, Proposition};

/// Only `and` and `or` take part in the algebraic laws
fn is_lattice(kind: Connective) -> bool {
    matches!(kind, Connective::And | Connective::Or)
}

/// The other lattice connective
fn dual(kind: Connective) -> Option<Connective> {
    match kind {
        Connective::And => Some(Connective::Or),
        Connective::Or => Some(Connective::And),
        Connective::Implies => None,
    }
}

pub(super) fn rewrite_left_to_right(rule: EquivalenceRule, prop: &Proposition) -> Option<Proposition> {
    use Proposition::{Negation, Operator};

    match (rule, prop) {
        // P and T = P, P or F = P
        (EquivalenceRule::Identity, Operator(Connective::And, p, r)) if **r == Proposition::True => {
            Some((**p).clone())
        }
        (EquivalenceRule::Identity, Operator(Connective::Or, p, r)) if **r == Proposition::False => {
            Some((**p).clone())
        }

        // P or T = T, P and F = F
        (EquivalenceRule::Domination, Operator(Connective::Or, _, r)) if **r == Proposition::True => {
            Some(Proposition::True)
        }
        (EquivalenceRule::Domination, Operator(Connective::And, _, r)) if **r == Proposition::False => {
            Some(Proposition::False)
        }

        (EquivalenceRule::Idempotency, Operator(kind, p, q)) if is_lattice(*kind) && p == q => Some((**p).clone()),

        (EquivalenceRule::Commutativity, Operator(kind, p, q)) if is_lattice(*kind) => {
            Some(Proposition::operator(*kind, (**q).clone(), (**p).clone()))
        }

        // (P op Q) op R = P op (Q op R)
        (EquivalenceRule::Associativity, Operator(kind, left, r)) if is_lattice(*kind) => {
            let (p, q) = left.operands(*kind)?;
            Some(Proposition::operator(
                *kind,
                p.clone(),
                Proposition::operator(*kind, q.clone(), (**r).clone()),
            ))
        }

        // P op (Q dual R) = (P op Q) dual (P op R)
        (EquivalenceRule::Distributivity, Operator(kind, p, right)) => {
            let inner = dual(*kind)?;
            let (q, r) = right.operands(inner)?;
            Some(Proposition::operator(
                inner,
                Proposition::operator(*kind, (**p).clone(), q.clone()),
                Proposition::operator(*kind, (**p).clone(), r.clone()),
            ))
        }

        // P or (P and Q) = P, P and (P or Q) = P
        (EquivalenceRule::Absorption, Operator(kind, p, right)) => {
            let (p2, _) = right.operands(dual(*kind)?)?;
            (**p == *p2).then(|| (**p).clone())
        }

        // P or not P = T, P and not P = F
        (EquivalenceRule::Negation, Operator(kind, p, right)) if is_lattice(*kind) => {
            let negated = right.negated()?;
            if **p != *negated {
                return None;
            }
            Some(if *kind == Connective::Or {
                Proposition::True
            } else {
                Proposition::False
            })
        }

        // not (P op Q) = not P dual not Q
        (EquivalenceRule::DeMorgan, Negation(inner)) => match inner.as_ref() {
            Operator(kind, p, q) => Some(Proposition::operator(
                dual(*kind)?,
                Proposition::negation((**p).clone()),
                Proposition::negation((**q).clone()),
            )),
            _ => None,
        },

        (EquivalenceRule::DoubleNegation, Negation(inner)) => inner.negated().cloned(),

        (EquivalenceRule::LawOfImplication, Operator(Connective::Implies, p, q)) => Some(Proposition::disjunction(
            Proposition::negation((**p).clone()),
            (**q).clone(),
        )),

        (EquivalenceRule::Contrapositive, Operator(Connective::Implies, p, q)) => Some(Proposition::implication(
            Proposition::negation((**q).clone()),
            Proposition::negation((**p).clone()),
        )),

        _ => None,
    }
}

pub(super) fn rewrite_right_to_left(
    rule: EquivalenceRule,
    version: Option<EquivalenceVersion>,
    prop: &Proposition,
) -> Option<Proposition> {
    use Proposition::Operator;

    match (rule, prop) {
        (EquivalenceRule::Identity, _) => Some(match version? {
            EquivalenceVersion::And => Proposition::conjunction(prop.clone(), Proposition::True),
            EquivalenceVersion::Or => Proposition::disjunction(prop.clone(), Proposition::False),
        }),

        (EquivalenceRule::Idempotency, _) => Some(match version? {
            EquivalenceVersion::And => Proposition::conjunction(prop.clone(), prop.clone()),
            EquivalenceVersion::Or => Proposition::disjunction(prop.clone(), prop.clone()),
        }),

        (EquivalenceRule::Commutativity, Operator(kind, p, q)) if is_lattice(*kind) => {
            Some(Proposition::operator(*kind, (**q).clone(), (**p).clone()))
        }

        // P op (Q op R) = (P op Q) op R
        (EquivalenceRule::Associativity, Operator(kind, p, right)) if is_lattice(*kind) => {
            let (q, r) = right.operands(*kind)?;
            Some(Proposition::operator(
                *kind,
                Proposition::operator(*kind, (**p).clone(), q.clone()),
                r.clone(),
            ))
        }

        // (P op Q) dual (P op R) = P op (Q dual R)
        (EquivalenceRule::Distributivity, Operator(outer, left, right)) => {
            let inner = dual(*outer)?;
            let (p, q) = left.operands(inner)?;
            let (p2, r) = right.operands(inner)?;
            if p != p2 {
                return None;
            }
            Some(Proposition::operator(
                inner,
                p.clone(),
                Proposition::operator(*outer, q.clone(), r.clone()),
            ))
        }

        // not P dual not Q = not (P op Q)
        (EquivalenceRule::DeMorgan, Operator(kind, left, right)) => {
            let outer = dual(*kind)?;
            Some(Proposition::negation(Proposition::operator(
                outer,
                left.negated()?.clone(),
                right.negated()?.clone(),
            )))
        }

        (EquivalenceRule::DoubleNegation, _) => Some(Proposition::negation(Proposition::negation(prop.clone()))),

        (EquivalenceRule::LawOfImplication, Operator(Connective::Or, left, q)) => {
            Some(Proposition::implication(left.negated()?.clone(), (**q).clone()))
        }

        (EquivalenceRule::Contrapositive, Operator(Connective::Implies, left, right)) => Some(
            Proposition::implication(right.negated()?.clone(), left.negated()?.clone()),
        ),

        // Domination, Absorption and Negation cannot rebuild what they dropped
        _ => None,
    }
}
