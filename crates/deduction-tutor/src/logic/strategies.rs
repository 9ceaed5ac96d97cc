//! Proptest strategies for propositions over a small variable pool.

use super::{Connective, Proposition};
use proptest::prelude::*;

fn arb_atom() -> BoxedStrategy<Proposition> {
    prop_oneof![
        1 => Just(Proposition::True),
        1 => Just(Proposition::False),
        4 => prop::sample::select(vec!["P", "Q", "R", "Tx"]).prop_map(Proposition::variable),
    ]
    .boxed()
}

/// A random proposition of bounded depth
pub(crate) fn arb_proposition(max_depth: u32) -> BoxedStrategy<Proposition> {
    if max_depth == 0 {
        arb_atom()
    } else {
        let inner = arb_proposition(max_depth - 1);
        prop_oneof![
            2 => arb_atom(),
            1 => inner.clone().prop_map(Proposition::negation),
            3 => (
                prop::sample::select(vec![Connective::And, Connective::Or, Connective::Implies]),
                inner.clone(),
                inner,
            )
                .prop_map(|(kind, left, right)| Proposition::operator(kind, left, right)),
        ]
        .boxed()
    }
}
