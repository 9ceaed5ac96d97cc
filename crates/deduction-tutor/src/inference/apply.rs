//! Structural matching and application of inference rules

use super::{Direction, Inference, InferenceRule, Side};
use crate::error::RuleError;
use crate::logic::{Connective, Proposition};

impl Inference {
    /// Whether the rule applies to the given propositions in this
    /// inference's direction.
    ///
    /// Forward, `props` are the cited premises. Backward, `props` holds the
    /// conclusion. Unsupported rule and direction pairs never match.
    pub fn matches(&self, props: &[&Proposition]) -> bool {
        if self.forward {
            self.matches_forward(props)
        } else {
            self.matches_backward(props)
        }
    }

    fn matches_forward(&self, props: &[&Proposition]) -> bool {
        let Some(rule) = self.rule else { return false };
        match rule {
            InferenceRule::DirectProof | InferenceRule::Assumption | InferenceRule::IntroOr => false,
            InferenceRule::ModusPonens => match props {
                [premise, implication] => implication
                    .operands(Connective::Implies)
                    .map_or(false, |(antecedent, _)| antecedent == *premise),
                _ => false,
            },
            InferenceRule::IntroAnd => props.len() == 2,
            InferenceRule::ElimAnd => matches!(props, [p] if p.connective() == Some(Connective::And)),
            InferenceRule::ElimOr => match props {
                [disjunction, negation] => match (disjunction.operands(Connective::Or), negation.negated()) {
                    (Some((left, _)), Some(denied)) => left == denied,
                    _ => false,
                },
                _ => false,
            },
            InferenceRule::Equivalence => self.matches_backward(props),
        }
    }

    fn matches_backward(&self, props: &[&Proposition]) -> bool {
        let Some(rule) = self.rule else { return false };
        match rule {
            InferenceRule::ModusPonens | InferenceRule::ElimOr => false,
            InferenceRule::DirectProof => matches!(props, [p] if p.connective() == Some(Connective::Implies)),
            InferenceRule::IntroAnd => matches!(props, [p] if p.connective() == Some(Connective::And)),
            InferenceRule::ElimAnd => props.len() == 2,
            InferenceRule::IntroOr => matches!(props, [p] if p.connective() == Some(Connective::Or)),
            InferenceRule::Equivalence => match (props, self.equivalence) {
                ([p], Some(equivalence)) => {
                    let count = equivalence.match_count(p);
                    count > 0 && self.match_index.map_or(true, |i| i < count)
                }
                _ => false,
            },
            InferenceRule::Assumption => true,
        }
    }

    fn check_ready(&self, direction: Direction) -> Result<InferenceRule, RuleError> {
        let rule = self.rule.ok_or(RuleError::Incomplete)?;
        if !rule.supports(direction) {
            return Err(RuleError::NotAllowed { rule, direction });
        }
        if !self.is_complete() {
            return Err(RuleError::Incomplete);
        }
        Ok(rule)
    }

    /// The proposition derived from the cited premises
    pub fn apply_forward(&self, props: &[&Proposition]) -> Result<Proposition, RuleError> {
        let rule = self.check_ready(Direction::Forward)?;
        let expected = match rule {
            InferenceRule::ModusPonens | InferenceRule::IntroAnd | InferenceRule::ElimOr => 2,
            _ => 1,
        };
        if props.len() != expected {
            return Err(RuleError::WrongInputCount {
                expected,
                actual: props.len(),
            });
        }
        if !self.matches_forward(props) {
            return Err(RuleError::NoMatch);
        }

        let result = match rule {
            InferenceRule::ModusPonens => right_of(props[1], Connective::Implies)?,
            InferenceRule::IntroAnd => Proposition::conjunction(props[0].clone(), props[1].clone()),
            InferenceRule::ElimAnd => {
                let (left, right) = props[0].operands(Connective::And).ok_or(RuleError::NoMatch)?;
                match self.version {
                    Some(Side::Left) => left.clone(),
                    _ => right.clone(),
                }
            }
            InferenceRule::ElimOr => right_of(props[0], Connective::Or)?,
            InferenceRule::Equivalence => {
                let equivalence = self.equivalence.ok_or(RuleError::Incomplete)?;
                match self.match_index {
                    None => equivalence.apply_all(props[0]),
                    Some(index) => equivalence.apply_once(props[0], index),
                }
            }
            InferenceRule::DirectProof | InferenceRule::Assumption | InferenceRule::IntroOr => {
                return Err(RuleError::NotAllowed {
                    rule,
                    direction: Direction::Forward,
                })
            }
        };
        Ok(result)
    }

    /// The subgoals that justify the given conclusion
    pub fn apply_backward(&self, props: &[&Proposition]) -> Result<Vec<Proposition>, RuleError> {
        let rule = self.check_ready(Direction::Backward)?;
        if self.forward {
            return Err(RuleError::NotAllowed {
                rule,
                direction: Direction::Backward,
            });
        }
        let expected = if rule == InferenceRule::ElimAnd { 2 } else { 1 };
        if props.len() != expected {
            return Err(RuleError::WrongInputCount {
                expected,
                actual: props.len(),
            });
        }
        if !self.matches_backward(props) {
            return Err(RuleError::NoMatch);
        }

        let goals = match rule {
            InferenceRule::Assumption => vec![],
            InferenceRule::DirectProof => both_of(props[0], Connective::Implies)?,
            InferenceRule::IntroAnd => both_of(props[0], Connective::And)?,
            InferenceRule::ElimAnd => vec![Proposition::conjunction(props[0].clone(), props[1].clone())],
            InferenceRule::IntroOr => {
                let (left, right) = props[0].operands(Connective::Or).ok_or(RuleError::NoMatch)?;
                match self.version {
                    Some(Side::Left) => vec![left.clone()],
                    _ => vec![right.clone()],
                }
            }
            InferenceRule::Equivalence => {
                let equivalence = self.equivalence.ok_or(RuleError::Incomplete)?;
                vec![match self.match_index {
                    None => equivalence.apply_all(props[0]),
                    Some(index) => equivalence.apply_once(props[0], index),
                }]
            }
            InferenceRule::ModusPonens | InferenceRule::ElimOr => {
                return Err(RuleError::NotAllowed {
                    rule,
                    direction: Direction::Backward,
                })
            }
        };
        Ok(goals)
    }
}

fn right_of(prop: &Proposition, kind: Connective) -> Result<Proposition, RuleError> {
    prop.operands(kind)
        .map(|(_, right)| right.clone())
        .ok_or(RuleError::NoMatch)
}

fn both_of(prop: &Proposition, kind: Connective) -> Result<Vec<Proposition>, RuleError> {
    prop.operands(kind)
        .map(|(left, right)| vec![left.clone(), right.clone()])
        .ok_or(RuleError::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalence::{Equivalence, EquivalenceRule};
    use crate::parser::parse;

    fn prop(text: &str) -> Proposition {
        parse(text).unwrap()
    }

    fn rule(rule: InferenceRule, forward: bool) -> Inference {
        Inference::new(Some(rule), forward)
    }

    #[test]
    fn test_intro_and_both_directions() {
        let (p, q) = (prop("P"), prop("Q"));
        let forward = rule(InferenceRule::IntroAnd, true);
        assert!(forward.matches(&[&p, &q]));
        assert_eq!(forward.apply_forward(&[&p, &q]).unwrap(), prop("P and Q"));

        let backward = rule(InferenceRule::IntroAnd, false);
        let goal = prop("P and Q");
        assert!(backward.matches(&[&goal]));
        assert_eq!(backward.apply_backward(&[&goal]).unwrap(), vec![p, q]);
    }

    #[test]
    fn test_modus_ponens_forward() {
        let mp = rule(InferenceRule::ModusPonens, true);
        let (p, imp) = (prop("P"), prop("P implies Q and R"));
        assert!(mp.matches(&[&p, &imp]));
        assert!(!mp.matches(&[&imp, &p]));
        assert!(!mp.matches(&[&prop("Q"), &imp]));
        assert_eq!(mp.apply_forward(&[&p, &imp]).unwrap(), prop("Q and R"));
    }

    #[test]
    fn test_elim_and_uses_version() {
        let mut elim = rule(InferenceRule::ElimAnd, true);
        let conj = prop("P and Q");
        assert_eq!(elim.apply_forward(&[&conj]), Err(RuleError::Incomplete));

        elim.version = Some(Side::Left);
        assert_eq!(elim.apply_forward(&[&conj]).unwrap(), prop("P"));
        elim.version = Some(Side::Right);
        assert_eq!(elim.apply_forward(&[&conj]).unwrap(), prop("Q"));
        assert!(!elim.matches(&[&prop("P or Q")]));
    }

    #[test]
    fn test_elim_or_forward() {
        let elim = rule(InferenceRule::ElimOr, true);
        let (disj, neg) = (prop("P or Q"), prop("not P"));
        assert!(elim.matches(&[&disj, &neg]));
        assert!(!elim.matches(&[&disj, &prop("not Q")]));
        assert_eq!(elim.apply_forward(&[&disj, &neg]).unwrap(), prop("Q"));
    }

    #[test]
    fn test_direct_proof_backward() {
        let dp = rule(InferenceRule::DirectProof, false);
        let goal = prop("Q implies P implies R");
        assert_eq!(dp.apply_backward(&[&goal]).unwrap(), vec![prop("Q"), prop("P implies R")]);
        assert!(!dp.matches(&[&prop("Q and P")]));
    }

    #[test]
    fn test_intro_or_backward_keeps_chosen_side() {
        let mut intro = rule(InferenceRule::IntroOr, false);
        let goal = prop("P or Q");
        assert!(!intro.is_complete());
        intro.version = Some(Side::Left);
        assert_eq!(intro.apply_backward(&[&goal]).unwrap(), vec![prop("P")]);
        intro.version = Some(Side::Right);
        assert_eq!(intro.apply_backward(&[&goal]).unwrap(), vec![prop("Q")]);
    }

    #[test]
    fn test_assumption_needs_nothing() {
        let assumption = Inference::assumption();
        let p = prop("P");
        assert!(assumption.matches(&[&p]));
        assert_eq!(assumption.apply_backward(&[&p]).unwrap(), Vec::<Proposition>::new());
    }

    #[test]
    fn test_equivalence_steps() {
        let mut step = Inference::equivalence(Equivalence::new(EquivalenceRule::DoubleNegation), true);
        let subject = prop("not not P or not not Q");
        assert!(step.matches(&[&subject]));
        assert_eq!(step.apply_forward(&[&subject]).unwrap(), prop("P or Q"));

        step.match_index = Some(1);
        assert_eq!(step.apply_forward(&[&subject]).unwrap(), prop("not not P or Q"));

        step.match_index = Some(2);
        assert!(!step.matches(&[&subject]));
        assert_eq!(step.apply_forward(&[&subject]), Err(RuleError::NoMatch));

        step.forward = false;
        step.match_index = None;
        assert_eq!(step.apply_backward(&[&subject]).unwrap(), vec![prop("P or Q")]);
    }

    #[test]
    fn test_unsupported_pairs_are_rejected() {
        let (p, q) = (prop("P"), prop("P implies Q"));
        for (r, forward) in [
            (InferenceRule::ModusPonens, false),
            (InferenceRule::ElimOr, false),
            (InferenceRule::IntroOr, true),
            (InferenceRule::DirectProof, true),
            (InferenceRule::Assumption, true),
        ] {
            let mut inference = rule(r, forward);
            inference.version = Some(Side::Left);
            assert!(!inference.matches(&[&p, &q]));
            assert!(!inference.matches(&[&q]));
            let direction = Direction::from_forward(forward);
            let expected = Err(RuleError::NotAllowed { rule: r, direction });
            if forward {
                assert_eq!(inference.apply_forward(&[&q]), expected);
            } else {
                assert_eq!(inference.apply_backward(&[&q]).map(|_| ()), expected.map(|_: Proposition| ()));
            }
        }
    }

    #[test]
    fn test_backward_application_of_forward_line_fails() {
        let forward = rule(InferenceRule::IntroAnd, true);
        let goal = prop("P and Q");
        assert_eq!(
            forward.apply_backward(&[&goal]),
            Err(RuleError::NotAllowed {
                rule: InferenceRule::IntroAnd,
                direction: Direction::Backward
            })
        );
    }

    #[test]
    fn test_wrong_input_count() {
        let intro = rule(InferenceRule::IntroAnd, true);
        let p = prop("P");
        assert_eq!(
            intro.apply_forward(&[&p]),
            Err(RuleError::WrongInputCount { expected: 2, actual: 1 })
        );
    }
}
