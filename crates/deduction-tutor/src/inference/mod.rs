//! Inference rules of natural deduction.
//!
//! An [`Inference`] is the rule a proof line is justified by, read either
//! forward (from cited premises to the line) or backward (from the line to
//! the subgoals it needs). Arity depends on both the rule and the
//! direction; the argument slots of a line always follow it.

mod apply;

use crate::equivalence::Equivalence;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferenceRule {
    DirectProof,
    ModusPonens,
    IntroAnd,
    ElimAnd,
    IntroOr,
    ElimOr,
    Equivalence,
    Assumption,
}

impl InferenceRule {
    pub const ALL: [InferenceRule; 8] = [
        InferenceRule::DirectProof,
        InferenceRule::ModusPonens,
        InferenceRule::IntroAnd,
        InferenceRule::ElimAnd,
        InferenceRule::IntroOr,
        InferenceRule::ElimOr,
        InferenceRule::Equivalence,
        InferenceRule::Assumption,
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
            InferenceRule::DirectProof => "Direct Proof",
            InferenceRule::ModusPonens => "Modus Ponens",
            InferenceRule::IntroAnd => "Intro \u{22C0}",
            InferenceRule::ElimAnd => "Elim \u{22C0}",
            InferenceRule::IntroOr => "Intro \u{22C1}",
            InferenceRule::ElimOr => "Elim \u{22C1}",
            InferenceRule::Equivalence => "Equivalence",
            InferenceRule::Assumption => "Assumption",
        }
    }

    /// Whether the rule has an implementation in the given direction
    pub fn supports(self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => !matches!(
                self,
                InferenceRule::DirectProof | InferenceRule::Assumption | InferenceRule::IntroOr
            ),
            Direction::Backward => !matches!(self, InferenceRule::ModusPonens | InferenceRule::ElimOr),
        }
    }
}

impl fmt::Display for InferenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_forward(forward: bool) -> Self {
        if forward {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Which operand a two-way rule keeps: Elim-AND forward, Intro-OR backward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn code(self) -> u8 {
        match self {
            Side::Left => 1,
            Side::Right => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Side::Left),
            2 => Some(Side::Right),
            _ => None,
        }
    }
}

/// A rule together with the choices needed to apply it.
///
/// `equivalence` is present exactly when the rule is
/// [`InferenceRule::Equivalence`]. `match_index` selects a single match of
/// that equivalence; `None` rewrites every match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inference {
    pub rule: Option<InferenceRule>,
    pub forward: bool,
    pub version: Option<Side>,
    pub equivalence: Option<Equivalence>,
    pub match_index: Option<usize>,
}

impl Inference {
    pub fn new(rule: Option<InferenceRule>, forward: bool) -> Self {
        let mut inference = Inference {
            rule: None,
            forward,
            version: None,
            equivalence: None,
            match_index: None,
        };
        inference.set_rule(rule);
        inference
    }

    /// No rule chosen yet
    pub fn unknown(forward: bool) -> Self {
        Self::new(None, forward)
    }

    /// The rule of a hypothesis line
    pub fn assumption() -> Self {
        Self::new(Some(InferenceRule::Assumption), false)
    }

    /// An equivalence step, rewriting every match
    pub fn equivalence(equivalence: Equivalence, forward: bool) -> Self {
        let mut inference = Self::new(Some(InferenceRule::Equivalence), forward);
        inference.equivalence = Some(equivalence);
        inference
    }

    /// Change the rule, keeping an equivalence exactly for the Equivalence rule
    pub fn set_rule(&mut self, rule: Option<InferenceRule>) {
        self.rule = rule;
        if rule == Some(InferenceRule::Equivalence) {
            self.equivalence.get_or_insert_with(Equivalence::default);
        } else {
            self.equivalence = None;
            self.match_index = None;
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::from_forward(self.forward)
    }

    /// Number of propositions the rule consumes
    pub fn num_inputs(&self) -> usize {
        let Some(rule) = self.rule else { return 0 };
        match rule {
            InferenceRule::DirectProof => 1,
            InferenceRule::ModusPonens | InferenceRule::IntroAnd | InferenceRule::ElimOr => {
                if self.forward {
                    2
                } else {
                    1
                }
            }
            InferenceRule::ElimAnd => {
                if self.forward {
                    1
                } else {
                    2
                }
            }
            InferenceRule::IntroOr | InferenceRule::Equivalence | InferenceRule::Assumption => 1,
        }
    }

    /// Number of propositions the rule produces
    pub fn num_outputs(&self) -> usize {
        let Some(rule) = self.rule else { return 0 };
        match rule {
            InferenceRule::DirectProof => 2,
            InferenceRule::ModusPonens | InferenceRule::IntroAnd | InferenceRule::ElimOr => {
                if self.forward {
                    1
                } else {
                    2
                }
            }
            InferenceRule::ElimAnd | InferenceRule::IntroOr => {
                if self.forward {
                    2
                } else {
                    1
                }
            }
            InferenceRule::Equivalence => 1,
            InferenceRule::Assumption => 0,
        }
    }

    /// Argument slots of a line justified by this inference: the cited
    /// premises going forward, the generated subgoals going backward.
    pub fn argument_count(&self) -> usize {
        if self.forward {
            self.num_inputs()
        } else {
            self.num_outputs()
        }
    }

    /// Whether a [`Side`] must be chosen
    pub fn has_version(&self) -> bool {
        (self.forward && self.num_outputs() == 2) || (!self.forward && self.rule == Some(InferenceRule::IntroOr))
    }

    pub fn is_complete(&self) -> bool {
        let Some(rule) = self.rule else { return false };
        if self.has_version() && self.version.is_none() {
            return false;
        }
        if rule == InferenceRule::Equivalence {
            return self.equivalence.as_ref().map_or(false, Equivalence::is_complete);
        }
        true
    }

    pub fn rule_name(&self) -> Option<&'static str> {
        match self.rule? {
            InferenceRule::Equivalence => self.equivalence?.rule.map(|r| r.name()),
            rule => Some(rule.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalence::EquivalenceRule;

    fn arity(rule: InferenceRule, forward: bool) -> (usize, usize) {
        let inference = Inference::new(Some(rule), forward);
        (inference.num_inputs(), inference.num_outputs())
    }

    #[test]
    fn test_arity_table() {
        let table = [
            (InferenceRule::DirectProof, (1, 2), (1, 2)),
            (InferenceRule::ModusPonens, (2, 1), (1, 2)),
            (InferenceRule::IntroAnd, (2, 1), (1, 2)),
            (InferenceRule::ElimAnd, (1, 2), (2, 1)),
            (InferenceRule::IntroOr, (1, 2), (1, 1)),
            (InferenceRule::ElimOr, (2, 1), (1, 2)),
            (InferenceRule::Equivalence, (1, 1), (1, 1)),
            (InferenceRule::Assumption, (1, 0), (1, 0)),
        ];
        for (rule, forward, backward) in table {
            assert_eq!(arity(rule, true), forward, "{} forward", rule);
            assert_eq!(arity(rule, false), backward, "{} backward", rule);
        }
        let unknown = Inference::unknown(true);
        assert_eq!((unknown.num_inputs(), unknown.num_outputs()), (0, 0));
    }

    #[test]
    fn test_codes() {
        assert_eq!(InferenceRule::DirectProof.code(), 1);
        assert_eq!(InferenceRule::Assumption.code(), 8);
        for rule in InferenceRule::ALL {
            assert_eq!(InferenceRule::from_code(rule.code()), Some(rule));
        }
        assert_eq!(InferenceRule::from_code(0), None);
        assert_eq!(InferenceRule::from_code(9), None);
    }

    #[test]
    fn test_versions() {
        assert!(Inference::new(Some(InferenceRule::ElimAnd), true).has_version());
        assert!(!Inference::new(Some(InferenceRule::ElimAnd), false).has_version());
        assert!(Inference::new(Some(InferenceRule::IntroOr), false).has_version());
        assert!(!Inference::new(Some(InferenceRule::IntroAnd), false).has_version());

        let mut elim = Inference::new(Some(InferenceRule::ElimAnd), true);
        assert!(!elim.is_complete());
        elim.version = Some(Side::Right);
        assert!(elim.is_complete());
    }

    #[test]
    fn test_equivalence_follows_rule() {
        let mut inference = Inference::unknown(true);
        assert!(!inference.is_complete());

        inference.set_rule(Some(InferenceRule::Equivalence));
        assert_eq!(inference.equivalence, Some(Equivalence::default()));
        assert!(!inference.is_complete());
        assert_eq!(inference.rule_name(), None);

        inference.equivalence = Some(Equivalence::new(EquivalenceRule::DeMorgan));
        assert!(inference.is_complete());
        assert_eq!(inference.rule_name(), Some("De Morgan"));

        inference.match_index = Some(0);
        inference.set_rule(Some(InferenceRule::ModusPonens));
        assert_eq!(inference.equivalence, None);
        assert_eq!(inference.match_index, None);
    }

    #[test]
    fn test_supported_directions() {
        use Direction::*;
        assert!(!InferenceRule::DirectProof.supports(Forward));
        assert!(!InferenceRule::Assumption.supports(Forward));
        assert!(!InferenceRule::IntroOr.supports(Forward));
        assert!(!InferenceRule::ModusPonens.supports(Backward));
        assert!(!InferenceRule::ElimOr.supports(Backward));
        assert!(InferenceRule::Equivalence.supports(Forward));
        assert!(InferenceRule::Equivalence.supports(Backward));
    }
}
