//! Natural-deduction proofs built edit by edit

use deduction_tutor::{parse, render_tree, InferenceRule, Label, ProofError, Proposition, TreeEdit, TreeProof};

fn prop(text: &str) -> Proposition {
    parse(text).unwrap()
}

fn label(text: &str) -> Label {
    text.parse().unwrap()
}

fn labels(proof: &TreeProof) -> Vec<String> {
    proof.labels().iter().map(ToString::to_string).collect()
}

/// Labels stay in proof order, every citation resolves, and forward
/// citations stay in scope
fn assert_invariants(proof: &TreeProof) {
    assert_eq!(proof.labels().len(), proof.lines().len());
    for pair in proof.labels().windows(2) {
        assert!(pair[0] < pair[1], "labels out of order: {} then {}", pair[0], pair[1]);
    }
    for (index, line) in proof.lines().iter().enumerate() {
        assert_eq!(line.arguments.len(), line.inference.argument_count());
        for argument in line.arguments.iter().flatten() {
            let cited = proof.find_label(argument).unwrap();
            if line.is_forward() {
                assert!(cited < index);
                assert!(argument.in_scope_at(&proof.labels()[index]));
            }
        }
    }
}

struct Script {
    proof: TreeProof,
}

impl Script {
    fn new(start: &str, end: &str) -> Self {
        Script {
            proof: TreeProof::new(prop(start), prop(end)),
        }
    }

    fn edit(&mut self, edit: TreeEdit) -> &TreeProof {
        self.proof = self.proof.apply_edit(edit).unwrap();
        assert_invariants(&self.proof);
        &self.proof
    }

    fn rule(&mut self, line: usize, rule: InferenceRule) -> &TreeProof {
        self.edit(TreeEdit::SetRule { line, rule: Some(rule) })
    }

    fn cite(&mut self, line: usize, slot: usize, text: &str) -> &TreeProof {
        self.edit(TreeEdit::SetArgument {
            line,
            slot,
            label: Some(label(text)),
        })
    }
}

/// Q implies (P implies R) from P implies (Q implies R)
fn exchange_premises() -> Script {
    let mut script = Script::new("P implies Q implies R", "Q implies P implies R");
    script.rule(1, InferenceRule::DirectProof);
    script.rule(2, InferenceRule::DirectProof);
    assert_eq!(labels(&script.proof), ["1", "2.1", "2.2.1", "2.2.2", "2.2", "2"]);

    // R, worked forward: P with the premise gives Q implies R first
    script.edit(TreeEdit::ToggleDirection { line: 3 });
    script.rule(3, InferenceRule::ModusPonens);
    script.cite(3, 0, "2.2.1");
    script.cite(3, 1, "1");
    assert_eq!(labels(&script.proof), ["1", "2.1", "2.2.1", "2.2.2", "2.2.3", "2.2", "2"]);
    assert_eq!(script.proof.lines()[3].proposition, prop("Q implies R"));
    assert_eq!(script.proof.lines()[4].proposition, prop("R"));
    assert_eq!(script.proof.lines()[4].rule(), None);

    script.rule(4, InferenceRule::ModusPonens);
    script.cite(4, 0, "2.1");
    script.cite(4, 1, "2.2.2");
    script
}

#[test]
fn test_exchange_of_premises_is_solved() {
    let script = exchange_premises();
    let proof = &script.proof;

    assert_eq!(proof.len(), 7);
    assert_eq!(proof.lines()[5].arguments, vec![Some(label("2.2.1")), Some(label("2.2.3"))]);
    assert_eq!(proof.lines()[6].arguments, vec![Some(label("2.1")), Some(label("2.2"))]);
    assert!(proof.is_solved().unwrap());

    let rendered = render_tree(proof).unwrap();
    assert!(rendered.iter().all(|line| line.correct && line.collapsed));
    assert_eq!(rendered[4].arguments, vec![Some("2.1".to_string()), Some("2.2.2".to_string())]);
    assert_eq!(rendered[4].argument_choices, ["1", "2.1", "2.2.1", "2.2.2"]);
}

#[test]
fn test_deleting_derived_line_renumbers_subproof() {
    let mut script = exchange_premises();
    script.edit(TreeEdit::DeleteLine { line: 3 });
    let proof = &script.proof;

    assert_eq!(labels(proof), ["1", "2.1", "2.2.1", "2.2.2", "2.2", "2"]);
    assert_eq!(proof.lines()[3].proposition, prop("R"));
    assert_eq!(proof.lines()[3].arguments, vec![Some(label("2.1")), None]);
    assert_eq!(proof.lines()[4].arguments, vec![Some(label("2.2.1")), Some(label("2.2.2"))]);
    assert!(!proof.is_correct(3).unwrap());
    assert!(proof.is_correct(4).unwrap());
}

#[test]
fn test_abandoning_outer_subproof_drops_nested_one() {
    let mut script = exchange_premises();
    script.edit(TreeEdit::SetRule { line: 6, rule: None });
    assert_eq!(labels(&script.proof), ["1", "2"]);
    assert!(!script.proof.is_solved().unwrap());
}

#[test]
fn test_backward_intro_and_then_forward_elim() {
    let mut script = Script::new("Q and P", "P and Q");
    script.rule(1, InferenceRule::IntroAnd);
    assert_eq!(labels(&script.proof), ["1", "2", "3", "4"]);
    assert_eq!(script.proof.lines()[1].proposition, prop("P"));
    assert_eq!(script.proof.lines()[2].proposition, prop("Q"));

    for (line, side) in [(1, deduction_tutor::Side::Right), (2, deduction_tutor::Side::Left)] {
        script.edit(TreeEdit::ToggleDirection { line });
        script.rule(line, InferenceRule::ElimAnd);
        script.edit(TreeEdit::SetVersion {
            line,
            version: Some(side),
        });
        script.cite(line, 0, "1");
    }

    assert_eq!(script.proof.len(), 4);
    assert!(script.proof.is_solved().unwrap());
}

#[test]
fn test_rejected_edit_keeps_proof() {
    let script = exchange_premises();
    let before = labels(&script.proof);
    assert!(script.proof.apply_edit(TreeEdit::DeleteLine { line: 4 }).is_err());
    assert!(script
        .proof
        .apply_edit(TreeEdit::SetArgument {
            line: 4,
            slot: 0,
            label: Some(label("2.2")),
        })
        .is_err());
    assert_eq!(labels(&script.proof), before);
}

#[test]
fn test_assumption_and_forward_direct_proof_are_not_offered() {
    let proof = TreeProof::new(prop("P"), prop("Q"));
    let err = proof
        .apply_edit(TreeEdit::SetRule {
            line: 1,
            rule: Some(InferenceRule::Assumption),
        })
        .unwrap_err();
    assert_eq!(
        err,
        ProofError::RuleNotOffered {
            line: 1,
            rule: InferenceRule::Assumption,
        }
    );
    assert!(!proof.is_solved().unwrap());

    let forward = proof.apply_edit(TreeEdit::ToggleDirection { line: 1 }).unwrap();
    let err = forward
        .apply_edit(TreeEdit::SetRule {
            line: 1,
            rule: Some(InferenceRule::DirectProof),
        })
        .unwrap_err();
    assert_eq!(
        err,
        ProofError::RuleNotOffered {
            line: 1,
            rule: InferenceRule::DirectProof,
        }
    );
    assert_eq!(forward.lines()[1].rule(), None);
}
