//! Per-line summaries for whatever displays a proof

use super::chain::ChainProof;
use super::tree::{ProofLine, TreeProof};
use crate::error::ProofError;
use crate::inference::InferenceRule;
use crate::logic::{Position, Proposition};
use crate::parser::{format_highlighted, FormattedProposition, MatchKind};
use serde::Serialize;

/// What a display needs to know about one line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLine {
    /// Dotted label; chains have none
    pub label: Option<String>,
    pub depth: usize,
    pub proposition: FormattedProposition,
    pub rule_name: Option<&'static str>,
    pub forward: bool,
    pub complete: bool,
    pub correct: bool,
    /// Complete but not correct
    pub error: bool,
    /// Correct and not being edited
    pub collapsed: bool,
    pub arguments: Vec<Option<String>>,
    /// Labels a forward line may cite
    pub argument_choices: Vec<String>,
    pub has_version: bool,
    /// Matches of the chosen equivalence, once it is complete
    pub match_count: Option<usize>,
    pub deletable: bool,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedChain {
    pub start: FormattedProposition,
    pub lines: Vec<RenderedLine>,
}

pub fn render_tree(proof: &TreeProof) -> Result<Vec<RenderedLine>, ProofError> {
    let mut rendered = Vec::with_capacity(proof.len());
    for (index, line) in proof.lines().iter().enumerate() {
        let label = proof.label(index)?;
        let complete = line.is_complete();
        let correct = proof.is_correct(index)?;
        let argument_choices = if line.is_forward() {
            proof.labels_in_scope(index).into_iter().map(ToString::to_string).collect()
        } else {
            vec![]
        };

        rendered.push(RenderedLine {
            label: Some(label.to_string()),
            depth: label.depth(),
            proposition: format_highlighted(&line.proposition, &tree_highlights(line)),
            rule_name: line.inference.rule_name(),
            forward: line.is_forward(),
            complete,
            correct,
            error: complete && !correct,
            collapsed: correct && !line.editing,
            arguments: line
                .arguments
                .iter()
                .map(|arg| arg.as_ref().map(ToString::to_string))
                .collect(),
            argument_choices,
            has_version: line.inference.has_version()
                || line.inference.equivalence.map_or(false, |eq| eq.has_version()),
            match_count: tree_match_count(proof, line),
            deletable: !line.fixed,
            editable: line.editable,
        });
    }
    Ok(rendered)
}

/// Backward equivalence lines highlight where their rule rewrites them
fn tree_highlights(line: &ProofLine) -> Vec<(Position, MatchKind)> {
    match line.inference.equivalence {
        Some(equivalence) if !line.is_forward() && equivalence.is_complete() => {
            selected(equivalence.match_positions(&line.proposition), line.inference.match_index)
                .into_iter()
                .filter(|pos| !pos.is_root())
                .map(|pos| (pos, MatchKind::Backward))
                .collect()
        }
        _ => vec![],
    }
}

fn tree_match_count(proof: &TreeProof, line: &ProofLine) -> Option<usize> {
    if line.rule() != Some(InferenceRule::Equivalence) {
        return None;
    }
    let equivalence = line.inference.equivalence.filter(|eq| eq.is_complete())?;
    let source: &Proposition = if line.is_forward() {
        let label = line.arguments.first()?.as_ref()?;
        &proof.find_line(label).ok()?.proposition
    } else {
        &line.proposition
    };
    Some(equivalence.match_count(source))
}

fn selected(positions: Vec<Position>, match_index: Option<usize>) -> Vec<Position> {
    match match_index {
        None => positions,
        Some(index) => positions.into_iter().nth(index).into_iter().collect(),
    }
}

pub fn render_chain(proof: &ChainProof) -> Result<RenderedChain, ProofError> {
    let lines = proof.lines();
    let forward_matches = |index: usize, prop: &Proposition| -> Vec<(Position, MatchKind)> {
        match lines.get(index) {
            Some(next) if next.forward => next
                .matched_positions(prop)
                .into_iter()
                .map(|pos| (pos, MatchKind::Forward))
                .collect(),
            _ => vec![],
        }
    };

    let start = format_highlighted(proof.start(), &forward_matches(0, proof.start()));
    let mut rendered = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let prev = proof.previous(index)?;
        let mut highlights = forward_matches(index + 1, &line.proposition);
        if !line.forward {
            highlights.extend(
                line.matched_positions(&line.proposition)
                    .into_iter()
                    .map(|pos| (pos, MatchKind::Backward)),
            );
        }
        let complete = line.equivalence.is_complete();
        let correct = line.is_correct(prev);

        rendered.push(RenderedLine {
            label: None,
            depth: 0,
            proposition: format_highlighted(&line.proposition, &highlights),
            rule_name: line.rule_name(),
            forward: line.forward,
            complete,
            correct,
            error: complete && !correct,
            collapsed: correct && !line.editing,
            arguments: vec![],
            argument_choices: vec![],
            has_version: line.equivalence.has_version(),
            match_count: complete.then(|| line.match_count(prev)),
            deletable: index + 1 < lines.len(),
            editable: true,
        });
    }
    Ok(RenderedChain { start, lines: rendered })
}
