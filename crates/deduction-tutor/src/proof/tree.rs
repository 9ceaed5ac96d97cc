//! Natural-deduction proofs as a sequence of labeled lines.
//!
//! Lines are kept in proof order next to a parallel list of labels. Every
//! edit works on a copy of the proof and returns the new proof, so a
//! rejected edit leaves the original untouched.
//!
//! Lines remember which proposition they were generated from. Backward
//! steps generate subgoal lines from their own proposition; forward steps
//! mark themselves as their own source. These links decide whether an
//! edit may rewrite a line in place or must insert a new one.

use super::label::Label;
use crate::equivalence::{EquivalenceRule, EquivalenceVersion};
use crate::error::ProofError;
use crate::inference::{Inference, InferenceRule, Side};
use crate::logic::{PropId, PropIdAllocator, Proposition};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// One line of a proof
#[derive(Debug, Clone, PartialEq)]
pub struct ProofLine {
    pub proposition: Proposition,
    pub inference: Inference,
    /// Fixed lines cannot be deleted
    pub fixed: bool,
    /// Whether the rule and direction can be changed
    pub editable: bool,
    /// Shown expanded even when correct
    pub editing: bool,
    /// Cited lines going forward, generated subgoals going backward
    pub arguments: Vec<Option<Label>>,
    pub(crate) prop_id: PropId,
    pub(crate) generated_from: Option<PropId>,
}

impl ProofLine {
    pub(crate) fn new(
        proposition: Proposition,
        prop_id: PropId,
        inference: Inference,
        fixed: bool,
        editable: bool,
    ) -> Self {
        let arguments = vec![None; inference.argument_count()];
        ProofLine {
            proposition,
            inference,
            fixed,
            editable,
            editing: false,
            arguments,
            prop_id,
            generated_from: None,
        }
    }

    pub fn rule(&self) -> Option<InferenceRule> {
        self.inference.rule
    }

    pub fn is_forward(&self) -> bool {
        self.inference.forward
    }

    pub fn is_complete(&self) -> bool {
        self.inference.is_complete()
    }

    pub fn prop_id(&self) -> PropId {
        self.prop_id
    }

    pub fn generated_from(&self) -> Option<PropId> {
        self.generated_from
    }

    /// Change the rule, resizing the argument slots to its arity
    pub fn set_rule(&mut self, rule: Option<InferenceRule>) {
        self.inference.set_rule(rule);
        self.fit_arguments();
    }

    /// Change the direction, resizing the argument slots to its arity
    pub fn set_forward(&mut self, forward: bool) {
        self.inference.forward = forward;
        self.fit_arguments();
    }

    fn fit_arguments(&mut self) {
        self.arguments.resize(self.inference.argument_count(), None);
    }
}

/// A single user action on a tree proof
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeEdit {
    SetRule { line: usize, rule: Option<InferenceRule> },
    ToggleDirection { line: usize },
    SetVersion { line: usize, version: Option<Side> },
    SetEquivalenceRule { line: usize, rule: Option<EquivalenceRule> },
    SetLeftToRight { line: usize, left_to_right: bool },
    SetEquivalenceVersion { line: usize, version: Option<EquivalenceVersion> },
    SetMatchIndex { line: usize, index: Option<usize> },
    SetArgument { line: usize, slot: usize, label: Option<Label> },
    ToggleEditing { line: usize },
    DeleteLine { line: usize },
}

impl TreeEdit {
    /// Index of the line the edit applies to
    pub fn line(&self) -> usize {
        match self {
            TreeEdit::SetRule { line, .. }
            | TreeEdit::ToggleDirection { line }
            | TreeEdit::SetVersion { line, .. }
            | TreeEdit::SetEquivalenceRule { line, .. }
            | TreeEdit::SetLeftToRight { line, .. }
            | TreeEdit::SetEquivalenceVersion { line, .. }
            | TreeEdit::SetMatchIndex { line, .. }
            | TreeEdit::SetArgument { line, .. }
            | TreeEdit::ToggleEditing { line }
            | TreeEdit::DeleteLine { line } => *line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeProof {
    start: Proposition,
    end: Proposition,
    labels: Vec<Label>,
    lines: Vec<ProofLine>,
    ids: PropIdAllocator,
}

impl TreeProof {
    /// A fresh proof: the start as an assumption and the end as an open
    /// backward goal.
    pub fn new(start: Proposition, end: Proposition) -> Self {
        Self::bootstrap(start, end, true)
    }

    /// A fresh proof whose goal line points in the given direction
    pub fn bootstrap(start: Proposition, end: Proposition, goal_backward: bool) -> Self {
        let mut ids = PropIdAllocator::default();
        let premise = ProofLine::new(start.clone(), ids.fresh(), Inference::assumption(), true, false);
        let goal = ProofLine::new(end.clone(), ids.fresh(), Inference::unknown(!goal_backward), true, true);
        TreeProof {
            start,
            end,
            labels: vec![Label::top(1), Label::top(2)],
            lines: vec![premise, goal],
            ids,
        }
    }

    pub(crate) fn from_parts(
        start: Proposition,
        end: Proposition,
        labels: Vec<Label>,
        lines: Vec<ProofLine>,
        ids: PropIdAllocator,
    ) -> Self {
        debug_assert_eq!(labels.len(), lines.len());
        TreeProof {
            start,
            end,
            labels,
            lines,
            ids,
        }
    }

    pub fn start(&self) -> &Proposition {
        &self.start
    }

    pub fn end(&self) -> &Proposition {
        &self.end
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn lines(&self) -> &[ProofLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Result<&ProofLine, ProofError> {
        self.lines.get(index).ok_or(ProofError::LineOutOfRange(index))
    }

    pub fn label(&self, index: usize) -> Result<&Label, ProofError> {
        self.labels.get(index).ok_or(ProofError::LineOutOfRange(index))
    }

    pub fn find_label(&self, label: &Label) -> Result<usize, ProofError> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| ProofError::UnknownLabel(label.clone()))
    }

    pub fn find_line(&self, label: &Label) -> Result<&ProofLine, ProofError> {
        Ok(&self.lines[self.find_label(label)?])
    }

    /// Labels a line may cite, in proof order
    pub fn labels_in_scope(&self, index: usize) -> Vec<&Label> {
        let Some(from) = self.labels.get(index) else {
            return vec![];
        };
        self.labels[..index].iter().filter(|l| l.in_scope_at(from)).collect()
    }

    /// Indices of every line generated, directly or transitively, from the
    /// proposition with the given identity. Self-justified lines are not
    /// followed.
    pub fn generated_closure(&self, id: PropId) -> Vec<usize> {
        let mut found = IndexSet::new();
        self.collect_generated(id, &mut found);
        let mut indices: Vec<usize> = found.into_iter().collect();
        indices.sort_unstable();
        indices
    }

    fn collect_generated(&self, id: PropId, found: &mut IndexSet<usize>) {
        for (i, line) in self.lines.iter().enumerate() {
            if line.generated_from == Some(id) && line.prop_id != id && found.insert(i) {
                self.collect_generated(line.prop_id, found);
            }
        }
    }

    /// Propositions of the cited lines, or `None` while a slot is unset
    fn argument_propositions(&self, line: &ProofLine) -> Result<Option<Vec<&Proposition>>, ProofError> {
        let mut props = Vec::with_capacity(line.arguments.len());
        for argument in &line.arguments {
            match argument {
                Some(label) => props.push(&self.find_line(label)?.proposition),
                None => return Ok(None),
            }
        }
        Ok(Some(props))
    }

    /// Whether the line is justified by its rule.
    ///
    /// A backward line whose generated subgoals disagree with the lines it
    /// points at is a broken proof and reported as an error.
    pub fn is_correct(&self, index: usize) -> Result<bool, ProofError> {
        let line = self.line(index)?;
        if !line.is_complete() {
            return Ok(false);
        }

        if line.inference.forward {
            let from = &self.labels[index];
            if line.arguments.iter().flatten().any(|arg| !arg.in_scope_at(from)) {
                return Ok(false);
            }
            let Some(inputs) = self.argument_propositions(line)? else {
                return Ok(false);
            };
            if !line.inference.matches(&inputs) {
                return Ok(false);
            }
            return Ok(line.inference.apply_forward(&inputs)? == line.proposition);
        }

        if !line.inference.matches(&[&line.proposition]) {
            return Ok(false);
        }
        let expected = line.inference.apply_backward(&[&line.proposition])?;
        if expected.len() != line.arguments.len() {
            return Err(ProofError::ArgumentCount {
                line: index,
                expected: expected.len(),
                actual: line.arguments.len(),
            });
        }
        for (goal, argument) in expected.iter().zip(&line.arguments) {
            let Some(label) = argument else {
                return Ok(false);
            };
            let found = &self.find_line(label)?.proposition;
            if found != goal {
                return Err(ProofError::ArgumentMismatch {
                    line: index,
                    label: label.clone(),
                    expected: goal.clone(),
                    found: found.clone(),
                });
            }
        }
        Ok(true)
    }

    /// Whether every line is justified
    pub fn is_solved(&self) -> Result<bool, ProofError> {
        for index in 0..self.lines.len() {
            if !self.is_correct(index)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Apply a user action, returning the resulting proof
    pub fn apply_edit(&self, edit: TreeEdit) -> Result<TreeProof, ProofError> {
        match self.edit(&edit) {
            Ok(next) => {
                debug!(?edit, lines = next.lines.len(), "tree edit applied");
                Ok(next)
            }
            Err(err) => {
                warn!(?edit, %err, "tree edit rejected");
                Err(err)
            }
        }
    }

    fn edit(&self, edit: &TreeEdit) -> Result<TreeProof, ProofError> {
        let index = edit.line();
        let mut line = self.line(index)?.clone();

        match edit {
            TreeEdit::ToggleEditing { .. } => {
                let mut next = self.clone();
                next.lines[index].editing = !line.editing;
                return Ok(next);
            }
            TreeEdit::DeleteLine { .. } => return self.delete_line(index),
            TreeEdit::SetArgument { slot, label, .. } => {
                self.require_editable(index)?;
                if !line.inference.forward {
                    return Err(ProofError::DerivedArguments(index));
                }
                if *slot >= line.arguments.len() {
                    return Err(ProofError::ArgumentOutOfRange { line: index, slot: *slot });
                }
                if let Some(label) = label {
                    self.find_label(label)?;
                    if !label.in_scope_at(&self.labels[index]) {
                        return Err(ProofError::LabelOutOfScope {
                            line: index,
                            label: label.clone(),
                        });
                    }
                }
                line.arguments[*slot] = label.clone();
            }
            TreeEdit::SetRule { rule, .. } => {
                self.require_editable(index)?;
                // Assumptions only come from bootstrap and subproofs
                if let Some(rule) = *rule {
                    let forward_dp = rule == InferenceRule::DirectProof && line.inference.forward;
                    if rule == InferenceRule::Assumption || forward_dp {
                        return Err(ProofError::RuleNotOffered { line: index, rule });
                    }
                }
                line.set_rule(*rule);
            }
            TreeEdit::ToggleDirection { .. } => {
                self.require_editable(index)?;
                let forward = !line.inference.forward;
                if forward && line.rule() == Some(InferenceRule::DirectProof) {
                    line.set_rule(None);
                }
                line.set_forward(forward);
            }
            TreeEdit::SetVersion { version, .. } => {
                self.require_editable(index)?;
                line.inference.version = *version;
            }
            TreeEdit::SetEquivalenceRule { rule, .. } => {
                self.require_editable(index)?;
                line.inference.equivalence.as_mut().ok_or(ProofError::NoEquivalence(index))?.rule = *rule;
            }
            TreeEdit::SetLeftToRight { left_to_right, .. } => {
                self.require_editable(index)?;
                line.inference
                    .equivalence
                    .as_mut()
                    .ok_or(ProofError::NoEquivalence(index))?
                    .left_to_right = *left_to_right;
            }
            TreeEdit::SetEquivalenceVersion { version, .. } => {
                self.require_editable(index)?;
                line.inference.equivalence.as_mut().ok_or(ProofError::NoEquivalence(index))?.version = *version;
            }
            TreeEdit::SetMatchIndex { index: match_index, .. } => {
                self.require_editable(index)?;
                if line.inference.equivalence.is_none() {
                    return Err(ProofError::NoEquivalence(index));
                }
                line.inference.match_index = *match_index;
            }
        }

        self.update_line(index, line)
    }

    fn require_editable(&self, index: usize) -> Result<(), ProofError> {
        if self.line(index)?.editable {
            Ok(())
        } else {
            Err(ProofError::LineNotEditable(index))
        }
    }

    /// Remove a line the user added
    pub fn delete_line(&self, index: usize) -> Result<TreeProof, ProofError> {
        if self.line(index)?.fixed {
            return Err(ProofError::LineFixed(index));
        }
        let mut next = self.clone();
        next.remove_line(index);
        next.prune_subproofs();
        Ok(next)
    }

    /// Replace the line at `index` with an edited copy and reconcile the
    /// rest of the proof with it.
    ///
    /// Incomplete or non-matching rules are stored as they are. A matching
    /// backward rule regenerates the line's subgoals; a matching forward
    /// rule either rewrites the line, explains it, or inserts its result as
    /// a new line in front of it.
    pub fn update_line(&self, index: usize, line: ProofLine) -> Result<TreeProof, ProofError> {
        let previous = self.line(index)?;
        debug_assert_eq!(line.arguments.len(), line.inference.argument_count());
        let prev_id = previous.prop_id;
        let next_id = self.lines.get(index + 1).map(|l| l.prop_id);
        let mut next = self.clone();

        if !line.is_complete() {
            next.lines[index] = line;
        } else if !line.inference.forward {
            if line.inference.matches(&[&line.proposition]) {
                next.expand_backward(index, line, prev_id)?;
            } else {
                next.lines[index] = line;
            }
        } else {
            match self.argument_propositions(&line)? {
                Some(inputs) if line.inference.matches(&inputs) => {
                    let result = line.inference.apply_forward(&inputs)?;
                    next.record_forward(index, line, result, prev_id, next_id);
                }
                _ => next.lines[index] = line,
            }
        }

        next.prune_subproofs();
        Ok(next)
    }

    /// Regenerate the subgoals of a backward line
    fn expand_backward(&mut self, index: usize, line: ProofLine, prev_id: PropId) -> Result<(), ProofError> {
        let mut index = index;
        let source = line.prop_id;
        self.lines[index] = line;

        for doomed in self.generated_closure(prev_id).into_iter().rev() {
            if doomed == index {
                continue;
            }
            self.remove_line(doomed);
            if doomed < index {
                index -= 1;
            }
        }

        let goals = {
            let conclusion = &self.lines[index];
            conclusion.inference.apply_backward(&[&conclusion.proposition])?
        };
        if self.lines[index].rule() == Some(InferenceRule::DirectProof) {
            self.open_subproof(index, source, goals)
        } else {
            self.cite_or_insert(index, source, goals);
            Ok(())
        }
    }

    /// Direct Proof: assume the antecedent and aim for the consequent in a
    /// subproof labeled under the line.
    fn open_subproof(&mut self, index: usize, source: PropId, goals: Vec<Proposition>) -> Result<(), ProofError> {
        let mut index = index;
        let header = self.labels[index].clone();
        let [premise, goal]: [Proposition; 2] = goals.try_into().map_err(|goals: Vec<Proposition>| {
            ProofError::ArgumentCount {
                line: index,
                expected: 2,
                actual: goals.len(),
            }
        })?;

        while index > 0 && self.labels[index - 1].is_descendant_of(&header) {
            self.remove_line(index - 1);
            index -= 1;
        }

        let first = header.child(1);
        let second = header.child(2);
        let mut assumption = ProofLine::new(premise, self.ids.fresh(), Inference::assumption(), true, false);
        assumption.generated_from = Some(source);
        let mut subgoal = ProofLine::new(goal, self.ids.fresh(), Inference::unknown(false), true, true);
        subgoal.generated_from = Some(source);

        self.lines.insert(index, subgoal);
        self.lines.insert(index, assumption);
        self.labels.insert(index, second.clone());
        self.labels.insert(index, first.clone());
        self.lines[index + 2].arguments = vec![Some(first), Some(second)];
        trace!(%header, "opened subproof");
        Ok(())
    }

    /// Cite earlier lines that already hold a subgoal and insert
    /// placeholder lines for the rest, just before the line.
    fn cite_or_insert(&mut self, index: usize, source: PropId, goals: Vec<Proposition>) {
        let base = self.labels[index].clone();
        let mut inserted = 0;
        let mut arguments = Vec::with_capacity(goals.len());

        for goal in goals {
            if let Some(found) = self.find_citable(&goal, index, inserted, &base) {
                arguments.push(Some(self.labels[found].clone()));
                continue;
            }
            let label = base.offset_last(inserted as i32);
            let mut placeholder = ProofLine::new(goal, self.ids.fresh(), Inference::unknown(false), true, true);
            placeholder.generated_from = Some(source);
            self.lines.insert(index + inserted, placeholder);
            self.labels.insert(index + inserted, label.clone());
            arguments.push(Some(label));
            inserted += 1;
        }

        if inserted > 0 {
            self.shift_labels_at(&base, index + inserted, inserted as i32);
        }
        self.lines[index + inserted].arguments = arguments;
    }

    /// An earlier in-scope line, or a placeholder inserted for this same
    /// step, holding `goal`
    fn find_citable(&self, goal: &Proposition, index: usize, inserted: usize, base: &Label) -> Option<usize> {
        (0..index)
            .find(|&i| self.lines[i].proposition == *goal && self.labels[i].in_scope_at(base))
            .or_else(|| (index..index + inserted).find(|&i| self.lines[i].proposition == *goal))
    }

    /// Reconcile a forward line with the proposition its rule derives
    fn record_forward(
        &mut self,
        index: usize,
        mut line: ProofLine,
        result: Proposition,
        prev_id: PropId,
        next_id: Option<PropId>,
    ) {
        if line.generated_from == Some(prev_id) && self.generated_closure(prev_id).is_empty() {
            // Nothing depends on the old proposition; rewrite in place.
            line.proposition = result;
            line.prop_id = self.ids.fresh();
            line.generated_from = Some(line.prop_id);
            self.lines[index] = line;
        } else if line.proposition == result {
            if line.generated_from.is_none() {
                line.generated_from = Some(line.prop_id);
            }
            self.lines[index] = line;
        } else {
            let label = self.labels[index].clone();
            line.fixed = false;
            line.editable = true;
            line.proposition = result;
            line.prop_id = self.ids.fresh();
            line.generated_from = Some(line.prop_id);
            self.lines.insert(index, line);
            self.labels.insert(index, label.clone());
            self.shift_labels_at(&label, index + 1, 1);

            for other in &mut self.lines {
                if other.generated_from == Some(prev_id) {
                    other.generated_from = None;
                }
            }

            // The old line keeps its proposition but loses a rule that no
            // longer has anything behind it.
            let old = &mut self.lines[index + 1];
            if old.generated_from.is_none() || old.generated_from == next_id {
                *old = ProofLine::new(
                    old.proposition.clone(),
                    old.prop_id,
                    Inference::unknown(true),
                    old.fixed,
                    old.editable,
                );
            }
        }
    }

    /// Renumber labels and citations after `delta` lines were inserted (or
    /// removed) just before `pos`, starting at line index `start`
    fn shift_labels_at(&mut self, pos: &Label, start: usize, delta: i32) {
        trace!(%pos, start, delta, "shifting labels");
        for label in &mut self.labels[start..] {
            *label = label.shifted(pos, delta);
        }
        for line in &mut self.lines[start..] {
            for argument in line.arguments.iter_mut().flatten() {
                if *argument >= *pos {
                    *argument = argument.shifted(pos, delta);
                }
            }
        }
    }

    fn remove_line(&mut self, index: usize) {
        let label = self.labels.remove(index);
        self.lines.remove(index);
        self.clear_citations(&label);
        self.shift_labels_at(&label, index, -1);
    }

    fn clear_citations(&mut self, label: &Label) {
        for line in &mut self.lines {
            for argument in line.arguments.iter_mut() {
                if argument.as_ref() == Some(label) {
                    *argument = None;
                }
            }
        }
    }

    /// Delete subproofs whose closing line is no longer a Direct Proof
    fn prune_subproofs(&mut self) {
        let mut starts = vec![0usize];
        let mut i = 1;
        while i < self.lines.len() {
            let depth = self.labels[i].depth();
            while depth > starts.len() {
                starts.push(i);
            }
            if depth < starts.len() {
                if self.lines[i].rule() != Some(InferenceRule::DirectProof) {
                    let start = starts[depth];
                    let removed: Vec<Label> = self.labels.drain(start..i).collect();
                    self.lines.drain(start..i);
                    trace!(start, count = removed.len(), "pruned abandoned subproof");
                    for label in &removed {
                        self.clear_citations(label);
                    }
                    starts.pop();
                    i = start;
                }
                while self.labels[i].depth() < starts.len() {
                    starts.pop();
                }
            }
            i += 1;
        }
    }
}
