//! Equivalence chains: a start proposition followed by lines that each
//! rewrite the previous one with an equivalence rule.
//!
//! A forward line is derived from the line above it; a backward line
//! derives the line above it from itself. Consecutive rules may read
//! forward then forward, backward then backward, or forward then backward,
//! so the chain changes direction at most once.

use crate::equivalence::{Equivalence, EquivalenceRule, EquivalenceVersion};
use crate::error::ProofError;
use crate::logic::{Position, PropId, PropIdAllocator, Proposition};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ChainLine {
    pub proposition: Proposition,
    pub equivalence: Equivalence,
    /// Single match to rewrite; `None` rewrites all of them
    pub match_index: Option<usize>,
    pub forward: bool,
    /// Shown expanded even when correct
    pub editing: bool,
    pub(crate) prop_id: PropId,
    pub(crate) generated_from: Option<PropId>,
}

impl ChainLine {
    pub(crate) fn new(proposition: Proposition, prop_id: PropId) -> Self {
        ChainLine {
            proposition,
            equivalence: Equivalence::default(),
            match_index: None,
            forward: true,
            editing: false,
            prop_id,
            generated_from: None,
        }
    }

    pub fn prop_id(&self) -> PropId {
        self.prop_id
    }

    pub fn generated_from(&self) -> Option<PropId> {
        self.generated_from
    }

    /// The proposition the rule rewrites
    fn source<'a>(&'a self, prev: &'a Proposition) -> &'a Proposition {
        if self.forward {
            prev
        } else {
            &self.proposition
        }
    }

    pub fn match_count(&self, prev: &Proposition) -> usize {
        if !self.equivalence.is_complete() {
            return 0;
        }
        self.equivalence.match_count(self.source(prev))
    }

    /// Positions in `prop` where the rule applies, excluding the root
    pub fn matched_positions(&self, prop: &Proposition) -> Vec<Position> {
        if !self.equivalence.is_complete() {
            return vec![];
        }
        let positions = self.equivalence.match_positions(prop);
        let selected = match self.match_index {
            None => positions,
            Some(index) => positions.into_iter().nth(index).into_iter().collect(),
        };
        selected.into_iter().filter(|pos| !pos.is_root()).collect()
    }

    pub fn is_applicable(&self, prev: &Proposition) -> bool {
        let count = self.match_count(prev);
        count > 0 && self.match_index.map_or(true, |index| index < count)
    }

    /// Result of the rule, or `None` when it does not apply
    pub fn apply(&self, prev: &Proposition) -> Option<Proposition> {
        if !self.is_applicable(prev) {
            return None;
        }
        let source = self.source(prev);
        Some(match self.match_index {
            None => self.equivalence.apply_all(source),
            Some(index) => self.equivalence.apply_once(source, index),
        })
    }

    /// Whether the rule turns `prev` into this line (forward) or this line
    /// into `prev` (backward)
    pub fn is_correct(&self, prev: &Proposition) -> bool {
        match self.apply(prev) {
            Some(result) if self.forward => result == self.proposition,
            Some(result) => result == *prev,
            None => false,
        }
    }

    pub fn rule_name(&self) -> Option<&'static str> {
        self.equivalence.rule.map(EquivalenceRule::name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChainEdit {
    SetRule { line: usize, rule: Option<EquivalenceRule> },
    SetLeftToRight { line: usize, left_to_right: bool },
    SetVersion { line: usize, version: Option<EquivalenceVersion> },
    SetMatchIndex { line: usize, index: Option<usize> },
    ToggleDirection { line: usize },
    ToggleEditing { line: usize },
    DeleteLine { line: usize },
}

impl ChainEdit {
    pub fn line(&self) -> usize {
        match self {
            ChainEdit::SetRule { line, .. }
            | ChainEdit::SetLeftToRight { line, .. }
            | ChainEdit::SetVersion { line, .. }
            | ChainEdit::SetMatchIndex { line, .. }
            | ChainEdit::ToggleDirection { line }
            | ChainEdit::ToggleEditing { line }
            | ChainEdit::DeleteLine { line } => *line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChainProof {
    start: Proposition,
    start_id: PropId,
    end: Proposition,
    lines: Vec<ChainLine>,
    ids: PropIdAllocator,
}

impl ChainProof {
    /// A chain holding only the end proposition, with no rule yet
    pub fn new(start: Proposition, end: Proposition) -> Self {
        let mut ids = PropIdAllocator::default();
        let start_id = ids.fresh();
        let last = ChainLine::new(end.clone(), ids.fresh());
        ChainProof {
            start,
            start_id,
            end,
            lines: vec![last],
            ids,
        }
    }

    pub(crate) fn from_parts(
        start: Proposition,
        start_id: PropId,
        end: Proposition,
        lines: Vec<ChainLine>,
        ids: PropIdAllocator,
    ) -> Self {
        ChainProof {
            start,
            start_id,
            end,
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

    pub fn lines(&self) -> &[ChainLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Result<&ChainLine, ProofError> {
        self.lines.get(index).ok_or(ProofError::LineOutOfRange(index))
    }

    /// The proposition above line `index`
    pub fn previous(&self, index: usize) -> Result<&Proposition, ProofError> {
        self.line(index)?;
        Ok(match index {
            0 => &self.start,
            _ => &self.lines[index - 1].proposition,
        })
    }

    fn previous_id(&self, index: usize) -> PropId {
        match index {
            0 => self.start_id,
            _ => self.lines[index - 1].prop_id,
        }
    }

    pub fn is_correct(&self, index: usize) -> Result<bool, ProofError> {
        Ok(self.line(index)?.is_correct(self.previous(index)?))
    }

    /// Every step is correct and the chain ends at the end proposition
    pub fn is_solved(&self) -> bool {
        let ends = self.lines.last().map_or(false, |last| last.proposition == self.end);
        ends && (0..self.lines.len()).all(|i| self.is_correct(i).unwrap_or(false))
    }

    pub fn apply_edit(&self, edit: ChainEdit) -> Result<ChainProof, ProofError> {
        match self.edit(&edit) {
            Ok(next) => {
                debug!(?edit, lines = next.lines.len(), "chain edit applied");
                Ok(next)
            }
            Err(err) => {
                warn!(?edit, %err, "chain edit rejected");
                Err(err)
            }
        }
    }

    fn edit(&self, edit: &ChainEdit) -> Result<ChainProof, ProofError> {
        let index = edit.line();
        let mut line = self.line(index)?.clone();

        match edit {
            ChainEdit::ToggleDirection { .. } => return Ok(self.toggle_direction(index)),
            ChainEdit::ToggleEditing { .. } => {
                let mut next = self.clone();
                next.lines[index].editing = !line.editing;
                return Ok(next);
            }
            ChainEdit::DeleteLine { .. } => return self.delete_line(index),
            ChainEdit::SetRule { rule, .. } => line.equivalence.rule = *rule,
            ChainEdit::SetLeftToRight { left_to_right, .. } => line.equivalence.left_to_right = *left_to_right,
            ChainEdit::SetVersion { version, .. } => line.equivalence.version = *version,
            ChainEdit::SetMatchIndex { index: match_index, .. } => line.match_index = *match_index,
        }

        self.update_line(index, line)
    }

    /// Flip a line's direction, unlinking it from the lines it was tied to
    fn toggle_direction(&self, index: usize) -> ChainProof {
        let mut next = self.clone();
        let line = &mut next.lines[index];
        let id = line.prop_id;
        if line.forward {
            line.generated_from = None;
            line.forward = false;
        } else {
            line.forward = true;
            if index > 0 && next.lines[index - 1].generated_from == Some(id) {
                next.lines[index - 1].generated_from = None;
            }
        }
        next
    }

    /// Remove a line; the last line holds the end proposition and stays
    pub fn delete_line(&self, index: usize) -> Result<ChainProof, ProofError> {
        self.line(index)?;
        if index + 1 == self.lines.len() {
            return Err(ProofError::NotDeletable(index));
        }
        let mut next = self.clone();
        let removed = next.lines.remove(index);
        for neighbour in [index.checked_sub(1), Some(index)].into_iter().flatten() {
            if let Some(line) = next.lines.get_mut(neighbour) {
                if line.generated_from == Some(removed.prop_id) {
                    line.generated_from = None;
                }
            }
        }
        Ok(next)
    }

    /// Store an edited copy of line `index`, propagating its result to the
    /// neighbouring line it derives or explains
    pub fn update_line(&self, index: usize, mut line: ChainLine) -> Result<ChainProof, ProofError> {
        let prev = self.previous(index)?;
        let prev_id = self.previous_id(index);
        let mut next = self.clone();

        let Some(result) = line.apply(prev) else {
            next.lines[index] = line;
            return Ok(next);
        };

        if self.lines[index].forward {
            let successor_linked = self
                .lines
                .get(index + 1)
                .map_or(false, |after| after.generated_from == Some(line.prop_id));
            if line.generated_from == Some(prev_id) && !successor_linked {
                line.proposition = result;
                line.prop_id = next.ids.fresh();
                next.lines[index] = line;
            } else if self.lines[index].proposition == result {
                if line.generated_from.is_none() {
                    line.generated_from = Some(prev_id);
                }
                next.lines[index] = line;
            } else {
                line.proposition = result;
                line.prop_id = next.ids.fresh();
                line.generated_from = Some(prev_id);
                next.lines.insert(index, line);
                let old = &mut next.lines[index + 1];
                if old.generated_from == Some(prev_id) {
                    old.generated_from = None;
                }
            }
            return Ok(next);
        }

        let own_id = line.prop_id;
        let above_linked = index > 0 && self.lines[index - 1].generated_from == Some(own_id);
        let above_is_source =
            index > 1 && self.lines[index - 2].generated_from == Some(self.lines[index - 1].prop_id);

        if above_linked && !above_is_source {
            let above = &mut next.lines[index - 1];
            above.proposition = result;
            above.prop_id = next.ids.fresh();
            next.lines[index] = line;
        } else if *prev == result {
            if index > 0 && next.lines[index - 1].generated_from.is_none() {
                next.lines[index - 1].generated_from = Some(own_id);
            }
            next.lines[index] = line;
        } else {
            let mut inserted = ChainLine::new(result, next.ids.fresh());
            inserted.forward = false;
            inserted.generated_from = Some(own_id);
            next.lines[index] = line;
            next.lines.insert(index, inserted);
            if index > 0 && next.lines[index - 1].generated_from == Some(own_id) {
                next.lines[index - 1].generated_from = None;
            }
        }
        Ok(next)
    }
}
