//! JSON snapshots of editor state.
//!
//! Rule and version choices are stored as integer codes, 0 meaning none
//! chosen yet. A `matchNumber` of -1 (or none at all) rewrites every
//! match. Derivation links between lines are not stored; a decoded proof
//! starts without them.

use crate::config::TutorConfig;
use crate::equivalence::{Equivalence, EquivalenceRule, EquivalenceVersion};
use crate::error::SnapshotError;
use crate::inference::{Inference, InferenceRule, Side};
use crate::logic::PropIdAllocator;
use crate::parser::{parse, stringify};
use crate::proof::{ChainLine, ChainProof, Label, ProofLine, TreeProof};
use serde::{Deserialize, Serialize};

const ALL_MATCHES: i64 = -1;

/// JSON representation of a tree proof
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_prop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_prop: Option<String>,
    #[serde(default)]
    pub lines: Vec<TreeLineJson>,
    /// Dotted labels, parallel to `lines`
    #[serde(default)]
    pub labels: Vec<String>,
}

/// JSON representation of a tree proof line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLineJson {
    pub prop: String,
    #[serde(default)]
    pub rule: i64,
    #[serde(default)]
    pub forward: bool,
    /// Inference version, or the equivalence version when `equiv` is set
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub editing: bool,
    #[serde(default)]
    pub args: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equiv: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_to_right: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_number: Option<i64>,
}

/// JSON representation of an equivalence chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_prop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_prop: Option<String>,
    #[serde(default)]
    pub lines: Vec<ChainLineJson>,
}

/// JSON representation of a chain line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainLineJson {
    pub prop: String,
    #[serde(default)]
    pub rule: i64,
    #[serde(default = "default_true")]
    pub left_to_right: bool,
    #[serde(default)]
    pub version: i64,
    #[serde(default = "default_match_number")]
    pub match_number: i64,
    #[serde(default = "default_true")]
    pub forward: bool,
}

fn default_true() -> bool {
    true
}

fn default_match_number() -> i64 {
    ALL_MATCHES
}

fn rule_code(code: Option<u8>) -> i64 {
    code.map_or(0, i64::from)
}

fn inference_rule(code: i64) -> Result<Option<InferenceRule>, SnapshotError> {
    if code == 0 {
        return Ok(None);
    }
    u8::try_from(code)
        .ok()
        .and_then(InferenceRule::from_code)
        .map(Some)
        .ok_or(SnapshotError::RuleCode { kind: "inference", code })
}

fn equivalence_rule(code: i64) -> Result<Option<EquivalenceRule>, SnapshotError> {
    if code == 0 {
        return Ok(None);
    }
    u8::try_from(code)
        .ok()
        .and_then(EquivalenceRule::from_code)
        .map(Some)
        .ok_or(SnapshotError::RuleCode {
            kind: "equivalence",
            code,
        })
}

fn side(code: i64) -> Result<Option<Side>, SnapshotError> {
    if code == 0 {
        return Ok(None);
    }
    u8::try_from(code)
        .ok()
        .and_then(Side::from_code)
        .map(Some)
        .ok_or(SnapshotError::VersionCode(code))
}

fn equivalence_version(code: i64) -> Result<Option<EquivalenceVersion>, SnapshotError> {
    if code == 0 {
        return Ok(None);
    }
    u8::try_from(code)
        .ok()
        .and_then(EquivalenceVersion::from_code)
        .map(Some)
        .ok_or(SnapshotError::VersionCode(code))
}

/// Negative or missing numbers select every match
fn match_index(number: Option<i64>) -> Option<usize> {
    number.and_then(|n| usize::try_from(n).ok())
}

fn match_number(index: Option<usize>) -> i64 {
    index.map_or(ALL_MATCHES, |i| i as i64)
}

impl TreeLineJson {
    pub fn from_line(line: &ProofLine) -> Self {
        let inference = &line.inference;
        let mut json = TreeLineJson {
            prop: stringify(&line.proposition),
            rule: rule_code(inference.rule.map(InferenceRule::code)),
            forward: inference.forward,
            version: rule_code(inference.version.map(Side::code)),
            fixed: line.fixed,
            editable: line.editable,
            editing: line.editing,
            args: line
                .arguments
                .iter()
                .map(|arg| arg.as_ref().map(ToString::to_string))
                .collect(),
            equiv: None,
            left_to_right: None,
            match_number: None,
        };
        if let Some(equivalence) = inference.equivalence {
            json.equiv = Some(rule_code(equivalence.rule.map(EquivalenceRule::code)));
            json.left_to_right = Some(equivalence.left_to_right);
            json.version = rule_code(equivalence.version.map(EquivalenceVersion::code));
            json.match_number = Some(match_number(inference.match_index));
        }
        json
    }

    /// Rebuild the line labeled `own`; citations of labels not in `labels`
    /// are dropped, and so are forward citations not in scope at `own`
    fn into_line(self, own: &Label, labels: &[Label], ids: &mut PropIdAllocator) -> Result<ProofLine, SnapshotError> {
        let proposition = parse(&self.prop)?;
        let rule = inference_rule(self.rule)?;
        let mut inference = Inference::new(rule, self.forward);
        match self.equiv {
            Some(code) if rule == Some(InferenceRule::Equivalence) => {
                inference.equivalence = Some(Equivalence {
                    rule: equivalence_rule(code)?,
                    left_to_right: self.left_to_right.unwrap_or(true),
                    version: equivalence_version(self.version)?,
                });
                inference.match_index = match_index(self.match_number);
            }
            _ => inference.version = side(self.version)?,
        }

        let mut line = ProofLine::new(proposition, ids.fresh(), inference, self.fixed, self.editable);
        line.editing = self.editing;
        let forward = line.inference.forward;
        for (slot, arg) in line.arguments.iter_mut().zip(self.args) {
            *slot = match arg {
                Some(text) => {
                    let label: Label = text.parse()?;
                    let visible = !forward || label.in_scope_at(own);
                    (visible && labels.contains(&label)).then_some(label)
                }
                None => None,
            };
        }
        Ok(line)
    }
}

impl TreeSnapshot {
    pub fn from_proof(proof: &TreeProof) -> Self {
        TreeSnapshot {
            start_prop: Some(stringify(proof.start())),
            end_prop: Some(stringify(proof.end())),
            lines: proof.lines().iter().map(TreeLineJson::from_line).collect(),
            labels: proof.labels().iter().map(ToString::to_string).collect(),
        }
    }

    /// Rebuild the proof, falling back to a fresh one when the snapshot
    /// holds no lines
    pub fn into_proof(self, config: &TutorConfig) -> Result<TreeProof, SnapshotError> {
        let start = parse(self.start_prop.as_deref().unwrap_or(&config.default_start))?;
        let end = parse(self.end_prop.as_deref().unwrap_or(&config.default_end))?;
        if self.lines.is_empty() || self.labels.is_empty() {
            return Ok(TreeProof::bootstrap(start, end, config.goal_direction_backward));
        }

        let count = self.lines.len().min(self.labels.len());
        let labels = self.labels[..count]
            .iter()
            .map(|text| text.parse::<Label>())
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(i) = labels.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(SnapshotError::LabelOrder(i + 1));
        }

        let mut ids = PropIdAllocator::default();
        let mut lines = Vec::with_capacity(count);
        for (json, own) in self.lines.into_iter().zip(&labels) {
            lines.push(json.into_line(own, &labels, &mut ids)?);
        }
        Ok(TreeProof::from_parts(start, end, labels, lines, ids))
    }
}

impl ChainLineJson {
    pub fn from_line(line: &ChainLine) -> Self {
        ChainLineJson {
            prop: stringify(&line.proposition),
            rule: rule_code(line.equivalence.rule.map(EquivalenceRule::code)),
            left_to_right: line.equivalence.left_to_right,
            version: rule_code(line.equivalence.version.map(EquivalenceVersion::code)),
            match_number: match_number(line.match_index),
            forward: line.forward,
        }
    }

    fn into_line(self, ids: &mut PropIdAllocator) -> Result<ChainLine, SnapshotError> {
        let mut line = ChainLine::new(parse(&self.prop)?, ids.fresh());
        line.equivalence = Equivalence {
            rule: equivalence_rule(self.rule)?,
            left_to_right: self.left_to_right,
            version: equivalence_version(self.version)?,
        };
        line.match_index = match_index(Some(self.match_number));
        line.forward = self.forward;
        Ok(line)
    }
}

impl ChainSnapshot {
    pub fn from_proof(proof: &ChainProof) -> Self {
        ChainSnapshot {
            start_prop: Some(stringify(proof.start())),
            end_prop: Some(stringify(proof.end())),
            lines: proof.lines().iter().map(ChainLineJson::from_line).collect(),
        }
    }

    /// Rebuild the chain, falling back to a fresh one when the snapshot
    /// holds no lines
    pub fn into_proof(self, config: &TutorConfig) -> Result<ChainProof, SnapshotError> {
        let start = parse(self.start_prop.as_deref().unwrap_or(&config.default_start))?;
        let end = parse(self.end_prop.as_deref().unwrap_or(&config.default_end))?;
        if self.lines.is_empty() {
            return Ok(ChainProof::new(start, end));
        }

        let mut ids = PropIdAllocator::default();
        let start_id = ids.fresh();
        let mut lines = Vec::with_capacity(self.lines.len());
        for json in self.lines {
            lines.push(json.into_line(&mut ids)?);
        }
        Ok(ChainProof::from_parts(start, start_id, end, lines, ids))
    }
}

/// Read a tree snapshot; blank input gives a fresh proof
pub fn decode_tree(json: &str, config: &TutorConfig) -> Result<TreeProof, SnapshotError> {
    let snapshot: TreeSnapshot = if json.trim().is_empty() {
        TreeSnapshot::default()
    } else {
        serde_json::from_str(json)?
    };
    snapshot.into_proof(config)
}

/// Read a chain snapshot; blank input gives a fresh chain
pub fn decode_chain(json: &str, config: &TutorConfig) -> Result<ChainProof, SnapshotError> {
    let snapshot: ChainSnapshot = if json.trim().is_empty() {
        ChainSnapshot::default()
    } else {
        serde_json::from_str(json)?
    };
    snapshot.into_proof(config)
}

pub fn encode_tree(proof: &TreeProof) -> Result<String, serde_json::Error> {
    serde_json::to_string(&TreeSnapshot::from_proof(proof))
}

pub fn encode_chain(proof: &ChainProof) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ChainSnapshot::from_proof(proof))
}
