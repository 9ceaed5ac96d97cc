//! Error types for the tutor

use crate::inference::{Direction, InferenceRule};
use crate::logic::Proposition;
use crate::proof::Label;
use thiserror::Error;

/// Formula text that does not reduce to exactly one proposition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no valid proposition in {input:?}: {message}")]
pub struct ParseError {
    pub input: String,
    pub message: String,
}

impl ParseError {
    pub fn new(input: &str, message: impl Into<String>) -> Self {
        ParseError {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

/// Label text that is not a dot-separated list of positive integers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid label {0:?}")]
pub struct LabelError(pub String);

/// Errors raised when applying an inference rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("{rule} cannot be applied {direction}")]
    NotAllowed {
        rule: InferenceRule,
        direction: Direction,
    },

    #[error("rule is missing a choice")]
    Incomplete,

    #[error("rule does not match its inputs")]
    NoMatch,

    #[error("rule takes {expected} propositions, got {actual}")]
    WrongInputCount { expected: usize, actual: usize },
}

/// Errors raised by proof edits and proof queries.
///
/// Rejected edits leave the previous state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("line {0} does not exist")]
    LineOutOfRange(usize),

    #[error("no line is labeled {0}")]
    UnknownLabel(Label),

    #[error("line {line} has no argument slot {slot}")]
    ArgumentOutOfRange { line: usize, slot: usize },

    #[error("label {label} is not in scope at line {line}")]
    LabelOutOfScope { line: usize, label: Label },

    #[error("line {0} is fixed and cannot be deleted")]
    LineFixed(usize),

    #[error("the rule of line {0} cannot be edited")]
    LineNotEditable(usize),

    #[error("line {0} cannot be deleted")]
    NotDeletable(usize),

    #[error("{rule} is not offered on line {line}")]
    RuleNotOffered { line: usize, rule: InferenceRule },

    #[error("arguments of backward line {0} are generated, not chosen")]
    DerivedArguments(usize),

    #[error("line {0} does not use an equivalence rule")]
    NoEquivalence(usize),

    #[error("line {line} has {actual} arguments but its rule produces {expected}")]
    ArgumentCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("argument {label} of line {line} holds {found}, expected {expected}")]
    ArgumentMismatch {
        line: usize,
        label: Label,
        expected: Proposition,
        found: Proposition,
    },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Errors raised while decoding a stored snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid formula in snapshot: {0}")]
    Formula(#[from] ParseError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("unknown {kind} rule code {code}")]
    RuleCode { kind: &'static str, code: i64 },

    #[error("unknown version code {0}")]
    VersionCode(i64),

    #[error("labels are not in proof order at line {0}")]
    LabelOrder(usize),
}

#[derive(Error, Debug)]
pub enum TutorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Proof error: {0}")]
    Proof(#[from] ProofError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TutorError>;
