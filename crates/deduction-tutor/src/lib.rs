//! Deduction Tutor: incremental checking of propositional proofs
//!
//! This library models propositional formulas, the equivalence laws and
//! natural-deduction rules that relate them, and two proof editors built
//! on top: labeled natural-deduction trees and equivalence chains. Every
//! edit is checked as it is made, and editor state round-trips through a
//! JSON snapshot.

pub mod config;
pub mod equivalence;
pub mod error;
pub mod inference;
pub mod json;
pub mod logic;
pub mod parser;
pub mod proof;

pub use config::TutorConfig;
pub use error::{LabelError, ParseError, ProofError, RuleError, SnapshotError, TutorError};

// Re-export commonly used types from logic
pub use logic::{Connective, Position, PropId, Proposition};

pub use parser::{format, format_highlighted, parse, stringify, FormattedProposition, StatementEntry};

pub use equivalence::{Equivalence, EquivalenceRule, EquivalenceVersion};
pub use inference::{Direction, Inference, InferenceRule, Side};

// Re-export editor types
pub use proof::{
    render_chain, render_tree, ChainEdit, ChainLine, ChainProof, Editor, Label, ProofLine, RenderedChain,
    RenderedLine, Session, SnapshotSink, TreeEdit, TreeProof,
};

pub use json::{decode_chain, decode_tree, encode_chain, encode_tree, ChainSnapshot, TreeSnapshot};
