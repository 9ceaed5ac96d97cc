//! Proof editors: labeled natural-deduction trees and equivalence chains

pub mod chain;
pub mod label;
pub mod render;
pub mod session;
pub mod tree;

pub use chain::{ChainEdit, ChainLine, ChainProof};
pub use label::Label;
pub use render::{render_chain, render_tree, RenderedChain, RenderedLine};
pub use session::{Editor, Session, SnapshotSink};
pub use tree::{ProofLine, TreeEdit, TreeProof};
