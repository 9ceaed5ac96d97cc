//! Host-side slot for the current proof state.
//!
//! Editors are pure: an edit produces a new state or an error. A
//! [`Session`] holds the current state, swaps in the result of each
//! accepted edit and hands the serialized snapshot to a listener.

use super::chain::{ChainEdit, ChainProof};
use super::tree::{TreeEdit, TreeProof};
use crate::error::{ProofError, TutorError};
use crate::json::{ChainSnapshot, TreeSnapshot};
use serde::Serialize;
use std::fmt;

/// A proof state that user actions transform
pub trait Editor: Sized {
    type Edit: fmt::Debug;
    type Snapshot: Serialize;

    fn apply_edit(&self, edit: Self::Edit) -> Result<Self, ProofError>;

    fn snapshot(&self) -> Self::Snapshot;
}

impl Editor for TreeProof {
    type Edit = TreeEdit;
    type Snapshot = TreeSnapshot;

    fn apply_edit(&self, edit: TreeEdit) -> Result<Self, ProofError> {
        TreeProof::apply_edit(self, edit)
    }

    fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::from_proof(self)
    }
}

impl Editor for ChainProof {
    type Edit = ChainEdit;
    type Snapshot = ChainSnapshot;

    fn apply_edit(&self, edit: ChainEdit) -> Result<Self, ProofError> {
        ChainProof::apply_edit(self, edit)
    }

    fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot::from_proof(self)
    }
}

/// Receives the JSON snapshot after every accepted edit
pub trait SnapshotSink {
    fn publish(&mut self, snapshot: &str);
}

impl<F: FnMut(&str)> SnapshotSink for F {
    fn publish(&mut self, snapshot: &str) {
        self(snapshot)
    }
}

pub struct Session<E: Editor> {
    state: E,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl<E: Editor> Session<E> {
    pub fn new(state: E) -> Self {
        Session { state, sink: None }
    }

    pub fn with_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn state(&self) -> &E {
        &self.state
    }

    pub fn into_state(self) -> E {
        self.state
    }

    /// Apply an edit and publish the new snapshot.
    ///
    /// On error the current state is kept and nothing is published.
    pub fn apply(&mut self, edit: E::Edit) -> Result<&E, TutorError> {
        let next = self.state.apply_edit(edit)?;
        let json = serde_json::to_string(&next.snapshot())?;
        self.state = next;
        if let Some(sink) = self.sink.as_mut() {
            sink.publish(&json);
        }
        Ok(&self.state)
    }
}
