//! Positions of subterms inside a proposition.
//!
//! A `Position` is the path of child indices from the root: `0` selects the
//! left operand (or the negated formula), `1` the right operand.

use super::Proposition;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<usize>,
}

impl Position {
    pub fn root() -> Self {
        Position { path: vec![] }
    }

    pub fn with_path(path: Vec<usize>) -> Self {
        Position { path }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Position of the `idx`-th child of this position
    pub fn child(&self, idx: usize) -> Self {
        let mut path = self.path.clone();
        path.push(idx);
        Position { path }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}

impl Proposition {
    /// Subterm at the given position, if the path exists
    pub fn subterm(&self, pos: &Position) -> Option<&Proposition> {
        let mut current = self;
        for &step in &pos.path {
            current = *current.children().get(step)?;
        }
        Some(current)
    }

    /// All positions in pre-order (root first, then left before right)
    pub fn positions(&self) -> Vec<Position> {
        let mut out = Vec::new();
        collect_positions(self, Position::root(), &mut out);
        out
    }
}

fn collect_positions(prop: &Proposition, here: Position, out: &mut Vec<Position>) {
    let children = prop.children();
    out.push(here.clone());
    for (i, child) in children.into_iter().enumerate() {
        collect_positions(child, here.child(i), out);
    }
}
