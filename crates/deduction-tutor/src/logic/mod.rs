//! Propositional logic core types

pub mod identity;
pub mod position;
pub mod proposition;

pub use identity::{PropId, PropIdAllocator};
pub use position::Position;
pub use proposition::{Connective, Proposition};

#[cfg(test)]
pub(crate) mod strategies;
