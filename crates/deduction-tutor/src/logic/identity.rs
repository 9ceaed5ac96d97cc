//! Identity stamps for stored propositions.
//!
//! Editors track which line was derived from which by identity rather than
//! by structural equality. Every stored proposition carries a [`PropId`];
//! copies of a line share it, newly built propositions get a fresh one.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropId(u64);

impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh identities, never repeating one within an editor.
#[derive(Debug, Clone, Default)]
pub struct PropIdAllocator {
    next: u64,
}

impl PropIdAllocator {
    pub fn fresh(&mut self) -> PropId {
        let id = PropId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_distinct() {
        let mut ids = PropIdAllocator::default();
        let a = ids.fresh();
        let b = ids.fresh();
        assert_ne!(a, b);

        let mut copy = ids.clone();
        assert_eq!(copy.fresh(), ids.fresh());
    }
}
