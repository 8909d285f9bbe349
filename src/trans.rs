//! Weighted automaton transitions.
//!
//! A [`Trans`] is one edge `from --stack--> to` carrying a weight. Every
//! transition is owned by the arena of the [`Wfa`][crate::wfa::Wfa] that
//! created it and is addressed by a [`TransId`]; the per-state outgoing and
//! reverse lists hold ids, never the transitions themselves.
//!
//! Besides its weight, a transition carries the delta-propagation bookkeeping
//! of the saturation loop: `delta` accumulates the not-yet-propagated change
//! since the transition was last dequeued, and `marked` records worklist
//! membership.

use std::fmt;

use crate::key::{Key, EPSILON};
use crate::semiring::Semiring;

/// Handle of a transition inside its owning automaton's arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TransId(pub(crate) u32);

impl TransId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TransId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Trans<W> {
    from: Key,
    stack: Key,
    to: Key,
    weight: W,
    delta: W,
    pub(crate) marked: bool,
}

impl<W: Semiring> Trans<W> {
    /// Creates a fresh transition. Its whole weight is pending propagation,
    /// so `delta` starts equal to the weight.
    pub(crate) fn new(from: Key, stack: Key, to: Key, weight: W) -> Self {
        let delta = weight.clone();
        Self {
            from,
            stack,
            to,
            weight,
            delta,
            marked: false,
        }
    }

    pub fn from(&self) -> Key {
        self.from
    }
    pub fn stack(&self) -> Key {
        self.stack
    }
    pub fn to(&self) -> Key {
        self.to
    }

    pub fn weight(&self) -> &W {
        &self.weight
    }

    pub fn is_epsilon(&self) -> bool {
        self.stack == EPSILON
    }

    /// The primary index bucket this transition lives in.
    pub fn keypair(&self) -> (Key, Key) {
        (self.from, self.stack)
    }

    pub(crate) fn delta(&self) -> &W {
        &self.delta
    }

    /// Removes and returns the pending delta, leaving `zero()` behind.
    pub(crate) fn take_delta(&mut self) -> W {
        std::mem::replace(&mut self.delta, W::zero())
    }

    /// Re-seeds the transition for a fresh pass: everything it carries is
    /// pending propagation again.
    pub(crate) fn reset_delta(&mut self) {
        self.delta = self.weight.clone();
    }

    /// Combines `w` into the stored weight. The diff is folded into the
    /// pending delta. Returns `true` iff the stored weight changed.
    pub(crate) fn combine_weight(&mut self, w: &W) -> bool {
        let (combined, diff) = w.delta(&self.weight);
        self.weight = combined;
        if diff.is_zero() {
            false
        } else {
            self.delta = self.delta.combine(&diff);
            true
        }
    }
}

impl<W: fmt::Debug> fmt::Display for Trans<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}) {:?}",
            self.from, self.stack, self.to, self.weight
        )
    }
}
