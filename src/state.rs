//! Weighted automaton states.
//!
//! A [`State`] is the per-key record of a [`Wfa`][crate::wfa::Wfa]: the
//! accumulated meet-over-paths weight and delta used by `path_summary`, the
//! quasi accumulator used by `poststar` for generated states, and the
//! outgoing/reverse transition id lists. The lists are views into the
//! automaton's arena; the arena owns the transitions.

use crate::key::Key;
use crate::semiring::Semiring;
use crate::trans::TransId;

#[derive(Debug, Clone)]
pub struct State<W> {
    key: Key,
    weight: W,
    delta: W,
    /// Combine of all push-rule contributions routed through this state,
    /// when it is a generated state of `poststar`.
    pub(crate) quasi: W,
    pub(crate) marked: bool,
    pub(crate) out: Vec<TransId>,
    pub(crate) rev: Vec<TransId>,
}

impl<W: Semiring> State<W> {
    pub(crate) fn new(key: Key) -> Self {
        Self {
            key,
            weight: W::zero(),
            delta: W::zero(),
            quasi: W::zero(),
            marked: false,
            out: Vec::new(),
            rev: Vec::new(),
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// The accumulated meet-over-paths weight of the last `path_summary`.
    pub fn weight(&self) -> &W {
        &self.weight
    }

    pub(crate) fn set_weight(&mut self, w: W) {
        self.weight = w;
    }

    pub(crate) fn delta(&self) -> &W {
        &self.delta
    }

    pub(crate) fn set_delta(&mut self, d: W) {
        self.delta = d;
    }

    pub(crate) fn take_delta(&mut self) -> W {
        std::mem::replace(&mut self.delta, W::zero())
    }

    pub(crate) fn add_out(&mut self, t: TransId) {
        self.out.push(t);
    }

    pub(crate) fn add_rev(&mut self, t: TransId) {
        self.rev.push(t);
    }

    pub(crate) fn remove_trans(&mut self, t: TransId) {
        self.out.retain(|&id| id != t);
        self.rev.retain(|&id| id != t);
    }
}
