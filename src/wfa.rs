//! Weighted finite automata.
//!
//! A [`Wfa`] represents a (possibly infinite) set of pushdown configurations:
//! a configuration `<p, y1 y2 ... yn>` is accepted with the weight of the
//! automaton path reading `y1 ... yn` from `p` to a final state, and the
//! meet over all accepting paths is the configuration's language weight.
//!
//! ## Ownership
//!
//! All transitions live in a single slot arena owned by the automaton and are
//! addressed by [`TransId`]. The `(from, stack)` bucket index, the epsilon
//! index and the per-state outgoing/reverse lists all hold ids into that
//! arena. Erasing a transition removes it from every index; [`Wfa::clear`]
//! releases everything.
//!
//! ## Duplicate insertion
//!
//! Inserting a transition whose `(from, stack, to)` triple already exists
//! combines the weights into the existing edge — an automaton never stores
//! two edges with the same triple, and edge weights only ever grow under the
//! combine order.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use log::{debug, trace};

use crate::key::{Key, KeySpace, EPSILON};
use crate::progress::{Progress, Unbounded};
use crate::semiring::Semiring;
use crate::state::State;
use crate::trans::{Trans, TransId};
use crate::worklist::{DefaultWorklist, Worklist};

/// Traversal order of a query automaton.
///
/// Determines the operand order of `extend` in [`Wfa::path_summary`], since
/// `extend` need not commute: `Inorder` composes transition weight first,
/// `Reverse` composes the accumulated suffix first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Query {
    #[default]
    Inorder,
    Reverse,
}

#[derive(Debug, Clone)]
pub struct Wfa<W> {
    arena: Vec<Option<Trans<W>>>,
    free: Vec<TransId>,
    live: usize,
    /// Primary index: every live transition sits in exactly one bucket.
    kpmap: HashMap<(Key, Key), Vec<TransId>>,
    /// Epsilon transitions, keyed by their target state.
    eps_map: HashMap<Key, Vec<TransId>>,
    states: HashMap<Key, State<W>>,
    finals: BTreeSet<Key>,
    initial: Key,
    query: Query,
}

impl<W: Semiring> Wfa<W> {
    pub fn new(query: Query) -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            live: 0,
            kpmap: HashMap::new(),
            eps_map: HashMap::new(),
            states: HashMap::new(),
            finals: BTreeSet::new(),
            initial: EPSILON,
            query,
        }
    }

    pub fn query(&self) -> Query {
        self.query
    }

    pub fn set_query(&mut self, query: Query) -> Query {
        std::mem::replace(&mut self.query, query)
    }

    /// Sets the initial state, returning the previous one.
    pub fn set_initial_state(&mut self, key: Key) -> Key {
        self.add_state(key);
        std::mem::replace(&mut self.initial, key)
    }

    pub fn initial_state(&self) -> Key {
        self.initial
    }

    pub fn is_initial_state(&self, key: Key) -> bool {
        self.initial == key
    }

    pub fn add_final_state(&mut self, key: Key) {
        self.add_state(key);
        self.finals.insert(key);
    }

    pub fn is_final_state(&self, key: Key) -> bool {
        self.finals.contains(&key)
    }

    pub fn final_states(&self) -> &BTreeSet<Key> {
        &self.finals
    }

    /// Ensures `key` exists as a state; created with `zero()` weight.
    pub fn add_state(&mut self, key: Key) {
        self.states.entry(key).or_insert_with(|| State::new(key));
    }

    pub fn state(&self, key: Key) -> Option<&State<W>> {
        self.states.get(&key)
    }

    /// The state's accumulated weight from the last [`Wfa::path_summary`].
    pub fn state_weight(&self, key: Key) -> Option<&W> {
        self.states.get(&key).map(|st| st.weight())
    }

    pub fn states(&self) -> impl Iterator<Item = Key> + '_ {
        self.states.keys().copied()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of live transitions.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn trans(&self, id: TransId) -> &Trans<W> {
        self.arena[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("Stale transition id {}", id))
    }

    pub(crate) fn trans_mut(&mut self, id: TransId) -> &mut Trans<W> {
        self.arena[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("Stale transition id {}", id))
    }

    pub(crate) fn state_mut(&mut self, key: Key) -> &mut State<W> {
        self.states
            .get_mut(&key)
            .unwrap_or_else(|| panic!("No such state {}", key))
    }

    /// Live transitions, in arena order.
    pub fn transitions(&self) -> impl Iterator<Item = (TransId, &Trans<W>)> {
        self.arena
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|t| (TransId(i as u32), t)))
    }

    /// Snapshot of all live transition ids.
    pub(crate) fn trans_ids(&self) -> Vec<TransId> {
        self.transitions().map(|(id, _)| id).collect()
    }

    /// Snapshot of the `(from, stack)` bucket.
    pub(crate) fn bucket(&self, from: Key, stack: Key) -> Vec<TransId> {
        self.kpmap.get(&(from, stack)).cloned().unwrap_or_default()
    }

    /// Snapshot of the epsilon transitions into `to`.
    pub(crate) fn eps_into(&self, to: Key) -> Vec<TransId> {
        self.eps_map.get(&to).cloned().unwrap_or_default()
    }

    /// Snapshot of the outgoing transition ids of `from`.
    pub(crate) fn out_of(&self, from: Key) -> Vec<TransId> {
        self.states
            .get(&from)
            .map(|st| st.out.clone())
            .unwrap_or_default()
    }

    fn alloc(&mut self, t: Trans<W>) -> TransId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.arena[id.index()] = Some(t);
                id
            }
            None => {
                let id = TransId(self.arena.len() as u32);
                self.arena.push(Some(t));
                id
            }
        }
    }

    /// Adds a transition, implicitly creating both endpoint states.
    ///
    /// A duplicate `(from, stack, to)` combines `weight` into the existing
    /// edge instead of storing a second one.
    pub fn add_trans(&mut self, from: Key, stack: Key, to: Key, weight: W) -> TransId {
        self.insert(from, stack, to, weight).0
    }

    /// Core insertion: returns the transition id and whether its stored
    /// weight changed (always `true` for a fresh edge).
    pub(crate) fn insert(&mut self, from: Key, stack: Key, to: Key, weight: W) -> (TransId, bool) {
        self.add_state(from);
        self.add_state(to);

        if let Some(id) = self.find(from, stack, to) {
            let changed = self.trans_mut(id).combine_weight(&weight);
            trace!("combine ({}, {}, {}): changed = {}", from, stack, to, changed);
            return (id, changed);
        }

        let id = self.alloc(Trans::new(from, stack, to, weight));
        self.kpmap.entry((from, stack)).or_default().push(id);
        if stack == EPSILON {
            self.eps_map.entry(to).or_default().push(id);
        }
        self.state_mut(from).add_out(id);
        self.state_mut(to).add_rev(id);
        debug!("insert ({}, {}, {}) as {}", from, stack, to, id);
        (id, true)
    }

    /// Point lookup of the unique `(from, stack, to)` transition.
    pub fn find(&self, from: Key, stack: Key, to: Key) -> Option<TransId> {
        let bucket = self.kpmap.get(&(from, stack))?;
        // The bucket already matched (from, stack); only `to` is left.
        bucket.iter().copied().find(|&id| self.trans(id).to() == to)
    }

    /// Removes the matching transition from every index. No-op if absent.
    pub fn erase(&mut self, from: Key, stack: Key, to: Key) {
        let Some(id) = self.find(from, stack, to) else {
            return;
        };
        if let Some(bucket) = self.kpmap.get_mut(&(from, stack)) {
            bucket.retain(|&t| t != id);
            if bucket.is_empty() {
                self.kpmap.remove(&(from, stack));
            }
        }
        if stack == EPSILON {
            if let Some(ls) = self.eps_map.get_mut(&to) {
                ls.retain(|&t| t != id);
                if ls.is_empty() {
                    self.eps_map.remove(&to);
                }
            }
        }
        self.state_mut(from).remove_trans(id);
        self.state_mut(to).remove_trans(id);
        self.arena[id.index()] = None;
        self.free.push(id);
        self.live -= 1;
        debug!("erase ({}, {}, {})", from, stack, to);
    }

    /// Releases every owned transition and state; the automaton is empty
    /// afterwards. The query order is kept.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.free.clear();
        self.live = 0;
        self.kpmap.clear();
        self.eps_map.clear();
        self.states.clear();
        self.finals.clear();
        self.initial = EPSILON;
    }

    /// Product automaton of `self` and `other`.
    ///
    /// States are pair keys allocated from `keys`, final states are the
    /// cross product of both final sets, and two transitions on the *same*
    /// stack symbol produce a product transition whose weight comes from
    /// `make_weight`. The weight type may change; this is a general hook,
    /// not tied to any one weight semantics.
    pub fn intersect_with<V, F>(&self, other: &Wfa<W>, keys: &mut KeySpace, mut make_weight: F) -> Wfa<V>
    where
        V: Semiring,
        F: FnMut(&W, &W) -> V,
    {
        // Hash the other automaton's transitions on their stack symbol, then
        // probe with ours.
        let mut stackmap: HashMap<Key, Vec<TransId>> = HashMap::new();
        for (id, t) in other.transitions() {
            stackmap.entry(t.stack()).or_default().push(id);
        }

        let mut dest = Wfa::new(self.query);
        dest.initial = keys.pair(self.initial, other.initial);
        dest.add_state(dest.initial);
        for &f1 in &self.finals {
            for &f2 in &other.finals {
                let f = keys.pair(f1, f2);
                dest.add_final_state(f);
            }
        }

        for ((_, stack), bucket) in &self.kpmap {
            let Some(candidates) = stackmap.get(stack) else {
                continue;
            };
            for &id in bucket {
                let t = self.trans(id);
                for &id2 in candidates {
                    let t2 = other.trans(id2);
                    let from = keys.pair(t.from(), t2.from());
                    let to = keys.pair(t.to(), t2.to());
                    let w = make_weight(t.weight(), t2.weight());
                    dest.add_trans(from, *stack, to, w);
                }
            }
        }
        dest
    }

    /// Puts every state in the pre-fixpoint configuration: final states get
    /// `one()` weight and delta and go on the worklist, all others `zero()`.
    fn setup_fixpoint(&mut self, wl: &mut impl Worklist<Key>) {
        wl.clear();
        let keys: Vec<Key> = self.states.keys().copied().collect();
        for key in keys {
            let is_final = self.finals.contains(&key);
            let st = self.state_mut(key);
            if is_final {
                st.set_weight(W::one());
                st.set_delta(W::one());
                st.marked = true;
                wl.put(key);
            } else {
                st.set_weight(W::zero());
                st.set_delta(W::zero());
                st.marked = false;
            }
        }
    }

    /// Computes, for every state, the meet over all path weights from that
    /// state to a final state, with the default FIFO worklist.
    pub fn path_summary(&mut self) {
        let mut wl = DefaultWorklist::new();
        self.path_summary_with(&mut wl, &mut Unbounded);
    }

    /// [`Wfa::path_summary`] with a caller-supplied worklist discipline and
    /// progress guard. Returns `false` if the guard aborted the pass.
    pub fn path_summary_with(
        &mut self,
        wl: &mut impl Worklist<Key>,
        progress: &mut impl Progress,
    ) -> bool {
        self.setup_fixpoint(wl);
        while let Some(q) = wl.get() {
            if !progress.tick() {
                debug!("path_summary aborted by progress guard");
                return false;
            }
            let (the_delta, rev) = {
                let st = self.state_mut(q);
                st.marked = false;
                (st.take_delta(), st.rev.clone())
            };
            trace!("path_summary: popped {} with delta {:?}", q, the_delta);

            // For each t = (q', x, q) directed into q.
            for id in rev {
                let (qprime, extended) = {
                    let t = self.trans(id);
                    let extended = match self.query {
                        Query::Inorder => t.weight().extend(&the_delta),
                        Query::Reverse => the_delta.extend(t.weight()),
                    };
                    (t.from(), extended)
                };

                let st = self.state_mut(qprime);
                let (combined, diff) = extended.delta(st.weight());
                st.set_weight(combined);
                if st.marked {
                    // Already on the worklist: fold the change into its
                    // pending delta.
                    let pending = st.delta().combine(&diff);
                    st.set_delta(pending);
                } else {
                    let enqueue = !diff.is_zero();
                    st.set_delta(diff);
                    if enqueue {
                        st.marked = true;
                        wl.put(qprime);
                    }
                }
            }
        }
        true
    }
}

impl<W: Semiring> Default for Wfa<W> {
    fn default() -> Self {
        Wfa::new(Query::Inorder)
    }
}

impl<W: Semiring + fmt::Debug> fmt::Display for Wfa<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WFA[ initial = {}", self.initial)?;
        write!(f, "     F = {{")?;
        for (i, key) in self.finals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", key)?;
        }
        writeln!(f, "}}")?;
        for (_, t) in self.transitions() {
            writeln!(f, "     {}", t)?;
        }
        write!(f, "]")
    }
}
