//! Weighted pushdown systems: the rule store and the saturation engine.
//!
//! A [`Wpds`] holds the rules and answers reachability queries by
//! *saturation*: starting from a seed automaton describing a configuration
//! set, rules are applied until no transition weight changes, yielding the
//! automaton of all forward-reachable ([`Wpds::poststar`]) or
//! backward-reachable ([`Wpds::prestar`]) configurations. Each accepted
//! path's weight is the `extend` of the rule weights used, in application
//! order; alternatives meet under `combine`.
//!
//! Both directions share one worklist discipline: a popped transition hands
//! over only its accumulated *delta* — the change since it was last
//! processed — so already-propagated contributions are never re-extended.
//!
//! Push rules `<p, y> -> <p', y' y''>` need an intermediate state, since a
//! finite automaton cannot push two symbols on one edge. The generated
//! state's identity is the memoized pair key of `(p', y')`, so every rule
//! (and every re-run) routing through the same pair reuses the same state.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

use crate::key::{Key, KeySpace, EPSILON};
use crate::progress::{Progress, Unbounded};
use crate::rule::{Rule, RuleId};
use crate::semiring::Semiring;
use crate::trans::TransId;
use crate::wfa::Wfa;
use crate::worklist::{DefaultWorklist, Worklist};

#[derive(Debug, Clone)]
pub struct Wpds<W> {
    rules: Vec<Rule<W>>,
    /// Rules keyed by `(from_state, from_stack)` — the poststar direction.
    forward: HashMap<(Key, Key), Vec<RuleId>>,
    /// Rules of arity >= 1 keyed by `(to_state, to_stack1)` — the prestar
    /// direction.
    backward: HashMap<(Key, Key), Vec<RuleId>>,
    /// Push rules keyed by their second pushed symbol.
    stack2: HashMap<Key, Vec<RuleId>>,
    /// Pop rules; prestar seeds one transition per entry.
    pops: Vec<RuleId>,
    /// Push rules; poststar pre-creates one generated state per entry.
    pushes: Vec<RuleId>,
}

impl<W: Semiring> Wpds<W> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            forward: HashMap::new(),
            backward: HashMap::new(),
            stack2: HashMap::new(),
            pops: Vec::new(),
            pushes: Vec::new(),
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule(&self, id: RuleId) -> &Rule<W> {
        &self.rules[id.index()]
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule<W>> {
        self.rules.iter()
    }

    /// Adds the rule `<from_state, from_stack> -> <to_state, to_stack> w`.
    ///
    /// `to_stack` holds 0, 1 or 2 symbols (pop, same-level, push). A rule
    /// with the same five key fields is not duplicated: the weights are
    /// combined into the existing rule, which becomes visible to both
    /// directions immediately.
    ///
    /// # Panics
    ///
    /// Panics if `to_stack` has more than two symbols, or on the arity
    /// violations of [`Rule::new`].
    pub fn add_rule(
        &mut self,
        from_state: Key,
        from_stack: Key,
        to_state: Key,
        to_stack: &[Key],
        weight: W,
    ) -> RuleId {
        let (to_stack1, to_stack2) = match *to_stack {
            [] => (None, None),
            [y1] => (Some(y1), None),
            [y1, y2] => (Some(y1), Some(y2)),
            _ => panic!("A pushdown rule pushes at most two stack symbols"),
        };
        self.insert_rule(Rule::new(
            from_state, from_stack, to_state, to_stack1, to_stack2, weight,
        ))
    }

    fn insert_rule(&mut self, rule: Rule<W>) -> RuleId {
        let fkey = (rule.from_state(), rule.from_stack());
        let existing = self.forward.get(&fkey).and_then(|bucket| {
            bucket
                .iter()
                .copied()
                .find(|&rid| self.rules[rid.index()].same_shape(&rule))
        });
        if let Some(rid) = existing {
            self.rules[rid.index()].combine_weight(rule.weight());
            trace!("combined duplicate into rule {}", self.rules[rid.index()]);
            return rid;
        }

        let rid = RuleId(self.rules.len() as u32);
        debug!("add rule {}", rule);
        self.forward.entry(fkey).or_default().push(rid);
        match (rule.to_stack1(), rule.to_stack2()) {
            (None, _) => self.pops.push(rid),
            (Some(y1), None) => {
                self.backward.entry((rule.to_state(), y1)).or_default().push(rid);
            }
            (Some(y1), Some(y2)) => {
                self.backward.entry((rule.to_state(), y1)).or_default().push(rid);
                self.stack2.entry(y2).or_default().push(rid);
                self.pushes.push(rid);
            }
        }
        self.rules.push(rule);
        rid
    }

    /// Marks every present transition as pending and enqueues it with its
    /// full weight as delta. Shared by both directions; this is also what
    /// makes in-place re-saturation after adding rules converge to the
    /// from-scratch result.
    fn setup_saturation(&self, fa: &mut Wfa<W>, wl: &mut impl Worklist<TransId>) {
        wl.clear();
        for tid in fa.trans_ids() {
            let t = fa.trans_mut(tid);
            t.reset_delta();
            t.marked = true;
            wl.put(tid);
        }
    }

    /// Inserts/combines and re-enqueues the transition when its stored
    /// weight changed.
    fn update(
        &self,
        fa: &mut Wfa<W>,
        wl: &mut impl Worklist<TransId>,
        from: Key,
        stack: Key,
        to: Key,
        weight: W,
    ) {
        let (tid, changed) = fa.insert(from, stack, to, weight);
        if changed {
            let t = fa.trans_mut(tid);
            if !t.marked {
                t.marked = true;
                wl.put(tid);
            }
        }
    }

    // ------------------------------------------------------------------
    // prestar
    // ------------------------------------------------------------------

    /// Backward reachability: returns the saturated automaton accepting
    /// every configuration from which `input`'s language is reachable.
    pub fn prestar(&self, input: &Wfa<W>) -> Wfa<W> {
        let mut fa = input.clone();
        self.prestar_into(&mut fa);
        fa
    }

    /// In-place [`Wpds::prestar`]; `fa` is both seed and destination. Its
    /// existing transitions remain and are re-propagated, which makes
    /// add-rules-then-re-run incremental updates converge correctly.
    pub fn prestar_into(&self, fa: &mut Wfa<W>) {
        let mut wl = DefaultWorklist::new();
        self.prestar_with(fa, &mut wl, &mut Unbounded);
    }

    /// [`Wpds::prestar_into`] with a caller-supplied worklist and progress
    /// guard. Returns `false` if the guard aborted the pass, leaving `fa`
    /// partially saturated.
    pub fn prestar_with(
        &self,
        fa: &mut Wfa<W>,
        wl: &mut impl Worklist<TransId>,
        progress: &mut impl Progress,
    ) -> bool {
        self.setup_saturation(fa, wl);

        // Every pop rule <p, y> -> <p', > contributes (p, y, p') up front.
        for &rid in &self.pops {
            let r = &self.rules[rid.index()];
            self.update(
                fa,
                wl,
                r.from_state(),
                r.from_stack(),
                r.to_state(),
                r.weight().clone(),
            );
        }

        while let Some(tid) = wl.get() {
            if !progress.tick() {
                debug!("prestar aborted by progress guard");
                return false;
            }
            self.pre(fa, wl, tid);
        }
        true
    }

    fn pre(&self, fa: &mut Wfa<W>, wl: &mut impl Worklist<TransId>, tid: TransId) {
        let (q, y, qprime, dnew) = {
            let t = fa.trans_mut(tid);
            t.marked = false;
            (t.from(), t.stack(), t.to(), t.take_delta())
        };
        trace!("prestar: popped ({}, {}, {}) delta {:?}", q, y, qprime, dnew);

        // Rules whose right-hand side starts with (q, y).
        if let Some(bucket) = self.backward.get(&(q, y)) {
            for &rid in bucket {
                let r = &self.rules[rid.index()];
                let wrule_trans = r.weight().extend(&dnew);
                match r.to_stack2() {
                    None => {
                        // <p, y_r> -> <q, y>: new (p, y_r, q').
                        self.update(fa, wl, r.from_state(), r.from_stack(), qprime, wrule_trans);
                    }
                    Some(y2) => {
                        // <p, y_r> -> <q, y y2>: continue over (q', y2, q'').
                        for tp in fa.bucket(qprime, y2) {
                            let (tp_to, w) = {
                                let t2 = fa.trans(tp);
                                (t2.to(), wrule_trans.extend(t2.weight()))
                            };
                            self.update(fa, wl, r.from_state(), r.from_stack(), tp_to, w);
                        }
                    }
                }
            }
        }

        // Push rules whose *second* symbol is y: <p, y_r> -> <p1, y1 y>.
        // The popped transition closes such a rule iff (p1, y1, q) exists.
        if let Some(ls) = self.stack2.get(&y) {
            for &rid in ls {
                let r = &self.rules[rid.index()];
                let y1 = r.to_stack1().unwrap();
                if let Some(tmid) = fa.find(r.to_state(), y1, q) {
                    let wght = fa.trans(tmid).weight().extend(&dnew);
                    let wrule_trans = r.weight().extend(&wght);
                    self.update(fa, wl, r.from_state(), r.from_stack(), qprime, wrule_trans);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // poststar
    // ------------------------------------------------------------------

    /// Forward reachability: returns the saturated automaton accepting every
    /// configuration reachable from `input`'s language. Generated states for
    /// push rules are allocated from `keys`.
    pub fn poststar(&self, input: &Wfa<W>, keys: &mut KeySpace) -> Wfa<W> {
        let mut fa = input.clone();
        self.poststar_into(&mut fa, keys);
        fa
    }

    /// In-place [`Wpds::poststar`]; `fa` is both seed and destination. See
    /// [`Wpds::prestar_into`] for the incremental-update pattern.
    pub fn poststar_into(&self, fa: &mut Wfa<W>, keys: &mut KeySpace) {
        let mut wl = DefaultWorklist::new();
        self.poststar_with(fa, keys, &mut wl, &mut Unbounded);
    }

    /// [`Wpds::poststar_into`] with a caller-supplied worklist and progress
    /// guard. Returns `false` if the guard aborted the pass.
    pub fn poststar_with(
        &self,
        fa: &mut Wfa<W>,
        keys: &mut KeySpace,
        wl: &mut impl Worklist<TransId>,
        progress: &mut impl Progress,
    ) -> bool {
        self.setup_saturation(fa, wl);

        // One generated state per push rule, keyed deterministically by
        // (to_state, to_stack1) so distinct rules share it.
        for &rid in &self.pushes {
            let r = &self.rules[rid.index()];
            let g = keys.pair(r.to_state(), r.to_stack1().unwrap());
            fa.add_state(g);
        }

        while let Some(tid) = wl.get() {
            if !progress.tick() {
                debug!("poststar aborted by progress guard");
                return false;
            }
            self.post(fa, keys, wl, tid);
        }
        true
    }

    fn post(
        &self,
        fa: &mut Wfa<W>,
        keys: &mut KeySpace,
        wl: &mut impl Worklist<TransId>,
        tid: TransId,
    ) {
        let (p, y, q, dnew) = {
            let t = fa.trans_mut(tid);
            t.marked = false;
            (t.from(), t.stack(), t.to(), t.take_delta())
        };
        trace!("poststar: popped ({}, {}, {}) delta {:?}", p, y, q, dnew);

        if y != EPSILON {
            if let Some(bucket) = self.forward.get(&(p, y)) {
                for &rid in bucket {
                    self.post_rule(fa, keys, wl, rid, q, &dnew);
                }
            }
        } else {
            // (p, eps, q) then (q, y', q') gives (p, y', q'). The epsilon
            // edge is applied on the right: it entered the automaton later
            // in rule-application order.
            for tp in fa.out_of(q) {
                let (stack, to, w) = {
                    let t2 = fa.trans(tp);
                    (t2.stack(), t2.to(), t2.weight().extend(&dnew))
                };
                self.update(fa, wl, p, stack, to, w);
            }
        }
    }

    fn post_rule(
        &self,
        fa: &mut Wfa<W>,
        keys: &mut KeySpace,
        wl: &mut impl Worklist<TransId>,
        rid: RuleId,
        q: Key,
        dnew: &W,
    ) {
        let r = &self.rules[rid.index()];
        let wrule_trans = dnew.extend(r.weight());

        match (r.to_stack1(), r.to_stack2()) {
            (None, _) => {
                // Pop rule: an epsilon edge stands in for the vanished symbol.
                self.update(fa, wl, r.to_state(), EPSILON, q, wrule_trans);
            }
            (Some(y1), None) => {
                self.update(fa, wl, r.to_state(), y1, q, wrule_trans);
            }
            (Some(y1), Some(y2)) => {
                let g = keys.pair(r.to_state(), y1);
                fa.add_state(g);

                // The exit edge of the generated state carries the real
                // weight and never enters the worklist.
                let (tprime, changed) = fa.insert(g, y2, q, wrule_trans.clone());

                // Every contribution routed through g is remembered in its
                // quasi accumulator; the entry edge carries only the
                // quasi-one placeholder.
                let quasi = {
                    let st = fa.state_mut(g);
                    st.quasi = st.quasi.combine(&wrule_trans);
                    st.quasi.clone()
                };
                self.update(fa, wl, r.to_state(), y1, g, quasi.quasi_one());

                if changed {
                    // Propagate the exit edge's new weight through epsilon
                    // edges already targeting g.
                    let tprime_delta = fa.trans(tprime).delta().clone();
                    for teps in fa.eps_into(g) {
                        let (teps_from, eps_w) = {
                            let te = fa.trans(teps);
                            (te.from(), tprime_delta.extend(te.weight()))
                        };
                        self.update(fa, wl, teps_from, y2, q, eps_w);
                    }
                }
            }
        }
    }
}

impl<W: Semiring> Default for Wpds<W> {
    fn default() -> Self {
        Wpds::new()
    }
}

impl<W: Semiring + fmt::Debug> fmt::Display for Wpds<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WPDS[")?;
        for rule in &self.rules {
            writeln!(f, "     {}", rule)?;
        }
        write!(f, "]")
    }
}
