//! # wpds-rs: Weighted Pushdown Systems in Rust
//!
//! **`wpds-rs`** is a reachability engine for **weighted pushdown systems (WPDS)**.
//! It is designed for interprocedural dataflow analysis, program verification, and
//! any client that can phrase its question as weighted pushdown reachability.
//!
//! ## What is a WPDS?
//!
//! A pushdown system is a state machine with an unbounded stack; its rules rewrite the
//! top of the stack. When each rule carries a weight from a user-supplied **semiring**,
//! reachability questions get quantitative answers: the weight of a path is the
//! `extend` of the rule weights used, and the answer for a configuration is the
//! `combine` ("meet") over all paths reaching it.
//!
//! ## Key Features
//!
//! - **Saturation**: [`poststar`][crate::wpds::Wpds::poststar] (forward) and
//!   [`prestar`][crate::wpds::Wpds::prestar] (backward) close a weighted automaton
//!   under all applicable rules by a delta-propagating worklist fixpoint.
//! - **Generic weights**: the engine is parametric over the
//!   [`Semiring`][crate::semiring::Semiring] trait — booleans for plain reachability,
//!   gen/kill sets for dataflow, anything with an idempotent `combine`.
//! - **Single-owner storage**: a [`Wfa`][crate::wfa::Wfa] owns all of its transitions
//!   in one arena; state-side lists are index views, so there is no shared-ownership
//!   bookkeeping anywhere.
//! - **Path summaries**: [`path_summary`][crate::wfa::Wfa::path_summary] computes the
//!   meet-over-all-paths weight of every automaton state by the same fixpoint
//!   discipline.
//!
//! ## Basic Usage
//!
//! ```rust
//! use wpds_rs::key::KeySpace;
//! use wpds_rs::semiring::{Reach, Semiring};
//! use wpds_rs::wfa::Wfa;
//! use wpds_rs::wpds::Wpds;
//!
//! // 1. Intern the states and stack symbols
//! let mut keys = KeySpace::new();
//! let q = keys.key("q");
//! let acc = keys.key("acc");
//! let e_main = keys.key("e_main");
//! let n1 = keys.key("n1");
//!
//! // 2. Build the pushdown system
//! let mut pds = Wpds::new();
//! pds.add_rule(q, e_main, q, &[n1], Reach::one());
//!
//! // 3. Build the seed automaton accepting <q, e_main>
//! let mut query: Wfa<Reach> = Wfa::default();
//! query.add_trans(q, e_main, acc, Reach::one());
//! query.add_final_state(acc);
//! query.set_initial_state(q);
//!
//! // 4. Saturate and read off the result
//! let post = pds.poststar(&query, &mut keys);
//! let t = post.find(q, n1, acc).expect("<q, n1> is reachable");
//! assert_eq!(post.trans(t).weight(), &Reach::one());
//! ```
//!
//! ## Core Components
//!
//! - **[`wpds`]**: the rule store and the saturation engine.
//! - **[`wfa`]**: weighted automata — storage, intersection, path summary.
//! - **[`semiring`]**: the weight contract every domain implements.
//! - **[`key`]**: interned identifiers and the explicit [`KeySpace`][crate::key::KeySpace].
//! - **[`worklist`]** / **[`progress`]**: pluggable fixpoint discipline and pass guards.
//! - **[`dot`]**: Graphviz export of automata.
//!
//! Termination of the fixpoints is a property of the weight domain (idempotent
//! `combine`, finite ascending chains). For domains without that guarantee, inject a
//! [`Progress`][crate::progress::Progress] guard through the `*_with` entry points.

pub mod dot;
pub mod key;
pub mod progress;
pub mod rule;
pub mod semiring;
pub mod state;
pub mod trans;
pub mod wfa;
pub mod worklist;
pub mod wpds;
