//! Path-summary fixpoint scenarios.

mod common;

use common::{GenKill, Lang, MinPlus};
use wpds_rs::key::KeySpace;
use wpds_rs::progress::Ticks;
use wpds_rs::semiring::Semiring;
use wpds_rs::wfa::{Query, Wfa};
use wpds_rs::worklist::{DefaultWorklist, LifoWorklist};
use wpds_rs::wpds::Wpds;

/// A weighted cycle converges: extra loop iterations only produce costlier
/// paths, which the min-combine discards.
#[test]
fn cycle_converges_to_shortest_paths() {
    let mut keys = KeySpace::new();
    let p = keys.key("p");
    let q = keys.key("q");
    let f = keys.key("f");
    let a = keys.key("a");
    let b = keys.key("b");
    let c = keys.key("c");

    let mut fa: Wfa<MinPlus> = Wfa::default();
    fa.add_trans(p, a, q, MinPlus::cost(1));
    fa.add_trans(q, b, p, MinPlus::cost(1));
    fa.add_trans(q, c, f, MinPlus::cost(5));
    fa.add_final_state(f);

    fa.path_summary();

    assert_eq!(fa.state_weight(f), Some(&MinPlus::one()));
    assert_eq!(fa.state_weight(q), Some(&MinPlus::cost(5)));
    assert_eq!(fa.state_weight(p), Some(&MinPlus::cost(6)));
}

/// The summary is the combine over *all* accepting paths, not just one.
#[test]
fn summary_combines_alternative_paths() {
    let mut keys = KeySpace::new();
    let p = keys.key("p");
    let q = keys.key("q");
    let f = keys.key("f");
    let a = keys.key("a");
    let b = keys.key("b");
    let c = keys.key("c");

    let mut fa: Wfa<Lang> = Wfa::default();
    fa.add_trans(p, a, q, Lang::word("a"));
    fa.add_trans(q, b, f, Lang::word("b"));
    fa.add_trans(p, c, f, Lang::word("c"));
    fa.add_final_state(f);

    fa.path_summary();

    assert_eq!(fa.state_weight(p), Some(&Lang::of(&["ab", "c"])));
}

/// INORDER and REVERSE queries flip the extend operands.
#[test]
fn query_order_flips_extend() {
    let mut keys = KeySpace::new();
    let p = keys.key("p");
    let q = keys.key("q");
    let f = keys.key("f");
    let a = keys.key("a");
    let b = keys.key("b");

    let build = |query| {
        let mut fa: Wfa<Lang> = Wfa::new(query);
        fa.add_trans(p, a, q, Lang::word("a"));
        fa.add_trans(q, b, f, Lang::word("b"));
        fa.add_final_state(f);
        fa.path_summary();
        fa
    };

    let inorder = build(Query::Inorder);
    assert_eq!(inorder.state_weight(p), Some(&Lang::word("ab")));

    let reverse = build(Query::Reverse);
    assert_eq!(reverse.state_weight(p), Some(&Lang::word("ba")));
}

/// The discipline changes the propagation order, never the fixpoint.
#[test]
fn worklist_discipline_does_not_change_fixpoint() {
    let mut keys = KeySpace::new();
    let p = keys.key("p");
    let q = keys.key("q");
    let f = keys.key("f");
    let a = keys.key("a");
    let b = keys.key("b");
    let c = keys.key("c");

    let build = || {
        let mut fa: Wfa<MinPlus> = Wfa::default();
        fa.add_trans(p, a, q, MinPlus::cost(2));
        fa.add_trans(q, b, p, MinPlus::cost(3));
        fa.add_trans(q, c, f, MinPlus::cost(1));
        fa.add_trans(p, c, f, MinPlus::cost(7));
        fa.add_final_state(f);
        fa
    };

    let mut fifo = build();
    fifo.path_summary_with(&mut DefaultWorklist::new(), &mut wpds_rs::progress::Unbounded);

    let mut lifo = build();
    lifo.path_summary_with(&mut LifoWorklist::new(), &mut wpds_rs::progress::Unbounded);

    for s in [p, q, f] {
        assert_eq!(fifo.state_weight(s), lifo.state_weight(s));
    }
}

/// A tick guard bounds the pass; aborting reports `false`.
#[test]
fn progress_guard_bounds_the_pass() {
    let mut keys = KeySpace::new();
    let p = keys.key("p");
    let f = keys.key("f");
    let a = keys.key("a");

    let mut fa: Wfa<MinPlus> = Wfa::default();
    fa.add_trans(p, a, f, MinPlus::cost(1));
    fa.add_final_state(f);

    let converged = fa.path_summary_with(&mut DefaultWorklist::new(), &mut Ticks::new(0));
    assert!(!converged);

    let converged = fa.path_summary_with(&mut DefaultWorklist::new(), &mut Ticks::new(100));
    assert!(converged);
}

/// Saturate, then summarize: the poststar automaton of the gen/kill chain
/// yields per-state dataflow summaries.
#[test]
fn summary_after_poststar() {
    const A: u32 = 1 << 0;
    const B: u32 = 1 << 1;

    let mut keys = KeySpace::new();
    let q = keys.key("q");
    let acc = keys.key("acc");
    let e_main = keys.key("e_main");
    let n1 = keys.key("n1");
    let x_main = keys.key("x_main");

    let mut pds = Wpds::new();
    pds.add_rule(q, e_main, q, &[n1], GenKill::transformer(0, A | B));
    pds.add_rule(q, n1, q, &[x_main], GenKill::transformer(A, 0));

    let mut query: Wfa<GenKill> = Wfa::default();
    query.add_trans(q, e_main, acc, GenKill::one());
    query.add_final_state(acc);
    query.set_initial_state(q);

    let mut post = pds.poststar(&query, &mut keys);
    post.path_summary();

    // Every accepting path ends at acc with the identity summary; q's
    // summary is the meet over all configurations readable from it — the
    // seed edge (identity), <q, n1> and <q, x_main>. Under this domain the
    // meet unions the possibly-uninitialized facts.
    assert_eq!(post.state_weight(acc), Some(&GenKill::one()));
    let at_q = post.state_weight(q).unwrap();
    assert_eq!(at_q.apply(0), A | B);
}
