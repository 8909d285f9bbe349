//! Uninitialized-variables analysis as a weighted pushdown query.
//!
//! The program under analysis:
//!
//! ```text
//! int a, b, c, d;
//!
//! void main() {
//! 1:  a = 5;
//! 2:  b = 6;
//! 3:  c = 7;
//! }
//! ```
//!
//! Each CFG edge carries a gen/kill transformer over the variable set:
//! entering `main` makes every variable uninitialized, each assignment kills
//! one. Poststar from `<q, e_main>` yields, per control point, the set of
//! possibly-uninitialized variables. The `b = 6` edge is added *after* the
//! first pass to show the incremental re-saturation pattern.

use std::collections::BTreeSet;

use log::info;

use wpds_rs::key::KeySpace;
use wpds_rs::semiring::Semiring;
use wpds_rs::wfa::Wfa;
use wpds_rs::wpds::Wpds;

/// Gen/kill transformer over variable name sets: `x -> (x - kill) | gen`.
#[derive(Debug, Clone, Eq, PartialEq)]
enum VarSetTransformer {
    Bottom,
    Transform {
        kill: BTreeSet<&'static str>,
        gen: BTreeSet<&'static str>,
    },
}

impl VarSetTransformer {
    fn new(kill: &[&'static str], gen: &[&'static str]) -> Self {
        VarSetTransformer::Transform {
            kill: kill.iter().copied().collect(),
            gen: gen.iter().copied().collect(),
        }
    }

    fn apply(&self, x: &BTreeSet<&'static str>) -> BTreeSet<&'static str> {
        match self {
            VarSetTransformer::Bottom => BTreeSet::new(),
            VarSetTransformer::Transform { kill, gen } => {
                x.difference(kill).copied().chain(gen.iter().copied()).collect()
            }
        }
    }
}

impl Semiring for VarSetTransformer {
    fn zero() -> Self {
        VarSetTransformer::Bottom
    }

    fn one() -> Self {
        VarSetTransformer::new(&[], &[])
    }

    fn combine(&self, other: &Self) -> Self {
        use VarSetTransformer::*;
        match (self, other) {
            (Bottom, w) | (w, Bottom) => w.clone(),
            (Transform { kill: k1, gen: g1 }, Transform { kill: k2, gen: g2 }) => Transform {
                kill: k1.intersection(k2).copied().collect(),
                gen: g1.union(g2).copied().collect(),
            },
        }
    }

    fn extend(&self, other: &Self) -> Self {
        use VarSetTransformer::*;
        match (self, other) {
            (Bottom, _) | (_, Bottom) => Bottom,
            (Transform { kill: k1, gen: g1 }, Transform { kill: k2, gen: g2 }) => Transform {
                kill: k1.union(k2).copied().collect(),
                gen: g1.difference(k2).copied().chain(g2.iter().copied()).collect(),
            },
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut keys = KeySpace::new();
    let q = keys.key("q");
    let acc = keys.key("accepting_state");
    let e_main = keys.key("e_main");
    let n1 = keys.key("n1");
    let n2 = keys.key("n2");
    let n3 = keys.key("n3");
    let x_main = keys.key("x_main");
    let points = [e_main, n1, n2, n3, x_main];

    let mut pds = Wpds::new();
    pds.add_rule(q, e_main, q, &[n1], VarSetTransformer::new(&[], &["a", "b", "c", "d"]));
    pds.add_rule(q, n1, q, &[n2], VarSetTransformer::new(&["a"], &[]));
    // The `b = 6` edge arrives later.
    pds.add_rule(q, n3, q, &[x_main], VarSetTransformer::new(&["c"], &[]));

    let mut query: Wfa<VarSetTransformer> = Wfa::default();
    query.add_trans(q, e_main, acc, VarSetTransformer::one());
    query.add_final_state(acc);
    query.set_initial_state(q);

    info!("poststar of <q, e_main>");
    let mut post = pds.poststar(&query, &mut keys);
    report(&post, &keys, q, acc, &points);

    info!("adding the n2 -> n3 edge and re-saturating");
    pds.add_rule(q, n2, q, &[n3], VarSetTransformer::new(&["b"], &[]));
    pds.poststar_into(&mut post, &mut keys);
    report(&post, &keys, q, acc, &points);

    post.path_summary();
    info!("path summary done");
    for &n in &points {
        if let Some(w) = post.state_weight(n) {
            println!("summary at {}: {:?}", keys.name(n), w);
        }
    }

    Ok(())
}

fn report(
    post: &Wfa<VarSetTransformer>,
    keys: &KeySpace,
    q: wpds_rs::key::Key,
    acc: wpds_rs::key::Key,
    points: &[wpds_rs::key::Key],
) {
    let none = BTreeSet::new();
    for &n in points {
        match post.find(q, n, acc) {
            Some(t) => {
                let uninit = post.trans(t).weight().apply(&none);
                println!("{:>8}: possibly uninitialized {:?}", keys.name(n), uninit);
            }
            None => println!("{:>8}: unreachable", keys.name(n)),
        }
    }
}
