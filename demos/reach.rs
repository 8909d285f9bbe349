//! Plain pushdown reachability over the boolean `Reach` domain.
//!
//! Builds a linear program of `--nodes` steps followed by a call/return
//! (push/pop) pair, runs poststar from the entry configuration, and prints
//! which control points are reachable.
//!
//! Run with: `cargo run --example reach -- --nodes 5`

use clap::Parser;
use log::info;

use wpds_rs::key::KeySpace;
use wpds_rs::semiring::{Reach, Semiring};
use wpds_rs::wfa::Wfa;
use wpds_rs::wpds::Wpds;

#[derive(Parser, Debug)]
#[command(about = "Weighted pushdown reachability demo")]
struct Args {
    /// Number of same-level steps before the call.
    #[arg(long, default_value_t = 3)]
    nodes: usize,

    /// Print the saturated automaton in DOT format.
    #[arg(long)]
    dot: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Args::parse();

    let mut keys = KeySpace::new();
    let q = keys.key("q");
    let acc = keys.key("acc");

    // A chain n0 -> n1 -> ... -> n_k, then a call to `f_entry` returning to
    // `ret`, and the callee popping back out.
    let nodes: Vec<_> = (0..=args.nodes).map(|i| keys.key(&format!("n{}", i))).collect();
    let f_entry = keys.key("f_entry");
    let ret = keys.key("ret");

    let mut pds = Wpds::new();
    for w in nodes.windows(2) {
        pds.add_rule(q, w[0], q, &[w[1]], Reach::one());
    }
    let last = *nodes.last().unwrap();
    pds.add_rule(q, last, q, &[f_entry, ret], Reach::one());
    pds.add_rule(q, f_entry, q, &[], Reach::one());
    info!("pds has {} rules", pds.rule_count());

    let mut query: Wfa<Reach> = Wfa::default();
    query.add_trans(q, nodes[0], acc, Reach::one());
    query.add_final_state(acc);
    query.set_initial_state(q);

    let post = pds.poststar(&query, &mut keys);
    info!(
        "saturated automaton: {} states, {} transitions",
        post.state_count(),
        post.len()
    );

    for &n in nodes.iter().chain([f_entry, ret].iter()) {
        let reachable = post
            .find(q, n, acc)
            .map(|t| !post.trans(t).weight().is_zero())
            .unwrap_or(false);
        println!("<q, {}> reachable: {}", keys.name(n), reachable);
    }

    if args.dot {
        println!("{}", post.to_dot(&keys)?);
    }

    Ok(())
}
