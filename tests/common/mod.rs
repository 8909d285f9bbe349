//! Weight domains shared by the integration suites.
//!
//! Each domain witnesses a different property of the engine: `Lang` has a
//! non-commutative `extend` (operand-order mistakes change the answer),
//! `MinPlus` converges on weighted cycles, `GenKill` mirrors a classic
//! uninitialized-variables dataflow transformer.
#![allow(dead_code)]

use std::collections::BTreeSet;

use wpds_rs::semiring::Semiring;

/// Finite string-language semiring: `combine` is union, `extend` is
/// pairwise concatenation. The empty language is `zero`, `{""}` is `one`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Lang(pub BTreeSet<String>);

impl Lang {
    pub fn word(w: &str) -> Self {
        Lang(BTreeSet::from([w.to_string()]))
    }

    pub fn of(words: &[&str]) -> Self {
        Lang(words.iter().map(|w| w.to_string()).collect())
    }
}

impl Semiring for Lang {
    fn zero() -> Self {
        Lang(BTreeSet::new())
    }

    fn one() -> Self {
        Lang(BTreeSet::from([String::new()]))
    }

    fn combine(&self, other: &Self) -> Self {
        Lang(self.0.union(&other.0).cloned().collect())
    }

    fn extend(&self, other: &Self) -> Self {
        let mut out = BTreeSet::new();
        for a in &self.0 {
            for b in &other.0 {
                out.insert(format!("{}{}", a, b));
            }
        }
        Lang(out)
    }
}

/// Tropical semiring: `combine` is min, `extend` is saturating addition.
/// `None` is "no path".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MinPlus(pub Option<u64>);

impl MinPlus {
    pub fn cost(c: u64) -> Self {
        MinPlus(Some(c))
    }
}

impl Semiring for MinPlus {
    fn zero() -> Self {
        MinPlus(None)
    }

    fn one() -> Self {
        MinPlus(Some(0))
    }

    fn combine(&self, other: &Self) -> Self {
        match (self.0, other.0) {
            (None, w) | (w, None) => MinPlus(w),
            (Some(a), Some(b)) => MinPlus(Some(a.min(b))),
        }
    }

    fn extend(&self, other: &Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => MinPlus(Some(a.saturating_add(b))),
            _ => MinPlus(None),
        }
    }
}

/// Gen/kill bit-set transformer: applied to a fact set `x`, a transformer
/// yields `(x - kill) | gen`. `extend` composes in path order, `combine`
/// meets over paths (kills intersect, gens union). `Bottom` is "no path".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GenKill {
    Bottom,
    Transform { kill: u32, gen: u32 },
}

impl GenKill {
    pub fn transformer(kill: u32, gen: u32) -> Self {
        GenKill::Transform { kill, gen }
    }

    pub fn apply(&self, x: u32) -> u32 {
        match *self {
            GenKill::Bottom => 0,
            GenKill::Transform { kill, gen } => (x & !kill) | gen,
        }
    }
}

impl Semiring for GenKill {
    fn zero() -> Self {
        GenKill::Bottom
    }

    fn one() -> Self {
        GenKill::Transform { kill: 0, gen: 0 }
    }

    fn combine(&self, other: &Self) -> Self {
        match (*self, *other) {
            (GenKill::Bottom, w) | (w, GenKill::Bottom) => w,
            (
                GenKill::Transform { kill: k1, gen: g1 },
                GenKill::Transform { kill: k2, gen: g2 },
            ) => GenKill::Transform {
                kill: k1 & k2,
                gen: g1 | g2,
            },
        }
    }

    fn extend(&self, other: &Self) -> Self {
        match (*self, *other) {
            (GenKill::Bottom, _) | (_, GenKill::Bottom) => GenKill::Bottom,
            (
                GenKill::Transform { kill: k1, gen: g1 },
                GenKill::Transform { kill: k2, gen: g2 },
            ) => GenKill::Transform {
                kill: k1 | k2,
                gen: (g1 & !k2) | g2,
            },
        }
    }
}
