//! WFA to DOT (Graphviz) conversion.
//!
//! Renders a weighted automaton for inspection with `dot`, `neato`, or an
//! online viewer. This is a pure consumer of the automaton's read-only query
//! surface; nothing in the engine depends on it.
//!
//! # Conventions
//!
//! - The initial state is filled green, final states light blue.
//! - Edges are labeled with the stack symbol's interned name and the weight.
//! - Epsilon edges are dashed.
//!
//! # Examples
//!
//! ```
//! use wpds_rs::key::KeySpace;
//! use wpds_rs::semiring::{Reach, Semiring};
//! use wpds_rs::wfa::Wfa;
//!
//! let mut keys = KeySpace::new();
//! let p = keys.key("p");
//! let q = keys.key("q");
//! let a = keys.key("a");
//!
//! let mut fa: Wfa<Reach> = Wfa::default();
//! fa.set_initial_state(p);
//! fa.add_final_state(q);
//! fa.add_trans(p, a, q, Reach::one());
//!
//! let dot = fa.to_dot(&keys).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph"));
//! ```

use std::fmt::Debug;

use crate::key::KeySpace;
use crate::semiring::Semiring;
use crate::wfa::Wfa;

impl<W: Semiring + Debug> Wfa<W> {
    /// Renders the automaton in DOT format, resolving key names via `keys`.
    pub fn to_dot(&self, keys: &KeySpace) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph wfa {{")?;
        writeln!(dot, "  rankdir=LR;")?;
        writeln!(dot, "  node [shape=circle];")?;

        let mut states: Vec<_> = self.states().collect();
        states.sort();
        for key in states {
            write!(dot, "  {} [label=\"{}\"", key.id(), keys.name(key))?;
            if self.is_initial_state(key) {
                write!(dot, ", color=green, style=filled")?;
            } else if self.is_final_state(key) {
                write!(dot, ", shape=doublecircle, color=lightblue, style=filled")?;
            }
            writeln!(dot, "];")?;
        }

        for (_, t) in self.transitions() {
            write!(
                dot,
                "  {} -> {} [label=\"{} / {:?}\"",
                t.from().id(),
                t.to().id(),
                keys.name(t.stack()),
                t.weight()
            )?;
            if t.is_epsilon() {
                write!(dot, ", style=dashed")?;
            }
            writeln!(dot, "];")?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
