//! Pushdown rules.
//!
//! A rule rewrites the control state and the top of the stack:
//!
//! ```text
//! <p, y> -> <p', >          pop rule    (arity 0)
//! <p, y> -> <p', y'>        same-level  (arity 1)
//! <p, y> -> <p', y' y''>    push rule   (arity 2)
//! ```
//!
//! Rules are immutable in structure; only the weight may be strengthened, by
//! the store, when a structurally identical rule is re-added.

use std::fmt;

use crate::key::{Key, EPSILON};
use crate::semiring::Semiring;

/// Index of a rule inside its owning [`Wpds`][crate::wpds::Wpds].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One pushdown rule plus its weight.
///
/// # Invariants
///
/// - `from_stack` is never `EPSILON` (a rule always matches a real symbol).
/// - `to_stack2` is only present when `to_stack1` is.
/// - The weight is never conceptually "null"; `W::zero()` is a legal, if
///   useless, rule weight.
#[derive(Debug, Clone)]
pub struct Rule<W> {
    from_state: Key,
    from_stack: Key,
    to_state: Key,
    to_stack1: Option<Key>,
    to_stack2: Option<Key>,
    weight: W,
}

impl<W: Semiring> Rule<W> {
    /// Creates a rule.
    ///
    /// # Panics
    ///
    /// Panics on malformed arity: an epsilon left-hand stack symbol, an
    /// epsilon right-hand symbol, or a second symbol without a first.
    pub fn new(
        from_state: Key,
        from_stack: Key,
        to_state: Key,
        to_stack1: Option<Key>,
        to_stack2: Option<Key>,
        weight: W,
    ) -> Self {
        assert_ne!(from_stack, EPSILON, "Rule must match a real stack symbol");
        assert!(
            to_stack1.is_some() || to_stack2.is_none(),
            "Rule cannot push a second symbol without a first"
        );
        assert!(
            to_stack1 != Some(EPSILON) && to_stack2 != Some(EPSILON),
            "Pushed stack symbols must not be epsilon"
        );
        Self {
            from_state,
            from_stack,
            to_state,
            to_stack1,
            to_stack2,
            weight,
        }
    }

    pub fn from_state(&self) -> Key {
        self.from_state
    }
    pub fn from_stack(&self) -> Key {
        self.from_stack
    }
    pub fn to_state(&self) -> Key {
        self.to_state
    }
    pub fn to_stack1(&self) -> Option<Key> {
        self.to_stack1
    }
    pub fn to_stack2(&self) -> Option<Key> {
        self.to_stack2
    }

    pub fn weight(&self) -> &W {
        &self.weight
    }

    /// Number of stack symbols on the right-hand side (0, 1 or 2).
    pub fn arity(&self) -> usize {
        self.to_stack1.is_some() as usize + self.to_stack2.is_some() as usize
    }

    pub fn is_pop(&self) -> bool {
        self.to_stack1.is_none()
    }

    pub fn is_push(&self) -> bool {
        self.to_stack2.is_some()
    }

    /// Structural equality of the five key fields, weight ignored.
    pub(crate) fn same_shape(&self, other: &Rule<W>) -> bool {
        self.from_state == other.from_state
            && self.from_stack == other.from_stack
            && self.to_state == other.to_state
            && self.to_stack1 == other.to_stack1
            && self.to_stack2 == other.to_stack2
    }

    /// Strengthens the rule's weight by combine. Store-internal.
    pub(crate) fn combine_weight(&mut self, w: &W) {
        self.weight = self.weight.combine(w);
    }
}

impl<W: fmt::Debug> fmt::Display for Rule<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}> -> <{}", self.from_state, self.from_stack, self.to_state)?;
        if let Some(y1) = self.to_stack1 {
            write!(f, ", {}", y1)?;
            if let Some(y2) = self.to_stack2 {
                write!(f, " {}", y2)?;
            }
        }
        write!(f, "> {:?}", self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeySpace;
    use crate::semiring::Reach;

    #[test]
    fn test_arity() {
        let mut keys = KeySpace::new();
        let p = keys.key("p");
        let y = keys.key("y");
        let g = keys.key("g");

        let pop = Rule::new(p, y, p, None, None, Reach::one());
        let step = Rule::new(p, y, p, Some(g), None, Reach::one());
        let push = Rule::new(p, y, p, Some(g), Some(y), Reach::one());

        assert_eq!(pop.arity(), 0);
        assert!(pop.is_pop());
        assert_eq!(step.arity(), 1);
        assert!(!step.is_pop() && !step.is_push());
        assert_eq!(push.arity(), 2);
        assert!(push.is_push());
    }

    #[test]
    #[should_panic(expected = "second symbol without a first")]
    fn test_bad_arity_panics() {
        let mut keys = KeySpace::new();
        let p = keys.key("p");
        let y = keys.key("y");
        let _ = Rule::new(p, y, p, None, Some(y), Reach::one());
    }

    #[test]
    #[should_panic(expected = "real stack symbol")]
    fn test_epsilon_lhs_panics() {
        let mut keys = KeySpace::new();
        let p = keys.key("p");
        let _ = Rule::new(p, crate::key::EPSILON, p, None, None, Reach::one());
    }

    #[test]
    fn test_same_shape_ignores_weight() {
        let mut keys = KeySpace::new();
        let p = keys.key("p");
        let y = keys.key("y");
        let a = Rule::new(p, y, p, Some(y), None, Reach::one());
        let b = Rule::new(p, y, p, Some(y), None, Reach::zero());
        assert!(a.same_shape(&b));
    }
}
