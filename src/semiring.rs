//! The semiring weight contract.
//!
//! Every weight carried by rules and transitions implements [`Semiring`]:
//! `combine` is the meet over alternative paths, `extend` the sequential
//! composition along a path. The engine is generic over this trait and never
//! touches a concrete domain — reachability, gen/kill dataflow facts and
//! interval abstractions all ride the same fixpoint machinery.
//!
//! Termination of saturation and path summary is a property of the domain:
//! `combine` must be idempotent, and fixpoints are guaranteed to converge
//! only when the domain has finite ascending chains under `combine`. Domains
//! without that property must be bounded by the caller (see
//! [`Progress`][crate::progress::Progress]).

use std::fmt::Debug;

/// A semiring element.
///
/// # Laws
///
/// - `combine` is associative, commutative and idempotent: `a ⊕ a == a`.
/// - `extend` is associative; it need not commute.
/// - `zero()` is the identity for `combine` and annihilates `extend`:
///   `zero ⊗ a == a ⊗ zero == zero`.
/// - `one()` is the identity for `extend`.
///
/// Values are immutable: every operation returns a new value.
pub trait Semiring: Clone + PartialEq + Debug {
    /// The "no path" element.
    fn zero() -> Self;

    /// The "empty path" element.
    fn one() -> Self;

    /// Meet over alternative paths.
    fn combine(&self, other: &Self) -> Self;

    /// Sequential composition, `self` then `other`.
    fn extend(&self, other: &Self) -> Self;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Combines `self` (a new contribution) into `prev` (the stored value)
    /// and reports the change as `(combined, diff)`.
    ///
    /// `diff` is `zero()` when the contribution changed nothing; propagating
    /// `diff` alone and combining with what was already propagated reproduces
    /// the effect of propagating the full combined value. The default is the
    /// conservative diff (the whole combined value on any change); domains
    /// with a real difference operator should override.
    fn delta(&self, prev: &Self) -> (Self, Self) {
        let combined = self.combine(prev);
        if combined == *prev {
            (combined, Self::zero())
        } else {
            let diff = combined.clone();
            (combined, diff)
        }
    }

    /// Placeholder weight for the entry transition of a generated state in
    /// `poststar`. Plain domains keep the default `one()`; stack-sensitive
    /// domains may need a distinguished quasi-identity.
    fn quasi_one(&self) -> Self {
        Self::one()
    }
}

/// Boolean reachability weight: `combine` is or, `extend` is and.
///
/// The smallest useful domain — saturation with `Reach` weights computes
/// plain (un-weighted) pushdown reachability.
///
/// # Examples
///
/// ```
/// use wpds_rs::semiring::{Reach, Semiring};
///
/// let w = Reach::one().extend(&Reach::one());
/// assert_eq!(w, Reach::one());
/// assert_eq!(w.combine(&Reach::zero()), w);
/// assert_eq!(w.extend(&Reach::zero()), Reach::zero());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Reach(pub bool);

impl Semiring for Reach {
    fn zero() -> Self {
        Reach(false)
    }

    fn one() -> Self {
        Reach(true)
    }

    fn combine(&self, other: &Self) -> Self {
        Reach(self.0 || other.0)
    }

    fn extend(&self, other: &Self) -> Self {
        Reach(self.0 && other.0)
    }
}
