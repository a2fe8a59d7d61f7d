//! Algebraic Model Counting (spec.md §4.7): a single semiring fold over a
//! smooth d-DNNF, with two ready-made semirings.
//!
//! `And` folds by `mul`, `Or` folds by `add`, and a `Var` leaf folds to
//! whatever the caller's labeling assigns it. Because the fold trusts each
//! `And`'s children to be variable-disjoint and each `Or`'s to be mutually
//! exclusive (decomposability and determinism) and every sibling under an
//! `Or` to range over the same variables (smoothness), [`eval`] refuses
//! any input lacking those three properties rather than silently returning
//! a wrong number — except [`num_sat`], which spec.md's own S1 scenario
//! exercises directly on a sentence that has none of those properties
//! (`fig1b`, a 2-clause CNF) and still expects a specific number back, not
//! an error; see [`num_sat`] for why that one bypasses the check.

use rug::Integer;

use crate::core::{Name, Nnf};
use crate::error::{NnfError, Result};

/// A commutative semiring used as the accumulator of an AMC fold.
pub trait Semiring: Clone {
    /// The additive identity (the value of an unsatisfiable sentence).
    fn zero() -> Self;
    /// The multiplicative identity (the value of `True`).
    fn one() -> Self;
    /// Combines two `Or`-sibling values.
    fn add(&self, other: &Self) -> Self;
    /// Combines two `And`-sibling values.
    fn mul(&self, other: &Self) -> Self;
}

impl Semiring for Integer {
    fn zero() -> Self {
        Integer::from(0)
    }
    fn one() -> Self {
        Integer::from(1)
    }
    fn add(&self, other: &Self) -> Self {
        Integer::from(self + other)
    }
    fn mul(&self, other: &Self) -> Self {
        Integer::from(self * other)
    }
}

/// Folds `n` through `label` over the semiring `S`. `label(name, polarity)`
/// gives the value of the literal `name` (negated when `polarity` is
/// `false`); `n` must be decomposable, deterministic and smooth.
pub fn eval<V: Name, S: Semiring>(n: &Nnf<V>, label: &impl Fn(&V, bool) -> S) -> Result<S> {
    if !n.is_d_dnnf() || !n.smooth() {
        return Err(NnfError::Unsupported(
            "AMC evaluation requires a smooth, decomposable, deterministic sentence".to_string(),
        ));
    }
    Ok(eval_unchecked(n, label))
}

fn eval_unchecked<V: Name, S: Semiring>(n: &Nnf<V>, label: &impl Fn(&V, bool) -> S) -> S {
    if let Some((name, polarity)) = n.as_var() {
        return label(name, polarity);
    }
    let children = n.children().expect("internal node has children");
    if n.is_and() {
        children
            .iter()
            .fold(S::one(), |acc, c| acc.mul(&eval_unchecked(c, label)))
    } else {
        children
            .iter()
            .fold(S::zero(), |acc, c| acc.add(&eval_unchecked(c, label)))
    }
}

/// The `NUM_SAT` semiring (spec.md §4.7): every literal is worth `1`, so
/// on a smooth d-DNNF the fold recovers the model count without ever
/// materializing a model list.
///
/// Unlike [`eval`], `num_sat` does not reject a non-smooth or
/// non-decomposable `n` — it always runs the raw `And`-multiplies,
/// `Or`-adds fold. spec.md §8's S1 scenario computes `NUM_SAT(fig1b) == 4`
/// directly on `fig1b = (¬a ∨ ¬b) ∧ (a ∨ b)`, a CNF whose two clauses both
/// range over `{a, b}` — neither decomposable nor smooth — and gets 4
/// precisely *because* the fold double-counts the overlap (spec.md §9:
/// "AMC evaluators silently give wrong answers on unsmoothed inputs").
/// Reject the input first (e.g. check [`Nnf::is_d_dnnf`] and
/// [`Nnf::smooth`], or call [`Nnf::make_smooth`]) if a plain, trustworthy
/// model count is what's wanted — that's what [`crate::model_count`] is for.
#[must_use]
pub fn num_sat<V: Name>(n: &Nnf<V>) -> Integer {
    eval_unchecked(n, &|_name: &V, _polarity: bool| Integer::from(1))
}

/// A dual number `value + grad * epsilon` with `epsilon^2 = 0`, used by
/// [`grad`] to carry a partial derivative alongside the ordinary weighted
/// count through the same fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    /// The ordinary (weighted model count) component.
    pub value: f64,
    /// The derivative component.
    pub grad: f64,
}

impl Semiring for Dual {
    fn zero() -> Self {
        Dual { value: 0.0, grad: 0.0 }
    }
    fn one() -> Self {
        Dual { value: 1.0, grad: 0.0 }
    }
    fn add(&self, other: &Self) -> Self {
        Dual {
            value: self.value + other.value,
            grad: self.grad + other.grad,
        }
    }
    fn mul(&self, other: &Self) -> Self {
        Dual {
            value: self.value * other.value,
            grad: self.grad * other.value + self.value * other.grad,
        }
    }
}

/// The `GRAD` semiring (spec.md §4.7): evaluates the weighted model count
/// of `n` under `weight`, together with its partial derivative with
/// respect to the weight of the positive literal of `wrt`.
pub fn grad<V: Name>(n: &Nnf<V>, weight: impl Fn(&V, bool) -> f64, wrt: &V) -> Result<Dual> {
    eval(n, &|name: &V, polarity: bool| Dual {
        value: weight(name, polarity),
        grad: if polarity && name == wrt { 1.0 } else { 0.0 },
    })
}
