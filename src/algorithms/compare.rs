//! Comparison operations (spec.md §4.6): satisfiability, validity,
//! contradiction and equivalence. None of these call out to a SAT solver —
//! each is answered by brute-force enumeration over `core::semantics`, same
//! as the determinism check in `core::properties`.

use crate::core::{is_satisfiable_brute, Name, Nnf};

/// `true` if `n` has at least one model.
#[must_use]
pub fn satisfiable<V: Name>(n: &Nnf<V>) -> bool {
    is_satisfiable_brute(n)
}

/// `true` if `n` has no model, i.e. `n` is equivalent to `False`.
#[must_use]
pub fn contradicts_itself<V: Name>(n: &Nnf<V>) -> bool {
    !satisfiable(n)
}

/// `true` if `a & b` is unsatisfiable.
#[must_use]
pub fn contradicts<V: Name>(a: &Nnf<V>, b: &Nnf<V>) -> bool {
    crate::core::contradicts(a, b)
}

/// `true` if `n` is satisfied by every model over its variables, i.e. `n`
/// is equivalent to `True`.
#[must_use]
pub fn valid<V: Name>(n: &Nnf<V>) -> bool {
    !satisfiable(&n.negate())
}

/// `true` if `a` and `b` have exactly the same models (over the union of
/// their variables): neither `a & ~b` nor `~a & b` is satisfiable.
#[must_use]
pub fn equivalent<V: Name>(a: &Nnf<V>, b: &Nnf<V>) -> bool {
    !satisfiable(&(a.clone() & b.negate())) && !satisfiable(&(b.clone() & a.negate()))
}

/// `true` if every model of `a` is a model of `b` (`a` entails `b`):
/// equivalently, `a & ~b` is unsatisfiable.
#[must_use]
pub fn entails<V: Name>(a: &Nnf<V>, b: &Nnf<V>) -> bool {
    !satisfiable(&(a.clone() & b.negate()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Nnf<String> {
        Nnf::var(name.to_string())
    }

    #[test]
    fn test_satisfiable_and_valid() {
        let a = v("a");
        assert!(satisfiable(&a));
        assert!(!valid(&a));
        assert!(valid(&(a.clone() | !a.clone())));
        assert!(!satisfiable(&(a.clone() & !a)));
    }

    #[test]
    fn test_contradicts() {
        let a = v("a");
        let b = v("b");
        assert!(contradicts(&a, &!a.clone()));
        assert!(!contradicts(&a, &b));
        assert!(contradicts(&Nnf::r#false(), &a));
    }

    #[test]
    fn test_equivalent() {
        let a = v("a");
        let b = v("b");
        assert!(equivalent(&(a.clone() & b.clone()), &(b.clone() & a.clone())));
        assert!(!equivalent(&a, &b));
        assert!(equivalent(&a, &(a.clone() | (a.clone() & b))));
    }

    #[test]
    fn test_entails() {
        let a = v("a");
        let b = v("b");
        assert!(entails(&(a.clone() & b.clone()), &a));
        assert!(!entails(&a, &(a.clone() & b)));
        assert!(entails(&Nnf::r#false(), &a));
        assert!(entails(&a.clone(), &(a.clone() | b)));
    }
}
