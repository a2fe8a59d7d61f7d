//! Property analyses (spec.md §4.3): decomposability, determinism,
//! smoothness. Results are memoized per node — recomputing at each DAG
//! occurrence would be exponential on a heavily-shared formula.

use super::node::{Name, NodeKind, Nnf};
use super::semantics::contradicts;

impl<V: Name> Nnf<V> {
    /// `true` if every `And` reachable from `self` has pairwise
    /// variable-disjoint children (spec.md §4.3).
    #[must_use]
    pub fn decomposable(&self) -> bool {
        *self
            .caches()
            .decomposable_cache()
            .get_or_init(|| self.check_decomposable())
    }

    fn check_decomposable(&self) -> bool {
        match self.kind() {
            NodeKind::Var(..) => true,
            NodeKind::And(children) => {
                let var_sets: Vec<_> = children.iter().map(Nnf::vars).collect();
                for i in 0..var_sets.len() {
                    for j in (i + 1)..var_sets.len() {
                        if !var_sets[i].is_disjoint(&var_sets[j]) {
                            return false;
                        }
                    }
                }
                children.iter().all(Nnf::decomposable)
            }
            NodeKind::Or(children) => children.iter().all(Nnf::decomposable),
        }
    }

    /// `true` if every `Or` reachable from `self` has pairwise logically
    /// contradictory children (spec.md §4.3). Deciding this exactly requires
    /// a satisfiability check per pair of children, which this crate answers
    /// by enumeration (spec.md §4.6): determinism is therefore as expensive
    /// as general NNF satisfiability, not a cheap syntactic test.
    #[must_use]
    pub fn deterministic(&self) -> bool {
        *self
            .caches()
            .deterministic_cache()
            .get_or_init(|| self.check_deterministic())
    }

    fn check_deterministic(&self) -> bool {
        match self.kind() {
            NodeKind::Var(..) => true,
            NodeKind::And(children) => children.iter().all(Nnf::deterministic),
            NodeKind::Or(children) => {
                let items: Vec<_> = children.iter().collect();
                for i in 0..items.len() {
                    for j in (i + 1)..items.len() {
                        if !contradicts(items[i], items[j]) {
                            return false;
                        }
                    }
                }
                children.iter().all(Nnf::deterministic)
            }
        }
    }

    /// `true` if every `Or` reachable from `self` has children that all
    /// share the same variable set (spec.md §4.3).
    #[must_use]
    pub fn smooth(&self) -> bool {
        *self.caches().smooth_cache().get_or_init(|| self.check_smooth())
    }

    fn check_smooth(&self) -> bool {
        match self.kind() {
            NodeKind::Var(..) => true,
            NodeKind::And(children) => children.iter().all(Nnf::smooth),
            NodeKind::Or(children) => {
                let mut iter = children.iter();
                let first_vars = match iter.next() {
                    Some(first) => first.vars(),
                    None => return true,
                };
                if !iter.all(|c| c.vars() == first_vars) {
                    return false;
                }
                children.iter().all(Nnf::smooth)
            }
        }
    }

    /// `true` if `self` is both decomposable and deterministic — a
    /// d-DNNF in the terminology of spec.md's glossary.
    #[must_use]
    pub fn is_d_dnnf(&self) -> bool {
        self.decomposable() && self.deterministic()
    }
}
