//! Structural queries (spec.md §4.2): size, walk, the variable set, leaves,
//! and the syntactic class tests (CNF/DNF/MODS/flat/simply-conjunct).

use std::collections::BTreeSet;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use super::node::{Name, NodeKind, Nnf};

impl<V: Name> Nnf<V> {
    /// Every distinct node reachable from `self`, each visited exactly once
    /// (spec.md §3: "DAG-unique, not tree-expanded").
    ///
    /// Traversal uses an explicit stack rather than recursion, since formula
    /// height is not bounded and a recursive walk over a tall DAG could blow
    /// the native stack (spec.md §9, design notes).
    #[must_use]
    pub fn walk(&self) -> Vec<Nnf<V>> {
        let mut seen: FxHashSet<Nnf<V>> = FxHashSet::default();
        let mut order = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.clone()) {
                continue;
            }
            if let Some(children) = node.children() {
                stack.extend(children.iter().cloned());
            }
            order.push(node);
        }
        order
    }

    /// The sum, over internal nodes reachable from `self` (each counted
    /// once), of their number of children. `0` for a leaf.
    #[must_use]
    pub fn size(&self) -> usize {
        *self.caches().size_cache().get_or_init(|| {
            self.walk()
                .iter()
                .map(|n| n.children().map_or(0, BTreeSet::len))
                .sum()
        })
    }

    /// The set of variable names appearing anywhere under `self`.
    #[must_use]
    pub fn vars(&self) -> Rc<BTreeSet<V>> {
        Rc::clone(self.caches().vars_cache().get_or_init(|| {
            let mut set = BTreeSet::new();
            for n in self.walk() {
                if let NodeKind::Var(name, _) = n.kind() {
                    set.insert(name.clone());
                }
            }
            Rc::new(set)
        }))
    }

    /// Every distinct `Var` node reachable from `self`.
    #[must_use]
    pub fn atoms(&self) -> Vec<Nnf<V>> {
        self.walk().into_iter().filter(Nnf::is_var).collect()
    }

    /// Every distinct leaf (`Var`, `True` or `False`) reachable from `self`.
    #[must_use]
    pub fn leaves(&self) -> Vec<Nnf<V>> {
        self.walk().into_iter().filter(Nnf::is_leaf).collect()
    }

    /// `self` is a conjunction of leaves only.
    #[must_use]
    pub fn simply_conjunct(&self) -> bool {
        matches!(self.kind(), NodeKind::And(c) if c.iter().all(Nnf::is_leaf))
    }

    /// `self` is a disjunction of leaves only.
    #[must_use]
    pub fn simply_disjunct(&self) -> bool {
        matches!(self.kind(), NodeKind::Or(c) if c.iter().all(Nnf::is_leaf))
    }

    /// `self` has depth at most two: it is internal, and each of its
    /// children is either a leaf or an internal node whose own children are
    /// all leaves.
    #[must_use]
    pub fn flat(&self) -> bool {
        match self.children() {
            None => false,
            Some(children) => children.iter().all(|c| match c.children() {
                None => true,
                Some(grandchildren) => grandchildren.iter().all(Nnf::is_leaf),
            }),
        }
    }

    /// `self` is a conjunction of clauses: an `And` whose children are all
    /// non-empty `Or`s of `Var`s.
    #[must_use]
    pub fn is_cnf(&self) -> bool {
        match self.kind() {
            NodeKind::And(clauses) => clauses.iter().all(Nnf::is_clause),
            _ => false,
        }
    }

    /// `self` is a disjunction of terms: an `Or` whose children are all
    /// non-empty `And`s of `Var`s.
    #[must_use]
    pub fn is_dnf(&self) -> bool {
        match self.kind() {
            NodeKind::Or(terms) => terms.iter().all(Nnf::is_term),
            _ => false,
        }
    }

    /// `self` is a non-empty `Or` of `Var`s (a clause).
    #[must_use]
    pub fn is_clause(&self) -> bool {
        matches!(self.kind(), NodeKind::Or(lits) if !lits.is_empty() && lits.iter().all(Nnf::is_var))
    }

    /// `self` is a non-empty `And` of `Var`s (a term).
    #[must_use]
    pub fn is_term(&self) -> bool {
        matches!(self.kind(), NodeKind::And(lits) if !lits.is_empty() && lits.iter().all(Nnf::is_var))
    }

    /// `self` is an `Or` of model terms — `And`s of `Var`s that each cover
    /// exactly the same set of variable names — with all terms distinct
    /// (guaranteed by the set semantics of `Or`'s children).
    #[must_use]
    pub fn is_mods(&self) -> bool {
        let terms = match self.kind() {
            NodeKind::Or(terms) => terms,
            _ => return false,
        };
        let mut names = terms.iter().map(term_var_names);
        let Some(first) = names.next() else {
            return true;
        };
        let Some(first) = first else {
            return false;
        };
        names.all(|n| n.as_ref() == Some(&first))
    }
}

/// The set of variable names of a model term, or `None` if `node` is not a
/// term (an `And` of `Var`s) or repeats a variable name.
fn term_var_names<V: Name>(node: &Nnf<V>) -> Option<BTreeSet<V>> {
    let lits = match node.kind() {
        NodeKind::And(lits) if !lits.is_empty() => lits,
        _ => return None,
    };
    let mut names = BTreeSet::new();
    for lit in lits {
        let (name, _) = lit.as_var()?;
        if !names.insert(name.clone()) {
            return None;
        }
    }
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Nnf<String> {
        Nnf::var(name.to_string())
    }

    #[test]
    fn test_size_simple() {
        let a = v("a");
        let b = v("b");
        assert_eq!(2, (a.clone() & b.clone()).size());
        assert_eq!(4, (a.clone() & (a.clone() | b.clone())).size());
        assert_eq!(6, ((a.clone() | b.clone()) & (!a.clone() | !b.clone())).size());
    }

    #[test]
    fn test_size_sharing_counts_shared_node_once() {
        let a = v("a");
        let b = v("b");
        let shared = Nnf::or_of([a.clone(), b.clone()]);
        let sentence = Nnf::and_of([
            shared.clone(),
            Nnf::and_of([a.clone(), shared]),
        ]);
        assert_eq!(6, sentence.size());
    }

    #[test]
    fn test_walk_unique_and_bounded() {
        let a = v("a");
        let b = v("b");
        let shared = Nnf::or_of([a.clone(), b.clone()]);
        let sentence = Nnf::and_of([shared.clone(), shared]);
        let walked = sentence.walk();
        let unique: FxHashSet<_> = walked.iter().cloned().collect();
        assert_eq!(walked.len(), unique.len());
        assert!(walked.len() <= sentence.size() + 1);
    }

    #[test]
    fn test_is_cnf_dnf() {
        let a = v("a");
        let b = v("b");
        let c = v("c");
        let cnf = Nnf::and_of([
            Nnf::or_of([a.clone(), b.clone()]),
            Nnf::or_of([!b.clone(), c.clone()]),
        ]);
        assert!(cnf.is_cnf());
        assert!(!cnf.is_dnf());

        let dnf = Nnf::or_of([
            Nnf::and_of([a.clone(), b.clone()]),
            Nnf::and_of([!b, c]),
        ]);
        assert!(dnf.is_dnf());
        assert!(!dnf.is_cnf());
    }

    #[test]
    fn test_is_mods() {
        let a = v("a");
        let b = v("b");
        let m1 = Nnf::and_of([a.clone(), b.clone()]);
        let m2 = Nnf::and_of([!a.clone(), b.clone()]);
        let mods = Nnf::or_of([m1, m2]);
        assert!(mods.is_mods());

        let not_mods = Nnf::or_of([Nnf::and_of([a]), Nnf::and_of([b])]);
        assert!(!not_mods.is_mods());
    }

    #[test]
    fn test_flat() {
        let a = v("a");
        let b = v("b");
        let c = v("c");
        let flat = Nnf::and_of([a.clone(), Nnf::or_of([b.clone(), c.clone()])]);
        assert!(flat.flat());
        let not_flat = Nnf::and_of([Nnf::and_of([Nnf::or_of([a, b])]), c]);
        assert!(!not_flat.flat());
    }
}
