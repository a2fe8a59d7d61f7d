use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitAnd, BitOr, Not};
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use rustc_hash::FxHasher;

/// The bound satisfied by variable names.
///
/// A variable name is a domain-opaque identifier: the source library accepts
/// any hashable Python object, which this crate mirrors with a single bound
/// covering both integer-keyed formulas (DIMACS/DSHARP, `V = u32`) and
/// symbolic ones (`V = String`).
pub trait Name: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}
impl<T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display> Name for T {}

/// The shape of a node, sealed so that it can only be produced by the
/// constructors on [`Nnf`].
///
/// There is deliberately no "abstract" variant a caller could instantiate:
/// the source library raises `TypeError` on `NNF()`/`Internal()`; here the
/// equivalent is that `NodeKind` itself is private to the crate, so the only
/// way to obtain an `Nnf<V>` from outside the crate is through `var`,
/// `and_of`, `or_of`, [`Nnf::TRUE`](Nnf::r#true) or [`Nnf::FALSE`](Nnf::r#false).
#[derive(Debug)]
pub(crate) enum NodeKind<V: Name> {
    /// A literal: a variable name together with its polarity.
    Var(V, bool),
    /// A conjunction over a set of children. Empty means `True`.
    And(BTreeSet<Nnf<V>>),
    /// A disjunction over a set of children. Empty means `False`.
    Or(BTreeSet<Nnf<V>>),
}

impl<V: Name> PartialEq for NodeKind<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeKind::Var(n1, p1), NodeKind::Var(n2, p2)) => n1 == n2 && p1 == p2,
            (NodeKind::And(c1), NodeKind::And(c2)) | (NodeKind::Or(c1), NodeKind::Or(c2)) => {
                c1 == c2
            }
            _ => false,
        }
    }
}
impl<V: Name> Eq for NodeKind<V> {}

pub(crate) struct NodeData<V: Name> {
    kind: NodeKind<V>,
    hash: u64,
    size_cache: OnceCell<usize>,
    vars_cache: OnceCell<Rc<BTreeSet<V>>>,
    decomposable_cache: OnceCell<bool>,
    deterministic_cache: OnceCell<bool>,
    smooth_cache: OnceCell<bool>,
}

impl<V: Name> NodeData<V> {
    pub(crate) fn size_cache(&self) -> &OnceCell<usize> {
        &self.size_cache
    }

    pub(crate) fn vars_cache(&self) -> &OnceCell<Rc<BTreeSet<V>>> {
        &self.vars_cache
    }

    pub(crate) fn decomposable_cache(&self) -> &OnceCell<bool> {
        &self.decomposable_cache
    }

    pub(crate) fn deterministic_cache(&self) -> &OnceCell<bool> {
        &self.deterministic_cache
    }

    pub(crate) fn smooth_cache(&self) -> &OnceCell<bool> {
        &self.smooth_cache
    }
}

/// A node of an immutable, structurally-shared NNF DAG.
///
/// Cloning an `Nnf` is a reference-count bump, not a deep copy: all
/// transformations in this crate allocate fresh nodes and leave existing
/// ones untouched (spec.md §3, invariant 3).
///
/// Two `Nnf` values compare equal exactly when they have the same variant
/// and the same (set-semantics) children; `And`/`Or` children are stored in
/// a `BTreeSet`, which gives duplicate-collapsing and order-independence for
/// free (invariant 1) as well as a canonical iteration order.
pub struct Nnf<V: Name>(pub(crate) Rc<NodeData<V>>);

impl<V: Name> Clone for Nnf<V> {
    fn clone(&self) -> Self {
        Nnf(Rc::clone(&self.0))
    }
}

impl<V: Name> PartialEq for Nnf<V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.0.hash == other.0.hash && self.0.kind == other.0.kind)
    }
}
impl<V: Name> Eq for Nnf<V> {}

impl<V: Name> Hash for Nnf<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl<V: Name> PartialOrd for Nnf<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: Name> Ord for Nnf<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0.kind, &other.0.kind) {
            (NodeKind::Var(n1, p1), NodeKind::Var(n2, p2)) => n1.cmp(n2).then(p1.cmp(p2)),
            (NodeKind::Var(..), _) => Ordering::Less,
            (_, NodeKind::Var(..)) => Ordering::Greater,
            (NodeKind::And(c1), NodeKind::And(c2)) => c1.cmp(c2),
            (NodeKind::And(_), NodeKind::Or(_)) => Ordering::Less,
            (NodeKind::Or(_), NodeKind::And(_)) => Ordering::Greater,
            (NodeKind::Or(c1), NodeKind::Or(c2)) => c1.cmp(c2),
        }
    }
}

impl<V: Name> fmt::Debug for Nnf<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0.kind, f)
    }
}

impl<V: Name> fmt::Display for Nnf<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            NodeKind::Var(name, true) => write!(f, "{name}"),
            NodeKind::Var(name, false) => write!(f, "~{name}"),
            NodeKind::And(children) if children.is_empty() => write!(f, "true"),
            NodeKind::Or(children) if children.is_empty() => write!(f, "false"),
            NodeKind::And(children) => {
                write!(f, "(")?;
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, ")")
            }
            NodeKind::Or(children) => {
                write!(f, "(")?;
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn compute_hash<V: Name>(kind: &NodeKind<V>) -> u64 {
    let mut h = FxHasher::default();
    match kind {
        NodeKind::Var(name, polarity) => {
            0u8.hash(&mut h);
            name.hash(&mut h);
            polarity.hash(&mut h);
        }
        NodeKind::And(children) => {
            1u8.hash(&mut h);
            for c in children {
                c.0.hash.hash(&mut h);
            }
        }
        NodeKind::Or(children) => {
            2u8.hash(&mut h);
            for c in children {
                c.0.hash.hash(&mut h);
            }
        }
    }
    h.finish()
}

impl<V: Name> Nnf<V> {
    /// Builds the positive literal for `name`.
    #[must_use]
    pub fn var(name: V) -> Self {
        Self::from_kind(NodeKind::Var(name, true))
    }

    /// Builds a literal for `name` with the given polarity: `true` for the
    /// positive literal, `false` for the negated one.
    #[must_use]
    pub fn var_with_polarity(name: V, polarity: bool) -> Self {
        Self::from_kind(NodeKind::Var(name, polarity))
    }

    /// Builds the conjunction of `children`. Children are deduplicated by
    /// value; order is irrelevant (spec.md §3, invariant 1). An empty
    /// iterator yields [`Nnf::r#true`].
    ///
    /// Unlike [`BitAnd`], this never flattens nested `And`s: the result is
    /// always a single new `And` node directly over exactly `children`. Use
    /// [`simplify`](crate::simplify) with `merge_nodes = true` to splice
    /// same-connective descendants into their parent.
    #[must_use]
    pub fn and_of<I: IntoIterator<Item = Nnf<V>>>(children: I) -> Self {
        Self::from_kind(NodeKind::And(children.into_iter().collect()))
    }

    /// Builds the disjunction of `children`. See [`Nnf::and_of`] for the
    /// dedup/flattening contract; an empty iterator yields [`Nnf::r#false`].
    #[must_use]
    pub fn or_of<I: IntoIterator<Item = Nnf<V>>>(children: I) -> Self {
        Self::from_kind(NodeKind::Or(children.into_iter().collect()))
    }

    /// The constant `True`, represented as `And(∅)`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn r#true() -> Self {
        Self::and_of(std::iter::empty())
    }

    /// The constant `False`, represented as `Or(∅)`.
    #[must_use]
    pub fn r#false() -> Self {
        Self::or_of(std::iter::empty())
    }

    fn from_kind(kind: NodeKind<V>) -> Self {
        let hash = compute_hash(&kind);
        Nnf(Rc::new(NodeData {
            kind,
            hash,
            size_cache: OnceCell::new(),
            vars_cache: OnceCell::new(),
            decomposable_cache: OnceCell::new(),
            deterministic_cache: OnceCell::new(),
            smooth_cache: OnceCell::new(),
        }))
    }

    pub(crate) fn kind(&self) -> &NodeKind<V> {
        &self.0.kind
    }

    pub(crate) fn caches(&self) -> &NodeData<V> {
        &self.0
    }

    /// `true` for a `Var` node (a literal).
    #[must_use]
    pub fn is_var(&self) -> bool {
        matches!(&self.0.kind, NodeKind::Var(..))
    }

    /// `true` for the `True` constant.
    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(&self.0.kind, NodeKind::And(c) if c.is_empty())
    }

    /// `true` for the `False` constant.
    #[must_use]
    pub fn is_false(&self) -> bool {
        matches!(&self.0.kind, NodeKind::Or(c) if c.is_empty())
    }

    /// `true` for `True` or `False`.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.is_true() || self.is_false()
    }

    /// `true` for a `Var` node or a constant (`True`/`False`): a leaf of the
    /// formula in the sense of spec.md §3.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.is_var() || self.is_constant()
    }

    /// `true` for a non-degenerate `And`/`Or`, i.e. one with at least one
    /// child.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        !self.is_leaf()
    }

    /// `true` for an `And` node (including `True`).
    #[must_use]
    pub fn is_and(&self) -> bool {
        matches!(&self.0.kind, NodeKind::And(_))
    }

    /// `true` for an `Or` node (including `False`).
    #[must_use]
    pub fn is_or(&self) -> bool {
        matches!(&self.0.kind, NodeKind::Or(_))
    }

    /// If this node is an `And` or `Or`, its children; `None` for a `Var`.
    #[must_use]
    pub fn children(&self) -> Option<&BTreeSet<Nnf<V>>> {
        match &self.0.kind {
            NodeKind::Var(..) => None,
            NodeKind::And(c) | NodeKind::Or(c) => Some(c),
        }
    }

    /// If this node is a `Var`, its name and polarity.
    #[must_use]
    pub fn as_var(&self) -> Option<(&V, bool)> {
        match &self.0.kind {
            NodeKind::Var(name, polarity) => Some((name, *polarity)),
            _ => None,
        }
    }
}

/// `a & b`: the conjunction of two nodes, always built as a fresh two-child
/// `And` (no auto-flattening — see [`Nnf::and_of`]).
impl<V: Name> BitAnd for Nnf<V> {
    type Output = Nnf<V>;
    fn bitand(self, rhs: Self) -> Self::Output {
        Nnf::and_of([self, rhs])
    }
}

impl<V: Name> BitAnd for &Nnf<V> {
    type Output = Nnf<V>;
    fn bitand(self, rhs: Self) -> Self::Output {
        Nnf::and_of([self.clone(), rhs.clone()])
    }
}

/// `a | b`: the disjunction of two nodes, always built as a fresh two-child
/// `Or` (no auto-flattening — see [`Nnf::or_of`]).
impl<V: Name> BitOr for Nnf<V> {
    type Output = Nnf<V>;
    fn bitor(self, rhs: Self) -> Self::Output {
        Nnf::or_of([self, rhs])
    }
}

impl<V: Name> BitOr for &Nnf<V> {
    type Output = Nnf<V>;
    fn bitor(self, rhs: Self) -> Self::Output {
        Nnf::or_of([self.clone(), rhs.clone()])
    }
}

/// `!a`: De Morgan negation (spec.md §4.4, `negate`). See
/// [`crate::core::semantics::negate`] for the recursive definition.
impl<V: Name> Not for Nnf<V> {
    type Output = Nnf<V>;
    fn not(self) -> Self::Output {
        crate::core::semantics::negate(&self)
    }
}

impl<V: Name> Not for &Nnf<V> {
    type Output = Nnf<V>;
    fn not(self) -> Self::Output {
        crate::core::semantics::negate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_semantics_dedup() {
        let a = Nnf::var("a");
        let b = Nnf::var("b");
        let left = Nnf::and_of([a.clone(), b.clone(), a.clone()]);
        let right = Nnf::and_of([b, a]);
        assert_eq!(left, right);
    }

    #[test]
    fn test_true_false_distinct() {
        assert_ne!(Nnf::<&str>::r#true(), Nnf::<&str>::r#false());
        assert_eq!(Nnf::<&str>::r#true(), Nnf::and_of(std::iter::empty()));
    }

    #[test]
    fn test_display() {
        let a = Nnf::var("a");
        let b = Nnf::var("b");
        assert_eq!("~a", format!("{}", !a.clone()));
        assert_eq!("(a & b)", format!("{}", a & b));
    }

    #[test]
    fn test_no_auto_flatten() {
        let a = Nnf::var("a");
        let b = Nnf::var("b");
        let c = Nnf::var("c");
        let inner = Nnf::and_of([a.clone(), b.clone()]);
        let nested = inner.clone() & c.clone();
        assert_eq!(nested.children().unwrap().len(), 2);
        assert!(nested.children().unwrap().contains(&inner));
    }
}
