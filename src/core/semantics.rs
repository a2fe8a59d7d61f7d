//! Semantic operations (spec.md §4.4): evaluation, conditioning,
//! simplification, smoothing, negation, and conversion to MODS form. Also
//! home to the small satisfiability helpers (`all_models`, `contradicts`)
//! shared by the property analyses (§4.3) and the public comparison API
//! (§4.6), since both ultimately reduce to enumeration on general NNF
//! (spec.md: "this is not a SAT solver").

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::error::{NnfError, Result};

use super::node::{Name, NodeKind, Nnf};

/// A (possibly partial) assignment of boolean values to variable names.
pub type Model<V> = FxHashMap<V, bool>;

/// `to_MODS` only enumerates models directly when the formula has at most
/// this many variables; beyond that the `2^|vars|` blow-up makes the
/// operation impractical (spec.md §4.4: "Only usable when `|vars(n)|` is
/// small").
pub const MAX_TO_MODS_VARS: usize = 20;

impl<V: Name> Nnf<V> {
    /// Evaluates `self` under `model`. Fails with
    /// [`NnfError::IncompleteModel`] if a `Var` node needed to decide the
    /// result has no entry in `model`.
    pub fn satisfied_by(&self, model: &Model<V>) -> Result<bool> {
        match self.kind() {
            NodeKind::Var(name, polarity) => {
                let value = model.get(name).ok_or_else(|| NnfError::IncompleteModel {
                    missing: name.to_string(),
                })?;
                Ok(value == polarity)
            }
            NodeKind::And(children) => {
                for c in children {
                    if !c.satisfied_by(model)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            NodeKind::Or(children) => {
                for c in children {
                    if c.satisfied_by(model)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Substitutes each `Var` whose name is in `partial` by `True`/`False`
    /// (accounting for polarity); other `Var`s are left untouched. The
    /// result is typically simpler but **not** simplified — call
    /// [`Nnf::simplify`] afterwards if a normal form is needed.
    #[must_use]
    pub fn condition(&self, partial: &Model<V>) -> Nnf<V> {
        match self.kind() {
            NodeKind::Var(name, polarity) => match partial.get(name) {
                Some(value) if value == polarity => Nnf::r#true(),
                Some(_) => Nnf::r#false(),
                None => self.clone(),
            },
            NodeKind::And(children) => Nnf::and_of(children.iter().map(|c| c.condition(partial))),
            NodeKind::Or(children) => Nnf::or_of(children.iter().map(|c| c.condition(partial))),
        }
    }

    /// Fixed-point normalization (spec.md §4.4). With `merge_nodes`, a
    /// child sharing its parent's connective is spliced into the parent
    /// instead of kept nested.
    ///
    /// `simplify(simplify(n, m), m) == simplify(n, m)` and the set of
    /// models is preserved (spec.md §8, invariants 1–2).
    #[must_use]
    pub fn simplify(&self, merge_nodes: bool) -> Nnf<V> {
        match self.kind() {
            NodeKind::Var(..) => self.clone(),
            NodeKind::And(children) => {
                let mut kept = Vec::with_capacity(children.len());
                for c in children {
                    let c = c.simplify(merge_nodes);
                    if c.is_false() {
                        return Nnf::r#false();
                    }
                    if c.is_true() {
                        continue;
                    }
                    if merge_nodes {
                        if let NodeKind::And(grandchildren) = c.kind() {
                            kept.extend(grandchildren.iter().cloned());
                            continue;
                        }
                    }
                    kept.push(c);
                }
                if has_complementary_literal(&kept) {
                    return Nnf::r#false();
                }
                finish_and(kept)
            }
            NodeKind::Or(children) => {
                let mut kept = Vec::with_capacity(children.len());
                for c in children {
                    let c = c.simplify(merge_nodes);
                    if c.is_true() {
                        return Nnf::r#true();
                    }
                    if c.is_false() {
                        continue;
                    }
                    if merge_nodes {
                        if let NodeKind::Or(grandchildren) = c.kind() {
                            kept.extend(grandchildren.iter().cloned());
                            continue;
                        }
                    }
                    kept.push(c);
                }
                if has_complementary_literal(&kept) {
                    return Nnf::r#true();
                }
                finish_or(kept)
            }
        }
    }

    /// Pads every `Or`'s children with tautologies `(x | ~x)` for whichever
    /// variables they are individually missing, so that siblings of the
    /// same `Or` end up sharing a common variable set. The result is smooth
    /// and logically equivalent to `self`; `make_smooth` is idempotent
    /// (spec.md §4.4, §8 invariant 7).
    #[must_use]
    pub fn make_smooth(&self) -> Nnf<V> {
        match self.kind() {
            NodeKind::Var(..) => self.clone(),
            NodeKind::And(children) => Nnf::and_of(children.iter().map(Nnf::make_smooth)),
            NodeKind::Or(children) => {
                let smoothed: Vec<Nnf<V>> = children.iter().map(Nnf::make_smooth).collect();
                if smoothed.is_empty() {
                    return Nnf::r#false();
                }
                let mut union: BTreeSet<V> = BTreeSet::new();
                for c in &smoothed {
                    union.extend(c.vars().iter().cloned());
                }
                let padded = smoothed.into_iter().map(|c| {
                    let missing: Vec<V> = union.difference(&c.vars()).cloned().collect();
                    if missing.is_empty() {
                        c
                    } else {
                        let mut conjuncts = Vec::with_capacity(1 + missing.len());
                        conjuncts.push(c);
                        conjuncts.extend(missing.into_iter().map(tautology));
                        Nnf::and_of(conjuncts)
                    }
                });
                Nnf::or_of(padded)
            }
        }
    }

    /// Returns a formula whose models are exactly the complement of
    /// `self`'s models over `self`'s variables (De Morgan, plus leaf
    /// polarity flip). The result stays in NNF: no negation is introduced
    /// above a leaf.
    #[must_use]
    pub fn negate(&self) -> Nnf<V> {
        negate(self)
    }

    /// Builds a MODS-form formula (a disjunction of full models) equivalent
    /// to `self`, by enumerating `all_models` over `self`'s variables and
    /// keeping the satisfying ones. Only usable when `|vars(self)|` is
    /// small (see [`MAX_TO_MODS_VARS`]); otherwise returns
    /// [`NnfError::Unsupported`].
    pub fn to_mods(&self) -> Result<Nnf<V>> {
        let vars: Vec<V> = self.vars().iter().cloned().collect();
        if vars.len() > MAX_TO_MODS_VARS {
            return Err(NnfError::Unsupported(format!(
                "to_MODS needs at most {MAX_TO_MODS_VARS} variables, got {}",
                vars.len()
            )));
        }
        let mut terms = Vec::new();
        for model in all_models(&vars) {
            if self.satisfied_by(&model)? {
                let literals = vars
                    .iter()
                    .map(|name| Nnf::var_with_polarity(name.clone(), model[name]));
                terms.push(Nnf::and_of(literals));
            }
        }
        Ok(Nnf::or_of(terms))
    }

    /// Projects a simple conjunction of literals (an `And` of `Var`s) back
    /// to the `Model` it represents.
    #[must_use]
    pub fn to_model(&self) -> Option<Model<V>> {
        match self.kind() {
            NodeKind::And(children) => {
                let mut model = Model::default();
                for c in children {
                    let (name, polarity) = c.as_var()?;
                    model.insert(name.clone(), polarity);
                }
                Some(model)
            }
            _ => None,
        }
    }
}

fn tautology<V: Name>(name: V) -> Nnf<V> {
    Nnf::or_of([
        Nnf::var_with_polarity(name.clone(), true),
        Nnf::var_with_polarity(name, false),
    ])
}

fn finish_and<V: Name>(children: Vec<Nnf<V>>) -> Nnf<V> {
    match children.len() {
        0 => Nnf::r#true(),
        1 => children.into_iter().next().unwrap(),
        _ => Nnf::and_of(children),
    }
}

fn finish_or<V: Name>(children: Vec<Nnf<V>>) -> Nnf<V> {
    match children.len() {
        0 => Nnf::r#false(),
        1 => children.into_iter().next().unwrap(),
        _ => Nnf::or_of(children),
    }
}

fn has_complementary_literal<V: Name>(children: &[Nnf<V>]) -> bool {
    let mut pos = BTreeSet::new();
    let mut neg = BTreeSet::new();
    for c in children {
        if let Some((name, polarity)) = c.as_var() {
            if polarity {
                pos.insert(name);
            } else {
                neg.insert(name);
            }
        }
    }
    pos.iter().any(|n| neg.contains(n))
}

pub(crate) fn negate<V: Name>(n: &Nnf<V>) -> Nnf<V> {
    match n.kind() {
        NodeKind::Var(name, polarity) => Nnf::var_with_polarity(name.clone(), !polarity),
        NodeKind::And(children) => Nnf::or_of(children.iter().map(negate)),
        NodeKind::Or(children) => Nnf::and_of(children.iter().map(negate)),
    }
}

/// A lazy, restartable sequence of every total assignment over `names`
/// (spec.md §9, design notes; §11 supplemented feature). `all_models(&[])`
/// yields the single empty model; `all_models` over `k` names yields `2^k`
/// distinct models.
pub struct AllModels<V: Name> {
    names: Vec<V>,
    next: u64,
    total: u64,
}

impl<V: Name> Iterator for AllModels<V> {
    type Item = Model<V>;

    fn next(&mut self) -> Option<Model<V>> {
        if self.next >= self.total {
            return None;
        }
        let bits = self.next;
        self.next += 1;
        Some(
            self.names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), (bits >> i) & 1 == 1))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next) as usize;
        (remaining, Some(remaining))
    }
}

/// Enumerates every total boolean assignment over `names`.
#[must_use]
pub fn all_models<V: Name>(names: &[V]) -> AllModels<V> {
    assert!(
        names.len() < 64,
        "all_models cannot enumerate 2^{} assignments",
        names.len()
    );
    AllModels {
        names: names.to_vec(),
        next: 0,
        total: 1u64 << names.len(),
    }
}

/// `true` if `n` has at least one model, decided by brute-force enumeration
/// over `n`'s own variables.
pub(crate) fn is_satisfiable_brute<V: Name>(n: &Nnf<V>) -> bool {
    let vars: Vec<V> = n.vars().iter().cloned().collect();
    all_models(&vars).any(|m| n.satisfied_by(&m).unwrap_or(false))
}

/// `true` if `a & b` is unsatisfiable, decided by brute-force enumeration
/// over the union of `a`'s and `b`'s variables.
pub(crate) fn contradicts<V: Name>(a: &Nnf<V>, b: &Nnf<V>) -> bool {
    if a.is_false() || b.is_false() {
        return true;
    }
    let mut vars: BTreeSet<V> = (*a.vars()).clone();
    vars.extend(b.vars().iter().cloned());
    let vars: Vec<V> = vars.into_iter().collect();
    !all_models(&vars).any(|m| a.satisfied_by(&m).unwrap_or(false) && b.satisfied_by(&m).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Nnf<String> {
        Nnf::var(name.to_string())
    }

    #[test]
    fn test_satisfied_by() {
        let a = v("a");
        let b = v("b");
        let model: Model<String> = [("a".to_string(), true), ("b".to_string(), true)]
            .into_iter()
            .collect();
        assert!((a.clone() & b.clone()).satisfied_by(&model).unwrap());
    }

    #[test]
    fn test_incomplete_model() {
        let a = v("a");
        let err = a.satisfied_by(&Model::default()).unwrap_err();
        assert!(matches!(err, NnfError::IncompleteModel { .. }));
    }

    #[test]
    fn test_all_models_basic() {
        assert_eq!(1, all_models::<i32>(&[]).count());
        let one: Vec<_> = all_models(&[1]).collect();
        assert_eq!(
            vec![
                [(1, false)].into_iter().collect::<Model<i32>>(),
                [(1, true)].into_iter().collect::<Model<i32>>(),
            ],
            one
        );
        assert_eq!(1024, all_models(&(0..10).collect::<Vec<_>>()).count());
    }

    #[test]
    fn test_simplify_true_false_propagation() {
        let a = v("a");
        let b = v("b");
        assert!(Nnf::and_of([a.clone(), Nnf::r#false()]).simplify(false).is_false());
        assert!(Nnf::or_of([b.clone(), Nnf::r#true()]).simplify(false).is_true());
        assert_eq!(a, Nnf::and_of([a.clone(), Nnf::r#true()]).simplify(false));
    }

    #[test]
    fn test_simplify_complementary_literals() {
        let a = v("a");
        assert!(Nnf::and_of([a.clone(), !a.clone()]).simplify(false).is_false());
        assert!(Nnf::or_of([a.clone(), !a]).simplify(false).is_true());
    }

    #[test]
    fn test_simplify_idempotent() {
        let a = v("a");
        let b = v("b");
        let n = Nnf::and_of([
            Nnf::and_of([a.clone(), Nnf::r#true()]),
            Nnf::or_of([b.clone(), Nnf::r#false()]),
        ]);
        let once = n.simplify(true);
        assert_eq!(once, once.simplify(true));
    }

    #[test]
    fn test_condition_and_simplify_is_equivalent_under_model() {
        let a = v("a");
        let b = v("b");
        let n = a.clone() & b.clone();
        let model: Model<String> = [("a".to_string(), true), ("b".to_string(), true)]
            .into_iter()
            .collect();
        assert!(n.condition(&model).simplify(false).is_true());
    }

    #[test]
    fn test_make_smooth_fig1b() {
        let a = v("a");
        let b = v("b");
        let fig1b = (!a.clone() | !b.clone()) & (a.clone() | b.clone());
        assert!(!fig1b.smooth());
        let smoothed = fig1b.make_smooth();
        assert!(smoothed.smooth());
        assert_eq!(smoothed, smoothed.make_smooth());
    }

    #[test]
    fn test_negate_is_complement() {
        let a = v("a");
        let b = v("b");
        let n = a.clone() & b.clone();
        let negated = n.negate();
        assert!(!negated.satisfied_by(&[("a".to_string(), true), ("b".to_string(), true)].into_iter().collect()).unwrap());
        assert!(negated.satisfied_by(&[("a".to_string(), false), ("b".to_string(), true)].into_iter().collect()).unwrap());
    }

    #[test]
    fn test_to_mods() {
        let a = v("a");
        let b = v("b");
        let n = a.clone() | b.clone();
        let mods = n.to_mods().unwrap();
        assert!(mods.is_mods());
    }

    #[test]
    fn test_to_model_roundtrip() {
        let model: Model<i32> = [(1, true), (2, false)].into_iter().collect();
        let n = Nnf::and_of(model.iter().map(|(k, v)| Nnf::var_with_polarity(*k, *v)));
        assert_eq!(Some(model), n.to_model());
    }
}
