//! Model enumeration and counting (spec.md §4.5). Three strategies, picked
//! automatically from the properties already memoized on the node:
//!
//! - general NNF: brute-force enumeration over `all_models(vars(n))`,
//!   filtering by [`Nnf::satisfied_by`] (spec.md: "this is not a SAT
//!   solver" — correct but exponential in the variable count).
//! - deterministic NNF: a recursive enumeration that merges children's
//!   (partial) models instead of testing every total assignment, since a
//!   deterministic `Or`'s children are pairwise contradictory and an `And`'s
//!   children's models only need a consistency check rather than a from-scratch
//!   evaluation.
//! - decomposable *and* deterministic (d-DNNF): model *counting* drops the
//!   model list entirely and folds a product/sum straight down the DAG,
//!   grounded in the same recursive-fold shape as a d-DNNF weighted model
//!   count, using [`rug::Integer`] for the unbounded result.

use rug::Integer;

use crate::core::{Model, Name, Nnf};

/// Every model of `n` over `n`'s own variables.
///
/// Uses the deterministic-recursive strategy when `n.deterministic()`
/// holds, brute-force enumeration otherwise. Either way the result is the
/// same set of models (spec.md §8, invariant: `models(n) == models(simplify(n))`).
#[must_use]
pub fn models<V: Name>(n: &Nnf<V>) -> Vec<Model<V>> {
    if n.deterministic() {
        models_deterministic(n)
    } else {
        models_brute(n)
    }
}

/// The number of models of `n`, as an arbitrary-precision integer.
///
/// Uses the d-DNNF arithmetic fast path when `n` is both decomposable and
/// deterministic (no model list is ever materialized); falls back to
/// `models(n).len()` otherwise. The fast path folds over `n.make_smooth()`
/// rather than `n` itself (spec.md §4.5: "provided the input is d-DNNF and
/// smooth, via `make_smooth` when needed") — an unsmoothed `Or` whose
/// branches don't all mention the same variables otherwise undercounts,
/// since each branch then stands for more than one model of the whole.
#[must_use]
pub fn model_count<V: Name>(n: &Nnf<V>) -> Integer {
    if n.decomposable() && n.deterministic() {
        model_count_ddnnf(&n.make_smooth())
    } else {
        Integer::from(models(n).len())
    }
}

fn models_brute<V: Name>(n: &Nnf<V>) -> Vec<Model<V>> {
    let vars: Vec<V> = n.vars().iter().cloned().collect();
    crate::core::all_models(&vars)
        .filter(|m| n.satisfied_by(m).unwrap_or(false))
        .collect()
}

/// Deterministic-recursive enumeration, extended to `n`'s full variable set.
///
/// `partial_models_deterministic` only ever mentions the variables that
/// appear under the node it was called on, so an `Or` branch that doesn't
/// mention every variable `n` as a whole does (e.g. `a | (~a & b)`, whose
/// `a` branch says nothing about `b`) yields a partial assignment. Each one
/// is extended here by free Cartesian product over the variables it's
/// missing (spec.md §4.5), so the result is the same total-model set
/// `models_brute` would produce.
fn models_deterministic<V: Name>(n: &Nnf<V>) -> Vec<Model<V>> {
    let vars = n.vars();
    partial_models_deterministic(n)
        .into_iter()
        .flat_map(|partial| extend_free(partial, &vars))
        .collect()
}

fn extend_free<V: Name>(partial: Model<V>, vars: &std::collections::BTreeSet<V>) -> Vec<Model<V>> {
    let free: Vec<V> = vars
        .iter()
        .filter(|name| !partial.contains_key(*name))
        .cloned()
        .collect();
    crate::core::all_models(&free)
        .map(|assignment| {
            let mut m = partial.clone();
            m.extend(assignment);
            m
        })
        .collect()
}

fn partial_models_deterministic<V: Name>(n: &Nnf<V>) -> Vec<Model<V>> {
    if let Some((name, polarity)) = n.as_var() {
        return vec![[(name.clone(), polarity)].into_iter().collect()];
    }
    let children = n.children().expect("internal node has children");
    if n.is_and() {
        let mut acc = vec![Model::default()];
        for c in children {
            let child_models = partial_models_deterministic(c);
            let mut next = Vec::with_capacity(acc.len() * child_models.len());
            for a in &acc {
                for m in &child_models {
                    if consistent(a, m) {
                        let mut merged = a.clone();
                        merged.extend(m.iter().map(|(k, v)| (k.clone(), *v)));
                        next.push(merged);
                    }
                }
            }
            acc = next;
        }
        acc
    } else {
        children.iter().flat_map(partial_models_deterministic).collect()
    }
}

fn consistent<V: Name>(a: &Model<V>, b: &Model<V>) -> bool {
    b.iter().all(|(k, v)| match a.get(k) {
        Some(existing) => existing == v,
        None => true,
    })
}

fn model_count_ddnnf<V: Name>(n: &Nnf<V>) -> Integer {
    if n.as_var().is_some() {
        return Integer::from(1);
    }
    let children = n.children().expect("internal node has children");
    if n.is_and() {
        children
            .iter()
            .fold(Integer::from(1), |acc, c| acc * model_count_ddnnf(c))
    } else {
        children
            .iter()
            .fold(Integer::from(0), |acc, c| acc + model_count_ddnnf(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Nnf<String> {
        Nnf::var(name.to_string())
    }

    #[test]
    fn test_models_fig1a() {
        let a = v("a");
        let b = v("b");
        let fig1a = (!a.clone() & b.clone()) | (a.clone() & !b.clone());
        assert_eq!(2, models(&fig1a).len());
        assert_eq!(Integer::from(2), model_count(&fig1a));
    }

    #[test]
    fn test_model_count_matches_brute_force() {
        let a = v("a");
        let b = v("b");
        let c = v("c");
        let n = (a.clone() | b.clone()) & (!a.clone() | c.clone());
        assert_eq!(Integer::from(models_brute(&n).len()), model_count(&n));
    }

    /// `a | (~a & b)`: decomposable and deterministic but not smooth (its
    /// `a` branch says nothing about `b`). The true model count over
    /// `{a, b}` is 3 (`a=T,b=T`; `a=T,b=F`; `a=F,b=T`); folding the raw,
    /// unsmoothed structure would give 1 + 1 = 2.
    #[test]
    fn test_model_count_non_smooth_ddnnf() {
        let a = v("a");
        let b = v("b");
        let n = a.clone() | (!a.clone() & b.clone());
        assert!(n.decomposable());
        assert!(n.deterministic());
        assert!(!n.smooth());
        assert_eq!(Integer::from(3), model_count(&n));
        assert_eq!(3, models(&n).len());
    }

    /// Same formula: `models` must return total assignments over `{a, b}`,
    /// not the partial ones the deterministic recursion sees at each node.
    #[test]
    fn test_models_deterministic_extends_to_full_var_set() {
        let a = v("a");
        let b = v("b");
        let n = a.clone() | (!a.clone() & b.clone());
        let ms = models(&n);
        assert_eq!(3, ms.len());
        for m in &ms {
            assert_eq!(2, m.len(), "every model must assign both a and b: {m:?}");
        }
    }

    #[test]
    fn test_true_false_model_counts() {
        assert_eq!(Integer::from(1), model_count(&Nnf::<String>::r#true()));
        assert_eq!(Integer::from(0), model_count(&Nnf::<String>::r#false()));
    }
}
