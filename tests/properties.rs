//! Property-based tests encoding the universal invariants of spec.md §8,
//! exercised over randomly generated small sentences rather than the fixed
//! seed scenarios (see `tests/seed_scenarios.rs`).

use std::collections::BTreeSet;

use nnf::{Model, Nnf};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rug::Integer;

const VARS: [&str; 3] = ["a", "b", "c"];

#[derive(Clone, Debug)]
struct ArbNnf(Nnf<String>);

impl Arbitrary for ArbNnf {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbNnf(gen_nnf(g, 3))
    }
}

fn gen_nnf(g: &mut Gen, depth: u32) -> Nnf<String> {
    if depth == 0 || bool::arbitrary(g) {
        let name = *g.choose(&VARS).unwrap();
        Nnf::var_with_polarity(name.to_string(), bool::arbitrary(g))
    } else {
        let n_children = 1 + (u8::arbitrary(g) % 3) as usize;
        let children: Vec<_> = (0..n_children).map(|_| gen_nnf(g, depth - 1)).collect();
        if bool::arbitrary(g) {
            Nnf::and_of(children)
        } else {
            Nnf::or_of(children)
        }
    }
}

fn model_set(models: Vec<Model<String>>) -> BTreeSet<Vec<(String, bool)>> {
    models
        .into_iter()
        .map(|m| {
            let mut entries: Vec<_> = m.into_iter().collect();
            entries.sort();
            entries
        })
        .collect()
}

#[quickcheck]
fn prop_simplify_idempotent(n: ArbNnf) -> bool {
    let once = n.0.simplify(true);
    once == once.simplify(true)
}

#[quickcheck]
fn prop_simplify_preserves_models(n: ArbNnf) -> bool {
    let simplified = n.0.simplify(true);
    model_set(nnf::models(&n.0)) == model_set(nnf::models(&simplified))
}

#[quickcheck]
fn prop_walk_is_unique_and_bounded(n: ArbNnf) -> bool {
    let walked = n.0.walk();
    let unique: std::collections::HashSet<_> = walked.iter().cloned().collect();
    walked.len() == unique.len() && walked.len() <= n.0.size() + 1
}

#[quickcheck]
fn prop_make_smooth_idempotent(n: ArbNnf) -> bool {
    let once = n.0.make_smooth();
    once == once.make_smooth()
}

#[quickcheck]
fn prop_make_smooth_preserves_models(n: ArbNnf) -> bool {
    let smoothed = n.0.make_smooth();
    model_set(nnf::models(&n.0)) == model_set(nnf::models(&smoothed))
}

#[quickcheck]
fn prop_model_count_matches_model_list_length(n: ArbNnf) -> bool {
    nnf::model_count(&n.0) == Integer::from(nnf::models(&n.0).len())
}

#[quickcheck]
fn prop_false_contradicts_everything(n: ArbNnf) -> bool {
    nnf::contradicts(&Nnf::r#false(), &n.0)
}

#[quickcheck]
fn prop_equivalent_to_self_or_false(n: ArbNnf) -> bool {
    nnf::equivalent(&n.0, &(n.0.clone() | Nnf::r#false()))
}

#[quickcheck]
fn prop_negate_is_complement_of_valid(n: ArbNnf) -> bool {
    nnf::valid(&n.0) == !nnf::satisfiable(&n.0.negate())
}

#[quickcheck]
fn prop_double_negate_is_equivalent(n: ArbNnf) -> bool {
    nnf::equivalent(&n.0, &n.0.negate().negate())
}
