//! DSHARP d-DNNF codec (spec.md §4.9): the wire format produced by the
//! DSHARP/c2d family of knowledge compilers. Variable names are `i64`,
//! matching `io::dimacs`.
//!
//! ```text
//! nnf <node count> <edge count> <var count>
//! L <literal>
//! A <child count> <child index>...
//! O <decomposition var> <child count> <child index>...
//! ```
//!
//! Nodes are declared in dependency order — a node's children always refer
//! to strictly earlier lines by their 0-based position — and the root is
//! whichever node is declared last.

use crate::core::Nnf;
use crate::error::{NnfError, Result};

type V = i64;

fn parse_error(line: usize, message: impl Into<String>) -> NnfError {
    NnfError::ParseError {
        line,
        message: message.into(),
    }
}

/// Parses a DSHARP `nnf` instance into its root node.
pub fn load(input: &str) -> Result<Nnf<V>> {
    let mut lines = input.lines().enumerate();
    let (header_lineno, header_line) = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing header line"))?;
    let header_lineno = header_lineno + 1;

    let mut header_words = header_line.split_whitespace();
    if header_words.next() != Some("nnf") {
        return Err(parse_error(header_lineno, "expected \"nnf\" header"));
    }
    let n_nodes = header_words
        .next()
        .ok_or_else(|| parse_error(header_lineno, "missing node count"))?
        .parse::<usize>()
        .map_err(|_| parse_error(header_lineno, "node count is not an integer"))?;
    header_words
        .next()
        .ok_or_else(|| parse_error(header_lineno, "missing edge count"))?
        .parse::<usize>()
        .map_err(|_| parse_error(header_lineno, "edge count is not an integer"))?;
    header_words
        .next()
        .ok_or_else(|| parse_error(header_lineno, "missing variable count"))?
        .parse::<usize>()
        .map_err(|_| parse_error(header_lineno, "variable count is not an integer"))?;

    let mut nodes: Vec<Nnf<V>> = Vec::with_capacity(n_nodes);
    for (index, raw_line) in lines {
        let lineno = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let mut words = line.split_whitespace();
        let kind = words
            .next()
            .ok_or_else(|| parse_error(lineno, "empty node line"))?;
        let node = match kind {
            "L" => {
                let lit = words
                    .next()
                    .ok_or_else(|| parse_error(lineno, "missing literal"))?
                    .parse::<i64>()
                    .map_err(|_| parse_error(lineno, "literal is not an integer"))?;
                if lit == 0 {
                    return Err(parse_error(lineno, "literal must not be 0"));
                }
                check_no_more(&mut words, lineno)?;
                Nnf::var_with_polarity(lit.abs(), lit > 0)
            }
            "A" => {
                let count = parse_count(&mut words, lineno)?;
                let children = parse_children(&mut words, &nodes, lineno, count)?;
                Nnf::and_of(children)
            }
            "O" => {
                words
                    .next()
                    .ok_or_else(|| parse_error(lineno, "missing decomposition variable"))?
                    .parse::<i64>()
                    .map_err(|_| parse_error(lineno, "decomposition variable is not an integer"))?;
                let count = parse_count(&mut words, lineno)?;
                let children = parse_children(&mut words, &nodes, lineno, count)?;
                Nnf::or_of(children)
            }
            other => return Err(parse_error(lineno, format!("unexpected node kind \"{other}\""))),
        };
        nodes.push(node);
    }

    if nodes.len() != n_nodes {
        return Err(parse_error(
            0,
            format!("header declared {n_nodes} nodes, found {}", nodes.len()),
        ));
    }
    nodes
        .into_iter()
        .last()
        .ok_or_else(|| parse_error(0, "formula is empty"))
}

fn parse_count(words: &mut std::str::SplitWhitespace, lineno: usize) -> Result<usize> {
    words
        .next()
        .ok_or_else(|| parse_error(lineno, "missing child count"))?
        .parse::<usize>()
        .map_err(|_| parse_error(lineno, "child count is not an integer"))
}

fn parse_children(
    words: &mut std::str::SplitWhitespace,
    nodes: &[Nnf<V>],
    lineno: usize,
    count: usize,
) -> Result<Vec<Nnf<V>>> {
    let mut children = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = words
            .next()
            .ok_or_else(|| parse_error(lineno, "missing child index"))?
            .parse::<usize>()
            .map_err(|_| parse_error(lineno, "child index is not an integer"))?;
        let child = nodes
            .get(idx)
            .cloned()
            .ok_or_else(|| parse_error(lineno, format!("child index {idx} out of range")))?;
        children.push(child);
    }
    check_no_more(words, lineno)?;
    Ok(children)
}

fn check_no_more(words: &mut std::str::SplitWhitespace, lineno: usize) -> Result<()> {
    if words.next().is_some() {
        return Err(parse_error(lineno, "unexpected trailing content"));
    }
    Ok(())
}

/// Every distinct node reachable from `n`, each listed only after all of
/// its own children — the dependency order the DSHARP format requires, as
/// opposed to `Nnf::walk`'s unspecified order (root first in practice).
fn post_order(n: &Nnf<V>) -> Vec<Nnf<V>> {
    let mut seen = std::collections::HashSet::new();
    let mut order = Vec::new();
    post_order_visit(n, &mut seen, &mut order);
    order
}

fn post_order_visit(n: &Nnf<V>, seen: &mut std::collections::HashSet<Nnf<V>>, order: &mut Vec<Nnf<V>>) {
    if !seen.insert(n.clone()) {
        return;
    }
    if let Some(children) = n.children() {
        for c in children {
            post_order_visit(c, seen, order);
        }
    }
    order.push(n.clone());
}

/// Serializes `n` as a DSHARP `nnf` instance. `n` need not be decomposable
/// or deterministic — the format just records the DAG shape — but every
/// node must be a `Var`, `And` or `Or`, which holds for any `Nnf`.
pub fn dumps(n: &Nnf<V>) -> String {
    let order = post_order(n);
    let mut index_of = std::collections::HashMap::with_capacity(order.len());
    for (i, node) in order.iter().enumerate() {
        index_of.insert(node.clone(), i);
    }
    let n_vars = n.vars().len();
    let n_edges: usize = order
        .iter()
        .map(|node| node.children().map_or(0, |c| c.len()))
        .sum();

    let mut out = format!("nnf {} {n_edges} {n_vars}\n", order.len());
    for node in &order {
        if let Some((name, polarity)) = node.as_var() {
            let lit = if polarity { *name } else { -*name };
            out.push_str(&format!("L {lit}\n"));
        } else {
            let tag = if node.is_and() { 'A' } else { 'O' };
            let children = node.children().expect("internal node has children");
            let indices: Vec<String> = children
                .iter()
                .map(|c| index_of[c].to_string())
                .collect();
            if tag == 'O' {
                out.push_str(&format!("O 0 {} {}\n", children.len(), indices.join(" ")));
            } else {
                out.push_str(&format!("A {} {}\n", children.len(), indices.join(" ")));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_basic_ddnnf() {
        // (1 & 2) | (~1 & ~2), four leaves, two ands, one or.
        let instance = "nnf 7 6 2\nL 1\nL 2\nA 2 0 1\nL -1\nL -2\nA 2 3 4\nO 0 2 2 5\n";
        let n = load(instance).unwrap();
        assert!(n.decomposable());
        assert!(n.deterministic());
        assert_eq!(2, n.vars().len());
    }

    #[test]
    fn test_load_rejects_bad_kind() {
        let err = load("nnf 1 0 0\nX 0\n").unwrap_err();
        assert!(matches!(err, NnfError::ParseError { .. }));
    }

    #[test]
    fn test_load_rejects_bad_child_index() {
        let err = load("nnf 1 1 0\nA 1 5\n").unwrap_err();
        assert!(matches!(err, NnfError::ParseError { .. }));
    }

    #[test]
    fn test_dumps_roundtrip_models() {
        let a = Nnf::var(1i64);
        let b = Nnf::var(2i64);
        let n = ((!a.clone() & b.clone()) | (a.clone() & !b.clone())).make_smooth();
        let dumped = dumps(&n);
        let reloaded = load(&dumped).unwrap();
        assert!(crate::algorithms::equivalent(&n, &reloaded));
    }

    #[test]
    fn test_empty_instance() {
        assert!(load("nnf 0 0 0\n").is_err());
    }
}
