//! Property-based tests for edit path resolution.
//!
//! These tests use proptest to verify path invariants hold across
//! randomly generated sequence hierarchies.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use shotpath::core::edits::{Edit, EditIndex};
use shotpath::core::resolve::{enumerate_paths, resolve};
use shotpath::core::types::NodeId;

fn node(i: usize) -> NodeId {
    NodeId::new(format!("/Game/Cine/S{i:02}.S{i:02}")).unwrap()
}

/// Strategy for generating acyclic edit graphs.
///
/// Returns `(child, parents)` lists where each sequence is edited into a
/// subset of the sequences created before it. Sequence 0 is always a root.
fn dag_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..10).prop_flat_map(|count| {
        let parent_sets: Vec<BoxedStrategy<Vec<usize>>> = (0..count)
            .map(|i| {
                let earlier: Vec<usize> = (0..i).collect();
                let max = earlier.len().min(3);
                prop::sample::subsequence(earlier, 0..=max).boxed()
            })
            .collect();
        parent_sets
    })
}

fn build_index(parents: &[Vec<usize>]) -> EditIndex {
    let mut index = EditIndex::new();
    for (child, ps) in parents.iter().enumerate() {
        index.record(node(child));
        for &p in ps {
            index.push(node(child), Edit::to(node(p)));
        }
    }
    index
}

/// Number of root paths from each node, counted bottom-up.
fn path_counts(parents: &[Vec<usize>]) -> Vec<usize> {
    let mut counts = vec![0; parents.len()];
    for (i, ps) in parents.iter().enumerate() {
        counts[i] = if ps.is_empty() {
            1
        } else {
            ps.iter().map(|&p| counts[p]).sum()
        };
    }
    counts
}

proptest! {
    /// Every path starts at the queried node and ends at a root.
    #[test]
    fn paths_run_from_leaf_to_root(parents in dag_strategy()) {
        let index = build_index(&parents);
        for i in 0..parents.len() {
            let start = node(i);
            for path in enumerate_paths(&index, &start) {
                prop_assert_eq!(path.leaf(), &start);
                prop_assert!(index.is_root(path.root()), "{} is not a root", path.root());
            }
        }
    }

    /// Consecutive nodes of a path are joined by an edit.
    #[test]
    fn paths_follow_edits(parents in dag_strategy()) {
        let index = build_index(&parents);
        for i in 0..parents.len() {
            for path in enumerate_paths(&index, &node(i)) {
                for pair in path.nodes().windows(2) {
                    prop_assert!(
                        index.edits(&pair[0]).iter().any(|e| e.parent == pair[1]),
                        "no edit from {} to {}",
                        pair[0],
                        pair[1]
                    );
                }
            }
        }
    }

    /// No path visits a node twice.
    #[test]
    fn paths_never_repeat_nodes(parents in dag_strategy()) {
        let index = build_index(&parents);
        for i in 0..parents.len() {
            for path in enumerate_paths(&index, &node(i)) {
                let unique: HashSet<_> = path.nodes().iter().collect();
                prop_assert_eq!(unique.len(), path.len());
            }
        }
    }

    /// Acyclic graphs yield one path per route and no cycle reports.
    #[test]
    fn acyclic_graphs_yield_every_route(parents in dag_strategy()) {
        let index = build_index(&parents);
        let counts = path_counts(&parents);
        for (i, expected) in counts.iter().enumerate() {
            let resolution = resolve(&index, &node(i));
            prop_assert!(resolution.cycles.is_empty());
            prop_assert_eq!(resolution.paths.len(), *expected);

            let distinct: HashSet<_> = resolution.paths.iter().collect();
            prop_assert_eq!(distinct.len(), resolution.paths.len());
        }
    }

    /// Resolving twice gives the same paths in the same order.
    #[test]
    fn resolution_is_deterministic(parents in dag_strategy()) {
        let index = build_index(&parents);
        for i in 0..parents.len() {
            prop_assert_eq!(resolve(&index, &node(i)), resolve(&index, &node(i)));
        }
    }

    /// Editing a root back into one of its descendants is reported as a
    /// cycle, and the surviving paths still never repeat a node.
    #[test]
    fn back_edges_are_pruned(parents in dag_strategy(), pick in any::<prop::sample::Index>()) {
        let start = pick.index(parents.len());
        let index = build_index(&parents);
        let paths = enumerate_paths(&index, &node(start));
        prop_assume!(paths.iter().any(|p| p.len() > 1));

        let root = paths.iter().find(|p| p.len() > 1).map(|p| p.root().clone()).unwrap();
        let mut cyclic = index.clone();
        cyclic.push(root.clone(), Edit::to(node(start)));

        let resolution = resolve(&cyclic, &node(start));
        prop_assert!(!resolution.cycles.is_empty());
        prop_assert!(resolution.cycles.iter().any(|c| c.child == root));
        for path in &resolution.paths {
            let unique: HashSet<_> = path.nodes().iter().collect();
            prop_assert_eq!(unique.len(), path.len());
            prop_assert!(cyclic.is_root(path.root()));
        }
    }
}

#[test]
fn diamond_yields_both_routes() {
    // S03 is edited into S01 and S02, both edited into S00.
    let parents = vec![vec![], vec![0], vec![0], vec![1, 2]];
    let index = build_index(&parents);
    let paths = enumerate_paths(&index, &node(3));

    let routes: Vec<Vec<NodeId>> = paths.iter().map(|p| p.nodes().to_vec()).collect();
    assert_eq!(
        routes,
        vec![
            vec![node(3), node(1), node(0)],
            vec![node(3), node(2), node(0)],
        ]
    );
}

#[test]
fn unknown_node_is_its_own_root() {
    let index = build_index(&[vec![]]);
    let stranger = NodeId::new("/Game/Elsewhere/X.X").unwrap();
    let paths = enumerate_paths(&index, &stranger);

    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[stranger]);
}

#[test]
fn sibling_branches_do_not_share_visits() {
    // S02 reaches S00 through S01 and directly; S00 is visited on both.
    let mut index = build_index(&[vec![], vec![0], vec![1]]);
    index.push(node(2), Edit::to(node(0)));

    let counts: HashMap<usize, usize> = enumerate_paths(&index, &node(2))
        .iter()
        .fold(HashMap::new(), |mut acc, p| {
            *acc.entry(p.len()).or_default() += 1;
            acc
        });
    assert_eq!(counts.get(&3), Some(&1));
    assert_eq!(counts.get(&2), Some(&1));
}
