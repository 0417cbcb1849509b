//! Milestone dependency graph checks.
//!
//! Edges are `(milestone_id, depends_on_id)` pairs: the first milestone waits
//! on the second. Links are only allowed within one project, never to self,
//! and never in a way that closes a cycle.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::DbId;

/// Validate the complete dependency set requested for a milestone.
///
/// - `milestone_id` is `None` for a milestone that does not exist yet.
/// - `project_milestone_ids` holds every milestone id in the same project.
/// - `edges` holds the project's current dependency links. Outgoing links of
///   `milestone_id` are ignored because the requested set replaces them.
///
/// Returns the de-duplicated ids in ascending order.
pub fn validate_dependencies(
    milestone_id: Option<DbId>,
    requested: &[DbId],
    project_milestone_ids: &HashSet<DbId>,
    edges: &[(DbId, DbId)],
) -> Result<Vec<DbId>, String> {
    let requested: BTreeSet<DbId> = requested.iter().copied().collect();

    for &dep in &requested {
        if Some(dep) == milestone_id {
            return Err("A milestone cannot depend on itself".to_string());
        }
        if !project_milestone_ids.contains(&dep) {
            return Err(format!(
                "Milestone {dep} does not belong to this project"
            ));
        }
    }

    if let Some(id) = milestone_id {
        let graph = adjacency(edges, id);
        for &dep in &requested {
            if reaches(&graph, dep, id) {
                return Err(format!(
                    "Depending on milestone {dep} would create a dependency cycle"
                ));
            }
        }
    }

    Ok(requested.into_iter().collect())
}

/// Build an adjacency map from `edges`, skipping the outgoing edges of `replaced`.
fn adjacency(edges: &[(DbId, DbId)], replaced: DbId) -> HashMap<DbId, Vec<DbId>> {
    let mut graph: HashMap<DbId, Vec<DbId>> = HashMap::new();
    for &(from, to) in edges {
        if from != replaced {
            graph.entry(from).or_default().push(to);
        }
    }
    graph
}

/// Iterative DFS: is `target` reachable from `start`?
fn reaches(graph: &HashMap<DbId, Vec<DbId>>, start: DbId, target: DbId) -> bool {
    let mut stack = vec![start];
    let mut seen = HashSet::new();
    while let Some(node) = stack.pop() {
        if node == target {
            return true;
        }
        if !seen.insert(node) {
            continue;
        }
        if let Some(next) = graph.get(&node) {
            stack.extend(next.iter().copied());
        }
    }
    false
}

/// Find edges whose endpoints belong to different projects.
///
/// `project_of` maps milestone id to project id. Used by diagnostics.
pub fn cross_project_edges(
    edges: &[(DbId, DbId)],
    project_of: &HashMap<DbId, DbId>,
) -> Vec<(DbId, DbId)> {
    edges
        .iter()
        .copied()
        .filter(|(from, to)| project_of.get(from) != project_of.get(to))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[DbId]) -> HashSet<DbId> {
        v.iter().copied().collect()
    }

    #[test]
    fn new_milestone_dedupes_and_sorts() {
        let res = validate_dependencies(None, &[3, 1, 3], &ids(&[1, 2, 3]), &[]).unwrap();
        assert_eq!(res, vec![1, 3]);
    }

    #[test]
    fn empty_request_is_fine() {
        assert!(validate_dependencies(Some(1), &[], &ids(&[1]), &[(1, 2)])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn self_dependency_rejected() {
        let err = validate_dependencies(Some(2), &[2], &ids(&[1, 2]), &[]).unwrap_err();
        assert!(err.contains("itself"));
    }

    #[test]
    fn foreign_milestone_rejected() {
        let err = validate_dependencies(Some(1), &[99], &ids(&[1, 2]), &[]).unwrap_err();
        assert!(err.contains("does not belong"));
    }

    #[test]
    fn direct_cycle_rejected() {
        // 2 depends on 1; making 1 depend on 2 closes the loop.
        let err = validate_dependencies(Some(1), &[2], &ids(&[1, 2]), &[(2, 1)]).unwrap_err();
        assert!(err.contains("cycle"));
    }

    #[test]
    fn transitive_cycle_rejected() {
        // 3 -> 2 -> 1; making 1 depend on 3 closes the loop.
        let edges = [(3, 2), (2, 1)];
        assert!(validate_dependencies(Some(1), &[3], &ids(&[1, 2, 3]), &edges).is_err());
    }

    #[test]
    fn replacing_own_edges_is_not_a_cycle() {
        // 1 currently depends on 2. Re-submitting the same set must pass.
        let edges = [(1, 2)];
        assert_eq!(
            validate_dependencies(Some(1), &[2], &ids(&[1, 2]), &edges).unwrap(),
            vec![2]
        );
    }

    #[test]
    fn diamond_is_allowed() {
        // 4 -> {2, 3}, 2 -> 1, 3 -> 1
        let edges = [(2, 1), (3, 1)];
        assert!(validate_dependencies(Some(4), &[2, 3], &ids(&[1, 2, 3, 4]), &edges).is_ok());
    }

    #[test]
    fn cross_project_edges_detected() {
        let project_of: HashMap<DbId, DbId> = [(1, 10), (2, 10), (3, 20)].into_iter().collect();
        let edges = [(1, 2), (2, 3)];
        assert_eq!(cross_project_edges(&edges, &project_of), vec![(2, 3)]);
    }
}
