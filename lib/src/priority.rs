//! Priority ranking: the longest path of worst-case core times from each
//! task to any exit. Drives the order of the initial scheduling walk.
use crate::graph_extension::{GraphExtension, TaskGraph};
use std::collections::BTreeMap;

/// Priority of each task: `max(exec_times) + max(priority of successors)`,
/// computed by one walk over the reverse topological order.
pub fn compute_priorities(dag: &TaskGraph) -> BTreeMap<i32, i32> {
    let mut priorities: BTreeMap<i32, i32> = BTreeMap::new();
    for &node_i in dag.topological_sort_by_id().iter().rev() {
        let best_successor = dag
            .get_suc_nodes(node_i)
            .iter()
            .map(|&suc_i| priorities[&dag[suc_i].id])
            .max()
            .unwrap_or(0);
        priorities.insert(dag[node_i].id, dag[node_i].max_exec_time() + best_successor);
    }
    priorities
}

/// Task ids ordered by descending priority, ascending id on ties. Since a
/// task's priority strictly exceeds every successor's, this order is also
/// topological.
pub fn compute_priority_order(dag: &TaskGraph) -> Vec<i32> {
    let priorities = compute_priorities(dag);
    let mut order: Vec<i32> = priorities.keys().copied().collect();
    order.sort_by(|a, b| priorities[b].cmp(&priorities[a]).then(a.cmp(b)));
    order
}
