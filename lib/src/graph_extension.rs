//! Task graph node type and DAG accessors (petgraph)
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Direction::{Incoming, Outgoing};
use std::collections::BTreeSet;

/// Number of local cores on the platform.
pub const NUM_CORES: usize = 3;

/// Node payload of the task graph: a task id and its execution time on each
/// local core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    pub id: i32,
    pub exec_times: [i32; NUM_CORES],
}

impl TaskData {
    pub fn new(id: i32, exec_times: [i32; NUM_CORES]) -> TaskData {
        TaskData { id, exec_times }
    }

    /// Worst execution time across the three cores, the weight used by the
    /// priority ranking.
    pub fn max_exec_time(&self) -> i32 {
        *self.exec_times.iter().max().unwrap()
    }
}

/// The task graph: nodes carry `TaskData`, edges are pure precedence.
pub type TaskGraph = Graph<TaskData, ()>;

pub trait GraphExtension {
    fn get_pre_nodes(&self, node_i: NodeIndex) -> Vec<NodeIndex>;
    fn get_suc_nodes(&self, node_i: NodeIndex) -> Vec<NodeIndex>;
    fn get_source_nodes(&self) -> Vec<NodeIndex>;
    fn get_sink_nodes(&self) -> Vec<NodeIndex>;
    fn get_node_by_task_id(&self, task_id: i32) -> Option<NodeIndex>;
    fn topological_sort_by_id(&self) -> Vec<NodeIndex>;
}

impl GraphExtension for TaskGraph {
    fn get_pre_nodes(&self, node_i: NodeIndex) -> Vec<NodeIndex> {
        let mut pre_nodes: Vec<NodeIndex> = self.neighbors_directed(node_i, Incoming).collect();
        pre_nodes.sort_by_key(|&pre_i| self[pre_i].id);
        pre_nodes
    }

    fn get_suc_nodes(&self, node_i: NodeIndex) -> Vec<NodeIndex> {
        let mut suc_nodes: Vec<NodeIndex> = self.neighbors_directed(node_i, Outgoing).collect();
        suc_nodes.sort_by_key(|&suc_i| self[suc_i].id);
        suc_nodes
    }

    fn get_source_nodes(&self) -> Vec<NodeIndex> {
        self.node_indices()
            .filter(|&i| self.edges_directed(i, Incoming).next().is_none())
            .collect()
    }

    fn get_sink_nodes(&self) -> Vec<NodeIndex> {
        self.node_indices()
            .filter(|&i| self.edges_directed(i, Outgoing).next().is_none())
            .collect()
    }

    fn get_node_by_task_id(&self, task_id: i32) -> Option<NodeIndex> {
        self.node_indices().find(|&i| self[i].id == task_id)
    }

    /// Topological order with ties resolved by ascending task id (Kahn's
    /// algorithm over an ordered ready set). Identical graphs always yield
    /// the identical order, which pins down the timeline builder's output.
    fn topological_sort_by_id(&self) -> Vec<NodeIndex> {
        let mut in_degrees: Vec<usize> = self
            .node_indices()
            .map(|i| self.edges_directed(i, Incoming).count())
            .collect();
        let mut ready: BTreeSet<(i32, NodeIndex)> = self
            .node_indices()
            .filter(|&i| in_degrees[i.index()] == 0)
            .map(|i| (self[i].id, i))
            .collect();
        let mut order = Vec::with_capacity(self.node_count());

        while let Some(&(id, node_i)) = ready.iter().next() {
            ready.remove(&(id, node_i));
            order.push(node_i);
            for suc_i in self.get_suc_nodes(node_i) {
                in_degrees[suc_i.index()] -= 1;
                if in_degrees[suc_i.index()] == 0 {
                    ready.insert((self[suc_i].id, suc_i));
                }
            }
        }

        debug_assert_eq!(order.len(), self.node_count());
        order
    }
}
