//! Build a task graph from an edge list or a yaml file
use crate::graph_extension::{TaskData, TaskGraph, NUM_CORES};
use crate::util::load_yaml;

use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("task graph contains a cycle")]
    Cycle,
    #[error("edge references unknown task id {0}")]
    UnknownTask(i32),
    #[error("task {0} has no complete execution time row")]
    MissingExecTime(i32),
    #[error("core index {0} is out of range (expected 1..=3)")]
    CoreOutOfRange(i64),
}

/// Build a validated task graph from an execution-time table and an edge
/// list. Repeated edges collapse to one; any edge endpoint without a table
/// row is rejected, as is a cyclic precedence relation.
pub fn create_dag(tasks: &[TaskData], edges: &[(i32, i32)]) -> Result<TaskGraph, GraphError> {
    let mut dag = TaskGraph::new();
    let mut index_of: BTreeMap<i32, NodeIndex> = BTreeMap::new();

    for task in tasks {
        index_of.insert(task.id, dag.add_node(task.clone()));
    }

    for &(src_id, dst_id) in edges {
        let src_i = *index_of.get(&src_id).ok_or(GraphError::UnknownTask(src_id))?;
        let dst_i = *index_of.get(&dst_id).ok_or(GraphError::UnknownTask(dst_id))?;
        dag.update_edge(src_i, dst_i, ());
    }

    toposort(&dag, None).map_err(|_| GraphError::Cycle)?;
    Ok(dag)
}

/// load yaml file and return a task graph (petgraph)
///
/// # Arguments
///
/// *  `file_path` - yaml file path
///
/// # Returns
///
/// *  `dag` - task graph, or a `GraphError` for ill-formed input
///
/// # Example
///
/// ```
/// use lib::dag_creator::create_dag_from_yaml;
///
/// let dag = create_dag_from_yaml("tests/sample_dags/mcc_10_tasks.yaml").unwrap();
/// assert_eq!(dag.node_count(), 10);
/// assert_eq!(dag.edge_count(), 15);
/// ```
pub fn create_dag_from_yaml(file_path: &str) -> Result<TaskGraph, GraphError> {
    let yaml_docs = load_yaml(file_path);
    let yaml_doc = &yaml_docs[0];

    let (nodes, links) = match (yaml_doc["nodes"].as_vec(), yaml_doc["links"].as_vec()) {
        (Some(nodes), Some(links)) => (nodes, links),
        _ => panic!("YAML file is not a task graph structure: {}", file_path),
    };

    let mut tasks = Vec::with_capacity(nodes.len());
    for node in nodes {
        let id = node["id"].as_i64().expect("node id is required") as i32;
        let exec_row = node["execution_times"]
            .as_vec()
            .ok_or(GraphError::MissingExecTime(id))?;
        if exec_row.len() != NUM_CORES {
            return Err(GraphError::MissingExecTime(id));
        }
        let mut exec_times = [0; NUM_CORES];
        for (core_i, value) in exec_row.iter().enumerate() {
            exec_times[core_i] = value.as_i64().ok_or(GraphError::MissingExecTime(id))? as i32;
        }
        tasks.push(TaskData::new(id, exec_times));
    }

    let mut edges = Vec::with_capacity(links.len());
    for link in links {
        let source = link["source"].as_i64().expect("link source is required") as i32;
        let target = link["target"].as_i64().expect("link target is required") as i32;
        edges.push((source, target));
    }

    create_dag(&tasks, &edges)
}
