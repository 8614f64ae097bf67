//! Timeline builder: derive a full schedule from a location assignment.
//!
//! One pass in deterministic topological order with four cursors (three core
//! release times and the wireless-send release time). Total for any complete
//! assignment; the only failure is an assignment that does not cover the
//! graph.
use crate::graph_extension::{GraphExtension, TaskGraph, NUM_CORES};
use crate::platform::Platform;
use crate::schedule::{
    Assignment, CloudTiming, InternalError, Location, Schedule, ScheduleError, TaskSchedule,
};
use std::collections::BTreeMap;

pub fn rebuild_timeline(
    dag: &TaskGraph,
    assignment: &Assignment,
    platform: &Platform,
) -> Result<Schedule, ScheduleError> {
    let mut core_next_free = [0; NUM_CORES];
    let mut send_next_free = 0;
    let mut tasks: BTreeMap<i32, TaskSchedule> = BTreeMap::new();

    for node_i in dag.topological_sort_by_id() {
        let task = &dag[node_i];
        let ready_time = dag
            .get_pre_nodes(node_i)
            .iter()
            .map(|&pre_i| tasks[&dag[pre_i].id].effective_available())
            .max()
            .unwrap_or(0);
        let location = *assignment
            .get(&task.id)
            .ok_or(ScheduleError::Infeasible(task.id))?;

        let entry = match location {
            Location::Core(core) => {
                let start_time = ready_time.max(core_next_free[core - 1]);
                let finish_time = start_time + task.exec_times[core - 1];
                core_next_free[core - 1] = finish_time;
                TaskSchedule {
                    id: task.id,
                    location,
                    ready_time,
                    start_time,
                    finish_time,
                    cloud: None,
                }
            }
            Location::Cloud => {
                let send_start = ready_time.max(send_next_free);
                let cloud_start = send_start + platform.t_send();
                let cloud_finish = cloud_start + platform.t_cloud();
                let receive_finish = cloud_finish + platform.t_receive();
                send_next_free = send_start + platform.t_send();
                TaskSchedule {
                    id: task.id,
                    location,
                    ready_time,
                    start_time: send_start,
                    finish_time: receive_finish,
                    cloud: Some(CloudTiming {
                        send_start,
                        cloud_start,
                        cloud_finish,
                        receive_finish,
                    }),
                }
            }
        };
        tasks.insert(task.id, entry);
    }

    let schedule = Schedule { tasks };
    #[cfg(debug_assertions)]
    if let Err(violation) = verify_timeline(dag, &schedule, platform) {
        panic!("{}", violation);
    }
    Ok(schedule)
}

/// Check the structural invariants of a built timeline: precedence,
/// per-core serialization, wireless-send serialization, and the duration
/// equations. A violation is an implementation bug, not bad input.
pub fn verify_timeline(
    dag: &TaskGraph,
    schedule: &Schedule,
    platform: &Platform,
) -> Result<(), InternalError> {
    // precedence
    for node_i in dag.node_indices() {
        let task = &schedule.tasks[&dag[node_i].id];
        for pre_i in dag.get_pre_nodes(node_i) {
            let pre = &schedule.tasks[&dag[pre_i].id];
            if task.ready_time < pre.effective_available() {
                return Err(InternalError::InvariantViolation(format!(
                    "task {} ready at {} before predecessor {} is available at {}",
                    task.id,
                    task.ready_time,
                    pre.id,
                    pre.effective_available()
                )));
            }
        }
    }

    // per-core serialization and duration
    for core in 1..=NUM_CORES {
        let mut intervals: Vec<&TaskSchedule> = schedule
            .tasks
            .values()
            .filter(|task| task.location == Location::Core(core))
            .collect();
        intervals.sort_by_key(|task| task.start_time);
        for pair in intervals.windows(2) {
            if pair[1].start_time < pair[0].finish_time {
                return Err(InternalError::InvariantViolation(format!(
                    "tasks {} and {} overlap on core {}",
                    pair[0].id, pair[1].id, core
                )));
            }
        }
        for task in &intervals {
            let node_i = dag.get_node_by_task_id(task.id).unwrap();
            if task.finish_time != task.start_time + dag[node_i].exec_times[core - 1] {
                return Err(InternalError::InvariantViolation(format!(
                    "task {} duration inconsistent on core {}",
                    task.id, core
                )));
            }
        }
    }

    // wireless-send serialization and cloud duration
    let mut uploads: Vec<&TaskSchedule> = schedule
        .tasks
        .values()
        .filter(|task| task.location == Location::Cloud)
        .collect();
    uploads.sort_by_key(|task| task.start_time);
    for pair in uploads.windows(2) {
        if pair[1].start_time < pair[0].start_time + platform.t_send() {
            return Err(InternalError::InvariantViolation(format!(
                "uploads of tasks {} and {} overlap on the wireless channel",
                pair[0].id, pair[1].id
            )));
        }
    }
    for task in &uploads {
        if task.finish_time != task.start_time + platform.cloud_round_trip() {
            return Err(InternalError::InvariantViolation(format!(
                "task {} cloud duration inconsistent",
                task.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag_creator::create_dag;
    use crate::graph_extension::TaskData;

    fn canonical_platform(deadline: i32) -> Platform {
        Platform::new([1.0, 2.0, 4.0], 0.5, 3, 1, 1, deadline)
    }

    fn all_cloud(dag: &TaskGraph) -> Assignment {
        dag.node_indices()
            .map(|node_i| (dag[node_i].id, Location::Cloud))
            .collect()
    }

    #[test]
    fn test_rebuild_timeline_serializes_uploads() {
        // Two independent tasks both sent to the cloud share the single
        // wireless channel: the second upload waits out the first.
        let dag = create_dag(
            &[TaskData::new(1, [50, 50, 50]), TaskData::new(2, [50, 50, 50])],
            &[],
        )
        .unwrap();
        let platform = canonical_platform(100);

        let schedule = rebuild_timeline(&dag, &all_cloud(&dag), &platform).unwrap();
        let first = &schedule.tasks[&1];
        let second = &schedule.tasks[&2];
        assert_eq!(first.start_time, 0);
        assert_eq!(first.finish_time, 5);
        assert_eq!(second.start_time, 3);
        assert_eq!(second.cloud.unwrap().cloud_start, 6);
        assert_eq!(second.finish_time, 2 * 3 + 1 + 1);
    }

    #[test]
    fn test_rebuild_timeline_cloud_predecessor_releases_at_upload_finish() {
        // Successor of a cloud task becomes ready at the parent's
        // cloud_start, not its receive_finish.
        let dag = create_dag(
            &[TaskData::new(1, [50, 50, 50]), TaskData::new(2, [4, 3, 2])],
            &[(1, 2)],
        )
        .unwrap();
        let platform = canonical_platform(100);

        let mut assignment = Assignment::new();
        assignment.insert(1, Location::Cloud);
        assignment.insert(2, Location::Core(3));
        let schedule = rebuild_timeline(&dag, &assignment, &platform).unwrap();
        assert_eq!(schedule.tasks[&2].ready_time, 3);
        assert_eq!(schedule.tasks[&2].start_time, 3);
        assert_eq!(schedule.tasks[&2].finish_time, 5);
    }

    #[test]
    fn test_rebuild_timeline_core_serialization() {
        let dag = create_dag(
            &[TaskData::new(1, [4, 9, 9]), TaskData::new(2, [5, 9, 9])],
            &[],
        )
        .unwrap();
        let platform = canonical_platform(100);

        let mut assignment = Assignment::new();
        assignment.insert(1, Location::Core(1));
        assignment.insert(2, Location::Core(1));
        let schedule = rebuild_timeline(&dag, &assignment, &platform).unwrap();
        assert_eq!(schedule.tasks[&1].start_time, 0);
        assert_eq!(schedule.tasks[&1].finish_time, 4);
        assert_eq!(schedule.tasks[&2].start_time, 4);
        assert_eq!(schedule.tasks[&2].finish_time, 9);
        assert!(verify_timeline(&dag, &schedule, &platform).is_ok());
    }

    #[test]
    fn test_rebuild_timeline_incomplete_assignment() {
        let dag = create_dag(
            &[TaskData::new(1, [1, 1, 1]), TaskData::new(2, [1, 1, 1])],
            &[(1, 2)],
        )
        .unwrap();
        let platform = canonical_platform(100);

        let mut assignment = Assignment::new();
        assignment.insert(1, Location::Core(1));
        assert_eq!(
            rebuild_timeline(&dag, &assignment, &platform).unwrap_err(),
            ScheduleError::Infeasible(2)
        );
    }

    #[test]
    fn test_rebuild_timeline_idempotent() {
        // Rebuilding from a built schedule's own assignment reproduces the
        // identical times.
        let dag = create_dag(
            &[
                TaskData::new(1, [9, 7, 5]),
                TaskData::new(2, [8, 6, 5]),
                TaskData::new(3, [6, 5, 4]),
                TaskData::new(4, [7, 5, 3]),
            ],
            &[(1, 2), (1, 3), (2, 4), (3, 4)],
        )
        .unwrap();
        let platform = canonical_platform(100);

        let mut assignment = Assignment::new();
        assignment.insert(1, Location::Core(3));
        assignment.insert(2, Location::Cloud);
        assignment.insert(3, Location::Core(2));
        assignment.insert(4, Location::Core(3));

        let first = rebuild_timeline(&dag, &assignment, &platform).unwrap();
        let second = rebuild_timeline(&dag, &first.assignment(), &platform).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_timeline_detects_core_overlap() {
        let dag = create_dag(
            &[TaskData::new(1, [4, 9, 9]), TaskData::new(2, [5, 9, 9])],
            &[],
        )
        .unwrap();
        let platform = canonical_platform(100);

        let mut assignment = Assignment::new();
        assignment.insert(1, Location::Core(1));
        assignment.insert(2, Location::Core(1));
        let mut schedule = rebuild_timeline(&dag, &assignment, &platform).unwrap();

        // Force task 2 back onto task 1's interval.
        let broken = schedule.tasks.get_mut(&2).unwrap();
        broken.start_time = 2;
        broken.finish_time = 7;
        assert!(matches!(
            verify_timeline(&dag, &schedule, &platform),
            Err(InternalError::InvariantViolation(_))
        ));
    }
}
