//! Initial scheduling: walk the tasks in priority order and place each one
//! where it finishes earliest, advancing the core and wireless cursors as
//! the timeline builder does.
use crate::graph_extension::{GraphExtension, TaskGraph, NUM_CORES};
use crate::platform::Platform;
use crate::priority::compute_priority_order;
use crate::schedule::{CloudTiming, Location, Schedule, TaskSchedule};
use log::debug;
use std::collections::BTreeMap;

/// Build the time-optimal initial schedule. Every predecessor of a task is
/// already placed when the task is reached because the priority order is
/// topological.
///
/// The cloud wins a placement only by a strictly earlier finish; among the
/// cores the lowest index wins ties. The result is not guaranteed to meet
/// the deadline; callers check feasibility at the boundary.
pub fn build_initial_schedule(dag: &TaskGraph, platform: &Platform) -> Schedule {
    let mut core_next_free = [0; NUM_CORES];
    let mut send_next_free = 0;
    let mut tasks: BTreeMap<i32, TaskSchedule> = BTreeMap::new();

    for task_id in compute_priority_order(dag) {
        let node_i = dag.get_node_by_task_id(task_id).unwrap();
        let task = &dag[node_i];
        let ready_time = dag
            .get_pre_nodes(node_i)
            .iter()
            .map(|&pre_i| tasks[&dag[pre_i].id].effective_available())
            .max()
            .unwrap_or(0);

        let mut best_core = 0;
        let mut best_core_finish = i32::MAX;
        for core_i in 0..NUM_CORES {
            let finish = ready_time.max(core_next_free[core_i]) + task.exec_times[core_i];
            if finish < best_core_finish {
                best_core = core_i;
                best_core_finish = finish;
            }
        }

        let send_start = ready_time.max(send_next_free);
        let cloud_finish_time = send_start + platform.cloud_round_trip();

        if cloud_finish_time < best_core_finish {
            let cloud_start = send_start + platform.t_send();
            debug!(
                "task {} placed on cloud, send at {}, finish at {}",
                task.id, send_start, cloud_finish_time
            );
            tasks.insert(
                task.id,
                TaskSchedule {
                    id: task.id,
                    location: Location::Cloud,
                    ready_time,
                    start_time: send_start,
                    finish_time: cloud_finish_time,
                    cloud: Some(CloudTiming {
                        send_start,
                        cloud_start,
                        cloud_finish: cloud_start + platform.t_cloud(),
                        receive_finish: cloud_finish_time,
                    }),
                },
            );
            send_next_free = send_start + platform.t_send();
        } else {
            let start_time = ready_time.max(core_next_free[best_core]);
            debug!(
                "task {} placed on core {}, start at {}, finish at {}",
                task.id,
                best_core + 1,
                start_time,
                best_core_finish
            );
            tasks.insert(
                task.id,
                TaskSchedule {
                    id: task.id,
                    location: Location::Core(best_core + 1),
                    ready_time,
                    start_time,
                    finish_time: best_core_finish,
                    cloud: None,
                },
            );
            core_next_free[best_core] = best_core_finish;
        }
    }

    Schedule { tasks }
}
