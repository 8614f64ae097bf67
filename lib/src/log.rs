use serde::Serialize;
use serde_derive::{Deserialize, Serialize};

use crate::energy::{compute_energy, EnergyBreakdown};
use crate::graph_extension::{GraphExtension, TaskGraph, NUM_CORES};
use crate::platform::Platform;
use crate::schedule::{Location, Schedule};
use crate::util::append_info_to_yaml;

pub fn dump_struct(file_path: &str, target_struct: &impl Serialize) {
    let yaml = serde_yaml::to_string(&target_struct).expect("Failed to serialize.");
    append_info_to_yaml(file_path, &yaml);
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PlatformInfo {
    core_powers: [f32; NUM_CORES],
    rf_power: f32,
    t_send: i32,
    t_cloud: i32,
    t_receive: i32,
    deadline: i32,
}

impl PlatformInfo {
    pub fn new(platform: &Platform) -> Self {
        Self {
            core_powers: [
                platform.core_power(1),
                platform.core_power(2),
                platform.core_power(3),
            ],
            rf_power: platform.rf_power(),
            t_send: platform.t_send(),
            t_cloud: platform.t_cloud(),
            t_receive: platform.t_receive(),
            deadline: platform.deadline(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TaskLog {
    task_id: i32,
    location: String,
    core: Option<usize>,
    ready_time: i32,
    start_time: i32,
    finish_time: i32,
    send_start: Option<i32>,
    cloud_start: Option<i32>,
    cloud_finish: Option<i32>,
    receive_finish: Option<i32>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CoreLog {
    core_id: usize,
    total_proc_time: i32,
    utilization: f32,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct EnergyLog {
    per_core: [f32; NUM_CORES],
    cloud: f32,
    total: f32,
}

impl EnergyLog {
    fn new(breakdown: &EnergyBreakdown) -> Self {
        Self {
            per_core: breakdown.per_core,
            cloud: breakdown.cloud,
            total: breakdown.total,
        }
    }
}

/// The schedule table and energy report of one scheduler run.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SchedulerLog {
    platform_info: PlatformInfo,
    makespan: i32,
    feasible: bool,
    critical_task_ids: Vec<i32>,
    energy: EnergyLog,
    task_logs: Vec<TaskLog>,
    core_logs: Vec<CoreLog>,
}

impl SchedulerLog {
    pub fn new(dag: &TaskGraph, schedule: &Schedule, platform: &Platform) -> Self {
        let makespan = schedule.makespan();
        let mut core_logs: Vec<CoreLog> = (1..=NUM_CORES)
            .map(|core_id| CoreLog {
                core_id,
                total_proc_time: 0,
                utilization: 0.0,
            })
            .collect();

        let mut task_logs = Vec::with_capacity(schedule.tasks.len());
        for task in schedule.tasks.values() {
            let (location, core) = match task.location {
                Location::Core(core) => ("core".to_string(), Some(core)),
                Location::Cloud => ("cloud".to_string(), None),
            };
            if let Some(core) = core {
                let node_i = dag.get_node_by_task_id(task.id).unwrap();
                core_logs[core - 1].total_proc_time += dag[node_i].exec_times[core - 1];
            }
            task_logs.push(TaskLog {
                task_id: task.id,
                location,
                core,
                ready_time: task.ready_time,
                start_time: task.start_time,
                finish_time: task.finish_time,
                send_start: task.cloud.map(|cloud| cloud.send_start),
                cloud_start: task.cloud.map(|cloud| cloud.cloud_start),
                cloud_finish: task.cloud.map(|cloud| cloud.cloud_finish),
                receive_finish: task.cloud.map(|cloud| cloud.receive_finish),
            });
        }

        if makespan > 0 {
            for core_log in core_logs.iter_mut() {
                core_log.utilization = core_log.total_proc_time as f32 / makespan as f32;
            }
        }

        Self {
            platform_info: PlatformInfo::new(platform),
            makespan,
            feasible: schedule.check_deadline(platform).is_ok(),
            critical_task_ids: schedule.critical_task_ids(),
            energy: EnergyLog::new(&compute_energy(dag, schedule, platform)),
            task_logs,
            core_logs,
        }
    }

    pub fn dump_log_to_yaml(&self, file_path: &str) {
        dump_struct(file_path, self);
    }
}
