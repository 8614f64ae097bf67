//! Energy model: pure function of the assignment and the platform.
use crate::graph_extension::{TaskGraph, NUM_CORES};
use crate::platform::Platform;
use crate::schedule::{Location, Schedule};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergyBreakdown {
    pub per_core: [f32; NUM_CORES],
    pub cloud: f32,
    pub total: f32,
}

/// A core task charges `core_power * exec_time` on its core; a cloud task
/// charges RF power over the send and receive phases (the cloud's own
/// compute draws no battery power).
pub fn compute_energy(dag: &TaskGraph, schedule: &Schedule, platform: &Platform) -> EnergyBreakdown {
    let mut breakdown = EnergyBreakdown::default();

    for node_i in dag.node_indices() {
        let task = &dag[node_i];
        match schedule.tasks[&task.id].location {
            Location::Core(core) => {
                breakdown.per_core[core - 1] +=
                    platform.core_power(core) * task.exec_times[core - 1] as f32;
            }
            Location::Cloud => {
                breakdown.cloud +=
                    platform.rf_power() * (platform.t_send() + platform.t_receive()) as f32;
            }
        }
    }

    breakdown.total = breakdown.per_core.iter().sum::<f32>() + breakdown.cloud;
    breakdown
}
