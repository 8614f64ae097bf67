//! Migration optimizer: trade deadline slack for battery energy.
//!
//! One pass over the tasks in ascending id order. Each task tries every
//! other placement; a candidate is always evaluated on a complete timeline
//! rebuilt from its trial assignment. A move is adopted when it strictly
//! lowers total energy, or keeps energy while strictly lowering the
//! makespan.
use crate::energy::compute_energy;
use crate::graph_extension::TaskGraph;
use crate::platform::Platform;
use crate::schedule::{Location, Schedule};
use crate::timeline::rebuild_timeline;
use log::{debug, info, warn};

pub fn optimize_schedule(dag: &TaskGraph, initial: &Schedule, platform: &Platform) -> Schedule {
    if initial.makespan() > platform.deadline() {
        warn!(
            "input schedule already violates the deadline ({} > {}); migration may return it unchanged",
            initial.makespan(),
            platform.deadline()
        );
    }

    let mut current = initial.clone();
    let mut current_energy = compute_energy(dag, &current, platform).total;
    let mut current_makespan = current.makespan();

    let task_ids: Vec<i32> = current.tasks.keys().copied().collect();
    for task_id in task_ids {
        let current_location = current.tasks[&task_id].location;
        let mut best: Option<Schedule> = None;
        let mut best_energy = current_energy;
        let mut best_makespan = current_makespan;
        let mut any_feasible = false;

        for candidate in Location::candidates() {
            if candidate == current_location {
                continue;
            }
            let mut trial_assignment = current.assignment();
            trial_assignment.insert(task_id, candidate);
            // the assignment is complete by construction
            let trial = rebuild_timeline(dag, &trial_assignment, platform).unwrap();
            let trial_makespan = trial.makespan();
            if trial_makespan > platform.deadline() {
                continue;
            }
            any_feasible = true;

            let trial_energy = compute_energy(dag, &trial, platform).total;
            if trial_energy < best_energy
                || (trial_energy == best_energy && trial_makespan < best_makespan)
            {
                best_energy = trial_energy;
                best_makespan = trial_makespan;
                best = Some(trial);
            }
        }

        if let Some(improved) = best {
            info!(
                "task {} migrated to {:?}: energy {} -> {}, makespan {}",
                task_id,
                improved.tasks[&task_id].location,
                current_energy,
                best_energy,
                best_makespan
            );
            current = improved;
            current_energy = best_energy;
            current_makespan = best_makespan;
        } else if !any_feasible {
            debug!("no deadline-feasible migration for task {}", task_id);
        }
    }

    current
}

/// Repeat single passes until a pass no longer lowers total energy. The
/// single pass is the canonical mode; this variant squeezes out moves that
/// only become profitable after later tasks have migrated.
pub fn optimize_schedule_to_fixed_point(
    dag: &TaskGraph,
    initial: &Schedule,
    platform: &Platform,
) -> Schedule {
    let mut current = initial.clone();
    let mut current_energy = compute_energy(dag, &current, platform).total;
    loop {
        let next = optimize_schedule(dag, &current, platform);
        let next_energy = compute_energy(dag, &next, platform).total;
        if next_energy < current_energy {
            current = next;
            current_energy = next_energy;
        } else {
            return current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag_creator::create_dag;
    use crate::graph_extension::TaskData;
    use crate::initial_scheduler::build_initial_schedule;
    use crate::tests_helper::{
        create_canonical_platform, create_mcc_10_task_dag, create_mcc_20_task_dag,
    };

    #[test]
    fn test_optimize_canonical_10_task_dag() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dag = create_mcc_10_task_dag();
        let platform = create_canonical_platform(27);
        let initial = build_initial_schedule(&dag, &platform);
        assert_eq!(initial.makespan(), 17);
        assert_eq!(compute_energy(&dag, &initial, &platform).total, 92.0);

        let optimized = optimize_schedule(&dag, &initial, &platform);
        assert_eq!(optimized.makespan(), 26);
        assert!(optimized.check_deadline(&platform).is_ok());

        let breakdown = compute_energy(&dag, &optimized, &platform);
        assert_eq!(breakdown.total, 29.0);
        assert_eq!(breakdown.per_core, [5.0, 0.0, 8.0]);
        assert_eq!(breakdown.cloud, 16.0);

        let assignment = optimized.assignment();
        for task_id in 1..=8 {
            assert_eq!(assignment[&task_id], Location::Cloud, "task {}", task_id);
        }
        assert_eq!(assignment[&9], Location::Core(1));
        assert_eq!(assignment[&10], Location::Core(3));
    }

    #[test]
    fn test_optimize_canonical_20_task_dag() {
        let dag = create_mcc_20_task_dag();
        let platform = create_canonical_platform(39);
        let initial = build_initial_schedule(&dag, &platform);
        assert_eq!(initial.makespan(), 26);
        assert_eq!(compute_energy(&dag, &initial, &platform).total, 156.0);

        let optimized = optimize_schedule(&dag, &initial, &platform);
        assert_eq!(optimized.makespan(), 39);
        assert!(optimized.check_deadline(&platform).is_ok());
        assert_eq!(compute_energy(&dag, &optimized, &platform).total, 72.0);

        let assignment = optimized.assignment();
        assert_eq!(assignment[&13], Location::Cloud);
        assert_eq!(assignment[&14], Location::Core(1));
        assert_eq!(assignment[&20], Location::Core(3));
    }

    #[test]
    fn test_migration_rejected_when_deadline_pins_task() {
        // Moving off core 3 would save energy on core 1 (10 < 16) but every
        // candidate overshoots the deadline, so the schedule is unchanged.
        let dag = create_dag(&[TaskData::new(1, [10, 12, 4])], &[]).unwrap();
        let platform = Platform::new([1.0, 2.0, 4.0], 0.5, 5, 1, 1, 6);
        let initial = build_initial_schedule(&dag, &platform);
        assert_eq!(initial.tasks[&1].location, Location::Core(3));

        let optimized = optimize_schedule(&dag, &initial, &platform);
        assert_eq!(optimized, initial);
        assert_eq!(compute_energy(&dag, &optimized, &platform).total, 16.0);
    }

    #[test]
    fn test_single_task_migrates_to_cloud_under_loose_deadline() {
        let dag = create_dag(&[TaskData::new(1, [9, 7, 5])], &[]).unwrap();
        let platform = create_canonical_platform(100);
        let initial = build_initial_schedule(&dag, &platform);
        assert_eq!(compute_energy(&dag, &initial, &platform).total, 20.0);

        let optimized = optimize_schedule(&dag, &initial, &platform);
        assert_eq!(optimized.tasks[&1].location, Location::Cloud);
        assert_eq!(compute_energy(&dag, &optimized, &platform).total, 2.0);
    }

    #[test]
    fn test_optimize_never_raises_energy_or_breaks_deadline() {
        let dag = create_mcc_10_task_dag();
        let platform = create_canonical_platform(27);
        let initial = build_initial_schedule(&dag, &platform);
        let initial_energy = compute_energy(&dag, &initial, &platform).total;

        let optimized = optimize_schedule(&dag, &initial, &platform);
        assert!(compute_energy(&dag, &optimized, &platform).total <= initial_energy);
        assert!(optimized.makespan() <= platform.deadline());
    }

    #[test]
    fn test_optimize_deterministic() {
        let dag = create_mcc_20_task_dag();
        let platform = create_canonical_platform(39);
        let first = optimize_schedule(&dag, &build_initial_schedule(&dag, &platform), &platform);
        let second = optimize_schedule(&dag, &build_initial_schedule(&dag, &platform), &platform);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixed_point_matches_single_pass_on_canonical_dag() {
        // On the canonical inputs a second pass finds nothing further.
        let dag = create_mcc_10_task_dag();
        let platform = create_canonical_platform(27);
        let initial = build_initial_schedule(&dag, &platform);

        let single = optimize_schedule(&dag, &initial, &platform);
        let fixed = optimize_schedule_to_fixed_point(&dag, &initial, &platform);
        assert_eq!(single, fixed);
    }
}
