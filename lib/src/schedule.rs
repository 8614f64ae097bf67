//! Value-typed schedule snapshots: a location per task plus the derived
//! timeline. Snapshots are never mutated; the timeline builder and the
//! migration optimizer always construct fresh ones.
use crate::graph_extension::NUM_CORES;
use crate::platform::Platform;
use std::collections::BTreeMap;
use thiserror::Error;

/// Where a task executes: one of the three local cores (1-based index) or
/// the remote cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Core(usize),
    Cloud,
}

impl Location {
    /// Validated core placement; `None` unless `1 <= index <= NUM_CORES`.
    pub fn core(index: usize) -> Option<Location> {
        (1..=NUM_CORES).contains(&index).then_some(Location::Core(index))
    }

    /// All placements, in the canonical tie-break order
    /// core 1 < core 2 < core 3 < cloud.
    pub fn candidates() -> [Location; NUM_CORES + 1] {
        [
            Location::Core(1),
            Location::Core(2),
            Location::Core(3),
            Location::Cloud,
        ]
    }
}

/// The three phases of a cloud execution. The wireless channel is busy for
/// `[send_start, cloud_start)`; compute and downlink are private intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudTiming {
    pub send_start: i32,
    pub cloud_start: i32,
    pub cloud_finish: i32,
    pub receive_finish: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSchedule {
    pub id: i32,
    pub location: Location,
    pub ready_time: i32,
    pub start_time: i32,
    pub finish_time: i32,
    pub cloud: Option<CloudTiming>,
}

impl TaskSchedule {
    /// Earliest time a successor may consume this task's output: the finish
    /// time for a core task, the upload completion for a cloud task (a
    /// cloud-side descendant does not wait for the downlink).
    pub fn effective_available(&self) -> i32 {
        match self.location {
            Location::Core(_) => self.finish_time,
            Location::Cloud => self.cloud.expect("cloud task carries timing").cloud_start,
        }
    }
}

/// Task id to location, the optimizer's unit of change.
pub type Assignment = BTreeMap<i32, Location>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    pub tasks: BTreeMap<i32, TaskSchedule>,
}

impl Schedule {
    pub fn makespan(&self) -> i32 {
        self.tasks
            .values()
            .map(|task| task.finish_time)
            .max()
            .unwrap_or(0)
    }

    pub fn assignment(&self) -> Assignment {
        self.tasks
            .iter()
            .map(|(&id, task)| (id, task.location))
            .collect()
    }

    /// Tasks whose finish time equals the makespan.
    pub fn critical_task_ids(&self) -> Vec<i32> {
        let makespan = self.makespan();
        self.tasks
            .values()
            .filter(|task| task.finish_time == makespan)
            .map(|task| task.id)
            .collect()
    }

    pub fn check_deadline(&self, platform: &Platform) -> Result<(), ScheduleError> {
        let makespan = self.makespan();
        if makespan > platform.deadline() {
            return Err(ScheduleError::DeadlineViolated {
                makespan,
                deadline: platform.deadline(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("deadline violated: makespan {makespan} exceeds limit {deadline}")]
    DeadlineViolated { makespan: i32, deadline: i32 },
    #[error("assignment does not cover task {0}")]
    Infeasible(i32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InternalError {
    #[error("schedule invariant violated: {0}")]
    InvariantViolation(String),
}
