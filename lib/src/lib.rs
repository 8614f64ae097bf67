pub mod dag_creator;
pub mod energy;
pub mod graph_extension;
pub mod initial_scheduler;
pub mod log;
pub mod migration;
pub mod platform;
pub mod priority;
pub mod schedule;
pub mod timeline;
pub mod util;

#[cfg(any(test, feature = "test-helpers"))]
pub mod tests_helper {
    use crate::dag_creator::create_dag;
    use crate::graph_extension::{TaskData, TaskGraph};
    use crate::platform::Platform;

    pub fn create_canonical_platform(deadline: i32) -> Platform {
        Platform::new([1.0, 2.0, 4.0], 0.5, 3, 1, 1, deadline)
    }

    fn exec_table_10() -> Vec<TaskData> {
        vec![
            TaskData::new(1, [9, 7, 5]),
            TaskData::new(2, [8, 6, 5]),
            TaskData::new(3, [6, 5, 4]),
            TaskData::new(4, [7, 5, 3]),
            TaskData::new(5, [5, 4, 2]),
            TaskData::new(6, [7, 6, 4]),
            TaskData::new(7, [8, 5, 3]),
            TaskData::new(8, [6, 4, 2]),
            TaskData::new(9, [5, 3, 2]),
            TaskData::new(10, [7, 4, 2]),
        ]
    }

    pub fn create_mcc_10_task_dag() -> TaskGraph {
        let edges = [
            (1, 2),
            (1, 3),
            (1, 4),
            (1, 5),
            (1, 6),
            (2, 7),
            (2, 8),
            (3, 7),
            (4, 7),
            (4, 9),
            (5, 8),
            (6, 10),
            (7, 10),
            (8, 10),
            (9, 10),
        ];
        create_dag(&exec_table_10(), &edges).unwrap()
    }

    pub fn create_mcc_20_task_dag() -> TaskGraph {
        let mut tasks = exec_table_10();
        tasks.extend([
            TaskData::new(11, [8, 3, 2]),
            TaskData::new(12, [5, 3, 2]),
            TaskData::new(13, [6, 5, 4]),
            TaskData::new(14, [4, 4, 3]),
            TaskData::new(15, [6, 6, 5]),
            TaskData::new(16, [6, 6, 5]),
            TaskData::new(17, [4, 3, 2]),
            TaskData::new(18, [4, 3, 2]),
            TaskData::new(19, [5, 4, 2]),
            TaskData::new(20, [8, 4, 2]),
        ]);
        let edges = [
            (1, 2),
            (1, 3),
            (1, 4),
            (1, 5),
            (1, 6),
            (2, 8),
            (2, 9),
            (3, 7),
            (4, 8),
            (4, 9),
            (5, 9),
            (6, 8),
            (7, 10),
            (8, 10),
            (9, 10),
            (14, 1),
            (13, 1),
            (14, 15),
            (15, 12),
            (15, 8),
            (6, 12),
            (3, 11),
            (12, 20),
            (12, 16),
            (11, 17),
            (7, 18),
            (20, 16),
            (9, 19),
        ];
        create_dag(&tasks, &edges).unwrap()
    }
}
