use lib::util::append_info_to_yaml;
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct ResultInfo {
    initial_makespan: i32,
    initial_energy: f32,
    optimized_makespan: i32,
    optimized_energy: f32,
    feasible: bool,
}

pub fn dump_mcc_result_to_file(
    file_path: &str,
    initial_makespan: i32,
    initial_energy: f32,
    optimized_makespan: i32,
    optimized_energy: f32,
    feasible: bool,
) {
    let result_info = ResultInfo {
        initial_makespan,
        initial_energy,
        optimized_makespan,
        optimized_energy,
        feasible,
    };
    let yaml =
        serde_yaml::to_string(&result_info).expect("Failed to serialize mcc result to YAML");

    append_info_to_yaml(file_path, &yaml);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib::energy::compute_energy;
    use lib::initial_scheduler::build_initial_schedule;
    use lib::migration::optimize_schedule;
    use lib::tests_helper::{create_canonical_platform, create_mcc_10_task_dag};
    use lib::util::create_yaml;
    use std::fs::remove_file;

    #[test]
    fn test_dump_mcc_result_to_file_normal() {
        let dag = create_mcc_10_task_dag();
        let platform = create_canonical_platform(27);
        let initial = build_initial_schedule(&dag, &platform);
        let optimized = optimize_schedule(&dag, &initial, &platform);

        let file_path = create_yaml("../outputs", "test_dump_mcc_result_normal");
        dump_mcc_result_to_file(
            &file_path,
            initial.makespan(),
            compute_energy(&dag, &initial, &platform).total,
            optimized.makespan(),
            compute_energy(&dag, &optimized, &platform).total,
            optimized.check_deadline(&platform).is_ok(),
        );

        let file_contents = std::fs::read_to_string(&file_path).unwrap();
        let result_info: ResultInfo = serde_yaml::from_str(&file_contents).unwrap();

        assert_eq!(result_info.initial_makespan, 17);
        assert_eq!(result_info.initial_energy, 92.0);
        assert_eq!(result_info.optimized_makespan, 26);
        assert_eq!(result_info.optimized_energy, 29.0);
        assert!(result_info.feasible);

        remove_file(file_path).unwrap();
    }
}
