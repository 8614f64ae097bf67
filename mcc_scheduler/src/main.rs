use clap::Parser;
mod outputs_result;

use lib::dag_creator::create_dag_from_yaml;
use lib::energy::compute_energy;
use lib::initial_scheduler::build_initial_schedule;
use lib::log::SchedulerLog;
use lib::migration::{optimize_schedule, optimize_schedule_to_fixed_point};
use lib::platform::Platform;
use lib::util::create_scheduler_log_yaml;
use outputs_result::dump_mcc_result_to_file;

/// Application description and arguments definition using clap crate
#[derive(Parser)]
#[clap(
    name = "mcc_scheduler",
    about = "Energy-minimizing task scheduling for a mobile platform with cloud offloading."
)]
struct ArgParser {
    #[clap(short = 'f', long = "dag_file_path", required = true)]
    dag_file_path: String,
    #[clap(short = 'p', long = "platform_file_path", required = true)]
    platform_file_path: String,
    #[clap(short = 'o', long = "output_dir_path", default_value = "../outputs")]
    output_dir_path: String,
    /// Repeat migration passes until the energy stops decreasing.
    #[clap(long = "fixed_point")]
    fixed_point: bool,
}

fn main() {
    env_logger::init();
    let arg: ArgParser = ArgParser::parse();

    let dag = match create_dag_from_yaml(&arg.dag_file_path) {
        Ok(dag) => dag,
        Err(error) => panic!("Failed to load task graph: {}", error),
    };
    let platform = match Platform::from_yaml(&arg.platform_file_path) {
        Ok(platform) => platform,
        Err(error) => panic!("Failed to load platform: {}", error),
    };

    let initial = build_initial_schedule(&dag, &platform);
    let optimized = if arg.fixed_point {
        optimize_schedule_to_fixed_point(&dag, &initial, &platform)
    } else {
        optimize_schedule(&dag, &initial, &platform)
    };

    let file_path = create_scheduler_log_yaml(&arg.output_dir_path, "mcc");
    dump_mcc_result_to_file(
        &file_path,
        initial.makespan(),
        compute_energy(&dag, &initial, &platform).total,
        optimized.makespan(),
        compute_energy(&dag, &optimized, &platform).total,
        optimized.check_deadline(&platform).is_ok(),
    );
    SchedulerLog::new(&dag, &optimized, &platform).dump_log_to_yaml(&file_path);
}
