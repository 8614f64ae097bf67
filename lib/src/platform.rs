//! Platform constants: core powers, RF power, cloud transfer durations, and
//! the completion deadline. Read-only after construction.
use crate::dag_creator::GraphError;
use crate::graph_extension::NUM_CORES;
use crate::util::load_yaml;

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    core_powers: [f32; NUM_CORES],
    rf_power: f32,
    t_send: i32,
    t_cloud: i32,
    t_receive: i32,
    deadline: i32,
}

impl Platform {
    pub fn new(
        core_powers: [f32; NUM_CORES],
        rf_power: f32,
        t_send: i32,
        t_cloud: i32,
        t_receive: i32,
        deadline: i32,
    ) -> Platform {
        Platform {
            core_powers,
            rf_power,
            t_send,
            t_cloud,
            t_receive,
            deadline,
        }
    }

    /// Power draw of core `core` (1-based).
    pub fn core_power(&self, core: usize) -> f32 {
        self.core_powers[core - 1]
    }

    pub fn rf_power(&self) -> f32 {
        self.rf_power
    }

    pub fn t_send(&self) -> i32 {
        self.t_send
    }

    pub fn t_cloud(&self) -> i32 {
        self.t_cloud
    }

    pub fn t_receive(&self) -> i32 {
        self.t_receive
    }

    pub fn deadline(&self) -> i32 {
        self.deadline
    }

    /// Send + compute + receive, the end-to-end duration of one cloud task.
    pub fn cloud_round_trip(&self) -> i32 {
        self.t_send + self.t_cloud + self.t_receive
    }

    /// Load platform constants from a yaml file of the form:
    ///
    /// ```yaml
    /// core_powers: [1.0, 2.0, 4.0]
    /// rf_power: 0.5
    /// t_send: 3
    /// t_cloud: 1
    /// t_receive: 1
    /// deadline: 27
    /// ```
    pub fn from_yaml(file_path: &str) -> Result<Platform, GraphError> {
        let yaml_docs = load_yaml(file_path);
        let yaml_doc = &yaml_docs[0];

        let powers_yaml = yaml_doc["core_powers"]
            .as_vec()
            .expect("core_powers is required");
        if powers_yaml.len() != NUM_CORES {
            return Err(GraphError::CoreOutOfRange(powers_yaml.len() as i64));
        }
        let mut core_powers = [0.0; NUM_CORES];
        for (core_i, value) in powers_yaml.iter().enumerate() {
            core_powers[core_i] = value
                .as_f64()
                .or_else(|| value.as_i64().map(|v| v as f64))
                .expect("core power must be numeric") as f32;
        }

        let rf_power = yaml_doc["rf_power"]
            .as_f64()
            .or_else(|| yaml_doc["rf_power"].as_i64().map(|v| v as f64))
            .expect("rf_power is required") as f32;

        let as_time = |key: &str| -> i32 {
            yaml_doc[key]
                .as_i64()
                .unwrap_or_else(|| panic!("{} is required", key)) as i32
        };

        Ok(Platform::new(
            core_powers,
            rf_power,
            as_time("t_send"),
            as_time("t_cloud"),
            as_time("t_receive"),
            as_time("deadline"),
        ))
    }
}
