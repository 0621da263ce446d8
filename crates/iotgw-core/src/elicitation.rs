//! Task-based parameter completeness checking ("elicitation")
//!
//! A task declares the parameters it needs, each with the question a caller
//! should be asked when it is missing. [`CompletenessChecker::check`]
//! compares a provided field set against that declaration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One required parameter of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequirement {
    /// Parameter name
    pub field: String,
    /// Clarification prompt shown when the parameter is missing
    pub prompt: String,
}

impl TaskRequirement {
    pub fn new(field: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            prompt: prompt.into(),
        }
    }
}

/// Static mapping from task name to its ordered requirements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequirements {
    tasks: Vec<(String, Vec<TaskRequirement>)>,
}

impl TaskRequirements {
    /// Empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in task table
    pub fn builtin() -> Self {
        Self::empty()
            .with_task(
                "publish_sensor_data",
                vec![
                    TaskRequirement::new("platform", "Which IoT platform should be used?"),
                    TaskRequirement::new("target", "Provide the endpoint/broker/channel ID."),
                    TaskRequirement::new(
                        "sensor_data",
                        "Provide sensor_data (temperature, humidity, etc.)",
                    ),
                ],
            )
            .with_task(
                "discover_protocols",
                vec![TaskRequirement::new(
                    "endpoint",
                    "Provide the endpoint URL or host to probe.",
                )],
            )
            .with_task(
                "read_sensor_data",
                vec![TaskRequirement::new(
                    "timeout_ms",
                    "How long should the bus be polled (milliseconds)?",
                )],
            )
    }

    /// Add a task, replacing any task with the same name
    pub fn with_task(mut self, name: impl Into<String>, requirements: Vec<TaskRequirement>) -> Self {
        let name = name.into();
        match self.tasks.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = requirements,
            None => self.tasks.push((name, requirements)),
        }
        self
    }

    /// Requirements of a task, `None` if the task is unknown
    pub fn get(&self, task: &str) -> Option<&[TaskRequirement]> {
        self.tasks
            .iter()
            .find(|(n, _)| n == task)
            .map(|(_, reqs)| reqs.as_slice())
    }

    /// Known task names in declaration order
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|(n, _)| n.as_str())
    }
}

/// Result of a completeness check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElicitationReport {
    /// Task that was checked
    pub task: String,
    /// Prompts for the missing parameters, in declared order
    pub missing_parameters: Vec<String>,
    /// Names of the missing parameters, in declared order
    pub missing_fields: Vec<String>,
    /// True when nothing is missing
    pub complete: bool,
    /// False when the task name was not in the requirements table
    pub known_task: bool,
}

/// Reports which required parameters of a task are absent
#[derive(Debug, Clone)]
pub struct CompletenessChecker {
    requirements: TaskRequirements,
}

impl Default for CompletenessChecker {
    fn default() -> Self {
        Self::new(TaskRequirements::builtin())
    }
}

impl CompletenessChecker {
    pub fn new(requirements: TaskRequirements) -> Self {
        Self { requirements }
    }

    /// The requirements table in use
    pub fn requirements(&self) -> &TaskRequirements {
        &self.requirements
    }

    /// Check `provided` against the requirements of `task`.
    ///
    /// An unknown task has no requirements and is therefore complete; the
    /// report marks it with `known_task = false`.
    pub fn check<'a, I>(&self, task: &str, provided: I) -> ElicitationReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let provided: HashSet<&str> = provided.into_iter().collect();

        let Some(requirements) = self.requirements.get(task) else {
            warn!(task = %task, "Unknown elicitation task, reporting complete");
            return ElicitationReport {
                task: task.to_string(),
                missing_parameters: Vec::new(),
                missing_fields: Vec::new(),
                complete: true,
                known_task: false,
            };
        };

        let missing: Vec<&TaskRequirement> = requirements
            .iter()
            .filter(|r| !provided.contains(r.field.as_str()))
            .collect();

        ElicitationReport {
            task: task.to_string(),
            missing_parameters: missing.iter().map(|r| r.prompt.clone()).collect(),
            missing_fields: missing.iter().map(|r| r.field.clone()).collect(),
            complete: missing.is_empty(),
            known_task: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_params_report_all_prompts_in_order() {
        let checker = CompletenessChecker::default();
        let report = checker.check("publish_sensor_data", []);

        assert!(!report.complete);
        assert_eq!(
            report.missing_parameters,
            vec![
                "Which IoT platform should be used?",
                "Provide the endpoint/broker/channel ID.",
                "Provide sensor_data (temperature, humidity, etc.)",
            ]
        );
        assert_eq!(
            report.missing_fields,
            vec!["platform", "target", "sensor_data"]
        );
    }

    #[test]
    fn test_all_params_provided_is_complete() {
        let checker = CompletenessChecker::default();
        let report = checker.check("publish_sensor_data", ["platform", "target", "sensor_data"]);

        assert!(report.complete);
        assert!(report.known_task);
        assert!(report.missing_parameters.is_empty());
    }

    #[test]
    fn test_partial_params_keep_declared_order() {
        let checker = CompletenessChecker::default();
        let report = checker.check("publish_sensor_data", ["target"]);

        assert_eq!(report.missing_fields, vec!["platform", "sensor_data"]);
    }

    #[test]
    fn test_extra_params_are_ignored() {
        let checker = CompletenessChecker::default();
        let report = checker.check("discover_protocols", ["endpoint", "verbose"]);
        assert!(report.complete);
    }

    #[test]
    fn test_unknown_task_is_complete_but_flagged() {
        let checker = CompletenessChecker::default();
        let report = checker.check("launch_rocket", []);

        assert!(report.complete);
        assert!(!report.known_task);
        assert!(report.missing_parameters.is_empty());
    }

    #[test]
    fn test_configured_task_replaces_builtin() {
        let requirements = TaskRequirements::builtin().with_task(
            "discover_protocols",
            vec![
                TaskRequirement::new("endpoint", "Which endpoint?"),
                TaskRequirement::new("timeout_ms", "Probe timeout?"),
            ],
        );
        let checker = CompletenessChecker::new(requirements);
        let report = checker.check("discover_protocols", []);

        assert_eq!(
            report.missing_parameters,
            vec!["Which endpoint?", "Probe timeout?"]
        );
        assert_eq!(checker.requirements().task_names().count(), 3);
    }
}
