use serde::{Deserialize, Serialize};

/// Per-task settings stored next to the solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contest: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    /// Executed once before the testcases run. Empty means nothing to build.
    #[serde(default)]
    pub build: Vec<String>,

    pub run: Vec<String>,
}

impl TaskConfig {
    pub fn new(build: Vec<String>, run: Vec<String>) -> Self {
        Self {
            contest: None,
            task: None,
            build,
            run,
        }
    }

    pub fn with_task(mut self, contest: impl Into<String>, task: impl Into<String>) -> Self {
        self.contest = Some(contest.into());
        self.task = Some(task.into());
        self
    }

    /// Returns a reason when the config cannot be executed.
    pub fn validate(&self) -> Result<(), String> {
        if self.run.is_empty() {
            return Err("`run` must not be empty".to_owned());
        }
        if self.run[0].is_empty() {
            return Err("`run` starts with an empty program name".to_owned());
        }
        if self.build.first().map_or(false, |p| p.is_empty()) {
            return Err("`build` starts with an empty program name".to_owned());
        }
        Ok(())
    }
}
