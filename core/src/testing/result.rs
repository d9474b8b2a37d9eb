use std::time::Duration;

use super::{judge::Judgement, runner::RunOutcome};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::IntoStaticStr,
)]
pub enum TestStatus {
    /// Output matched the expected output.
    AC,
    /// Output differed from the expected output.
    WA,
    /// The program exited with a non-zero status.
    ERROR,
    /// The program exited normally but there was nothing to compare against.
    JUSTSHOW,
    /// The program was killed after exceeding the time limit.
    TIMEOUT,
    /// The run command could not be spawned.
    SPAWNERR,
}

impl TestStatus {
    pub fn is_passed(self) -> bool {
        self == TestStatus::AC
    }

    /// `JUSTSHOW` is neither passed nor failed.
    pub fn is_failed(self) -> bool {
        !matches!(self, TestStatus::AC | TestStatus::JUSTSHOW)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    /// Captured stdout of the run step. Empty when nothing could be captured.
    pub actual: String,
    pub error: String,
    /// Set only for `WA`.
    pub expected: Option<String>,
    pub exit_code: Option<i32>,
    pub execution_time: Duration,
}

impl TestResult {
    pub fn from_judgement(name: impl Into<String>, j: Judgement, outcome: &RunOutcome) -> Self {
        Self {
            name: name.into(),
            status: j.status,
            actual: j.actual,
            error: j.error,
            expected: j.expected,
            exit_code: Some(outcome.exit_code),
            execution_time: outcome.execution_time,
        }
    }

    pub fn timed_out(name: impl Into<String>, limit: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::TIMEOUT,
            actual: String::new(),
            error: format!("Killed after {}ms", limit.as_millis()),
            expected: None,
            exit_code: None,
            execution_time: limit,
        }
    }

    pub fn spawn_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::SPAWNERR,
            actual: String::new(),
            error: message.into(),
            expected: None,
            exit_code: None,
            execution_time: Duration::ZERO,
        }
    }
}
