//! Persistence of a task's config and its testcases.

pub mod error;
pub use error::*;

pub mod memory;
pub use memory::*;

pub mod suite;
pub use suite::*;

pub mod task_config;
pub use task_config::*;

pub mod workspace;
pub use workspace::*;

use crate::{config::TaskConfig, testing::TestCase};

pub trait TaskConfigStore {
    fn read(&self) -> Result<TaskConfig>;
    fn write(&self, cfg: &TaskConfig) -> Result<()>;
}

pub trait SuiteStore {
    /// Returns the testcases in stored order.
    fn read(&self) -> Result<Vec<TestCase>>;
    fn write(&self, testcases: &[TestCase]) -> Result<()>;
}

pub(crate) fn validate_task_config(location: &str, cfg: &TaskConfig) -> Result<()> {
    cfg.validate()
        .map_err(|reason| Error::Invalid(location.to_owned(), reason))
}

/// Names must be non-empty and unique within a suite.
pub(crate) fn validate_suite(location: &str, testcases: &[TestCase]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for (i, t) in testcases.iter().enumerate() {
        if t.name.is_empty() {
            return Err(Error::Invalid(
                location.to_owned(),
                format!("testcase #{} has an empty name", i + 1),
            ));
        }
        if !seen.insert(t.name.as_str()) {
            return Err(Error::Invalid(
                location.to_owned(),
                format!("testcase name '{}' is duplicated", t.name),
            ));
        }
    }
    Ok(())
}
