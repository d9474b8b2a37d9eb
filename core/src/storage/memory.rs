use std::sync::Mutex;

use super::{validate_suite, validate_task_config, Result, SuiteStore, TaskConfigStore};
use crate::{config::TaskConfig, testing::TestCase};

const LOCATION: &str = "<memory>";

/// Keeps the task config in memory. Validates on read like the file adapter.
#[derive(Debug)]
pub struct MemoryTaskConfigStore {
    inner: Mutex<TaskConfig>,
}

impl MemoryTaskConfigStore {
    pub fn new(cfg: TaskConfig) -> Self {
        Self {
            inner: Mutex::new(cfg),
        }
    }
}

impl TaskConfigStore for MemoryTaskConfigStore {
    fn read(&self) -> Result<TaskConfig> {
        let cfg = lock(&self.inner).clone();
        validate_task_config(LOCATION, &cfg)?;
        Ok(cfg)
    }

    fn write(&self, cfg: &TaskConfig) -> Result<()> {
        *lock(&self.inner) = cfg.clone();
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySuiteStore {
    inner: Mutex<Vec<TestCase>>,
}

impl MemorySuiteStore {
    pub fn new(testcases: Vec<TestCase>) -> Self {
        Self {
            inner: Mutex::new(testcases),
        }
    }
}

impl SuiteStore for MemorySuiteStore {
    fn read(&self) -> Result<Vec<TestCase>> {
        let testcases = lock(&self.inner).clone();
        validate_suite(LOCATION, &testcases)?;
        Ok(testcases)
    }

    fn write(&self, testcases: &[TestCase]) -> Result<()> {
        validate_suite(LOCATION, testcases)?;
        *lock(&self.inner) = testcases.to_vec();
        Ok(())
    }
}

/// A poisoned lock still holds a consistent value since writers only assign.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
