use std::io::{self, Write};

use super::{
    judge::{self, CompareMode},
    result::TestResult,
    runner::{display_command, ProcessRunner, RunError},
    testcase::TestCase,
};
use crate::{
    report::Reporter,
    storage::{self, SuiteStore, TaskConfigStore},
};

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Failed to load the task config or the testcases")]
    ConfigAccess(#[source] storage::Error),

    #[error("Failed to run build command `{0}`")]
    BuildSpawn(String, #[source] RunError),

    #[error("Build failed: `{0}` exited with non-zero status")]
    BuildFailed(String),

    #[error("Failed to run testcase '{0}'")]
    Process(String, #[source] RunError),

    #[error("Failed to write test report")]
    Report(#[source] io::Error),
}

/// Builds once, then runs every stored testcase in order and reports each verdict.
pub struct TestExecutor<'a, C: ?Sized, S: ?Sized, R: ?Sized> {
    task_config_store: &'a C,
    suite_store: &'a S,
    runner: &'a R,
    compare_mode: CompareMode,
}

impl<'a, C, S, R> TestExecutor<'a, C, S, R>
where
    C: TaskConfigStore + ?Sized,
    S: SuiteStore + ?Sized,
    R: ProcessRunner + ?Sized,
{
    pub fn new(task_config_store: &'a C, suite_store: &'a S, runner: &'a R) -> Self {
        Self {
            task_config_store,
            suite_store,
            runner,
            compare_mode: CompareMode::default(),
        }
    }

    pub fn compare_mode(mut self, mode: CompareMode) -> Self {
        self.compare_mode = mode;
        self
    }

    pub async fn execute_test<W: Write>(
        &self,
        reporter: &mut Reporter<W>,
    ) -> Result<Vec<TestResult>, ExecError> {
        let task_config = self
            .task_config_store
            .read()
            .map_err(ExecError::ConfigAccess)?;
        let testcases = self.suite_store.read().map_err(ExecError::ConfigAccess)?;

        if let (Some(contest), Some(task)) = (&task_config.contest, &task_config.task) {
            log::info!("Task: {} {}", contest, task);
        }
        if testcases.is_empty() {
            log::warn!("No testcases are saved for this task");
        }

        if !task_config.build.is_empty() {
            let cmd = display_command(&task_config.build);
            log::info!("Building: {}", cmd);
            let ok = self
                .runner
                .build(&task_config.build)
                .await
                .map_err(|e| ExecError::BuildSpawn(cmd.clone(), e))?;
            if !ok {
                return Err(ExecError::BuildFailed(cmd));
            }
        }

        log::info!("Running: {}", display_command(&task_config.run));

        let mut results = Vec::with_capacity(testcases.len());
        for t in &testcases {
            match self.run_reported(&task_config.run, t, reporter).await {
                Ok(res) => results.push(res),
                Err(e) => {
                    reporter.abort();
                    return Err(e);
                }
            }
        }

        reporter.summary(&results).map_err(ExecError::Report)?;
        Ok(results)
    }

    async fn run_reported<W: Write>(
        &self,
        argv: &[String],
        t: &TestCase,
        reporter: &mut Reporter<W>,
    ) -> Result<TestResult, ExecError> {
        reporter.case_started(t).map_err(ExecError::Report)?;
        let res = self.run_one(argv, t).await?;
        reporter.case_finished(&res).map_err(ExecError::Report)?;
        Ok(res)
    }

    async fn run_one(&self, argv: &[String], t: &TestCase) -> Result<TestResult, ExecError> {
        match self.runner.run(argv, &t.given).await {
            Ok(outcome) => {
                let j = judge::classify_with(self.compare_mode, &outcome, t.expected.as_deref());
                Ok(TestResult::from_judgement(&t.name, j, &outcome))
            }
            Err(RunError::TimedOut(limit)) => Ok(TestResult::timed_out(&t.name, limit)),
            Err(e @ RunError::Spawn { .. }) => {
                Ok(TestResult::spawn_failed(&t.name, error_chain(&e)))
            }
            Err(e) => Err(ExecError::Process(t.name.clone(), e)),
        }
    }
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(e) = source {
        msg += ": ";
        msg += &e.to_string();
        source = e.source();
    }
    msg
}
