pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{terminal, tty::IsTty};
use error::*;

use crate::config::TaskConfig;
use crate::report::Reporter;
use crate::storage::{TaskInitError, TaskWorkspace};
use crate::testing::{CommandRunner, CompareMode, ExecError, TestExecutor, TestResult};

#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub time_limit: Option<Duration>,
    pub compare_mode: CompareMode,
    pub color: bool,
}

/// Builds the solution in `task_dir` and runs its stored testcases,
/// reporting to stdout.
pub async fn do_test(task_dir: impl AsRef<Path>, opts: &ExecOptions) -> Result<Vec<TestResult>> {
    let task_dir = task_dir.as_ref();
    let ws = TaskWorkspace::new(task_dir);
    let task_config_store = ws.task_config_store();
    let suite_store = ws.suite_store();
    let runner = CommandRunner::new()
        .time_limit(opts.time_limit)
        .current_dir(task_dir);

    let stdout = io::stdout();
    let is_tty = stdout.is_tty();
    let width = match terminal::size() {
        Ok((cols, _)) if is_tty => cols as usize,
        _ => 60,
    };
    let mut reporter = Reporter::new(stdout)
        .color(opts.color && is_tty)
        .spinner(is_tty && io::stderr().is_tty())
        .separator_width(width);

    if let Some(limit) = runner.get_time_limit() {
        log::debug!("Time limit: {}ms", limit.as_millis());
    }

    let res = TestExecutor::new(&task_config_store, &suite_store, &runner)
        .compare_mode(opts.compare_mode)
        .execute_test(&mut reporter)
        .await;

    match res {
        Ok(results) => Ok(results),
        Err(ExecError::ConfigAccess(e)) if e.is_not_found() => Err(e).with_context(|| {
            format!(
                "'{}' is not a task directory (run `ach task init` there first)",
                task_dir.display()
            )
        }),
        Err(e) => Err(e).context("Failed to execute tests"),
    }
}

/// Initializes `dir` as a task directory. Returns the path of the written task config.
pub fn init_task(
    dir: impl Into<PathBuf>,
    cfg: &TaskConfig,
    template_dir: Option<&Path>,
) -> Result<PathBuf> {
    let ws = TaskWorkspace::new(dir);
    match ws.init(cfg, template_dir) {
        Ok(()) => Ok(ws.task_config_filepath()),
        Err(e @ TaskInitError::DirectoryNotEmpty(_)) => {
            Err(e).context("Refusing to overwrite existing files")
        }
        Err(e) => Err(e).with_context(|| {
            format!("Failed to init task directory '{}'", ws.dir().display())
        }),
    }
}

/// Creates `<base_dir>/<contest>/<task>` and initializes it with the task identity set.
pub fn create_task(
    base_dir: impl AsRef<Path>,
    contest: &str,
    task: &str,
    cfg: TaskConfig,
    template_dir: Option<&Path>,
) -> Result<PathBuf> {
    ensure!(
        is_valid_dir_name(contest) && is_valid_dir_name(task),
        "Invalid contest or task name: '{}' '{}'",
        contest,
        task
    );
    let dir = base_dir.as_ref().join(contest).join(task);
    let cfg = cfg.with_task(contest, task);
    self::init_task(&dir, &cfg, template_dir)?;
    Ok(dir)
}

fn is_valid_dir_name(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::{SuiteStore, TaskConfigStore};
    use crate::testing::{TestCase, TestStatus};

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    #[tokio::test]
    async fn do_test_runs_in_task_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TaskConfig::new(
            sh("printf '#!/bin/sh\\nread a b; echo $((a + b))\\n' > main.sh"),
            vec!["sh".into(), "main.sh".into()],
        );
        init_task(tmp.path(), &cfg, None).unwrap();
        TaskWorkspace::new(tmp.path())
            .suite_store()
            .write(&[
                TestCase::new("case-1", "1 2\n", "3\n"),
                TestCase::new("case-2", "3 4\n", "8\n"),
                TestCase::just_show("mine", "10 20\n"),
            ])
            .unwrap();

        let results = do_test(tmp.path(), &ExecOptions::default()).await.unwrap();
        let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            [TestStatus::AC, TestStatus::WA, TestStatus::JUSTSHOW]
        );
        assert_eq!(results[1].actual, "7\n");
        assert_eq!(results[2].actual, "30\n");
    }

    #[tokio::test]
    async fn do_test_outside_task_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = do_test(tmp.path(), &ExecOptions::default())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("ach task init"));
    }

    #[test]
    fn create_task_sets_identity() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TaskConfig::new(vec![], vec!["./main".into()]);
        let dir = create_task(tmp.path(), "abc300", "a", cfg, None).unwrap();

        assert_eq!(dir, tmp.path().join("abc300").join("a"));
        let saved = TaskWorkspace::new(&dir).task_config_store().read().unwrap();
        assert_eq!(saved.contest.as_deref(), Some("abc300"));
        assert_eq!(saved.task.as_deref(), Some("a"));
    }

    #[test]
    fn create_task_rejects_path_like_names() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TaskConfig::new(vec![], vec!["./main".into()]);
        assert!(create_task(tmp.path(), "..", "a", cfg.clone(), None).is_err());
        assert!(create_task(tmp.path(), "abc300", "a/b", cfg, None).is_err());
    }

    #[test]
    fn init_task_twice_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TaskConfig::new(vec![], vec!["./main".into()]);
        init_task(tmp.path(), &cfg, None).unwrap();
        let err = init_task(tmp.path(), &cfg, None).unwrap_err();
        assert!(format!("{:#}", err).contains("is not empty"));
    }
}
