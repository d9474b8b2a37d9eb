use std::path::{Path, PathBuf};

use fsutil::OptCopyContents;

use super::{TaskConfigStore, YamlSuiteStore, YamlTaskConfigStore};
use crate::config::TaskConfig;

#[derive(Debug, thiserror::Error)]
pub enum TaskInitError {
    #[error("Directory '{0}' is not empty")]
    DirectoryNotEmpty(PathBuf),

    #[error("Cannot prepare task directory")]
    Fs(#[from] fsutil::Error),

    #[error("Cannot write task config")]
    Store(#[from] super::Error),
}

/// A directory holding one task's solution, config and testcases.
#[derive(Debug, Clone)]
pub struct TaskWorkspace {
    dir: PathBuf,
}

impl TaskWorkspace {
    pub const TASK_CONFIG_FILENAME: &str = ".ach_task.yaml";
    pub const SUITE_FILENAME: &str = "testcases.yaml";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn task_config_filepath(&self) -> PathBuf {
        self.dir.join(Self::TASK_CONFIG_FILENAME)
    }

    pub fn suite_filepath(&self) -> PathBuf {
        self.dir.join(Self::SUITE_FILENAME)
    }

    pub fn task_config_store(&self) -> YamlTaskConfigStore {
        YamlTaskConfigStore::new(self.task_config_filepath())
    }

    pub fn suite_store(&self) -> YamlSuiteStore {
        YamlSuiteStore::new(self.suite_filepath())
    }

    /// Creates the directory if needed, copies the template files into it
    /// and writes the task config. Refuses a directory that already has entries.
    pub fn init(
        &self,
        cfg: &TaskConfig,
        template_dir: Option<&Path>,
    ) -> Result<(), TaskInitError> {
        if !fsutil::is_empty_dir(&self.dir)? {
            return Err(TaskInitError::DirectoryNotEmpty(self.dir.clone()));
        }
        fsutil::mkdir_all(&self.dir)?;

        if let Some(template_dir) = template_dir {
            let n = fsutil::copy_contents_all(
                template_dir,
                &self.dir,
                &OptCopyContents {
                    overwrite_existing_file: false,
                },
            )?;
            log::debug!("Copied {} template files from {:?}", n, template_dir);
        }

        self.task_config_store().write(cfg)?;
        Ok(())
    }
}
