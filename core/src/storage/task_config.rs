use std::path::{Path, PathBuf};

use super::{validate_task_config, Error, Result, TaskConfigStore};
use crate::config::TaskConfig;

/// Task config kept as a YAML file in the task directory.
#[derive(Debug, Clone)]
pub struct YamlTaskConfigStore {
    path: PathBuf,
}

impl YamlTaskConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl TaskConfigStore for YamlTaskConfigStore {
    fn read(&self) -> Result<TaskConfig> {
        let yaml = fsutil::read_to_string(&self.path).map_err(Error::Read)?;
        let cfg: TaskConfig =
            serde_yaml::from_str(&yaml).map_err(|e| Error::Parse(self.location(), e))?;
        validate_task_config(&self.location(), &cfg)?;
        log::debug!("Loaded task config from {:?}", self.path);
        Ok(cfg)
    }

    fn write(&self, cfg: &TaskConfig) -> Result<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| Error::Serialize(self.location(), e))?;
        fsutil::write_with_mkdir(&self.path, yaml).map_err(Error::Write)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn argv(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let store = YamlTaskConfigStore::new(tmp.path().join(".ach_task.yaml"));
        let cfg = TaskConfig::new(argv(&["g++", "-O2", "main.cpp"]), argv(&["./a.out"]))
            .with_task("abc300", "abc300_a");

        store.write(&cfg).unwrap();
        assert_eq!(store.read().unwrap(), cfg);
    }

    #[test]
    fn reads_handwritten_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".ach_task.yaml");
        fsutil::write(
            &path,
            "contest: abc001\ntask: abc001_1\nbuild:\n  - make\nrun:\n  - ./main\n",
        )
        .unwrap();

        let cfg = YamlTaskConfigStore::new(&path).read().unwrap();
        assert_eq!(cfg.contest.as_deref(), Some("abc001"));
        assert_eq!(cfg.task.as_deref(), Some("abc001_1"));
        assert_eq!(cfg.build, argv(&["make"]));
        assert_eq!(cfg.run, argv(&["./main"]));
    }

    #[test]
    fn missing_file_is_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = YamlTaskConfigStore::new(tmp.path().join("nothing.yaml"))
            .read()
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn broken_yaml_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".ach_task.yaml");
        fsutil::write(&path, "run: [./main\n").unwrap();
        let err = YamlTaskConfigStore::new(&path).read().unwrap_err();
        assert!(matches!(err, Error::Parse(..)));
    }

    #[test]
    fn missing_run_command_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".ach_task.yaml");

        fsutil::write(&path, "build: [make]\n").unwrap();
        assert!(matches!(
            YamlTaskConfigStore::new(&path).read(),
            Err(Error::Parse(..))
        ));

        fsutil::write(&path, "build: [make]\nrun: []\n").unwrap();
        assert!(matches!(
            YamlTaskConfigStore::new(&path).read(),
            Err(Error::Invalid(..))
        ));
    }
}
