use ach_core::testing::CompareMode;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use crate::{cmd::GlobalArgs, util};

pub const APP_NAME: &str = "ach";

/// User-level defaults, read from `<config_dir>/ach/ach.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    pub exec: ExecConfig,
    pub task: TaskDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecConfig {
    pub time_limit_ms: Option<u64>,
    pub compare: CompareMode,
}

/// Used by `task init` and `task create` when the flags are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskDefaults {
    pub build: Vec<String>,
    pub run: Vec<String>,
    pub template_dir: Option<PathBuf>,
}

impl GlobalConfig {
    pub const FILENAME: &str = "ach.toml";

    pub fn filepath() -> Option<PathBuf> {
        let dir = dirs::config_dir()?;
        Some(dir.join(APP_NAME).join(Self::FILENAME))
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// A missing file yields the defaults. An invalid file terminates the process.
    pub fn from_file_or_default(path: &Path) -> Self {
        let toml_str = match File::open(path).and_then(io::read_to_string) {
            Ok(toml) => toml,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!("Cannot read config {:?}: {}", path, e);
                }
                return GlobalConfig::default();
            }
        };
        Self::from_toml(&toml_str).unwrap_or_else(|e| {
            log::error!(
                "Invalid config '{}': {:#}",
                util::replace_homedir_to_tilde(path).display(),
                e
            );
            std::process::exit(1)
        })
    }

    pub fn from_file_and_args(args: &GlobalArgs) -> Self {
        let path = args.config.clone().or_else(Self::filepath);
        match path {
            Some(path) => {
                log::debug!("Config file: {:?}", path);
                Self::from_file_or_default(&path)
            }
            None => {
                log::debug!("User config dir is unknown; using default config");
                GlobalConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_full_config() {
        let cfg = GlobalConfig::from_toml(
            r#"
[exec]
time_limit_ms = 2000
compare = "exact"

[task]
build = ["g++", "-O2", "-o", "main", "main.cpp"]
run = ["./main"]
template_dir = "~/.config/ach/template"
"#,
        )
        .unwrap();

        assert_eq!(cfg.exec.time_limit_ms, Some(2000));
        assert_eq!(cfg.exec.compare, CompareMode::Exact);
        assert_eq!(cfg.task.build.len(), 5);
        assert_eq!(cfg.task.run, ["./main"]);
        assert_eq!(
            cfg.task.template_dir.as_deref(),
            Some(Path::new("~/.config/ach/template"))
        );
    }

    #[test]
    fn every_section_is_optional() {
        assert_eq!(GlobalConfig::from_toml("").unwrap(), GlobalConfig::default());

        let cfg = GlobalConfig::from_toml("[exec]\ncompare = \"trim-trailing\"\n").unwrap();
        assert_eq!(cfg.exec.compare, CompareMode::TrimTrailing);
        assert_eq!(cfg.exec.time_limit_ms, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GlobalConfig::from_toml("[exec]\ntimeout = 3\n").is_err());
        assert!(GlobalConfig::from_toml("[exec]\ncompare = \"fuzzy\"\n").is_err());
    }

    #[test]
    fn missing_file_yields_default() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = GlobalConfig::from_file_or_default(&tmp.path().join(GlobalConfig::FILENAME));
        assert_eq!(cfg, GlobalConfig::default());
    }

    #[test]
    fn reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(GlobalConfig::FILENAME);
        std::fs::write(&path, "[task]\nrun = [\"python3\", \"main.py\"]\n").unwrap();
        let cfg = GlobalConfig::from_file_or_default(&path);
        assert_eq!(cfg.task.run, ["python3", "main.py"]);
    }
}
