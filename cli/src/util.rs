use std::{
    path::{Path, PathBuf},
    process::exit,
};

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Failed to get current dir: {}", e);
        exit(1);
    })
}

pub fn replace_homedir_to_tilde(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    let Some(home_dir) = ::dirs::home_dir() else {
        return path
    };
    path.strip_prefix(home_dir)
        .map(|path| Path::new("~").join(path))
        .unwrap_or(path)
}

/// Inverse of [`replace_homedir_to_tilde`]. Paths not starting with `~` are returned as is.
pub fn expand_tilde(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    let Ok(rest) = path.strip_prefix("~") else {
        return path
    };
    match ::dirs::home_dir() {
        Some(home_dir) => home_dir.join(rest),
        None => path,
    }
}

/// Splits a command line given as one flag value into argv.
pub fn split_command(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_owned).collect()
}
