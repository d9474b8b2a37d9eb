use std::{
    fs::{self, ReadDir},
    path::Path,
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1})")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("{0} (from='{1}', to='{2}')")]
        FromToIO(Msg, PathBuf, PathBuf, #[source] io::Error),
    }

    impl Error {
        /// Kind of the underlying I/O error.
        pub fn io_kind(&self) -> io::ErrorKind {
            match self {
                Error::SingleIO(_, _, e) | Error::FromToIO(_, _, _, e) => e.kind(),
            }
        }
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        if !dir.as_os_str().is_empty() {
            self::mkdir_all(dir)?;
        }
    }
    self::write(filepath, contents)
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Returns `true` if `dir` does not exist or has no entries.
///
/// ```
/// let tmp = tempfile::tempdir().unwrap();
/// assert!(fsutil::is_empty_dir(tmp.path()).unwrap());
/// assert!(fsutil::is_empty_dir(tmp.path().join("not-yet-created")).unwrap());
///
/// fsutil::write(tmp.path().join("main.cpp"), "").unwrap();
/// assert!(!fsutil::is_empty_dir(tmp.path()).unwrap());
/// ```
pub fn is_empty_dir(dir: impl AsRef<Path>) -> Result<bool> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(true);
    }
    Ok(self::read_dir(dir)?.next().is_none())
}

#[must_use]
pub fn copy_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
    fs::copy(&from, &to).map_err(|e| {
        Error::FromToIO(
            "Cannot copy file",
            from.as_ref().to_owned(),
            to.as_ref().to_owned(),
            e,
        )
    })
}

#[derive(Debug, Clone)]
pub struct OptCopyContents {
    pub overwrite_existing_file: bool,
}

/// Recursively copies the contents of `src_dir` into `dst_dir`.
/// Returns the number of copied files.
pub fn copy_contents_all(
    src_dir: impl AsRef<Path>,
    dst_dir: impl AsRef<Path>,
    opt: &OptCopyContents,
) -> Result<usize> {
    let (src_dir, dst_dir) = (src_dir.as_ref(), dst_dir.as_ref());
    self::mkdir_all(dst_dir)?;

    let mut copied = 0;
    for entry in self::read_dir(src_dir)? {
        let entry = entry.map_err(|e| {
            Error::FromToIO(
                "Cannot access dir entry on `copy_contents_all()`",
                src_dir.to_owned(),
                dst_dir.to_owned(),
                e,
            )
        })?;
        let dst = dst_dir.join(entry.file_name());
        let ty = entry.file_type().map_err(|e| {
            Error::SingleIO(
                "Cannot get filetype on `copy_contents_all()`",
                entry.path(),
                e,
            )
        })?;
        if ty.is_dir() {
            copied += self::copy_contents_all(entry.path(), dst, opt)?;
        } else if opt.overwrite_existing_file || !dst.exists() {
            log::debug!("Copy {:?} -> {:?}", entry.path(), dst);
            self::copy_file(entry.path(), dst)?;
            copied += 1;
        }
    }
    Ok(copied)
}
