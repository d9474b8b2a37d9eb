use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot load stored task data")]
    Read(#[source] fsutil::Error),

    #[error("Cannot parse '{0}'")]
    Parse(String, #[source] serde_yaml::Error),

    #[error("Invalid content in '{0}': {1}")]
    Invalid(String, String),

    #[error("Cannot save task data")]
    Write(#[source] fsutil::Error),

    #[error("Cannot serialize data for '{0}'")]
    Serialize(String, #[source] serde_yaml::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Read(e) if e.io_kind() == io::ErrorKind::NotFound)
    }
}
