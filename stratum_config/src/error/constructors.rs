//! Error constructors shared by the file and schema readers.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use super::StratumError;

/// Construct a [`StratumError::File`] for a configuration path.
pub(crate) fn file_error(
    path: &Path,
    err: impl Into<Box<dyn Error + Send + Sync>>,
) -> Arc<StratumError> {
    Arc::new(StratumError::File {
        path: path.to_path_buf(),
        source: err.into(),
    })
}

pub(crate) fn invalid_data(path: &Path, msg: impl Into<String>) -> Arc<StratumError> {
    file_error(
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidData, msg.into()),
    )
}
