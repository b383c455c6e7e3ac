//! FileDriver - one file per payload, unencrypted.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use super::{Driver, DriverError};
use crate::entities::DriverOptions;

/// Option naming the directory that holds the payload files.
pub const PATH_OPTION: &str = "path";

/// Stores each payload as `<path>/<id>`.
///
/// The directory comes from the configmap's `path` option and is created on
/// first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDriver;

impl FileDriver {
    pub fn new() -> Self {
        FileDriver
    }

    fn payload_path(options: &DriverOptions, id: &str) -> Result<PathBuf, DriverError> {
        let dir = options
            .get(PATH_OPTION)
            .filter(|path| !path.is_empty())
            .ok_or_else(|| DriverError::MissingOption(PATH_OPTION.to_string()))?;
        Ok(PathBuf::from(dir).join(id))
    }
}

impl Driver for FileDriver {
    fn put(&self, options: &DriverOptions, id: &str, payload: &[u8]) -> Result<(), DriverError> {
        let path = Self::payload_path(options, id)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| DriverError::io("create dir", e))?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(DriverError::AlreadyExists(id.to_string()))
            }
            Err(e) => return Err(DriverError::io("open", e)),
        };

        if let Err(e) = file.write_all(payload).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&path);
            return Err(DriverError::io("write", e));
        }
        Ok(())
    }

    fn get(&self, options: &DriverOptions, id: &str) -> Result<Vec<u8>, DriverError> {
        let path = Self::payload_path(options, id)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DriverError::NotFound(id.to_string()),
            _ => DriverError::io("read", e),
        })
    }

    fn delete(&self, options: &DriverOptions, id: &str) -> Result<(), DriverError> {
        let path = Self::payload_path(options, id)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DriverError::NotFound(id.to_string()),
            _ => DriverError::io("remove", e),
        })
    }
}
