//! Saving and loading artifacts.
//!
//! The on-disk encoding follows the file extension: `.json` is written with
//! serde_json, anything else with bincode. Writes go to a temporary sibling
//! file that is renamed over the destination, so a failed run never leaves a
//! half-written artifact behind.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PersistenceError;
use crate::models::classifier::Classifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Bincode,
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `obj` to `path`, creating parent directories as needed and
/// replacing any existing file.
pub fn save_object<T: Serialize + ?Sized>(path: &Path, obj: &T) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let tmp = temp_path(path);
    let file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
    let mut writer = BufWriter::new(file);

    let encoded = match ArtifactFormat::from_path(path) {
        ArtifactFormat::Json => {
            serde_json::to_writer(&mut writer, obj).map_err(|source| PersistenceError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        ArtifactFormat::Bincode => {
            bincode::serialize_into(&mut writer, obj).map_err(|source| {
                PersistenceError::Bincode {
                    path: path.to_path_buf(),
                    source,
                }
            })
        }
    };

    let result = encoded
        .and_then(|_| writer.flush().map_err(|e| io_error(&tmp, e)))
        .and_then(|_| fs::rename(&tmp, path).map_err(|e| io_error(path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    } else {
        debug!("wrote artifact {}", path.display());
    }
    result
}

/// Inverse of [`save_object`].
pub fn load_object<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let file = fs::File::open(path).map_err(|e| io_error(path, e))?;
    let reader = BufReader::new(file);
    match ArtifactFormat::from_path(path) {
        ArtifactFormat::Json => {
            serde_json::from_reader(reader).map_err(|source| PersistenceError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        ArtifactFormat::Bincode => {
            bincode::deserialize_from(reader).map_err(|source| PersistenceError::Bincode {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Where the selected model goes once a run has picked it.
pub trait ModelStore {
    fn save(&self, path: &Path, model: &Classifier) -> Result<(), PersistenceError>;
    fn load(&self, path: &Path) -> Result<Classifier, PersistenceError>;
}

/// Filesystem-backed [`ModelStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileModelStore;

impl ModelStore for FileModelStore {
    fn save(&self, path: &Path, model: &Classifier) -> Result<(), PersistenceError> {
        save_object(path, model)
    }

    fn load(&self, path: &Path) -> Result<Classifier, PersistenceError> {
        load_object(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Array2;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ArtifactFormat::from_path(Path::new("a/model.json")), ArtifactFormat::Json);
        assert_eq!(ArtifactFormat::from_path(Path::new("a/model.JSON")), ArtifactFormat::Json);
        assert_eq!(ArtifactFormat::from_path(Path::new("a/model.bin")), ArtifactFormat::Bincode);
        assert_eq!(ArtifactFormat::from_path(Path::new("a/model")), ArtifactFormat::Bincode);
    }

    #[test]
    fn creates_parent_directories_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("arr.json");
        let arr = Array2::from_shape_vec((1, 2), vec![0.25f32, 3.5]).unwrap();

        save_object(&path, &arr).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());

        let back: Array2<f32> = load_object(&path).unwrap();
        assert_eq!(back, arr);
    }

    #[test]
    fn bincode_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arr.bin");
        let arr = Array2::from_shape_vec((2, 1), vec![0.1f32, -7.75]).unwrap();
        save_object(&path, &arr).unwrap();
        let back: Array2<f32> = load_object(&path).unwrap();
        assert_eq!(back, arr);
    }

    #[test]
    fn corrupt_artifact_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("model.json");
        fs::write(&json, b"{ truncated").unwrap();
        let err = FileModelStore.load(&json).unwrap_err();
        assert!(matches!(err, PersistenceError::Json { .. }));
        assert!(err.to_string().contains("decode"));

        let bin = dir.path().join("model.bin");
        fs::write(&bin, [0xffu8; 3]).unwrap();
        let err = FileModelStore.load(&bin).unwrap_err();
        assert!(matches!(err, PersistenceError::Bincode { .. }));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_object::<Array2<f32>>(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
