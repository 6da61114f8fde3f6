//! Saving and loading of the fitted scaler, reducer and manifest
//!
//! Every artifact is written to a temporary file in the destination
//! directory and renamed over the target once fully flushed, so an
//! interrupted run never leaves a truncated artifact behind. An existing
//! file at the destination is replaced.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::error::{PreprocessError, Result};
use super::manifest::Manifest;
use super::reducer::ReducerState;
use super::scaler::ScalerState;

/// Write through a temp file in the same directory, then atomically rename.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn save_binary<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    write_atomic(path, |writer| {
        bincode::serde::encode_into_std_write(value, writer, bincode::config::standard())?;
        Ok(())
    })
}

fn load_binary<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    Ok(bincode::serde::decode_from_std_read(
        &mut reader,
        bincode::config::standard(),
    )?)
}

fn corrupt(path: &Path, message: String) -> PreprocessError {
    PreprocessError::CorruptArtifact {
        path: path.display().to_string(),
        message,
    }
}

pub fn save_scaler(state: &ScalerState, path: &Path) -> Result<()> {
    save_binary(state, path)
}

pub fn save_reducer(state: &ReducerState, path: &Path) -> Result<()> {
    save_binary(state, path)
}

/// Load a scaler and check that its vectors line up.
pub fn load_scaler(path: &Path) -> Result<ScalerState> {
    let state: ScalerState = load_binary(path)?;
    state.validate().map_err(|m| corrupt(path, m))?;
    Ok(state)
}

/// Load a reducer and check that its components line up.
pub fn load_reducer(path: &Path) -> Result<ReducerState> {
    let state: ReducerState = load_binary(path)?;
    state.validate().map_err(|m| corrupt(path, m))?;
    Ok(state)
}

/// Write the manifest as pretty-printed JSON.
pub fn save_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, manifest)?;
        writer.write_all(b"\n")?;
        Ok(())
    })
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let file = File::open(path)?;
    let manifest: Manifest = serde_json::from_reader(BufReader::new(file))?;
    Ok(manifest)
}

/// Check that a scaler, reducer and manifest belong to the same run.
pub fn check_compatible(
    manifest: &Manifest,
    scaler: &ScalerState,
    reducer: &ReducerState,
) -> Result<()> {
    if scaler.feature_names != manifest.feature_columns {
        return Err(PreprocessError::CorruptArtifact {
            path: "scaler".to_string(),
            message: format!(
                "scaler features {:?} do not match manifest features {:?}",
                scaler.feature_names, manifest.feature_columns
            ),
        });
    }
    if reducer.n_features() != scaler.n_features() {
        return Err(PreprocessError::ShapeMismatch {
            expected: scaler.n_features(),
            actual: reducer.n_features(),
        });
    }
    if reducer.n_components() != manifest.n_components {
        return Err(PreprocessError::CorruptArtifact {
            path: "reducer".to_string(),
            message: format!(
                "reducer keeps {} component(s) but manifest records {}",
                reducer.n_components(),
                manifest.n_components
            ),
        });
    }
    Ok(())
}
