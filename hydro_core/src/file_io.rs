//! # File I/O Module
//!
//! JSON persistence for settings and for history/streak state:
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **File locking**: an exclusive `fs2` lock on a sidecar `.lock` file
//!   while a read-modify-write of the history file is in progress
//! - **Version validation**: history files carry a schema version
//!
//! ## Example
//!
//! ```rust,no_run
//! use hydro_core::file_io::JsonFileHistoryStore;
//! use hydro_core::history::HistoryStore;
//!
//! let store = JsonFileHistoryStore::new("hydrocalc_history.json");
//! let state = store.load()?;
//! println!("{} entries, streak {}", state.history.len(), state.streak.count);
//! # Ok::<(), hydro_core::errors::HydroError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{HydroError, HydroResult};
use crate::history::{CalculationHistoryEntry, History, HistoryState, HistoryStore, Streak};
use crate::settings::Settings;

/// Current schema version for history files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// On-disk layout of the history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistoryFile {
    version: String,
    history: History,
    #[serde(default)]
    streak: Streak,
}

// ============================================================================
// Locking
// ============================================================================

/// Exclusive lock on a data file, released when dropped.
///
/// The OS-level lock lives on `<file>.lock` so the data file itself can be
/// replaced by rename while the lock is held. The lock file is never removed:
/// every process must contend on the same inode.
pub struct FileLock {
    lock_file: File,
}

impl FileLock {
    /// Try to take the lock without blocking.
    ///
    /// Returns [`HydroError::FileLocked`] when another process holds it.
    pub fn acquire(path: &Path) -> HydroResult<Self> {
        let lock_path = lock_path_for(path);

        let lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                HydroError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| HydroError::FileLocked {
            path: path.display().to_string(),
        })?;

        debug!(path = %lock_path.display(), "lock acquired");
        Ok(FileLock { lock_file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.lock_file);
    }
}

/// `history.json` → `history.json.lock`
fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

// ============================================================================
// Generic JSON Read/Write
// ============================================================================

/// Serialize `value` and atomically replace `path` with it.
fn save_json<T: Serialize>(value: &T, path: &Path) -> HydroResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| HydroError::serialization(e.to_string()))?;

    let tmp_path = path.with_extension(
        path.extension()
            .map(|e| format!("{}.tmp", e.to_string_lossy()))
            .unwrap_or_else(|| "tmp".to_string()),
    );

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        HydroError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        HydroError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        HydroError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        HydroError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Read and parse `path`; `Ok(None)` when the file does not exist.
fn load_json<T: DeserializeOwned>(path: &Path) -> HydroResult<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(HydroError::file_error("read", path.display().to_string(), e.to_string()))
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| HydroError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))
}

// ============================================================================
// Settings
// ============================================================================

/// Load settings; a missing file yields [`Settings::default`].
pub fn load_settings(path: &Path) -> HydroResult<Settings> {
    match load_json(path)? {
        Some(settings) => Ok(settings),
        None => {
            debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Settings::default())
        }
    }
}

pub fn save_settings(settings: &Settings, path: &Path) -> HydroResult<()> {
    save_json(settings, path)
}

// ============================================================================
// History
// ============================================================================

/// Load history and streak; a missing file yields an empty state.
///
/// Entries beyond the cap (from a hand-edited file) are dropped.
pub fn load_history_state(path: &Path) -> HydroResult<HistoryState> {
    let Some(file) = load_json::<HistoryFile>(path)? else {
        return Ok(HistoryState::default());
    };

    validate_version(&file.version)?;

    Ok(HistoryState {
        history: History::from_entries(file.history.entries().to_vec()),
        streak: file.streak,
    })
}

/// Atomically write history and streak to `path`.
pub fn save_history_state(state: &HistoryState, path: &Path) -> HydroResult<()> {
    let file = HistoryFile {
        version: SCHEMA_VERSION.to_string(),
        history: state.history.clone(),
        streak: state.streak,
    };
    save_json(&file, path)
}

/// [`HistoryStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileHistoryStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn load(&self) -> HydroResult<HistoryState> {
        load_history_state(&self.path)
    }

    fn append(&mut self, entry: CalculationHistoryEntry) -> HydroResult<HistoryState> {
        let _lock = FileLock::acquire(&self.path)?;
        let mut state = load_history_state(&self.path)?;
        let id = entry.id.clone();
        state.record(entry);
        save_history_state(&state, &self.path)?;
        info!(
            path = %self.path.display(),
            %id,
            entries = state.history.len(),
            streak = state.streak.count,
            "history saved"
        );
        Ok(state)
    }

    fn clear(&mut self) -> HydroResult<()> {
        let _lock = FileLock::acquire(&self.path)?;
        let mut state = load_history_state(&self.path)?;
        state.history.clear();
        save_history_state(&state, &self.path)?;
        info!(path = %self.path.display(), "history cleared");
        Ok(())
    }
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> HydroResult<()> {
    let mismatch = || HydroError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // In 0.x, a newer minor may carry breaking changes
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{compute, CalculationKind};
    use crate::fields::fields_for;
    use crate::history::HISTORY_CAP;
    use crate::results::{labels, ResultMap};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("hydrocalc_test_{}_{}.json", std::process::id(), name))
    }

    fn entry(n: i64) -> CalculationHistoryEntry {
        let timestamp = Utc.timestamp_millis_opt(1_700_000_000_000 + n * 1000).unwrap();
        CalculationHistoryEntry::new(
            CalculationKind::ReynoldsNumber,
            fields_for("reynolds-number"),
            &HashMap::new(),
            &HashMap::new(),
            ResultMap::new()
                .with(labels::REYNOLDS_NUMBER, n as f64)
                .with(labels::FLOW_REGIME, "Laminar (Re < 2300)"),
            timestamp,
        )
    }

    #[test]
    fn test_lock_path_generation() {
        let path = Path::new("/path/to/history.json");
        assert_eq!(lock_path_for(path), Path::new("/path/to/history.json.lock"));
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(load_settings(&path).unwrap(), Settings::default());
        assert_eq!(load_history_state(&path).unwrap(), HistoryState::default());
    }

    #[test]
    fn test_settings_roundtrip() {
        let path = temp_path("settings");
        let mut settings = Settings::default();
        settings.locale = "en-US".to_string();
        settings
            .display_units
            .insert(labels::HEAD_LOSS.to_string(), "kPa".to_string());

        save_settings(&settings, &path).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_store_append_and_reload() {
        let path = temp_path("store");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileHistoryStore::new(&path);
        store.append(entry(1)).unwrap();
        let state = store.append(entry(2)).unwrap();
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.streak.count, 1);

        // A fresh store sees the same state
        let reloaded = JsonFileHistoryStore::new(&path).load().unwrap();
        assert_eq!(reloaded, state);
        assert_eq!(reloaded.history.latest().unwrap().id, entry(2).id);

        // Temp file is gone; the lock file stays for the next writer
        assert!(!path.with_extension("json.tmp").exists());
        assert!(lock_path_for(&path).exists());

        let _ = fs::remove_file(&path);
        let _ = fs::remove_file(lock_path_for(&path));
    }

    #[test]
    fn test_store_cap() {
        let path = temp_path("cap");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileHistoryStore::new(&path);
        for n in 0..=HISTORY_CAP as i64 {
            store.append(entry(n)).unwrap();
        }
        let state = store.load().unwrap();
        assert_eq!(state.history.len(), HISTORY_CAP);
        assert_eq!(state.history.entries().last().unwrap().id, entry(1).id);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_store_clear_keeps_streak() {
        let path = temp_path("clear");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileHistoryStore::new(&path);
        store.append(entry(1)).unwrap();
        store.clear().unwrap();
        let state = store.load().unwrap();
        assert!(state.history.is_empty());
        assert_eq!(state.streak.count, 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_lock_is_exclusive() {
        let path = temp_path("locked");
        let held = FileLock::acquire(&path).unwrap();
        let err = FileLock::acquire(&path).err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.is_recoverable());
        drop(held);

        // Released in place: the same lock file is reused
        assert!(lock_path_for(&path).exists());
        assert!(FileLock::acquire(&path).is_ok());
        let _ = fs::remove_file(lock_path_for(&path));
    }

    #[test]
    fn test_overflowing_result_keeps_history_readable() {
        let path = temp_path("overflow");
        let _ = fs::remove_file(&path);

        let kind = CalculationKind::PipeFlow;
        let raw = HashMap::from([
            ("pressureDifference".to_string(), "10".to_string()),
            ("pipeLength".to_string(), "100".to_string()),
            ("pipeDiameter".to_string(), "1e100".to_string()),
            ("fluidViscosity".to_string(), "1".to_string()),
        ]);
        let units = HashMap::new();
        let result = compute(kind.id(), &raw, &units, kind.fields());
        assert_eq!(result.number(labels::FLOW_RATE), Some(0.0));

        let timestamp = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut store = JsonFileHistoryStore::new(&path);
        store
            .append(CalculationHistoryEntry::new(kind, kind.fields(), &raw, &units, result, timestamp))
            .unwrap();
        store.append(entry(2)).unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.history.len(), 2);
        assert_eq!(
            state.history.entries()[1].result.number(labels::FLOW_RATE),
            Some(0.0)
        );

        let _ = fs::remove_file(&path);
        let _ = fs::remove_file(lock_path_for(&path));
    }

    #[test]
    fn test_rejects_newer_schema() {
        let path = temp_path("newer");
        fs::write(&path, r#"{"version":"0.9.0","history":[]}"#).unwrap();
        let err = load_history_state(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_json() {
        let path = temp_path("invalid");
        fs::write(&path, "not json").unwrap();
        let err = load_history_state(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.3").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
