#![forbid(unsafe_code)]

//! Flag store backends.
//!
//! # Role
//! Concrete [`FlagStore`] implementations: a volatile in-memory map for
//! tests and previews, and a JSON-file store that survives restarts. The
//! [`ShownRegistry`](crate::ShownRegistry) sits on top of either and never
//! cares which one it got.
//!
//! # Invariants
//! - A key that was never written reads as `false`, not as an error.
//! - [`JsonFileStore`] keeps its whole map in memory and rewrites the file
//!   on every mutation, so reads never touch the filesystem.
//! - File writes go through a temp file plus rename; a crash mid-write
//!   leaves the previous snapshot intact.
//!
//! # Failure Modes
//! - Opening a corrupted or future-versioned file fails with
//!   [`StoreError::Format`] rather than silently starting empty, so the
//!   caller can decide whether losing history is acceptable.
//!
//! # Example
//! ```ignore
//! let mut store = JsonFileStore::open("/tmp/waymark-flags.json")?;
//! store.set_bool("tutorial_shown_intro", true)?;
//! assert!(store.get_bool("tutorial_shown_intro")?);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use waymark_core::{FlagStore, StoreError};

/// Bumped whenever the on-disk layout changes shape.
const FORMAT_VERSION: u64 = 1;

/// Volatile [`FlagStore`] backed by a plain map.
///
/// Nothing survives a drop. Intended for tests, previews, and hosts that
/// deliberately want every tutorial to replay each launch.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    flags: HashMap<String, bool>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys ever written, including explicit `false` writes.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.flags.get(key).copied().unwrap_or(false))
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.flags.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Serialized snapshot of the whole store.
#[derive(Debug, Serialize, Deserialize)]
struct FlagsFile {
    version: u64,
    saved_at: String,
    flags: BTreeMap<String, bool>,
}

/// Durable [`FlagStore`] that snapshots to a pretty-printed JSON file.
///
/// The file is loaded once at [`open`](JsonFileStore::open) and rewritten
/// atomically after every mutation. Keys are kept in a [`BTreeMap`] so the
/// serialized output is deterministic and diffs stay readable.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

impl JsonFileStore {
    /// Opens the store at `path`, reading any existing snapshot.
    ///
    /// A missing file is an empty store. A corrupted or future-versioned
    /// file is an error; the caller decides whether to delete and retry.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let flags = read_flags(&path)?;
        debug!(path = %path.display(), entries = flags.len(), "flag store opened");
        Ok(Self { path, flags })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let file = FlagsFile {
            version: FORMAT_VERSION,
            saved_at: now_iso8601(),
            flags: self.flags.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|err| StoreError::Format(format!("failed to serialize flags: {err}")))?;
        // Write-then-rename so a crash mid-write cannot truncate the
        // previous snapshot.
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl FlagStore for JsonFileStore {
    fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.flags.get(key).copied().unwrap_or(false))
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.flags.insert(key.to_owned(), value);
        self.flush()
    }
}

fn read_flags(path: &Path) -> Result<BTreeMap<String, bool>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let json = std::fs::read_to_string(path)?;
    let file: FlagsFile = serde_json::from_str(&json)
        .map_err(|err| StoreError::Format(format!("failed to parse flags file: {err}")))?;
    if file.version != FORMAT_VERSION {
        return Err(StoreError::Format(format!(
            "unsupported flags file version {} (expected {FORMAT_VERSION})",
            file.version
        )));
    }
    Ok(file.flags)
}

/// Current UTC time as an ISO-8601 string, e.g. `2026-03-14T09:26:53Z`.
fn now_iso8601() -> String {
    use web_time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();
    let (year, month, day) = days_to_ymd(secs / 86_400);
    let tod = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        tod / 3_600,
        (tod % 3_600) / 60,
        tod % 60
    )
}

/// Civil-from-days conversion (Howard Hinnant's algorithm), valid for any
/// date the epoch can reach.
fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("flags.json")
    }

    // --- MemoryFlagStore tests ---

    #[test]
    fn memory_store_defaults_to_false() {
        let store = MemoryFlagStore::new();
        assert!(!store.get_bool("anything").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_round_trips_writes() {
        let mut store = MemoryFlagStore::new();
        store.set_bool("a", true).unwrap();
        store.set_bool("b", false).unwrap();
        assert!(store.get_bool("a").unwrap());
        assert!(!store.get_bool("b").unwrap());
        assert_eq!(store.len(), 2);
    }

    // --- JsonFileStore tests ---

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).unwrap();
        assert!(!store.get_bool("tutorial_shown_intro").unwrap());
    }

    #[test]
    fn round_trip_preserves_flags() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set_bool("tutorial_shown_intro", true).unwrap();
            store.set_bool("tutorial_shown_search", true).unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get_bool("tutorial_shown_intro").unwrap());
        assert!(store.get_bool("tutorial_shown_search").unwrap());
        assert!(!store.get_bool("tutorial_shown_other").unwrap());
    }

    #[test]
    fn explicit_false_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set_bool("tutorial_shown_intro", true).unwrap();
            store.set_bool("tutorial_shown_intro", false).unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert!(!store.get_bool("tutorial_shown_intro").unwrap());
    }

    #[test]
    fn corrupted_file_returns_error() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        std::fs::write(&path, "this is not json {{{").unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
    }

    #[test]
    fn version_mismatch_returns_error() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        std::fs::write(
            &path,
            r#"{"version": 99, "saved_at": "2026-01-01T00:00:00Z", "flags": {}}"#,
        )
        .unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        match err {
            StoreError::Format(msg) => assert!(msg.contains("version 99")),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_bool("tutorial_shown_intro", true).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_is_human_readable_json() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_bool("tutorial_shown_intro", true).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"version\": 1"));
        assert!(contents.contains("\"tutorial_shown_intro\": true"));
        assert!(contents.contains("\"saved_at\""));
    }

    #[test]
    fn deterministic_output_ordering() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_bool("tutorial_shown_zeta", true).unwrap();
        store.set_bool("tutorial_shown_alpha", true).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let alpha = contents.find("tutorial_shown_alpha").unwrap();
        let zeta = contents.find("tutorial_shown_zeta").unwrap();
        assert!(alpha < zeta, "keys should serialize in sorted order");
    }

    #[test]
    fn saved_at_is_iso8601_utc() {
        let stamp = now_iso8601();
        assert_eq!(stamp.len(), 20);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], "T");
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn days_to_ymd_matches_known_dates() {
        assert_eq!(days_to_ymd(0), (1970, 1, 1));
        assert_eq!(days_to_ymd(10_957), (2000, 1, 1));
        assert_eq!(days_to_ymd(11_016), (2000, 2, 29));
        assert_eq!(days_to_ymd(19_723), (2024, 1, 1));
    }
}
