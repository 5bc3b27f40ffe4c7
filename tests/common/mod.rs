#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use chrono::{NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use trade_ledger::{
    Collection, Config, FixedClock, LedgerError, LedgerStore, MemoryStorage, StorageBackend,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// JSON-file store rooted in its own temporary directory.
pub fn setup_json_store() -> (LedgerStore, PathBuf) {
    let base = temp_base();
    let store = LedgerStore::open_in(base.clone()).expect("open json ledger");
    (store, base)
}

/// In-memory store with a frozen clock. The returned handle shares the store's backend.
pub fn setup_memory_store() -> (LedgerStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = open_memory(&storage);
    (store, storage)
}

pub fn open_memory(storage: &MemoryStorage) -> LedgerStore {
    LedgerStore::open_with(
        Box::new(storage.clone()),
        Box::new(frozen_clock()),
        Config::default(),
    )
}

pub fn frozen_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap())
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Backend whose writes can be switched off to simulate a full disk.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    reject_writes: Arc<AtomicBool>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }
}

impl StorageBackend for FlakyStorage {
    fn read(&self, collection: Collection) -> Result<Option<String>, LedgerError> {
        self.inner.read(collection)
    }

    fn write(&self, collection: Collection, contents: &str) -> Result<(), LedgerError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("quota exceeded".into()));
        }
        self.inner.write(collection, contents)
    }
}
