use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::core::{
    errors::Result,
    utils::{ensure_dir, PathResolver},
};

use super::{Collection, StorageBackend};

const FILE_PREFIX: &str = "ledger_";
const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed persistence: one `ledger_<key>.json` file per collection.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_dir: PathBuf,
}

impl JsonStorage {
    /// Opens storage under `root`, or under the resolved application directory when `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        let data_dir = PathResolver::data_dir_in(&base);
        Self::in_dir(data_dir)
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    /// Uses `data_dir` directly as the collection directory.
    pub fn in_dir(data_dir: PathBuf) -> Result<Self> {
        ensure_dir(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!(
            "{}{}.{}",
            FILE_PREFIX,
            collection.key(),
            FILE_EXTENSION
        ))
    }
}

impl StorageBackend for JsonStorage {
    fn read(&self, collection: Collection) -> Result<Option<String>> {
        match fs::read_to_string(self.collection_path(collection)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, collection: Collection, contents: &str) -> Result<()> {
        let path = self.collection_path(collection);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
