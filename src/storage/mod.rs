pub mod json_backend;
pub mod memory_backend;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::core::errors::{LedgerError, Result};
use crate::domain::PartyRole;

/// Named collections kept by the persistence backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Sales,
    Expenses,
    Clients,
    Suppliers,
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Sales,
        Collection::Expenses,
        Collection::Clients,
        Collection::Suppliers,
        Collection::Settings,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Collection::Sales => "sales",
            Collection::Expenses => "expenses",
            Collection::Clients => "clients",
            Collection::Suppliers => "suppliers",
            Collection::Settings => "settings",
        }
    }

    /// Transaction collection owning a role's records.
    pub fn transactions_for(role: PartyRole) -> Self {
        match role {
            PartyRole::Client => Collection::Sales,
            PartyRole::Supplier => Collection::Expenses,
        }
    }

    /// Registry collection listing a role's party names.
    pub fn registry_for(role: PartyRole) -> Self {
        match role {
            PartyRole::Client => Collection::Clients,
            PartyRole::Supplier => Collection::Suppliers,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Key/value persistence port. Each call reads or replaces one whole collection; a write
/// either lands completely or not at all.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored text for `collection`, or `None` when nothing was ever saved.
    fn read(&self, collection: Collection) -> Result<Option<String>>;
    fn write(&self, collection: Collection, contents: &str) -> Result<()>;
}

/// Decodes a record sequence. Absent keys and stored `null` both read as empty.
pub fn read_collection<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    collection: Collection,
) -> Result<Vec<T>> {
    let records: Option<Vec<T>> = read_value(backend, collection)?;
    Ok(records.unwrap_or_default())
}

/// Like [`read_collection`] but keeps "never written" apart from a stored empty list.
pub fn read_optional_collection<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    collection: Collection,
) -> Result<Option<Vec<T>>> {
    read_value(backend, collection)
}

/// Decodes a single document such as settings, falling back to its default.
pub fn read_document<T: DeserializeOwned + Default>(
    backend: &dyn StorageBackend,
    collection: Collection,
) -> Result<T> {
    let document: Option<T> = read_value(backend, collection)?;
    Ok(document.unwrap_or_default())
}

pub fn write_value<T: Serialize + ?Sized>(
    backend: &dyn StorageBackend,
    collection: Collection,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|err| write_error(collection, err))?;
    backend
        .write(collection, &json)
        .map_err(|err| write_error(collection, err))
}

fn read_value<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    collection: Collection,
) -> Result<Option<T>> {
    let raw = backend
        .read(collection)
        .map_err(|err| read_error(collection, err))?;
    match raw {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(&text).map_err(|err| read_error(collection, err))
        }
        _ => Ok(None),
    }
}

fn read_error(collection: Collection, err: impl fmt::Display) -> LedgerError {
    LedgerError::PersistenceRead {
        collection: collection.key().to_string(),
        message: err.to_string(),
    }
}

fn write_error(collection: Collection, err: impl fmt::Display) -> LedgerError {
    LedgerError::PersistenceWrite {
        collection: collection.key().to_string(),
        message: err.to_string(),
    }
}

pub use json_backend::JsonStorage;
pub use memory_backend::MemoryStorage;
