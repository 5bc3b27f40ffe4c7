pub mod backup;
pub mod errors;
pub mod ledger_store;
pub mod services;
pub mod time;
pub mod utils;

pub use backup::BackupDocument;
pub use errors::{Committed, LedgerError};
pub use ledger_store::LedgerStore;
