#![doc(test(attr(deny(warnings))))]

//! Trade Ledger keeps the books of a small trading business: credit sales and payments
//! received from clients, purchases and payments made to suppliers, with balances,
//! monthly reports, party statements and whole-ledger backups derived from them.

pub mod config;
pub mod core;
pub mod domain;
pub mod money;
pub mod storage;
pub mod utils;

pub use crate::config::{Config, ConfigManager};
pub use crate::core::errors::{Committed, LedgerError, Result};
pub use crate::core::services::{
    BalanceService, Dashboard, DashboardTotals, MonthlyReport, PartySummary, ReportService,
    Statement, StatementRow, StatementService, TransactionService,
};
pub use crate::core::time::{Clock, FixedClock, SystemClock};
pub use crate::core::{BackupDocument, LedgerStore};
pub use crate::domain::{
    Entry, LineItem, Party, PartyRegistry, PartyRole, Settings, Transaction, TransactionInput,
    TransactionKind,
};
pub use crate::money::{format_amount, MoneyFormatter};
pub use crate::storage::{Collection, JsonStorage, MemoryStorage, StorageBackend};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Trade Ledger tracing initialized.");
    });
}
