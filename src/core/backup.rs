use serde::{Deserialize, Serialize};

use crate::core::errors::LedgerError;
use crate::domain::common::first_duplicate_id;
use crate::domain::{PartyRole, Settings, Transaction};

/// Portable snapshot of every collection.
///
/// `suppliers` is optional on input: documents written before suppliers had their own
/// collection omit it, and restore then rebuilds the list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BackupDocument {
    #[serde(default)]
    pub sales: Vec<Transaction>,
    #[serde(default)]
    pub expenses: Vec<Transaction>,
    #[serde(default)]
    pub clients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppliers: Option<Vec<String>>,
    #[serde(default)]
    pub settings: Settings,
}

impl BackupDocument {
    pub fn to_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(self).map_err(LedgerError::from)
    }

    /// Parses a backup. Malformed text or records are reported as validation failures.
    pub fn from_json(text: &str) -> Result<Self, LedgerError> {
        let document: Self = serde_json::from_str(text)
            .map_err(|err| LedgerError::validation(format!("invalid backup document: {err}")))?;
        document.validate()?;
        Ok(document)
    }

    /// Checks that each collection only holds its own role's records and that ids are
    /// unique within a collection.
    pub fn validate(&self) -> Result<(), LedgerError> {
        for (name, records, role) in [
            ("sales", &self.sales, PartyRole::Client),
            ("expenses", &self.expenses, PartyRole::Supplier),
        ] {
            if let Some(stray) = records.iter().find(|txn| txn.role() != role) {
                return Err(LedgerError::validation(format!(
                    "{name} holds {} record {}",
                    stray.role(),
                    stray.id
                )));
            }
            for txn in records {
                txn.validate()?;
            }
            if let Some(id) = first_duplicate_id(records.iter()) {
                return Err(LedgerError::validation(format!(
                    "{name} holds duplicate id {id}"
                )));
            }
        }
        Ok(())
    }

    /// Supplier names to install on restore: the explicit list when present, otherwise the
    /// names kept in settings by older documents, otherwise every supplier named in
    /// `expenses` in first-seen order.
    pub fn resolved_suppliers(&self) -> Vec<String> {
        if let Some(suppliers) = &self.suppliers {
            return suppliers.clone();
        }
        let legacy = self.settings.legacy_suppliers();
        if !legacy.is_empty() {
            return legacy;
        }
        let mut ordered: Vec<&Transaction> = self.expenses.iter().collect();
        ordered.sort_by(|a, b| a.chronological_cmp(b));
        let mut names: Vec<String> = Vec::new();
        for txn in ordered {
            if !names.contains(&txn.party) {
                names.push(txn.party.clone());
            }
        }
        names
    }
}
