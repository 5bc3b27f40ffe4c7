use std::collections::HashSet;
use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::config::{Config, ConfigManager};
use crate::core::backup::BackupDocument;
use crate::core::errors::{Committed, LedgerError};
use crate::core::services::{
    BalanceService, Dashboard, MonthlyReport, ReportService, Statement, StatementService,
    TransactionService,
};
use crate::core::time::{Clock, Stamper, SystemClock};
use crate::domain::{
    Displayable, PartyRegistry, PartyRole, Settings, Transaction, TransactionInput,
};
use crate::money::MoneyFormatter;
use crate::storage::{
    read_collection, read_document, read_optional_collection, write_value, Collection,
    JsonStorage, StorageBackend,
};

/// Owns the in-memory ledger and mirrors every mutation to the persistence backend.
///
/// Reads never touch the backend. A failed write leaves memory updated and is reported
/// through [`Committed::write_failures`].
pub struct LedgerStore {
    sales: Vec<Transaction>,
    expenses: Vec<Transaction>,
    registry: PartyRegistry,
    settings: Settings,
    config: Config,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    stamper: Stamper,
    retired_ids: HashSet<(PartyRole, String)>,
    load_warnings: Vec<LedgerError>,
}

impl LedgerStore {
    pub fn open(storage: Box<dyn StorageBackend>) -> Self {
        Self::open_with(storage, Box::new(SystemClock), Config::default())
    }

    /// Loads every collection. Unreadable collections start empty and are listed in
    /// [`LedgerStore::load_warnings`].
    pub fn open_with(
        storage: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
        config: Config,
    ) -> Self {
        let mut warnings = Vec::new();
        let backend = storage.as_ref();

        let mut sales: Vec<Transaction> =
            recover(read_collection(backend, Collection::Sales), &mut warnings);
        let mut expenses: Vec<Transaction> =
            recover(read_collection(backend, Collection::Expenses), &mut warnings);
        let clients: Vec<String> =
            recover(read_collection(backend, Collection::Clients), &mut warnings);
        let stored_suppliers: Option<Vec<String>> =
            recover(read_optional_collection(backend, Collection::Suppliers), &mut warnings);
        let settings: Settings =
            recover(read_document(backend, Collection::Settings), &mut warnings);

        rehome(&mut sales, &mut expenses, PartyRole::Client, &mut warnings);
        rehome(&mut expenses, &mut sales, PartyRole::Supplier, &mut warnings);

        // Older stores kept suppliers inside settings. Migrate them once, only when the
        // suppliers collection has never been written.
        let suppliers = match stored_suppliers {
            Some(suppliers) => suppliers,
            None => {
                let legacy = settings.legacy_suppliers();
                if !legacy.is_empty() {
                    info!(count = legacy.len(), "migrating supplier list out of settings");
                    if let Err(err) = write_value(backend, Collection::Suppliers, &legacy) {
                        warn!(error = %err, "supplier migration not persisted");
                        warnings.push(err);
                    }
                }
                legacy
            }
        };

        let mut stamper = Stamper::default();
        if let Some(latest) = sales.iter().chain(&expenses).map(|txn| txn.created_at).max() {
            stamper.observe(latest);
        }

        info!(
            sales = sales.len(),
            expenses = expenses.len(),
            warnings = warnings.len(),
            "ledger opened"
        );

        Self {
            sales,
            expenses,
            registry: PartyRegistry::from_lists(clients, suppliers),
            settings,
            config,
            storage,
            clock,
            stamper,
            retired_ids: HashSet::new(),
            load_warnings: warnings,
        }
    }

    /// Opens the JSON-file ledger under `base`, honoring `config.json` found there.
    pub fn open_in(base: PathBuf) -> Result<Self, LedgerError> {
        let manager = ConfigManager::with_base_dir(base)?;
        let config = manager.load()?;
        let storage = JsonStorage::in_dir(config.resolve_data_dir(manager.base_dir()))?;
        Ok(Self::open_with(Box::new(storage), Box::new(SystemClock), config))
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_warnings(&self) -> &[LedgerError] {
        &self.load_warnings
    }

    pub fn formatter(&self) -> MoneyFormatter {
        MoneyFormatter::from_config(&self.config)
    }

    /// Records of one role in insertion order.
    pub fn list(&self, role: PartyRole) -> &[Transaction] {
        match role {
            PartyRole::Client => &self.sales,
            PartyRole::Supplier => &self.expenses,
        }
    }

    /// Every record, sales first.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.sales.iter().chain(self.expenses.iter())
    }

    pub fn len(&self) -> usize {
        self.sales.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, role: PartyRole, id: &str) -> Option<&Transaction> {
        self.list(role).iter().find(|txn| txn.id == id)
    }

    /// Case-insensitive substring match on party name, newest first.
    pub fn search(&self, role: PartyRole, term: &str) -> Vec<&Transaction> {
        let needle = term.trim().to_lowercase();
        let mut found: Vec<&Transaction> = self
            .list(role)
            .iter()
            .filter(|txn| txn.party.to_lowercase().contains(&needle))
            .collect();
        found.sort_by(|a, b| b.chronological_cmp(a));
        found
    }

    pub fn create(
        &mut self,
        input: TransactionInput,
    ) -> Result<Committed<Transaction>, LedgerError> {
        let role = input.role();
        let id = match input.id.as_deref().map(str::trim) {
            Some("") => return Err(LedgerError::validation("id cannot be empty")),
            Some(id) => id.to_string(),
            None => TransactionService::new_id(),
        };
        if self.get(role, &id).is_some() {
            return Err(LedgerError::validation(format!(
                "transaction id {id} already exists"
            )));
        }
        if self.retired_ids.contains(&(role, id.clone())) {
            return Err(LedgerError::validation(format!(
                "transaction id {id} was deleted and cannot be reused"
            )));
        }
        let created_at = match input.created_at {
            Some(stamp) => {
                self.stamper.observe(stamp);
                stamp
            }
            None => self.stamper.next(self.clock.as_ref()),
        };
        let txn = TransactionService::build(&input, id, created_at)?;

        self.records_mut(role).push(txn.clone());
        debug!(label = %txn.display_label(), "transaction created");
        let failures = self.persist_with_party(role, &txn.party);
        Ok(Committed::new(txn, failures))
    }

    /// Replaces the record stored under `id`. The creation stamp is kept unless the input
    /// carries one.
    pub fn update(
        &mut self,
        id: &str,
        input: TransactionInput,
    ) -> Result<Committed<Transaction>, LedgerError> {
        let role = input.role();
        if let Some(other) = input.id.as_deref() {
            if other != id {
                return Err(LedgerError::validation(format!(
                    "input id {other} does not match {id}"
                )));
            }
        }
        let position = self
            .list(role)
            .iter()
            .position(|txn| txn.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let created_at = input
            .created_at
            .unwrap_or(self.list(role)[position].created_at);
        let txn = TransactionService::build(&input, id.to_string(), created_at)?;

        self.records_mut(role)[position] = txn.clone();
        debug!(label = %txn.display_label(), "transaction updated");
        let failures = self.persist_with_party(role, &txn.party);
        Ok(Committed::new(txn, failures))
    }

    /// Removes the record if present. Deleting an unknown id changes nothing and writes
    /// nothing.
    pub fn delete(&mut self, role: PartyRole, id: &str) -> Committed<Option<Transaction>> {
        let records = self.records_mut(role);
        let Some(position) = records.iter().position(|txn| txn.id == id) else {
            debug!(%id, %role, "delete ignored for unknown id");
            return Committed::new(None, Vec::new());
        };
        let removed = records.remove(position);
        self.retired_ids.insert((role, removed.id.clone()));
        debug!(label = %removed.display_label(), "transaction deleted");
        let failures = self
            .persist(Collection::transactions_for(role))
            .into_iter()
            .collect();
        Committed::new(Some(removed), failures)
    }

    pub fn registry(&self) -> &PartyRegistry {
        &self.registry
    }

    pub fn parties(&self, role: PartyRole) -> &[String] {
        self.registry.names(role)
    }

    pub fn register_party(
        &mut self,
        role: PartyRole,
        name: &str,
    ) -> Result<Committed<bool>, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("party name is required"));
        }
        if !self.registry.register(role, name) {
            return Ok(Committed::new(false, Vec::new()));
        }
        debug!(%role, %name, "party registered");
        let failures = self
            .persist(Collection::registry_for(role))
            .into_iter()
            .collect();
        Ok(Committed::new(true, failures))
    }

    /// Drops a name from the registry. Its transactions and balance are untouched.
    pub fn remove_party(&mut self, role: PartyRole, name: &str) -> Committed<bool> {
        if !self.registry.remove(role, name) {
            return Committed::new(false, Vec::new());
        }
        debug!(%role, %name, "party removed");
        let failures = self
            .persist(Collection::registry_for(role))
            .into_iter()
            .collect();
        Committed::new(true, failures)
    }

    pub fn replace_parties<I, S>(&mut self, role: PartyRole, names: I) -> Committed<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.replace(role, names);
        let failures = self
            .persist(Collection::registry_for(role))
            .into_iter()
            .collect();
        Committed::new((), failures)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) -> Committed<()> {
        self.settings = settings;
        let failures = self.persist(Collection::Settings).into_iter().collect();
        Committed::new((), failures)
    }

    pub fn client_balance(&self, client: &str) -> Decimal {
        BalanceService::client_balance(self.transactions(), client)
    }

    pub fn supplier_due(&self, supplier: &str) -> Decimal {
        BalanceService::supplier_due(self.transactions(), supplier)
    }

    /// Totals plus the configured number of most recent records.
    pub fn dashboard(&self) -> Dashboard<'_> {
        BalanceService::dashboard(self.transactions(), self.config.recent_limit)
    }

    pub fn monthly_reports(&self) -> Vec<MonthlyReport> {
        ReportService::monthly(self.transactions())
    }

    pub fn statement(&self, role: PartyRole, party: &str) -> Statement {
        StatementService::build(self.list(role), party, role)
    }

    pub fn export(&self) -> BackupDocument {
        BackupDocument {
            sales: self.sales.clone(),
            expenses: self.expenses.clone(),
            clients: self.registry.names(PartyRole::Client).to_vec(),
            suppliers: Some(self.registry.names(PartyRole::Supplier).to_vec()),
            settings: self.settings.clone(),
        }
    }

    /// Replaces every collection with the document's contents. Nothing changes when the
    /// document fails validation.
    pub fn restore(&mut self, document: BackupDocument) -> Result<Committed<()>, LedgerError> {
        document.validate()?;
        let suppliers = document.resolved_suppliers();
        let BackupDocument {
            sales,
            expenses,
            clients,
            settings,
            ..
        } = document;

        if let Some(latest) = sales.iter().chain(&expenses).map(|txn| txn.created_at).max() {
            self.stamper.observe(latest);
        }
        self.sales = sales;
        self.expenses = expenses;
        self.registry = PartyRegistry::from_lists(clients, suppliers);
        self.settings = settings;
        info!(
            sales = self.sales.len(),
            expenses = self.expenses.len(),
            "ledger restored from backup"
        );

        let failures = Collection::ALL
            .into_iter()
            .filter_map(|collection| self.persist(collection))
            .collect();
        Ok(Committed::new((), failures))
    }

    fn records_mut(&mut self, role: PartyRole) -> &mut Vec<Transaction> {
        match role {
            PartyRole::Client => &mut self.sales,
            PartyRole::Supplier => &mut self.expenses,
        }
    }

    /// Writes the role's transactions and, when `party` is new, its registry.
    fn persist_with_party(&mut self, role: PartyRole, party: &str) -> Vec<LedgerError> {
        let mut failures: Vec<LedgerError> = self
            .persist(Collection::transactions_for(role))
            .into_iter()
            .collect();
        if self.registry.register(role, party) {
            debug!(%role, %party, "party registered from transaction");
            failures.extend(self.persist(Collection::registry_for(role)));
        }
        failures
    }

    fn persist(&self, collection: Collection) -> Option<LedgerError> {
        let backend = self.storage.as_ref();
        let result = match collection {
            Collection::Sales => write_value(backend, collection, &self.sales),
            Collection::Expenses => write_value(backend, collection, &self.expenses),
            Collection::Clients => {
                write_value(backend, collection, self.registry.names(PartyRole::Client))
            }
            Collection::Suppliers => {
                write_value(backend, collection, self.registry.names(PartyRole::Supplier))
            }
            Collection::Settings => write_value(backend, collection, &self.settings),
        };
        match result {
            Ok(()) => None,
            Err(err) => {
                error!(%collection, error = %err, "write failed; in-memory state kept");
                Some(err)
            }
        }
    }
}

fn recover<T: Default>(result: Result<T, LedgerError>, warnings: &mut Vec<LedgerError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "collection unreadable; starting empty");
            warnings.push(err);
            T::default()
        }
    }
}

/// Moves records whose role does not belong in `own` over to `other`. A stray record whose
/// id is already taken there is dropped and reported in `warnings`.
fn rehome(
    own: &mut Vec<Transaction>,
    other: &mut Vec<Transaction>,
    role: PartyRole,
    warnings: &mut Vec<LedgerError>,
) {
    let (kept, stray): (Vec<_>, Vec<_>) = own.drain(..).partition(|txn| txn.role() == role);
    *own = kept;
    let home = Collection::transactions_for(role);
    for txn in stray {
        warn!(id = %txn.id, kind = %txn.kind(), "record stored under the wrong collection");
        if other.iter().any(|existing| existing.id == txn.id) {
            error!(id = %txn.id, "misfiled record collides with an existing id; dropped");
            warnings.push(LedgerError::PersistenceRead {
                collection: home.key().to_string(),
                message: format!(
                    "{} record {} is misfiled and its id is already used in {}; dropped",
                    txn.kind(),
                    txn.id,
                    Collection::transactions_for(txn.role())
                ),
            });
        } else {
            other.push(txn);
        }
    }
}
