use std::{cmp::Ordering, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::errors::LedgerError;
use crate::domain::common::{Displayable, Identifiable};

/// Which side of the business a party sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Client,
    Supplier,
}

impl PartyRole {
    pub const ALL: [PartyRole; 2] = [PartyRole::Client, PartyRole::Supplier];

    pub fn label(self) -> &'static str {
        match self {
            PartyRole::Client => "client",
            PartyRole::Supplier => "supplier",
        }
    }

    /// The kind that raises this role's balance.
    pub fn charge_kind(self) -> TransactionKind {
        match self {
            PartyRole::Client => TransactionKind::Sale,
            PartyRole::Supplier => TransactionKind::Purchase,
        }
    }

    /// The kind that settles this role's balance.
    pub fn settlement_kind(self) -> TransactionKind {
        match self {
            PartyRole::Client => TransactionKind::PaymentIn,
            PartyRole::Supplier => TransactionKind::PaymentOut,
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
    PaymentIn,
    PaymentOut,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Sale,
        TransactionKind::Purchase,
        TransactionKind::PaymentIn,
        TransactionKind::PaymentOut,
    ];

    pub fn role(self) -> PartyRole {
        match self {
            TransactionKind::Sale | TransactionKind::PaymentIn => PartyRole::Client,
            TransactionKind::Purchase | TransactionKind::PaymentOut => PartyRole::Supplier,
        }
    }

    pub fn is_payment(self) -> bool {
        matches!(self, TransactionKind::PaymentIn | TransactionKind::PaymentOut)
    }

    /// Applies the balance sign convention: trade kinds add, payment kinds subtract.
    pub fn signed(self, amount: Decimal) -> Decimal {
        if self.is_payment() {
            -amount
        } else {
            amount
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Sale => "Credit Sale",
            TransactionKind::Purchase => "Purchase",
            TransactionKind::PaymentIn => "Cash Received",
            TransactionKind::PaymentOut => "Cash Paid",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Goods or services moved by a sale or purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub item: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(
        item: Option<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            item,
            quantity,
            unit: unit.into(),
            unit_price,
        }
    }

    /// `quantity × unit_price` at full precision.
    pub fn extended_amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.quantity <= Decimal::ZERO {
            return Err(LedgerError::validation("quantity must be positive"));
        }
        if self.unit.trim().is_empty() {
            return Err(LedgerError::validation("unit is required"));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(LedgerError::validation("unit price cannot be negative"));
        }
        Ok(())
    }
}

/// Kind-specific payload. Trade kinds always carry a line item, payments never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Sale(LineItem),
    Purchase(LineItem),
    PaymentIn,
    PaymentOut,
}

impl Entry {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Entry::Sale(_) => TransactionKind::Sale,
            Entry::Purchase(_) => TransactionKind::Purchase,
            Entry::PaymentIn => TransactionKind::PaymentIn,
            Entry::PaymentOut => TransactionKind::PaymentOut,
        }
    }

    pub fn line(&self) -> Option<&LineItem> {
        match self {
            Entry::Sale(line) | Entry::Purchase(line) => Some(line),
            Entry::PaymentIn | Entry::PaymentOut => None,
        }
    }

    /// Pairs a kind with an optional line item, rejecting combinations the kind forbids.
    pub fn from_parts(kind: TransactionKind, line: Option<LineItem>) -> Result<Self, LedgerError> {
        match (kind, line) {
            (TransactionKind::Sale, Some(line)) => Ok(Entry::Sale(line)),
            (TransactionKind::Purchase, Some(line)) => Ok(Entry::Purchase(line)),
            (TransactionKind::PaymentIn, None) => Ok(Entry::PaymentIn),
            (TransactionKind::PaymentOut, None) => Ok(Entry::PaymentOut),
            (kind, None) => Err(LedgerError::validation(format!(
                "{} requires quantity, unit and unit price",
                kind.label()
            ))),
            (kind, Some(_)) => Err(LedgerError::validation(format!(
                "{} cannot carry item, quantity, unit or unit price",
                kind.label()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TransactionRecord", try_from = "TransactionRecord")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub party: String,
    pub entry: Entry,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        self.entry.kind()
    }

    pub fn role(&self) -> PartyRole {
        self.kind().role()
    }

    pub fn line(&self) -> Option<&LineItem> {
        self.entry.line()
    }

    /// Amount with the balance sign applied.
    pub fn signed_amount(&self) -> Decimal {
        self.kind().signed(self.amount)
    }

    /// Whether this record belongs to `party` under `role` (exact, case-sensitive).
    pub fn concerns(&self, party: &str, role: PartyRole) -> bool {
        self.role() == role && self.party == party
    }

    /// Ascending order by date, then creation stamp, then id.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Checks the field invariants a stored transaction must hold.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.id.trim().is_empty() {
            return Err(LedgerError::validation("id cannot be empty"));
        }
        if self.party.trim().is_empty() {
            return Err(LedgerError::validation("party name is required"));
        }
        if self.amount < Decimal::ZERO {
            return Err(LedgerError::validation("amount cannot be negative"));
        }
        if let Some(line) = self.line() {
            line.validate()?;
        }
        Ok(())
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{} {}]", self.id, self.kind().label(), self.party)
    }
}

/// Flat wire shape: carries the derived `role` and the optional line fields side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    id: String,
    date: NaiveDate,
    party: String,
    #[serde(default)]
    role: Option<PartyRole>,
    kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_price: Option<Decimal>,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionRecord {
    fn from(txn: Transaction) -> Self {
        let kind = txn.kind();
        let (item, quantity, unit, unit_price) = match txn.entry {
            Entry::Sale(line) | Entry::Purchase(line) => (
                line.item,
                Some(line.quantity),
                Some(line.unit),
                Some(line.unit_price),
            ),
            Entry::PaymentIn | Entry::PaymentOut => (None, None, None, None),
        };
        Self {
            id: txn.id,
            date: txn.date,
            party: txn.party,
            role: Some(kind.role()),
            kind,
            item,
            quantity,
            unit,
            unit_price,
            amount: txn.amount,
            created_at: txn.created_at,
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = LedgerError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        if let Some(role) = record.role {
            if role != record.kind.role() {
                return Err(LedgerError::validation(format!(
                    "transaction {} is a {} but is tagged {}",
                    record.id,
                    record.kind.label(),
                    role
                )));
            }
        }
        let line = match (record.quantity, record.unit, record.unit_price) {
            (None, None, None) if record.item.is_none() => None,
            (Some(quantity), Some(unit), Some(unit_price)) => {
                Some(LineItem::new(record.item, quantity, unit, unit_price))
            }
            _ if record.kind.is_payment() => {
                return Err(LedgerError::validation(format!(
                    "payment {} cannot carry line fields",
                    record.id
                )))
            }
            _ => {
                return Err(LedgerError::validation(format!(
                    "transaction {} has incomplete line fields",
                    record.id
                )))
            }
        };
        let txn = Transaction {
            id: record.id,
            date: record.date,
            party: record.party,
            entry: Entry::from_parts(record.kind, line)?,
            amount: record.amount,
            created_at: record.created_at,
        };
        txn.validate()?;
        Ok(txn)
    }
}

/// Caller-supplied fields for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    pub id: Option<String>,
    pub date: NaiveDate,
    pub party: String,
    pub kind: TransactionKind,
    pub item: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionInput {
    pub fn new(date: NaiveDate, party: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            id: None,
            date,
            party: party.into(),
            kind,
            item: None,
            quantity: None,
            unit: None,
            unit_price: None,
            amount: None,
            created_at: None,
        }
    }

    pub fn sale(
        date: NaiveDate,
        client: impl Into<String>,
        item: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self::new(date, client, TransactionKind::Sale).with_line(item, quantity, unit, unit_price)
    }

    pub fn purchase(
        date: NaiveDate,
        supplier: impl Into<String>,
        item: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self::new(date, supplier, TransactionKind::Purchase)
            .with_line(item, quantity, unit, unit_price)
    }

    pub fn payment_in(date: NaiveDate, client: impl Into<String>, amount: Decimal) -> Self {
        Self::new(date, client, TransactionKind::PaymentIn).with_amount(amount)
    }

    pub fn payment_out(date: NaiveDate, supplier: impl Into<String>, amount: Decimal) -> Self {
        Self::new(date, supplier, TransactionKind::PaymentOut).with_amount(amount)
    }

    pub fn with_line(
        mut self,
        item: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        self.item = Some(item.into());
        self.quantity = Some(quantity);
        self.unit = Some(unit.into());
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn role(&self) -> PartyRole {
        self.kind.role()
    }
}

impl From<&Transaction> for TransactionInput {
    fn from(txn: &Transaction) -> Self {
        let mut input = TransactionInput::new(txn.date, txn.party.clone(), txn.kind())
            .with_id(txn.id.clone())
            .with_amount(txn.amount)
            .with_created_at(txn.created_at);
        if let Some(line) = txn.line() {
            input.item = line.item.clone();
            input.quantity = Some(line.quantity);
            input.unit = Some(line.unit.clone());
            input.unit_price = Some(line.unit_price);
        }
        input
    }
}
